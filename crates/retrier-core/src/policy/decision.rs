//! Decision functions: what the retry loop consults after every failure.
//!
//! Two shapes exist. [`Decision`] sees the failure reason and may replace
//! it when aborting; any `FnMut(E) -> impl Future<Output = Result<(), E>>`
//! closure is one. [`RetryPolicy`] is the form built by registered
//! factories: it inspects the reason but cannot replace it.
//! [`PolicyDecision`] adapts it to any displayable reason type.

use futures::future::BoxFuture;
use std::fmt;
use std::future::Future;

/// Per-run retry oracle. `Ok(())` means retry, `Err(reason)` means give up
/// and fail the run with `reason`.
pub trait Decision<E>: Send {
    fn decide(&mut self, reason: E) -> BoxFuture<'_, Result<(), E>>;
}

impl<E, F, Fut> Decision<E> for F
where
    F: FnMut(E) -> Fut + Send,
    Fut: Future<Output = Result<(), E>> + Send + 'static,
{
    fn decide(&mut self, reason: E) -> BoxFuture<'_, Result<(), E>> {
        Box::pin((self)(reason))
    }
}

/// Outcome of a registered policy for one failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Proceed,
    Abort,
}

/// Stateful policy produced by a [`DecisionFactory`](super::DecisionFactory).
///
/// Each instance belongs to exactly one run, so state such as a remaining
/// retry budget is mutated through `&mut self` without sharing.
pub trait RetryPolicy: Send {
    /// Called once per failed attempt with the failure reason; may wait
    /// before answering. The returned future cannot borrow `reason`, so
    /// classify it before building the future.
    fn on_failure(&mut self, reason: &dyn fmt::Display) -> BoxFuture<'_, Verdict>;
}

/// Adapts a registered [`RetryPolicy`] into a [`Decision`]. Aborting
/// propagates the failure reason unchanged.
pub struct PolicyDecision {
    name: String,
    policy: Box<dyn RetryPolicy>,
}

impl PolicyDecision {
    pub fn new(name: impl Into<String>, policy: Box<dyn RetryPolicy>) -> Self {
        Self {
            name: name.into(),
            policy,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<E: fmt::Display + Send + 'static> Decision<E> for PolicyDecision {
    fn decide(&mut self, reason: E) -> BoxFuture<'_, Result<(), E>> {
        let verdict = self.policy.on_failure(&reason);
        let name = &self.name;
        Box::pin(async move {
            match verdict.await {
                Verdict::Proceed => Ok(()),
                Verdict::Abort => {
                    tracing::debug!(policy = %name, %reason, "policy aborted");
                    Err(reason)
                }
            }
        })
    }
}
