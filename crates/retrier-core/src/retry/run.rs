//! Retry loop: run the subject until it succeeds or the decision aborts.

use crate::policy::{self, Decision, PolicyDescriptor, PolicyError, PolicyRegistry};
use std::fmt::Display;
use std::future::Future;

/// Resolve `descriptor` against the process-wide registry and return the
/// retry loop as a future.
///
/// Descriptor errors are returned here, before the subject is invoked. The
/// future resolves to the subject's first success, or to the reason the
/// decision function aborted with.
pub fn retrier<T, E, F, Fut>(
    subject: F,
    descriptor: PolicyDescriptor<E>,
) -> Result<impl Future<Output = Result<T, E>>, PolicyError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display + Send + 'static,
{
    let decision = policy::resolve(descriptor)?;
    Ok(run_with_retry(subject, decision))
}

/// Like [`retrier`], resolving named policies in `registry`.
pub fn retrier_with<T, E, F, Fut>(
    registry: &PolicyRegistry,
    subject: F,
    descriptor: PolicyDescriptor<E>,
) -> Result<impl Future<Output = Result<T, E>>, PolicyError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display + Send + 'static,
{
    let decision = policy::resolve_with(registry, descriptor)?;
    Ok(run_with_retry(subject, decision))
}

/// Attempts and decisions strictly alternate; the loop itself never gives up.
pub async fn run_with_retry<T, E, F, Fut>(
    mut subject: F,
    mut decision: Box<dyn Decision<E>>,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut attempt = 1u64;
    loop {
        match subject().await {
            Ok(value) => {
                tracing::info!(attempt, "subject succeeded");
                return Ok(value);
            }
            Err(reason) => {
                tracing::debug!(attempt, %reason, "subject failed; awaiting retry decision");
                if let Err(reason) = decision.decide(reason).await {
                    tracing::warn!(attempt, %reason, "giving up");
                    return Err(reason);
                }
                attempt = attempt.saturating_add(1);
            }
        }
    }
}
