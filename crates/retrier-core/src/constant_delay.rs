//! Built-in `constantDelay` policy: fixed wait between attempts and a fixed
//! retry budget.

use crate::policy::{DecisionFactory, ParamSpec, RetryPolicy, Verdict};
use futures::future::BoxFuture;
use serde_json::Value;
use std::fmt;
use std::time::Duration;

/// Waits `delay` before every retry and gives up after `max_retries` retries.
#[derive(Debug, Clone)]
pub struct ConstantDelay {
    delay: Duration,
    remaining: u32,
}

impl ConstantDelay {
    pub fn new(delay: Duration, max_retries: u32) -> Self {
        Self {
            delay,
            remaining: max_retries,
        }
    }

    /// Build from raw descriptor numbers: `delay_ms` in milliseconds.
    ///
    /// Both values are truncated toward zero. Negative and NaN inputs clamp
    /// to 0, so a negative retry count means a single attempt.
    pub fn from_numbers(delay_ms: f64, max_retries: f64) -> Self {
        if delay_ms < 0.0 || max_retries < 0.0 {
            tracing::warn!(delay_ms, max_retries, "negative constantDelay argument clamped to 0");
        }
        // `as` truncates toward zero and saturates at the integer bounds.
        Self::new(Duration::from_millis(delay_ms as u64), max_retries as u32)
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Retries left before the next failure aborts.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }
}

impl RetryPolicy for ConstantDelay {
    fn on_failure(&mut self, _reason: &dyn fmt::Display) -> BoxFuture<'_, Verdict> {
        Box::pin(async move {
            if self.remaining == 0 {
                return Verdict::Abort;
            }
            tokio::time::sleep(self.delay).await;
            self.remaining -= 1;
            tracing::debug!(
                delay_ms = self.delay.as_millis() as u64,
                remaining = self.remaining,
                "constantDelay: retrying"
            );
            Verdict::Proceed
        })
    }
}

/// Registry entry for [`ConstantDelay`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstantDelayFactory;

impl ConstantDelayFactory {
    pub const NAME: &'static str = "constantDelay";
    const PARAMS: [ParamSpec; 2] = [ParamSpec::number("delay"), ParamSpec::number("maxRetries")];
}

impl DecisionFactory for ConstantDelayFactory {
    fn params(&self) -> &[ParamSpec] {
        &Self::PARAMS
    }

    fn build(&self, args: &[Value]) -> Box<dyn RetryPolicy> {
        let number = |i: usize| args.get(i).and_then(Value::as_f64).unwrap_or(0.0);
        Box::new(ConstantDelay::from_numbers(number(0), number(1)))
    }
}
