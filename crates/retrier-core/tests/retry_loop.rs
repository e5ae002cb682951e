//! Integration tests: the retry loop driven by registered and custom policies.
//!
//! Timing tests run on tokio's paused clock, so delays are exact and instant.

use futures::future::BoxFuture;
use retrier_core::policy::{
    DecisionFactory, ParamSpec, ParamType, PolicyRegistry, RetryPolicy, Verdict,
};
use retrier_core::{retrier, retrier_with, PolicyDescriptor, PolicyError};
use serde_json::{json, Value};
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

/// Subject that fails `failures` times, recording when each attempt started.
fn flaky(
    failures: usize,
    log: Arc<Mutex<Vec<Instant>>>,
) -> impl FnMut() -> std::future::Ready<Result<usize, String>> {
    move || {
        let mut log = log.lock().unwrap();
        log.push(Instant::now());
        let n = log.len();
        std::future::ready(if n <= failures {
            Err(format!("failure {}", n))
        } else {
            Ok(n)
        })
    }
}

fn constant(delay: u64, max_retries: i64) -> PolicyDescriptor<String> {
    json!({ "constantDelay": { "delay": delay, "maxRetries": max_retries } }).into()
}

fn gaps(log: &[Instant]) -> Vec<Duration> {
    log.windows(2).map(|w| w[1] - w[0]).collect()
}

#[tokio::test(start_paused = true)]
async fn three_failures_then_success_with_three_delays() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let start = Instant::now();
    let result = retrier(flaky(3, Arc::clone(&log)), constant(100, 3))
        .unwrap()
        .await;

    assert_eq!(result, Ok(4));
    let log = log.lock().unwrap();
    assert_eq!(log.len(), 4);
    for gap in gaps(&log) {
        assert!(gap >= Duration::from_millis(100), "gap {:?}", gap);
    }
    assert!(start.elapsed() >= Duration::from_millis(300));
}

#[tokio::test(start_paused = true)]
async fn always_failing_subject_runs_budget_plus_one_times() {
    for n in [0usize, 1, 4] {
        let log = Arc::new(Mutex::new(Vec::new()));
        let result = retrier(flaky(usize::MAX, Arc::clone(&log)), constant(25, n as i64))
            .unwrap()
            .await;
        assert_eq!(result, Err(format!("failure {}", n + 1)));
        let log = log.lock().unwrap();
        assert_eq!(log.len(), n + 1);
        assert!(gaps(&log).iter().all(|g| *g >= Duration::from_millis(25)));
    }
}

#[tokio::test(start_paused = true)]
async fn zero_retries_aborts_immediately() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let start = Instant::now();
    let result = retrier(flaky(1, Arc::clone(&log)), constant(10_000, 0))
        .unwrap()
        .await;
    assert_eq!(result, Err("failure 1".to_string()));
    assert_eq!(log.lock().unwrap().len(), 1);
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn negative_retry_count_means_single_attempt() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let descriptor: PolicyDescriptor<String> =
        json!({ "constantDelay": { "delay": 5, "maxRetries": -2.5 } }).into();
    let result = retrier(flaky(usize::MAX, Arc::clone(&log)), descriptor)
        .unwrap()
        .await;
    assert!(result.is_err());
    assert_eq!(log.lock().unwrap().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn success_within_budget_returns_final_value() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let result = retrier(flaky(2, Arc::clone(&log)), constant(1, 5))
        .unwrap()
        .await;
    assert_eq!(result, Ok(3));
    assert_eq!(log.lock().unwrap().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn same_descriptor_twice_yields_independent_budgets() {
    let registry = PolicyRegistry::with_builtins();
    let descriptor = json!({ "constantDelay": { "delay": 1, "maxRetries": 2 } });

    for _ in 0..2 {
        let log = Arc::new(Mutex::new(Vec::new()));
        let result = retrier_with(
            &registry,
            flaky(2, Arc::clone(&log)),
            descriptor.clone().into(),
        )
        .unwrap()
        .await;
        assert_eq!(result, Ok(3));
        assert_eq!(log.lock().unwrap().len(), 3);
    }
}

#[tokio::test]
async fn malformed_descriptors_never_invoke_the_subject() {
    let cases = vec![
        json!("constantDelay"),
        json!({}),
        json!({ "a": {}, "b": {} }),
        json!({ "noSuchPolicy": {} }),
        json!({ "constantDelay": { "maxRetries": 3 } }),
        json!({ "constantDelay": { "delay": 100, "maxRetries": "3" } }),
    ];
    for case in cases {
        let log = Arc::new(Mutex::new(Vec::new()));
        let result = retrier(flaky(0, Arc::clone(&log)), case.clone().into());
        assert!(result.is_err(), "{case} should not resolve");
        assert!(log.lock().unwrap().is_empty());
    }
}

#[tokio::test]
async fn type_mismatch_names_the_parameter() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let descriptor = json!({ "constantDelay": { "delay": 100, "maxRetries": "3" } });
    match retrier(flaky(0, Arc::clone(&log)), descriptor.into()) {
        Err(PolicyError::ParameterTypeMismatch {
            policy,
            param,
            actual,
            expected,
        }) => {
            assert_eq!(policy, "constantDelay");
            assert_eq!(param, "maxRetries");
            assert_eq!(actual, ParamType::String);
            assert_eq!(expected, ParamType::Number);
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected a type mismatch"),
    }
    assert!(log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn custom_decision_sees_every_failure() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorder = Arc::clone(&seen);
    let decision = move |reason: String| {
        recorder.lock().unwrap().push(reason.clone());
        let give_up = reason == "failure 2";
        async move {
            if give_up {
                Err(format!("final: {}", reason))
            } else {
                Ok(())
            }
        }
    };

    let result = retrier(flaky(5, Arc::clone(&log)), PolicyDescriptor::custom(decision))
        .unwrap()
        .await;
    assert_eq!(result, Err("final: failure 2".to_string()));
    assert_eq!(*seen.lock().unwrap(), ["failure 1", "failure 2"]);
}

/// Policy that retries while a shared gate is open.
struct Gate(Arc<Mutex<bool>>);

impl RetryPolicy for Gate {
    fn on_failure(&mut self, _reason: &dyn fmt::Display) -> BoxFuture<'_, Verdict> {
        let open = *self.0.lock().unwrap();
        Box::pin(async move {
            if open {
                Verdict::Proceed
            } else {
                Verdict::Abort
            }
        })
    }
}

struct GateFactory(Arc<Mutex<bool>>);

impl DecisionFactory for GateFactory {
    fn params(&self) -> &[ParamSpec] {
        const PARAMS: [ParamSpec; 1] = [ParamSpec::new("open", ParamType::Boolean)];
        &PARAMS
    }

    fn build(&self, args: &[Value]) -> Box<dyn RetryPolicy> {
        *self.0.lock().unwrap() = args[0].as_bool().unwrap_or(false);
        Box::new(Gate(Arc::clone(&self.0)))
    }
}

#[tokio::test]
async fn user_registered_policy_is_resolved_by_name() {
    let mut registry = PolicyRegistry::with_builtins();
    registry
        .register("gate", GateFactory(Arc::new(Mutex::new(false))))
        .unwrap();

    let log = Arc::new(Mutex::new(Vec::new()));
    let open = retrier_with(
        &registry,
        flaky(3, Arc::clone(&log)),
        json!({ "gate": { "open": true } }).into(),
    )
    .unwrap()
    .await;
    assert_eq!(open, Ok(4));

    let log = Arc::new(Mutex::new(Vec::new()));
    let closed = retrier_with(
        &registry,
        flaky(3, Arc::clone(&log)),
        json!({ "gate": { "open": false } }).into(),
    )
    .unwrap()
    .await;
    assert_eq!(closed, Err("failure 1".to_string()));

    let wrong = retrier_with(
        &registry,
        flaky(0, Arc::new(Mutex::new(Vec::new()))),
        json!({ "gate": { "open": 1 } }).into(),
    );
    assert!(matches!(
        wrong,
        Err(PolicyError::ParameterTypeMismatch { .. })
    ));
}

/// Retries only failures whose reason contains `needle`.
struct RetryOn {
    needle: String,
}

impl RetryPolicy for RetryOn {
    fn on_failure(&mut self, reason: &dyn fmt::Display) -> BoxFuture<'_, Verdict> {
        let verdict = if reason.to_string().contains(&self.needle) {
            Verdict::Proceed
        } else {
            Verdict::Abort
        };
        Box::pin(async move { verdict })
    }
}

struct RetryOnFactory;

impl DecisionFactory for RetryOnFactory {
    fn params(&self) -> &[ParamSpec] {
        const PARAMS: [ParamSpec; 1] = [ParamSpec::new("needle", ParamType::String)];
        &PARAMS
    }

    fn build(&self, args: &[Value]) -> Box<dyn RetryPolicy> {
        let needle = args[0].as_str().unwrap_or_default().to_string();
        Box::new(RetryOn { needle })
    }
}

#[tokio::test]
async fn registered_policy_classifies_failure_reasons() {
    let mut registry = PolicyRegistry::new();
    registry.register("retryOn", RetryOnFactory).unwrap();

    let attempts = Arc::new(Mutex::new(0u32));
    let counter = Arc::clone(&attempts);
    let subject = move || {
        let mut n = counter.lock().unwrap();
        *n += 1;
        let reason = if *n < 3 {
            format!("timeout on attempt {}", *n)
        } else {
            format!("refused on attempt {}", *n)
        };
        std::future::ready(Err::<(), _>(reason))
    };

    let descriptor = json!({ "retryOn": { "needle": "timeout" } });
    let result = retrier_with(&registry, subject, descriptor.into())
        .unwrap()
        .await;
    assert_eq!(result, Err("refused on attempt 3".to_string()));
    assert_eq!(*attempts.lock().unwrap(), 3);
}

#[tokio::test]
async fn retry_future_can_be_spawned() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let run = retrier(flaky(1, Arc::clone(&log)), constant(0, 1)).unwrap();
    let handle = tokio::spawn(run);
    assert_eq!(handle.await.unwrap(), Ok(2));
}
