//! Descriptor -> decision resolution with up-front argument validation.

use super::decision::{Decision, PolicyDecision};
use super::error::PolicyError;
use super::param::ParamType;
use super::registry::{self, DecisionFactory, PolicyRegistry};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// How a caller names the retry policy for one run.
pub enum PolicyDescriptor<E> {
    /// Caller-supplied decision function, used as-is.
    Decision(Box<dyn Decision<E>>),
    /// `{ "<policy name>": { <named arguments> } }`, looked up in a registry.
    Named(Value),
}

impl<E> PolicyDescriptor<E> {
    /// Wrap a custom decision (any `FnMut(E) -> impl Future<Output = Result<(), E>>`).
    pub fn custom(decision: impl Decision<E> + 'static) -> Self {
        PolicyDescriptor::Decision(Box::new(decision))
    }

    /// Parse a named descriptor from JSON text.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text).map(PolicyDescriptor::Named)
    }
}

impl<E> From<Value> for PolicyDescriptor<E> {
    fn from(value: Value) -> Self {
        PolicyDescriptor::Named(value)
    }
}

impl<E> fmt::Debug for PolicyDescriptor<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyDescriptor::Decision(_) => f.write_str("Decision(<fn>)"),
            PolicyDescriptor::Named(v) => f.debug_tuple("Named").field(v).finish(),
        }
    }
}

/// Resolve against the process-wide registry.
///
/// The registry lock is released before the factory builds the policy.
pub fn resolve<E: fmt::Display + Send + 'static>(
    descriptor: PolicyDescriptor<E>,
) -> Result<Box<dyn Decision<E>>, PolicyError> {
    resolve_in(|name| registry::global().factory(name), descriptor)
}

/// Resolve against an explicit registry. Every failure here happens before
/// the subject is ever invoked.
pub fn resolve_with<E: fmt::Display + Send + 'static>(
    registry: &PolicyRegistry,
    descriptor: PolicyDescriptor<E>,
) -> Result<Box<dyn Decision<E>>, PolicyError> {
    resolve_in(|name| registry.factory(name), descriptor)
}

fn resolve_in<E, L>(
    lookup: L,
    descriptor: PolicyDescriptor<E>,
) -> Result<Box<dyn Decision<E>>, PolicyError>
where
    E: fmt::Display + Send + 'static,
    L: FnOnce(&str) -> Option<Arc<dyn DecisionFactory>>,
{
    let value = match descriptor {
        PolicyDescriptor::Decision(decision) => return Ok(decision),
        PolicyDescriptor::Named(value) => value,
    };

    let (name, args) = match &value {
        Value::Object(map) if map.len() == 1 => match map.iter().next() {
            Some(entry) => entry,
            None => return Err(invalid_shape(&value)),
        },
        _ => return Err(invalid_shape(&value)),
    };

    let factory = lookup(name.as_str()).ok_or_else(|| PolicyError::UnknownPolicy(name.clone()))?;

    let args = match args {
        Value::Object(args) => args,
        other => {
            return Err(PolicyError::InvalidPolicyDescriptor(format!(
                "arguments of `{}` must be an object, got a {}",
                name,
                ParamType::of(other)
            )))
        }
    };

    let mut positional = Vec::with_capacity(factory.params().len());
    for spec in factory.params() {
        let arg = args
            .get(spec.name)
            .ok_or_else(|| PolicyError::MissingParameter {
                policy: name.clone(),
                param: spec.name.to_string(),
            })?;
        let actual = ParamType::of(arg);
        if actual != spec.expected {
            return Err(PolicyError::ParameterTypeMismatch {
                policy: name.clone(),
                param: spec.name.to_string(),
                actual,
                expected: spec.expected,
            });
        }
        positional.push(arg.clone());
    }

    tracing::debug!(policy = %name, args = ?positional, "resolved retry policy");
    let policy = factory.build(&positional);
    Ok(Box::new(PolicyDecision::new(name.clone(), policy)))
}

fn invalid_shape(value: &Value) -> PolicyError {
    let shape = match value {
        Value::Object(map) if map.is_empty() => "an empty object".to_string(),
        Value::Object(map) => format!("an object with {} keys", map.len()),
        other => format!("a {}", ParamType::of(other)),
    };
    PolicyError::InvalidPolicyDescriptor(format!(
        "expected a decision function or a single-key object, got {}",
        shape
    ))
}
