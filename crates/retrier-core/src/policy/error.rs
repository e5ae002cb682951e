//! Construction-time errors raised while turning a descriptor into a decision.

use super::param::ParamType;
use thiserror::Error;

/// Error returned before any attempt is made when a policy descriptor
/// cannot be resolved. These are never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    /// Descriptor is neither a decision function nor a single-key object.
    #[error("invalid policy descriptor: {0}")]
    InvalidPolicyDescriptor(String),

    /// Named policy is not in the registry.
    #[error("unknown retry policy `{0}`")]
    UnknownPolicy(String),

    /// A declared parameter is absent from the descriptor's arguments.
    #[error("retry policy `{policy}` is missing parameter `{param}`")]
    MissingParameter { policy: String, param: String },

    /// A parameter is present but has the wrong runtime type.
    #[error("retry policy `{policy}` parameter `{param}` is a {actual}, expected a {expected}")]
    ParameterTypeMismatch {
        policy: String,
        param: String,
        actual: ParamType,
        expected: ParamType,
    },

    /// A policy with this name is already registered; the registry is append-only.
    #[error("retry policy `{0}` is already registered")]
    DuplicatePolicy(String),
}
