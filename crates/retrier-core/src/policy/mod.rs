//! Retry policies: decision traits, the named-policy registry and the
//! resolver that turns a descriptor into a per-run decision function.

mod decision;
mod error;
mod param;
pub mod registry;
mod resolve;

pub use decision::{Decision, PolicyDecision, RetryPolicy, Verdict};
pub use error::PolicyError;
pub use param::{ParamSpec, ParamType};
pub use registry::{register_policy, DecisionFactory, PolicyRegistry};
pub use resolve::{resolve, resolve_with, PolicyDescriptor};
