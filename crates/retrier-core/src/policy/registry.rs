//! Name -> factory registry of retry policies.
//!
//! The process-wide registry starts with the built-in policies and is only
//! ever appended to. Registration is expected at startup, before runs
//! resolve descriptors against it.

use super::decision::RetryPolicy;
use super::error::PolicyError;
use super::param::ParamSpec;
use crate::constant_delay::ConstantDelayFactory;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock, RwLockReadGuard};

/// Constructor of a named policy.
///
/// The resolver checks every argument against [`params`](Self::params)
/// before calling [`build`](Self::build), so `args` always holds one value
/// per declared parameter, in declared order, with the declared type.
///
/// `build` runs without the process-wide registry lock held. Factories
/// should still not register policies from `build`: registration belongs
/// to startup.
pub trait DecisionFactory: Send + Sync {
    fn params(&self) -> &[ParamSpec];

    fn build(&self, args: &[Value]) -> Box<dyn RetryPolicy>;
}

#[derive(Clone, Default)]
pub struct PolicyRegistry {
    entries: BTreeMap<String, Arc<dyn DecisionFactory>>,
}

impl PolicyRegistry {
    /// Empty registry (no built-ins).
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in policies.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry
            .entries
            .insert(ConstantDelayFactory::NAME.to_string(), Arc::new(ConstantDelayFactory));
        registry
    }

    /// Add a policy under `name`. Existing names are never replaced.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        factory: impl DecisionFactory + 'static,
    ) -> Result<(), PolicyError> {
        let name = name.into();
        if self.entries.contains_key(&name) {
            return Err(PolicyError::DuplicatePolicy(name));
        }
        tracing::debug!(policy = %name, "registered retry policy");
        self.entries.insert(name, Arc::new(factory));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&dyn DecisionFactory> {
        self.entries.get(name).map(|f| &**f)
    }

    /// Shared handle to a factory, usable after the registry is released.
    pub fn factory(&self, name: &str) -> Option<Arc<dyn DecisionFactory>> {
        self.entries.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names with their declared parameters, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ParamSpec])> {
        self.entries
            .iter()
            .map(|(name, factory)| (name.as_str(), factory.params()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for PolicyRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.entries.keys()).finish()
    }
}

fn global_lock() -> &'static RwLock<PolicyRegistry> {
    static GLOBAL: OnceLock<RwLock<PolicyRegistry>> = OnceLock::new();
    GLOBAL.get_or_init(|| RwLock::new(PolicyRegistry::with_builtins()))
}

/// Read access to the process-wide registry.
pub fn global() -> RwLockReadGuard<'static, PolicyRegistry> {
    global_lock()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
}

/// Register a policy in the process-wide registry.
pub fn register_policy(
    name: impl Into<String>,
    factory: impl DecisionFactory + 'static,
) -> Result<(), PolicyError> {
    global_lock()
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .register(name, factory)
}
