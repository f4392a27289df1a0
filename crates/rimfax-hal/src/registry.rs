//! Backend registry for discovering available backends.
//!
//! Backends register a probe closure. Probing returns `None` when the
//! backend cannot run in the current environment, letting callers skip
//! it instead of failing.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::backend::Backend;

/// Probe function type. Returns `None` when the backend is unavailable.
type Probe = Box<dyn Fn() -> Option<Box<dyn Backend>> + Send + Sync>;

/// Central registry for quantum backends.
#[derive(Default)]
pub struct BackendRegistry {
    probes: FxHashMap<String, Probe>,
}

impl BackendRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a backend probe under a name.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        probe: impl Fn() -> Option<Box<dyn Backend>> + Send + Sync + 'static,
    ) {
        let name = name.into();
        debug!("Registering backend probe: {}", name);
        self.probes.insert(name, Box::new(probe));
    }

    /// Probe for a backend by name.
    ///
    /// Returns `None` if the name is unknown or the backend reports
    /// itself unavailable.
    pub fn probe(&self, name: &str) -> Option<Box<dyn Backend>> {
        let backend = self.probes.get(name).and_then(|probe| probe());
        if backend.is_none() {
            debug!("Backend '{}' is not available", name);
        }
        backend
    }

    /// Registered backend names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.probes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered probes.
    pub fn len(&self) -> usize {
        self.probes.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_backend_probe() {
        let registry = BackendRegistry::new();
        assert!(registry.probe("missing").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_unavailable_backend_probe() {
        let mut registry = BackendRegistry::new();
        registry.register("flaky", || None);
        assert_eq!(registry.names(), vec!["flaky"]);
        assert!(registry.probe("flaky").is_none());
    }
}
