//! `PropertySet` and related types for pass communication.
//!
//! Passes share state through a [`PropertySet`]: the target basis plus
//! arbitrary typed properties a pass may record for later passes or for
//! the caller.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::any::{Any, TypeId};

/// The gate names a target accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasisGates {
    gates: Vec<String>,
}

impl BasisGates {
    /// Create a basis from gate names.
    pub fn new(gates: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            gates: gates.into_iter().map(Into::into).collect(),
        }
    }

    /// The default simulator basis: identity, general single-qubit
    /// rotation, and controlled-X.
    pub fn simulator() -> Self {
        Self::new(["id", "u", "cx"])
    }

    /// Check whether a gate name belongs to the basis.
    pub fn contains(&self, name: &str) -> bool {
        self.gates.iter().any(|g| g == name)
    }

    /// The gate names in the basis.
    pub fn names(&self) -> &[String] {
        &self.gates
    }

    /// Copy the names into an owned vector.
    pub fn to_vec(&self) -> Vec<String> {
        self.gates.clone()
    }
}

impl Default for BasisGates {
    fn default() -> Self {
        Self::simulator()
    }
}

/// Shared context passed through all compilation passes.
#[derive(Default)]
pub struct PropertySet {
    /// The target basis, if any pass needs one.
    pub basis_gates: Option<BasisGates>,
    /// Arbitrary typed properties keyed by type.
    custom: FxHashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl PropertySet {
    /// Create an empty property set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a property set targeting the given basis.
    #[must_use]
    pub fn with_basis(mut self, basis: BasisGates) -> Self {
        self.basis_gates = Some(basis);
        self
    }

    /// Insert a custom property, replacing any previous value of the
    /// same type.
    pub fn insert<T: Any + Send + Sync>(&mut self, value: T) {
        self.custom.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Get a custom property by type.
    pub fn get<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.custom
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basis_contains() {
        let basis = BasisGates::simulator();
        assert!(basis.contains("u"));
        assert!(basis.contains("cx"));
        assert!(!basis.contains("h"));
    }

    #[test]
    fn test_custom_properties() {
        #[derive(Debug, PartialEq)]
        struct Marker(u32);

        let mut props = PropertySet::new();
        props.insert(Marker(7));
        assert_eq!(props.get::<Marker>(), Some(&Marker(7)));
        assert!(props.get::<String>().is_none());
    }
}
