//! Backend capability introspection.
//!
//! Describes what a backend can do: qubit count, accepted basis gates,
//! shot limits, and feature flags. Harnesses use this to decide which
//! circuits a backend can run before submitting them.

use serde::{Deserialize, Serialize};

/// Capabilities of a quantum backend.
///
/// Capabilities MUST be cached at backend construction time so that
/// [`Backend::capabilities`](crate::Backend::capabilities) can be
/// synchronous and infallible.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Capabilities {
    /// Name of the backend.
    pub name: String,
    /// Number of qubits available.
    pub num_qubits: u32,
    /// Gate names the backend accepts (OpenQASM 3 naming).
    pub basis_gates: Vec<String>,
    /// Maximum number of shots per job.
    pub max_shots: u32,
    /// Whether this backend is a simulator.
    pub is_simulator: bool,
    /// Additional capability flags, e.g. `"statevector"`,
    /// `"mid_circuit_measurement"`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
}

impl Capabilities {
    /// Capabilities for a local simulator with the standard basis.
    pub fn simulator(name: impl Into<String>, num_qubits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            basis_gates: vec!["id".into(), "u".into(), "cx".into()],
            max_shots: 100_000,
            is_simulator: true,
            features: vec![],
        }
    }

    /// Add a feature flag.
    #[must_use]
    pub fn with_feature(mut self, feature: impl Into<String>) -> Self {
        self.features.push(feature.into());
        self
    }

    /// Check whether a gate name belongs to the accepted basis.
    pub fn supports_gate(&self, name: &str) -> bool {
        self.basis_gates.iter().any(|g| g == name)
    }

    /// Check whether a feature flag is present.
    pub fn has_feature(&self, feature: &str) -> bool {
        self.features.iter().any(|f| f == feature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulator_capabilities() {
        let caps = Capabilities::simulator("sv", 24).with_feature("statevector");
        assert!(caps.is_simulator);
        assert!(caps.supports_gate("u"));
        assert!(caps.supports_gate("cx"));
        assert!(!caps.supports_gate("rzz"));
        assert!(caps.has_feature("statevector"));
        assert!(!caps.has_feature("mid_circuit_measurement"));
    }
}
