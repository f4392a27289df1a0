//! Bundle execution.

use rustc_hash::FxHashMap;
use tracing::{debug, info, instrument};

use rimfax_hal::{Backend, Counts, ExecutionResult, ValidationResult};

use crate::bundle::JobBundle;
use crate::error::{RunError, RunResult};

/// Results of a bundle run, keyed by circuit name.
#[derive(Debug, Default)]
pub struct BundleResults {
    results: FxHashMap<String, ExecutionResult>,
}

impl BundleResults {
    /// The full execution result for a circuit.
    pub fn get(&self, name: &str) -> Option<&ExecutionResult> {
        self.results.get(name)
    }

    /// The measurement histogram for a circuit.
    pub fn get_counts(&self, name: &str) -> RunResult<&Counts> {
        self.results
            .get(name)
            .map(|r| &r.counts)
            .ok_or_else(|| RunError::CircuitNotFound(name.to_string()))
    }

    /// Circuit names with results, in arbitrary order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.results.keys().map(String::as_str)
    }

    /// Number of circuits with results.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Whether no results were recorded.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Run every circuit in a bundle on the given backend.
///
/// Each circuit is validated, submitted with the bundle's shot count and
/// seed, and awaited in order. The first failure aborts the run.
#[instrument(skip(backend, bundle), fields(backend = backend.name(), bundle = %bundle.id))]
pub async fn run_bundle(backend: &dyn Backend, bundle: &JobBundle) -> RunResult<BundleResults> {
    info!(
        circuits = bundle.len(),
        shots = bundle.config.shots,
        seed = ?bundle.config.seed,
        "running bundle"
    );

    let mut results = BundleResults::default();
    for named in &bundle.circuits {
        if let ValidationResult::Invalid { reasons } = backend.validate(&named.compiled).await? {
            return Err(RunError::ValidationFailed {
                circuit: named.name.clone(),
                backend: backend.name().to_string(),
                reasons: reasons.join("; "),
            });
        }

        let job_id = backend
            .submit(&named.compiled, bundle.config.shots, bundle.config.seed)
            .await?;
        debug!(circuit = %named.name, job = %job_id, "submitted");

        let result = backend.wait(&job_id).await?;
        results.results.insert(named.name.clone(), result);
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::RunConfig;
    use rimfax_adapter_ref::RefBackend;
    use rimfax_adapter_sv::SvBackend;
    use rimfax_compile::{compile_circuit, CompileOptions};
    use rimfax_ir::Circuit;

    fn bell_bundle(seed: u64) -> JobBundle {
        let compiled =
            compile_circuit(&Circuit::bell().unwrap(), &CompileOptions::default()).unwrap();
        let mut bundle = JobBundle::new(RunConfig::new("sv", 100).with_seed(seed));
        bundle.add("bell", compiled).unwrap();
        bundle
    }

    #[tokio::test]
    async fn test_run_bundle_on_both_backends() {
        let bundle = bell_bundle(88);

        let sv = SvBackend::new();
        let sv_results = run_bundle(&sv, &bundle).await.unwrap();
        assert_eq!(sv_results.get_counts("bell").unwrap().total_shots(), 100);

        let reference = RefBackend::new();
        let ref_results = run_bundle(&reference, &bundle).await.unwrap();
        assert_eq!(ref_results.get_counts("bell").unwrap().total_shots(), 100);
    }

    #[tokio::test]
    async fn test_missing_circuit_lookup() {
        let bundle = bell_bundle(1);
        let results = run_bundle(&SvBackend::new(), &bundle).await.unwrap();
        assert!(matches!(
            results.get_counts("nope"),
            Err(RunError::CircuitNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_circuit_aborts_run() {
        let mut circuit = Circuit::with_size("r", 1, 1);
        circuit.reset(rimfax_ir::QubitId(0)).unwrap();
        let compiled = compile_circuit(&circuit, &CompileOptions::default()).unwrap();

        let mut bundle = JobBundle::new(RunConfig::new("sv", 100));
        bundle.add("resets", compiled).unwrap();

        let err = run_bundle(&SvBackend::new(), &bundle).await.unwrap_err();
        assert!(matches!(err, RunError::ValidationFailed { .. }));
    }
}
