//! Reference simulator backend.

use std::sync::{Arc, Mutex};
use std::time::Instant;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rustc_hash::FxHashMap;
use tracing::{debug, instrument};
use uuid::Uuid;

use rimfax_hal::{
    Backend, BackendAvailability, Capabilities, Counts, ExecutionResult, HalError, HalResult, Job,
    JobId, JobStatus, ValidationResult,
};
use rimfax_ir::{CompiledCircuit, InstructionKind};

use crate::interpreter::ShotState;

struct RefJob {
    job: Job,
    result: Option<ExecutionResult>,
}

/// Reference per-shot simulator backend.
///
/// Interprets the instruction stream once per shot with real projective
/// measurement, so mid-circuit measurement and reset behave as they
/// would on hardware. Slower than the statevector sampler; its value is
/// independence — the two backends share no execution path.
pub struct RefBackend {
    capabilities: Capabilities,
    jobs: Arc<Mutex<FxHashMap<String, RefJob>>>,
}

/// Per-shot dense interpretation gets expensive quickly.
const DEFAULT_MAX_QUBITS: u32 = 16;

impl RefBackend {
    /// Create a reference backend with the default qubit limit.
    pub fn new() -> Self {
        Self::with_max_qubits(DEFAULT_MAX_QUBITS)
    }

    /// Create a reference backend with a custom qubit limit.
    pub fn with_max_qubits(max_qubits: u32) -> Self {
        Self {
            capabilities: Capabilities::simulator("ref", max_qubits)
                .with_feature("mid_circuit_measurement"),
            jobs: Arc::new(Mutex::new(FxHashMap::default())),
        }
    }

    /// Probe for the backend, returning `None` if it cannot run here.
    pub fn probe() -> Option<Self> {
        Some(Self::new())
    }

    fn check(&self, circuit: &CompiledCircuit) -> Vec<String> {
        let mut reasons = Vec::new();
        if circuit.num_qubits > self.capabilities.num_qubits {
            reasons.push(format!(
                "circuit has {} qubits but the reference backend supports {}",
                circuit.num_qubits, self.capabilities.num_qubits
            ));
        }
        for inst in circuit.instructions() {
            if inst.is_gate() && !self.capabilities.supports_gate(inst.name()) {
                reasons.push(format!("gate '{}' is not in the basis", inst.name()));
            }
        }
        reasons
    }

    /// Run all shots synchronously with a single RNG stream.
    #[instrument(skip(self, circuit), fields(circuit = %circuit.name))]
    fn run_shots(
        &self,
        circuit: &CompiledCircuit,
        shots: u32,
        seed: Option<u64>,
    ) -> ExecutionResult {
        let start = Instant::now();
        let num_qubits = circuit.num_qubits as usize;
        let num_clbits = circuit.num_clbits as usize;
        debug!(num_qubits, shots, ?seed, "starting per-shot interpretation");

        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut counts = Counts::new();
        for _ in 0..shots {
            let mut state = ShotState::new(num_qubits);
            let mut clbits = vec![b'0'; num_clbits];

            for inst in circuit.instructions() {
                match &inst.kind {
                    InstructionKind::Gate(gate) => {
                        let qubits: Vec<usize> =
                            inst.qubits.iter().map(|q| q.0 as usize).collect();
                        state.apply(gate, &qubits);
                    }
                    InstructionKind::Measure => {
                        let bit =
                            state.measure(inst.qubits[0].0 as usize, &mut rng);
                        clbits[inst.clbits[0].0 as usize] = b'0' + bit;
                    }
                    InstructionKind::Reset => {
                        state.reset(inst.qubits[0].0 as usize, &mut rng);
                    }
                    InstructionKind::Barrier => {}
                }
            }

            counts.record(String::from_utf8(clbits).expect("bitstring is ascii"));
        }

        let elapsed = start.elapsed();
        debug!(?elapsed, "interpretation completed");
        ExecutionResult::new(counts, shots).with_execution_time(elapsed.as_millis() as u64)
    }
}

impl Default for RefBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for RefBackend {
    fn name(&self) -> &str {
        &self.capabilities.name
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    async fn availability(&self) -> HalResult<BackendAvailability> {
        Ok(BackendAvailability::always_available())
    }

    async fn validate(&self, circuit: &CompiledCircuit) -> HalResult<ValidationResult> {
        let reasons = self.check(circuit);
        if reasons.is_empty() {
            Ok(ValidationResult::Valid)
        } else {
            Ok(ValidationResult::Invalid { reasons })
        }
    }

    #[instrument(skip(self, circuit), fields(circuit = %circuit.name))]
    async fn submit(
        &self,
        circuit: &CompiledCircuit,
        shots: u32,
        seed: Option<u64>,
    ) -> HalResult<JobId> {
        if shots == 0 {
            return Err(HalError::InvalidShots("shots must be positive".into()));
        }
        let reasons = self.check(circuit);
        if !reasons.is_empty() {
            return Err(HalError::InvalidCircuit(reasons.join("; ")));
        }

        let job_id = JobId::new(Uuid::new_v4().to_string());
        let job = Job::new(job_id.clone(), shots)
            .with_seed(seed)
            .with_backend(self.name());

        {
            let mut jobs = self
                .jobs
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            jobs.insert(job_id.0.clone(), RefJob { job, result: None });
        }
        debug!("submitted job: {}", job_id);

        let result = self.run_shots(circuit, shots, seed);
        {
            let mut jobs = self
                .jobs
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            if let Some(ref_job) = jobs.get_mut(&job_id.0) {
                ref_job.result = Some(result);
                ref_job.job.set_status(JobStatus::Completed);
            }
        }

        Ok(job_id)
    }

    async fn status(&self, job_id: &JobId) -> HalResult<JobStatus> {
        let jobs = self
            .jobs
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        jobs.get(&job_id.0)
            .map(|j| j.job.status.clone())
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))
    }

    async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
        let jobs = self
            .jobs
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        jobs.get(&job_id.0)
            .and_then(|j| j.result.clone())
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))
    }

    async fn cancel(&self, job_id: &JobId) -> HalResult<()> {
        let mut jobs = self
            .jobs
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let job = jobs
            .get_mut(&job_id.0)
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))?;
        if !job.job.status.is_terminal() {
            job.job.set_status(JobStatus::Cancelled);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rimfax_compile::{compile_circuit, CompileOptions};
    use rimfax_ir::{Circuit, ClbitId, QubitId};

    fn compiled(circuit: &Circuit) -> CompiledCircuit {
        compile_circuit(circuit, &CompileOptions::default()).unwrap()
    }

    #[tokio::test]
    async fn test_bell_counts() {
        let backend = RefBackend::probe().unwrap();
        let circuit = compiled(&Circuit::bell().unwrap());

        let job_id = backend.submit(&circuit, 500, Some(19)).await.unwrap();
        let result = backend.wait(&job_id).await.unwrap();

        assert_eq!(result.counts.total_shots(), 500);
        assert_eq!(result.counts.get("01"), 0);
        assert_eq!(result.counts.get("10"), 0);
        assert!(result.counts.get("00") > 150);
        assert!(result.counts.get("11") > 150);
    }

    #[tokio::test]
    async fn test_seeded_sampling_is_reproducible() {
        let backend = RefBackend::new();
        let circuit = compiled(&Circuit::bell().unwrap());

        let a = backend.submit(&circuit, 100, Some(88)).await.unwrap();
        let b = backend.submit(&circuit, 100, Some(88)).await.unwrap();
        let ra = backend.result(&a).await.unwrap();
        let rb = backend.result(&b).await.unwrap();
        assert_eq!(ra.counts, rb.counts);
    }

    #[tokio::test]
    async fn test_mid_circuit_measurement_runs() {
        // Measure, then flip: the final measurement must invert the first.
        let mut circuit = Circuit::with_size("mid", 1, 2);
        circuit
            .h(QubitId(0))
            .unwrap()
            .measure(QubitId(0), ClbitId(0))
            .unwrap()
            .x(QubitId(0))
            .unwrap()
            .measure(QubitId(0), ClbitId(1))
            .unwrap();
        let compiled = compiled(&circuit);

        let backend = RefBackend::new();
        assert!(backend.validate(&compiled).await.unwrap().is_valid());

        let job_id = backend.submit(&compiled, 200, Some(4)).await.unwrap();
        let result = backend.wait(&job_id).await.unwrap();
        assert_eq!(result.counts.get("00") + result.counts.get("11"), 0);
        assert_eq!(result.counts.get("01") + result.counts.get("10"), 200);
    }

    #[tokio::test]
    async fn test_reset_runs() {
        let mut circuit = Circuit::with_size("reset", 1, 1);
        circuit
            .h(QubitId(0))
            .unwrap()
            .reset(QubitId(0))
            .unwrap()
            .measure(QubitId(0), ClbitId(0))
            .unwrap();
        let compiled = compiled(&circuit);

        let backend = RefBackend::new();
        let job_id = backend.submit(&compiled, 100, Some(2)).await.unwrap();
        let result = backend.wait(&job_id).await.unwrap();
        assert_eq!(result.counts.get("0"), 100);
    }
}
