//! Statevector simulator backend.

use std::sync::{Arc, Mutex};
use std::time::Instant;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashMap;
use tracing::{debug, instrument};
use uuid::Uuid;

use rimfax_hal::{
    Backend, BackendAvailability, Capabilities, Counts, ExecutionResult, HalError, HalResult, Job,
    JobId, JobStatus, ValidationResult,
};
use rimfax_ir::{CompiledCircuit, InstructionKind};

use crate::statevector::Statevector;

/// Job data for the simulator.
struct SvJob {
    job: Job,
    result: Option<ExecutionResult>,
}

/// Local statevector simulator backend.
///
/// Evolves the full statevector once per job and samples all shots from
/// the final distribution. This is fast but cannot express mid-circuit
/// measurement or reset; `validate()` rejects circuits that use them.
pub struct SvBackend {
    capabilities: Capabilities,
    jobs: Arc<Mutex<FxHashMap<String, SvJob>>>,
}

/// Default qubit limit; 2^24 amplitudes is 256 MiB of state.
const DEFAULT_MAX_QUBITS: u32 = 24;

impl SvBackend {
    /// Create a simulator with the default qubit limit.
    pub fn new() -> Self {
        Self::with_max_qubits(DEFAULT_MAX_QUBITS)
    }

    /// Create a simulator with a custom qubit limit.
    pub fn with_max_qubits(max_qubits: u32) -> Self {
        Self {
            capabilities: Capabilities::simulator("sv", max_qubits)
                .with_feature("statevector"),
            jobs: Arc::new(Mutex::new(FxHashMap::default())),
        }
    }

    /// Probe for the backend, returning `None` if it cannot run here.
    ///
    /// The statevector simulator is in-process and has no external
    /// requirements, so the probe always succeeds. Callers should still
    /// go through this entry point so unavailable accelerated builds can
    /// be skipped uniformly.
    pub fn probe() -> Option<Self> {
        Some(Self::new())
    }

    fn check(&self, circuit: &CompiledCircuit) -> Vec<String> {
        let mut reasons = Vec::new();
        if circuit.num_qubits > self.capabilities.num_qubits {
            reasons.push(format!(
                "circuit has {} qubits but the simulator supports {}",
                circuit.num_qubits, self.capabilities.num_qubits
            ));
        }
        for inst in circuit.instructions() {
            if inst.is_gate() && !self.capabilities.supports_gate(inst.name()) {
                reasons.push(format!("gate '{}' is not in the basis", inst.name()));
            }
        }
        if circuit.has_reset() {
            reasons.push("reset is not supported by the statevector sampler".into());
        }
        if circuit.has_mid_circuit_measurement() {
            reasons.push("mid-circuit measurement is not supported".into());
        }
        reasons
    }

    /// Run simulation synchronously.
    #[instrument(skip(self, circuit), fields(circuit = %circuit.name))]
    fn run_simulation(
        &self,
        circuit: &CompiledCircuit,
        shots: u32,
        seed: Option<u64>,
    ) -> HalResult<ExecutionResult> {
        let start = Instant::now();
        let num_qubits = circuit.num_qubits as usize;
        debug!(num_qubits, shots, ?seed, "starting simulation");

        let mut sv = Statevector::new(num_qubits);
        let mut measure_map: Vec<(usize, usize)> = Vec::new();
        for inst in circuit.instructions() {
            match &inst.kind {
                InstructionKind::Gate(gate) => {
                    let qubits: Vec<usize> =
                        inst.qubits.iter().map(|q| q.0 as usize).collect();
                    sv.apply(gate, &qubits);
                }
                InstructionKind::Measure => {
                    measure_map.push((inst.qubits[0].0 as usize, inst.clbits[0].0 as usize));
                }
                InstructionKind::Reset => {
                    return Err(HalError::Unsupported(
                        "reset reached the statevector sampler".into(),
                    ));
                }
                InstructionKind::Barrier => {}
            }
        }

        let measured: Vec<usize> = measure_map.iter().map(|&(q, _)| q).collect();
        let tree = MarginalTree::new(&sv.probabilities(), &measured);

        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut counts = Counts::new();
        for _ in 0..shots {
            let pattern = tree.sample(&mut rng);
            counts.record(bitstring(pattern, circuit.num_clbits as usize, &measure_map));
        }

        let elapsed = start.elapsed();
        debug!(?elapsed, "simulation completed");
        Ok(ExecutionResult::new(counts, shots).with_execution_time(elapsed.as_millis() as u64))
    }
}

/// Prefix-mass tree over the measured qubits, in measurement order.
///
/// Each classical bit is sampled from its conditional distribution with
/// exactly one random draw (`outcome = r < p(1 | earlier bits)`). That
/// is the same draw sequence a projective per-shot interpreter consumes,
/// so two backends fed the same seed and the same distribution produce
/// identical samples, not merely statistically compatible ones.
struct MarginalTree {
    /// `levels[d]` holds 2^d masses; the last level is per measurement
    /// pattern, earlier levels are prefix sums of it.
    levels: Vec<Vec<f64>>,
}

impl MarginalTree {
    fn new(probabilities: &[f64], qubits: &[usize]) -> Self {
        let k = qubits.len();
        let mut leaves = vec![0.0; 1 << k];
        for (state, p) in probabilities.iter().enumerate() {
            let mut pattern = 0usize;
            for (depth, &qubit) in qubits.iter().enumerate() {
                if state >> qubit & 1 == 1 {
                    pattern |= 1 << (k - 1 - depth);
                }
            }
            leaves[pattern] += p;
        }

        let mut levels = vec![leaves];
        while levels.last().is_some_and(|l| l.len() > 1) {
            let prev = levels.last().expect("levels is non-empty");
            let next: Vec<f64> = prev.chunks(2).map(|pair| pair[0] + pair[1]).collect();
            levels.push(next);
        }
        levels.reverse();
        Self { levels }
    }

    /// Sample one measurement pattern, first measured qubit in the top
    /// bit. Consumes one draw per measured qubit.
    fn sample(&self, rng: &mut StdRng) -> usize {
        let k = self.levels.len() - 1;
        let mut prefix = 0usize;
        for depth in 0..k {
            let level = &self.levels[depth + 1];
            let zero = level[prefix << 1];
            let one = level[(prefix << 1) | 1];
            let total = zero + one;
            let prob_one = if total > 0.0 { one / total } else { 0.0 };

            let r: f64 = rng.r#gen();
            prefix = (prefix << 1) | usize::from(r < prob_one);
        }
        prefix
    }
}

/// Render a sampled measurement pattern through the measurement map.
///
/// Classical bit `i` lands at string position `i`.
fn bitstring(pattern: usize, num_clbits: usize, measure_map: &[(usize, usize)]) -> String {
    let k = measure_map.len();
    let mut bits = vec![b'0'; num_clbits];
    for (depth, &(_, clbit)) in measure_map.iter().enumerate() {
        if pattern >> (k - 1 - depth) & 1 == 1 {
            bits[clbit] = b'1';
        }
    }
    String::from_utf8(bits).expect("bitstring is ascii")
}

impl Default for SvBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for SvBackend {
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
            jobs.insert(job_id.0.clone(), SvJob { job, result: None });
        }
        debug!("submitted job: {}", job_id);

        // Local simulation runs synchronously; the job is terminal by the
        // time submit() returns.
        let outcome = self.run_simulation(circuit, shots, seed);
        {
            let mut jobs = self
                .jobs
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            if let Some(sim_job) = jobs.get_mut(&job_id.0) {
                match outcome {
                    Ok(result) => {
                        sim_job.result = Some(result);
                        sim_job.job.set_status(JobStatus::Completed);
                    }
                    Err(err) => {
                        sim_job.job.set_status(JobStatus::Failed(err.to_string()));
                    }
                }
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
    use rimfax_ir::Circuit;

    fn compiled_bell() -> CompiledCircuit {
        compile_circuit(&Circuit::bell().unwrap(), &CompileOptions::default()).unwrap()
    }

    #[tokio::test]
    async fn test_bell_counts() {
        let backend = SvBackend::probe().unwrap();
        let circuit = compiled_bell();

        let job_id = backend.submit(&circuit, 1000, Some(7)).await.unwrap();
        let result = backend.wait(&job_id).await.unwrap();

        assert_eq!(result.counts.total_shots(), 1000);
        // Bell state: only 00 and 11 appear.
        assert_eq!(result.counts.get("01"), 0);
        assert_eq!(result.counts.get("10"), 0);
        assert!(result.counts.get("00") > 300);
        assert!(result.counts.get("11") > 300);
    }

    #[tokio::test]
    async fn test_seeded_sampling_is_reproducible() {
        let backend = SvBackend::new();
        let circuit = compiled_bell();

        let a = backend.submit(&circuit, 100, Some(88)).await.unwrap();
        let b = backend.submit(&circuit, 100, Some(88)).await.unwrap();
        let ra = backend.result(&a).await.unwrap();
        let rb = backend.result(&b).await.unwrap();
        assert_eq!(ra.counts, rb.counts);
    }

    #[tokio::test]
    async fn test_rejects_mid_circuit_measurement() {
        let mut circuit = Circuit::with_size("mid", 1, 1);
        circuit
            .measure(rimfax_ir::QubitId(0), rimfax_ir::ClbitId(0))
            .unwrap()
            .x(rimfax_ir::QubitId(0))
            .unwrap();
        let compiled = compile_circuit(&circuit, &CompileOptions::default()).unwrap();

        let backend = SvBackend::new();
        let validation = backend.validate(&compiled).await.unwrap();
        assert!(!validation.is_valid());
        assert!(backend.submit(&compiled, 100, None).await.is_err());
    }

    #[tokio::test]
    async fn test_rejects_reset() {
        let mut circuit = Circuit::with_size("r", 1, 1);
        circuit.reset(rimfax_ir::QubitId(0)).unwrap();
        let compiled = compile_circuit(&circuit, &CompileOptions::default()).unwrap();

        let backend = SvBackend::new();
        assert!(!backend.validate(&compiled).await.unwrap().is_valid());
    }

    #[tokio::test]
    async fn test_deterministic_x_circuit() {
        let mut circuit = Circuit::with_size("x", 1, 1);
        circuit
            .x(rimfax_ir::QubitId(0))
            .unwrap()
            .measure_all()
            .unwrap();
        let compiled = compile_circuit(&circuit, &CompileOptions::default()).unwrap();

        let backend = SvBackend::new();
        let job_id = backend.submit(&compiled, 100, Some(1)).await.unwrap();
        let result = backend.wait(&job_id).await.unwrap();
        assert_eq!(result.counts.get("1"), 100);
    }
}
