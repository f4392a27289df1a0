//! Backend equivalence harness.
//!
//! Runs the same compiled circuits on two backends with a shared seed
//! and shot count, then tests each pair of measurement histograms for
//! statistical agreement:
//!
//! 1. Outcomes at or below the noise floor are dropped from both sides.
//! 2. The surviving outcome sets must match exactly; a mismatch is a
//!    divergence in kind and short-circuits the statistics.
//! 3. The two histograms form a 2×k contingency table and a chi-squared
//!    independence test must not reject at the configured significance
//!    level.

use tracing::{debug, info, instrument};

use rimfax_compile::{compile_circuit, CompileOptions};
use rimfax_hal::Backend;
use rimfax_ir::Circuit;
use rimfax_run::{run_bundle, JobBundle, RunConfig};

use crate::error::{VerifyError, VerifyResult};
use crate::stats::{chi2_contingency, filter_counts, Chi2Outcome, ContingencyTable};

/// Options controlling an equivalence check.
#[derive(Debug, Clone)]
pub struct EquivalenceOptions {
    /// Shots per circuit on each backend.
    pub shots: u32,
    /// Sampling seed passed to both backends.
    pub seed: Option<u64>,
    /// Fraction of shots an outcome must exceed to count as signal.
    pub noise_floor: f64,
    /// Significance level the chi-squared p-value must stay above.
    pub alpha: f64,
    /// Compilation options applied to every circuit.
    pub compile: CompileOptions,
}

impl Default for EquivalenceOptions {
    fn default() -> Self {
        Self {
            shots: 100,
            seed: None,
            noise_floor: 0.10,
            alpha: 0.01,
            compile: CompileOptions::default(),
        }
    }
}

impl EquivalenceOptions {
    /// Set the shared sampling seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Count threshold implied by the noise floor.
    pub fn threshold(&self) -> u64 {
        (f64::from(self.shots) * self.noise_floor) as u64
    }
}

/// How one circuit fared.
#[derive(Debug, Clone)]
pub enum Verdict {
    /// Histograms are statistically consistent.
    Agree(Chi2Outcome),
    /// The chi-squared test rejected consistency.
    Diverged(Chi2Outcome),
    /// The filtered outcome sets differ.
    SupportMismatch {
        /// Outcomes only the left backend produced.
        left_only: Vec<String>,
        /// Outcomes only the right backend produced.
        right_only: Vec<String>,
    },
}

/// Per-circuit equivalence result.
#[derive(Debug, Clone)]
pub struct CircuitReport {
    /// Name of the circuit.
    pub circuit: String,
    /// The verdict.
    pub verdict: Verdict,
}

impl CircuitReport {
    /// Whether the circuit passed.
    pub fn passed(&self) -> bool {
        matches!(self.verdict, Verdict::Agree(_))
    }
}

/// Results across a corpus of circuits.
///
/// Every circuit is evaluated before any pass/fail decision so a single
/// divergence does not hide others.
#[derive(Debug, Clone, Default)]
pub struct CorpusReport {
    /// Per-circuit reports, in corpus order.
    pub reports: Vec<CircuitReport>,
}

impl CorpusReport {
    /// Whether every circuit passed.
    pub fn all_passed(&self) -> bool {
        self.reports.iter().all(CircuitReport::passed)
    }

    /// The reports that did not pass.
    pub fn failures(&self) -> Vec<&CircuitReport> {
        self.reports.iter().filter(|r| !r.passed()).collect()
    }

    /// Number of circuits checked.
    pub fn len(&self) -> usize {
        self.reports.len()
    }

    /// Whether no circuits were checked.
    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}

/// Checks that two backends produce statistically equivalent results.
pub struct EquivalenceHarness<'a> {
    left: &'a dyn Backend,
    right: &'a dyn Backend,
    options: EquivalenceOptions,
}

impl<'a> EquivalenceHarness<'a> {
    /// Create a harness over two backends.
    pub fn new(
        left: &'a dyn Backend,
        right: &'a dyn Backend,
        options: EquivalenceOptions,
    ) -> Self {
        Self {
            left,
            right,
            options,
        }
    }

    /// The options in force.
    pub fn options(&self) -> &EquivalenceOptions {
        &self.options
    }

    /// Compile a corpus into a bundle both backends will run.
    pub fn bundle(&self, circuits: &[Circuit]) -> VerifyResult<JobBundle> {
        let mut config = RunConfig::new(self.left.name(), self.options.shots);
        config.seed = self.options.seed;
        config.basis_gates = self.options.compile.basis_gates.to_vec();

        let mut bundle = JobBundle::new(config);
        for circuit in circuits {
            let compiled = compile_circuit(circuit, &self.options.compile)?;
            bundle.add(circuit.name().to_string(), compiled)?;
        }
        Ok(bundle)
    }

    /// Check a single circuit.
    pub async fn check_circuit(&self, circuit: &Circuit) -> VerifyResult<CircuitReport> {
        let report = self
            .check_corpus(std::slice::from_ref(circuit))
            .await?
            .reports
            .pop()
            .expect("one circuit in, one report out");
        Ok(report)
    }

    /// Check every circuit in a corpus.
    ///
    /// The whole corpus runs on both backends before any histogram is
    /// compared, and every comparison is recorded even when an early
    /// one fails.
    #[instrument(skip(self, circuits), fields(left = self.left.name(), right = self.right.name()))]
    pub async fn check_corpus(&self, circuits: &[Circuit]) -> VerifyResult<CorpusReport> {
        let bundle = self.bundle(circuits)?;
        info!(
            circuits = bundle.len(),
            shots = self.options.shots,
            seed = ?self.options.seed,
            "checking backend equivalence"
        );

        let left_results = run_bundle(self.left, &bundle).await?;
        let right_results = run_bundle(self.right, &bundle).await?;

        let threshold = self.options.threshold();
        let mut report = CorpusReport::default();
        for name in bundle.names() {
            let left = filter_counts(left_results.get_counts(name)?, threshold);
            let right = filter_counts(right_results.get_counts(name)?, threshold);

            let verdict = match ContingencyTable::from_counts(&left, &right) {
                Ok(table) => {
                    let outcome = chi2_contingency(&table);
                    debug!(
                        circuit = name,
                        statistic = outcome.statistic,
                        dof = outcome.dof,
                        p_value = outcome.p_value,
                        "chi-squared"
                    );
                    if outcome.p_value > self.options.alpha {
                        Verdict::Agree(outcome)
                    } else {
                        Verdict::Diverged(outcome)
                    }
                }
                Err(VerifyError::SupportMismatch {
                    left_only,
                    right_only,
                }) => Verdict::SupportMismatch {
                    left_only,
                    right_only,
                },
                Err(other) => return Err(other),
            };

            report.reports.push(CircuitReport {
                circuit: name.to_string(),
                verdict,
            });
        }

        Ok(report)
    }
}
