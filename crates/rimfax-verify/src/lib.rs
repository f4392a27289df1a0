//! Statistical backend equivalence checking.
//!
//! Two simulators implementing the same semantics should produce
//! measurement histograms that look like samples from one distribution.
//! This crate runs the same circuits on two backends and tests exactly
//! that: outcomes below a noise floor are dropped, the surviving
//! supports must match, and a chi-squared test of independence on the
//! 2×k contingency table must not reject.
//!
//! # Example
//!
//! ```ignore
//! use rimfax_adapter_ref::RefBackend;
//! use rimfax_adapter_sv::SvBackend;
//! use rimfax_ir::Circuit;
//! use rimfax_verify::{EquivalenceHarness, EquivalenceOptions};
//!
//! let sv = SvBackend::new();
//! let reference = RefBackend::new();
//! let harness = EquivalenceHarness::new(
//!     &sv,
//!     &reference,
//!     EquivalenceOptions::default().with_seed(88),
//! );
//!
//! let report = harness.check_circuit(&Circuit::bell()?).await?;
//! assert!(report.passed());
//! ```

mod error;
mod harness;
mod stats;

pub use error::{VerifyError, VerifyResult};
pub use harness::{
    CircuitReport, CorpusReport, EquivalenceHarness, EquivalenceOptions, Verdict,
};
pub use stats::{
    chi2_contingency, chi_squared_p_value, filter_counts, Chi2Outcome, ContingencyTable,
};
