//! Rimfax execution orchestration.
//!
//! Ties the compile and HAL layers together:
//! - [`JobBundle`] — a serializable batch of compiled circuits plus the
//!   [`RunConfig`] they were compiled against
//! - [`run_bundle`] — validate, submit, and await every circuit in a
//!   bundle on one backend
//! - [`Program`] — a high-level API that compiles for you
//!
//! # Example
//!
//! ```ignore
//! use rimfax_adapter_sv::SvBackend;
//! use rimfax_ir::Circuit;
//! use rimfax_run::Program;
//!
//! let mut program = Program::new();
//! program.add_circuit(Circuit::bell()?);
//!
//! let backend = SvBackend::new();
//! let results = program.execute(&backend, 100, Some(88)).await?;
//! println!("{:?}", results.get_counts("bell")?);
//! ```

mod bundle;
mod error;
mod program;
mod runner;

pub use bundle::{JobBundle, NamedCircuit, RunConfig};
pub use error::{RunError, RunResult};
pub use program::Program;
pub use runner::{run_bundle, BundleResults};
