//! Rimfax circuit compilation.
//!
//! Transforms builder-level circuits into [`CompiledCircuit`]s a backend
//! can execute, through a sequence of passes orchestrated by a
//! [`PassManager`]. The only transformation most targets need is
//! [`passes::BasisTranslation`], which rewrites every gate into the
//! target's basis gate set.
//!
//! # Example
//!
//! ```rust
//! use rimfax_compile::{compile_circuit, CompileOptions};
//! use rimfax_ir::Circuit;
//!
//! let circuit = Circuit::bell().unwrap();
//! let compiled = compile_circuit(&circuit, &CompileOptions::default()).unwrap();
//!
//! // Everything is now expressed over id/u/cx.
//! assert!(compiled
//!     .instructions()
//!     .filter(|i| i.is_gate())
//!     .all(|i| matches!(i.name(), "id" | "u" | "cx")));
//! ```
//!
//! [`CompiledCircuit`]: rimfax_ir::CompiledCircuit

mod compile;
mod error;
mod manager;
mod pass;
pub mod passes;
mod property;

pub use compile::{compile_circuit, compile_source, CompileOptions};
pub use error::{CompileError, CompileResult};
pub use manager::PassManager;
pub use pass::Pass;
pub use property::{BasisGates, PropertySet};
