//! Rimfax circuit intermediate representation.
//!
//! A circuit is an ordered sequence of [`Instruction`]s over declared quantum
//! and classical registers. The [`Circuit`] builder offers fluent methods for
//! the standard gate set; [`CompiledCircuit`] is the flattened, basis-checked
//! form that backends consume.
//!
//! # Example
//!
//! ```rust
//! use rimfax_ir::{Circuit, QubitId, ClbitId};
//!
//! let mut circuit = Circuit::with_size("bell", 2, 2);
//! circuit
//!     .h(QubitId(0)).unwrap()
//!     .cx(QubitId(0), QubitId(1)).unwrap()
//!     .measure(QubitId(0), ClbitId(0)).unwrap()
//!     .measure(QubitId(1), ClbitId(1)).unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.depth(), 3);
//! ```

pub mod circuit;
pub mod compiled;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod qubit;

pub use circuit::Circuit;
pub use compiled::CompiledCircuit;
pub use error::{IrError, IrResult};
pub use gate::StandardGate;
pub use instruction::{Instruction, InstructionKind};
pub use qubit::{Clbit, ClbitId, Qubit, QubitId};
