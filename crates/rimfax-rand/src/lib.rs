//! Random circuit generation for Rimfax.
//!
//! Produces fully measured circuits with randomly chosen sizes, depths,
//! gates, targets, and angles. The main consumer is backend equivalence
//! testing, where a seeded generator gives a reproducible corpus.
//!
//! # Example
//!
//! ```rust
//! use rimfax_rand::RandomCircuitGenerator;
//!
//! let mut generator = RandomCircuitGenerator::new(1, 4, 1, 10, Some(88));
//! let basis: Vec<String> = ["h", "cx", "rx"].iter().map(|s| s.to_string()).collect();
//! generator.add_circuits(5, &basis).unwrap();
//!
//! assert_eq!(generator.len(), 5);
//! for circuit in generator.circuits() {
//!     assert!(circuit.num_qubits() >= 1 && circuit.num_qubits() <= 4);
//! }
//! ```

mod error;
mod generator;
mod signature;

pub use error::{GenError, GenResult};
pub use generator::RandomCircuitGenerator;
pub use signature::{op_signature, OpSignature};
