//! OpenQASM 3 subset parser and emitter for Rimfax.
//!
//! Supports the statement forms the rest of the workspace produces and
//! consumes: version declaration, `include` (ignored), `qubit[n]`/`bit[n]`
//! register declarations, standard gates with constant angle expressions,
//! `measure` assignments, `reset`, and `barrier`.
//!
//! # Example: parsing
//!
//! ```rust
//! let qasm = r#"
//!     OPENQASM 3.0;
//!     qubit[2] q;
//!     bit[2] c;
//!     h q[0];
//!     cx q[0], q[1];
//!     c = measure q;
//! "#;
//!
//! let circuit = rimfax_qasm::parse(qasm).unwrap();
//! assert_eq!(circuit.num_qubits(), 2);
//! ```
//!
//! # Example: emitting
//!
//! ```rust
//! use rimfax_ir::Circuit;
//!
//! let circuit = Circuit::bell().unwrap();
//! let qasm = rimfax_qasm::emit(&circuit);
//! assert!(qasm.contains("OPENQASM 3.0;"));
//! assert!(qasm.contains("cx q[0], q[1];"));
//! ```

mod ast;
mod emitter;
mod error;
mod lexer;
mod parser;

pub use emitter::emit;
pub use error::{ParseError, ParseResult};
pub use parser::{parse, parse_statements};

// Syntax types for callers that want the raw statement stream.
pub mod syntax {
    pub use crate::ast::*;
}
