//! Syntax tree for the OpenQASM 3 subset.
//!
//! Angle expressions are folded to `f64` during parsing, so the tree carries
//! concrete values only.

/// A reference to a register or a single element of one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operand {
    /// Register name.
    pub register: String,
    /// Element index; `None` refers to the whole register.
    pub index: Option<u32>,
}

impl Operand {
    /// Reference a whole register.
    pub fn register(name: impl Into<String>) -> Self {
        Self {
            register: name.into(),
            index: None,
        }
    }

    /// Reference one element of a register.
    pub fn indexed(name: impl Into<String>, index: u32) -> Self {
        Self {
            register: name.into(),
            index: Some(index),
        }
    }
}

/// One statement of a QASM program.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `OPENQASM 3.0;`
    Version(String),
    /// `include "stdgates.inc";` — accepted and ignored.
    Include(String),
    /// `qubit[n] name;`
    QubitDecl {
        /// Register name.
        name: String,
        /// Register size.
        size: u32,
    },
    /// `bit[n] name;`
    BitDecl {
        /// Register name.
        name: String,
        /// Register size.
        size: u32,
    },
    /// `name(args...) operands...;`
    Gate {
        /// Gate name.
        name: String,
        /// Evaluated angle arguments.
        params: Vec<f64>,
        /// Qubit operands.
        operands: Vec<Operand>,
    },
    /// `dst = measure src;`
    Measure {
        /// Measured qubit(s).
        src: Operand,
        /// Destination classical bit(s).
        dst: Operand,
    },
    /// `reset q;`
    Reset(Operand),
    /// `barrier q, ...;`
    Barrier(Vec<Operand>),
}
