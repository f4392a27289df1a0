//! Error types for QASM parsing.

use rimfax_ir::IrError;
use thiserror::Error;

/// Errors produced while lexing, parsing, or lowering QASM source.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// Invalid character in the source.
    #[error("invalid character at byte {0}")]
    InvalidCharacter(usize),

    /// Unexpected token.
    #[error("unexpected token at byte {at}: expected {expected}")]
    UnexpectedToken {
        /// Byte offset of the token.
        at: usize,
        /// What the parser wanted.
        expected: String,
    },

    /// Source ended mid-statement.
    #[error("unexpected end of input: expected {0}")]
    UnexpectedEof(String),

    /// Unsupported or missing version declaration.
    #[error("unsupported OPENQASM version '{0}' (expected 3.x)")]
    UnsupportedVersion(String),

    /// Gate name not in the standard set.
    #[error("unknown gate '{0}'")]
    UnknownGate(String),

    /// Gate applied with the wrong number of angle arguments.
    #[error("gate '{gate}' expects {expected} parameter(s), got {got}")]
    WrongParamCount {
        /// Gate name.
        gate: String,
        /// Expected parameter count.
        expected: u32,
        /// Provided parameter count.
        got: usize,
    },

    /// Gate applied to the wrong number of qubits.
    #[error("gate '{gate}' expects {expected} qubit(s), got {got}")]
    WrongArity {
        /// Gate name.
        gate: String,
        /// Expected qubit count.
        expected: u32,
        /// Provided qubit count.
        got: usize,
    },

    /// Reference to an undeclared register.
    #[error("unknown register '{0}'")]
    UnknownRegister(String),

    /// Register declared twice.
    #[error("register '{0}' declared twice")]
    DuplicateRegister(String),

    /// Index past the end of a register.
    #[error("index {index} out of range for register '{register}' of size {size}")]
    IndexOutOfRange {
        /// Register name.
        register: String,
        /// Offending index.
        index: u32,
        /// Register size.
        size: u32,
    },

    /// Whole-register operand where only indexed operands are supported.
    #[error("register broadcast is not supported for '{0}' here")]
    UnsupportedBroadcast(String),

    /// Measurement between registers of different lengths.
    #[error("measure: register '{src}' (size {src_size}) does not match '{dst}' (size {dst_size})")]
    MeasureSizeMismatch {
        /// Source register.
        src: String,
        /// Source size.
        src_size: u32,
        /// Destination register.
        dst: String,
        /// Destination size.
        dst_size: u32,
    },

    /// Division by zero in a constant angle expression.
    #[error("division by zero in angle expression")]
    DivisionByZero,

    /// Error from the IR builder.
    #[error(transparent)]
    Ir(#[from] IrError),
}

/// Result type for parse operations.
pub type ParseResult<T> = Result<T, ParseError>;
