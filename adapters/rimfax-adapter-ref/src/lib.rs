//! Reference simulator backend for Rimfax.
//!
//! Executes each shot as its own trajectory: gates as dense matrix
//! multiplications, measurements as projective collapse. This is the
//! slow-but-trusted half of backend equivalence checking; it shares no
//! execution path with the statevector sampler.

mod backend;
mod interpreter;
mod matrices;

pub use backend::RefBackend;
pub use interpreter::ShotState;
