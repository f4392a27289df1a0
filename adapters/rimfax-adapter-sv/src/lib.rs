//! Statevector simulator backend for Rimfax.
//!
//! The fast local backend: evolves a dense statevector once per job and
//! samples every shot from the final distribution. Because measurement
//! never collapses the state, circuits with mid-circuit measurement or
//! reset are rejected at validation; use the reference backend for
//! those.

mod backend;
mod statevector;

pub use backend::SvBackend;
pub use statevector::Statevector;
