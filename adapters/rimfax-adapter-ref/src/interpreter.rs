//! Per-shot state with measurement collapse.
//!
//! Unlike a final-distribution sampler, this state supports projective
//! measurement and reset mid-circuit: each measurement draws a bit from
//! the current amplitudes, projects onto the outcome, and renormalizes.

use ndarray::{Array1, Array2};
use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::Rng;

use rimfax_ir::StandardGate;

use crate::matrices::matrix_of;

/// The quantum state of a single shot.
pub struct ShotState {
    amplitudes: Vec<Complex64>,
    num_qubits: usize,
}

impl ShotState {
    /// Initialize to |0...0⟩.
    pub fn new(num_qubits: usize) -> Self {
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); 1 << num_qubits];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self {
            amplitudes,
            num_qubits,
        }
    }

    /// Apply a gate by dense matrix multiplication on the local subspace.
    pub fn apply(&mut self, gate: &StandardGate, qubits: &[usize]) {
        self.apply_matrix(&matrix_of(gate), qubits);
    }

    fn apply_matrix(&mut self, matrix: &Array2<Complex64>, qubits: &[usize]) {
        let k = qubits.len();
        let local_dim = 1 << k;
        debug_assert_eq!(matrix.nrows(), local_dim);

        let gate_mask: usize = qubits.iter().map(|&q| 1 << q).sum();
        for base in 0..(1 << self.num_qubits) {
            if base & gate_mask != 0 {
                continue;
            }
            // Gather the subspace spanned by the gate qubits.
            let globals: Vec<usize> = (0..local_dim)
                .map(|local| {
                    let mut g = base;
                    for (j, &q) in qubits.iter().enumerate() {
                        if local >> j & 1 == 1 {
                            g |= 1 << q;
                        }
                    }
                    g
                })
                .collect();
            let local_in =
                Array1::from_iter(globals.iter().map(|&g| self.amplitudes[g]));
            let local_out = matrix.dot(&local_in);
            for (slot, &g) in globals.iter().enumerate() {
                self.amplitudes[g] = local_out[slot];
            }
        }
    }

    /// Measure one qubit, collapsing the state. Returns the outcome bit.
    pub fn measure(&mut self, qubit: usize, rng: &mut StdRng) -> u8 {
        let mask = 1 << qubit;
        let prob_one: f64 = self
            .amplitudes
            .iter()
            .enumerate()
            .filter(|(i, _)| i & mask != 0)
            .map(|(_, amp)| amp.norm_sqr())
            .sum();

        let r: f64 = rng.r#gen();
        let outcome = u8::from(r < prob_one);

        let keep_prob = if outcome == 1 {
            prob_one
        } else {
            1.0 - prob_one
        };
        let norm = keep_prob.sqrt();
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            let bit_set = i & mask != 0;
            if bit_set == (outcome == 1) {
                *amp /= norm;
            } else {
                *amp = Complex64::new(0.0, 0.0);
            }
        }
        outcome
    }

    /// Reset a qubit to |0⟩: measure, then flip if the outcome was 1.
    pub fn reset(&mut self, qubit: usize, rng: &mut StdRng) {
        if self.measure(qubit, rng) == 1 {
            self.apply(&StandardGate::X, &[qubit]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_measure_deterministic_one() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut state = ShotState::new(1);
        state.apply(&StandardGate::X, &[0]);
        assert_eq!(state.measure(0, &mut rng), 1);
    }

    #[test]
    fn test_bell_measurements_correlate() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            let mut state = ShotState::new(2);
            state.apply(&StandardGate::H, &[0]);
            state.apply(&StandardGate::CX, &[0, 1]);
            let a = state.measure(0, &mut rng);
            let b = state.measure(1, &mut rng);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_reset_returns_to_zero() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut state = ShotState::new(1);
        state.apply(&StandardGate::H, &[0]);
        state.reset(0, &mut rng);
        assert_eq!(state.measure(0, &mut rng), 0);
    }

    #[test]
    fn test_measure_collapses_superposition() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut state = ShotState::new(1);
        state.apply(&StandardGate::H, &[0]);
        let first = state.measure(0, &mut rng);
        // Once collapsed, the outcome repeats.
        for _ in 0..10 {
            assert_eq!(state.measure(0, &mut rng), first);
        }
    }
}
