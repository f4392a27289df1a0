//! Unitary matrices for the standard gate set.
//!
//! Local qubit convention: for a gate on qubits `[q0, q1, ...]`, `q0` is
//! the least significant bit of the local basis index. Matrices are
//! `M[out][in]`.

use ndarray::{array, Array2};
use num_complex::Complex64;
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use rimfax_ir::StandardGate;

fn c(re: f64, im: f64) -> Complex64 {
    Complex64::new(re, im)
}

fn phase(theta: f64) -> Complex64 {
    Complex64::from_polar(1.0, theta)
}

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);

/// The general single-qubit rotation.
fn u_matrix(theta: f64, phi: f64, lambda: f64) -> Array2<Complex64> {
    let cos = c((theta / 2.0).cos(), 0.0);
    let sin = c((theta / 2.0).sin(), 0.0);
    array![
        [cos, -phase(lambda) * sin],
        [phase(phi) * sin, phase(phi + lambda) * cos],
    ]
}

fn phase_matrix(lambda: f64) -> Array2<Complex64> {
    array![[ONE, ZERO], [ZERO, phase(lambda)]]
}

/// Embed a single-qubit matrix as a controlled two-qubit matrix, control
/// on local bit 0.
fn controlled(m: &Array2<Complex64>) -> Array2<Complex64> {
    let mut out = Array2::eye(4);
    // Control set means local indices 1 (target 0) and 3 (target 1).
    out[[1, 1]] = m[[0, 0]];
    out[[1, 3]] = m[[0, 1]];
    out[[3, 1]] = m[[1, 0]];
    out[[3, 3]] = m[[1, 1]];
    out
}

/// The unitary for a standard gate.
pub fn matrix_of(gate: &StandardGate) -> Array2<Complex64> {
    use StandardGate::*;

    match gate {
        I => Array2::eye(2),
        X => array![[ZERO, ONE], [ONE, ZERO]],
        Y => array![[ZERO, c(0.0, -1.0)], [c(0.0, 1.0), ZERO]],
        Z => phase_matrix(PI),
        H => {
            let h = c(1.0 / 2.0_f64.sqrt(), 0.0);
            array![[h, h], [h, -h]]
        }
        S => phase_matrix(FRAC_PI_2),
        Sdg => phase_matrix(-FRAC_PI_2),
        T => phase_matrix(FRAC_PI_4),
        Tdg => phase_matrix(-FRAC_PI_4),
        Rx(theta) => u_matrix(*theta, -FRAC_PI_2, FRAC_PI_2),
        Ry(theta) => u_matrix(*theta, 0.0, 0.0),
        Rz(theta) => array![[phase(-theta / 2.0), ZERO], [ZERO, phase(theta / 2.0)]],
        P(lambda) => phase_matrix(*lambda),
        U(theta, phi, lambda) => u_matrix(*theta, *phi, *lambda),
        CX => controlled(&matrix_of(&X)),
        CY => controlled(&matrix_of(&Y)),
        CZ => controlled(&matrix_of(&Z)),
        CH => controlled(&matrix_of(&H)),
        CP(lambda) => controlled(&phase_matrix(*lambda)),
        CRz(theta) => controlled(&matrix_of(&Rz(*theta))),
        Swap => {
            let mut m = Array2::from_elem((4, 4), ZERO);
            m[[0, 0]] = ONE;
            m[[1, 2]] = ONE;
            m[[2, 1]] = ONE;
            m[[3, 3]] = ONE;
            m
        }
        CCX => {
            // Controls on local bits 0 and 1, target on bit 2.
            let mut m = Array2::eye(8);
            m[[3, 3]] = ZERO;
            m[[7, 7]] = ZERO;
            m[[3, 7]] = ONE;
            m[[7, 3]] = ONE;
            m
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array1;

    fn is_unitary(m: &Array2<Complex64>) -> bool {
        let n = m.nrows();
        let adjoint = m.t().mapv(|v| v.conj());
        let product = adjoint.dot(m);
        (0..n).all(|i| {
            (0..n).all(|j| {
                let expected = if i == j { ONE } else { ZERO };
                (product[[i, j]] - expected).norm() < 1e-12
            })
        })
    }

    #[test]
    fn test_all_matrices_unitary() {
        use StandardGate::*;
        let gates = [
            I,
            X,
            Y,
            Z,
            H,
            S,
            Sdg,
            T,
            Tdg,
            Rx(0.7),
            Ry(1.3),
            Rz(2.1),
            P(0.4),
            U(0.5, 1.1, 2.2),
            CX,
            CY,
            CZ,
            CH,
            Swap,
            CP(0.9),
            CRz(1.7),
            CCX,
        ];
        for gate in gates {
            assert!(is_unitary(&matrix_of(&gate)), "{} not unitary", gate.name());
        }
    }

    #[test]
    fn test_cx_flips_target_when_control_set() {
        let cx = matrix_of(&StandardGate::CX);
        // |control=1, target=0⟩ is local index 1; expect local index 3.
        let input = Array1::from_vec(vec![ZERO, ONE, ZERO, ZERO]);
        let output = cx.dot(&input);
        assert!((output[3] - ONE).norm() < 1e-12);
    }

    #[test]
    fn test_u_matches_named_gates() {
        let h = matrix_of(&StandardGate::H);
        let u = matrix_of(&StandardGate::U(FRAC_PI_2, 0.0, PI));
        for i in 0..2 {
            for j in 0..2 {
                assert!((h[[i, j]] - u[[i, j]]).norm() < 1e-12);
            }
        }
    }
}
