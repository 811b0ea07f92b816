use crate::core::errors::GeometryError;
use crate::core::measurements::Axis;
use crate::core::state::StateVector;
use ndarray::{Array2, arr2};
use num_complex::Complex64;

/// Represents a single-qubit quantum gate.
///
/// A gate is defined by its 2x2 unitary matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Gate {
    /// The unitary matrix of the gate.
    pub matrix: Array2<Complex64>,
}

impl Gate {
    /// Creates a new `Gate` from a unitary matrix.
    ///
    /// # Errors
    ///
    /// Returns a `GeometryError` if:
    /// - The matrix is not 2x2.
    /// - The matrix is not unitary.
    pub fn new(matrix: Array2<Complex64>) -> Result<Self, GeometryError> {
        if matrix.dim() != (2, 2) {
            return Err(GeometryError::InvalidDimensions);
        }

        if !Self::check_unitary(&matrix) {
            return Err(GeometryError::NonUnitary);
        }

        Ok(Self { matrix })
    }

    /// Checks if a given matrix is unitary
    fn check_unitary(matrix: &Array2<Complex64>) -> bool {
        let (rows, _) = matrix.dim();
        let eye = Array2::<Complex64>::eye(rows);

        let u_dagger = matrix.t().mapv(|x| x.conj());
        let product = matrix.dot(&u_dagger);

        product
            .iter()
            .zip(eye.iter())
            .all(|(a, b)| (*a - *b).norm() < 1e-6)
    }

    /// Applies the gate to a state vector, returning the rotated state.
    pub fn apply(&self, state: &StateVector) -> StateVector {
        StateVector::from_array(&self.matrix.dot(&state.to_array()))
    }

    // --- Rotation family ---
    //
    // Rotations are unitary for every angle, so they skip the check in `new`.

    /// Rotation by `degrees` about the requested Pauli axis.
    ///
    /// The matrices are built from half of the requested angle, so a rotation
    /// of 180° maps |0⟩ to |1⟩ (up to global phase).
    pub fn rotation(axis: Axis, degrees: f64) -> Gate {
        match axis {
            Axis::X => Gate::rx(degrees),
            Axis::Y => Gate::ry(degrees),
            Axis::Z => Gate::rz(degrees),
        }
    }

    /// Creates an X rotation gate, exp(-i·angle/2·σx).
    pub fn rx(degrees: f64) -> Gate {
        let half = degrees.to_radians() / 2.0;
        let (sin, cos) = half.sin_cos();
        Gate {
            matrix: arr2(&[
                [Complex64::new(cos, 0.0), Complex64::new(0.0, -sin)],
                [Complex64::new(0.0, -sin), Complex64::new(cos, 0.0)],
            ]),
        }
    }

    /// Creates a Y rotation gate, exp(-i·angle/2·σy).
    pub fn ry(degrees: f64) -> Gate {
        let half = degrees.to_radians() / 2.0;
        let (sin, cos) = half.sin_cos();
        Gate {
            matrix: arr2(&[
                [Complex64::new(cos, 0.0), Complex64::new(-sin, 0.0)],
                [Complex64::new(sin, 0.0), Complex64::new(cos, 0.0)],
            ]),
        }
    }

    /// Creates a Z rotation gate, exp(-i·angle/2·σz).
    pub fn rz(degrees: f64) -> Gate {
        let half = degrees.to_radians() / 2.0;
        Gate {
            matrix: arr2(&[
                [Complex64::from_polar(1.0, -half), Complex64::new(0.0, 0.0)],
                [Complex64::new(0.0, 0.0), Complex64::from_polar(1.0, half)],
            ]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Complex64, b: Complex64) -> bool {
        (a - b).norm() < 1e-9
    }

    #[test]
    fn rotations_are_unitary() {
        for axis in [Axis::X, Axis::Y, Axis::Z] {
            for degrees in [0.0, 37.5, 90.0, 180.0, 270.0] {
                let gate = Gate::rotation(axis, degrees);
                assert!(Gate::new(gate.matrix.clone()).is_ok(), "{axis} {degrees}");
            }
        }
    }

    #[test]
    fn new_rejects_non_unitary_matrix() {
        let m = arr2(&[
            [Complex64::new(1.0, 0.0), Complex64::new(1.0, 0.0)],
            [Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0)],
        ]);
        assert_eq!(Gate::new(m), Err(GeometryError::NonUnitary));
    }

    #[test]
    fn new_rejects_wrong_dimensions() {
        let m = Array2::<Complex64>::eye(4);
        assert_eq!(Gate::new(m), Err(GeometryError::InvalidDimensions));
    }

    #[test]
    fn ry_half_turn_flips_zero_to_one() {
        let zero = StateVector::new(Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0));
        let out = Gate::ry(180.0).apply(&zero);
        assert!(approx(out.alpha, Complex64::new(0.0, 0.0)));
        assert!(approx(out.beta, Complex64::new(1.0, 0.0)));
    }

    #[test]
    fn rz_only_changes_phase() {
        let plus = StateVector::new(
            Complex64::new(1.0 / 2.0_f64.sqrt(), 0.0),
            Complex64::new(1.0 / 2.0_f64.sqrt(), 0.0),
        );
        let out = Gate::rz(90.0).apply(&plus);
        assert!((out.alpha.norm_sqr() - 0.5).abs() < 1e-12);
        assert!((out.beta.norm_sqr() - 0.5).abs() < 1e-12);
    }
}
