//! Single-qubit geometry on the Bloch sphere.
//!
//! [`BlochCalculator`] converts between the three representations used by the
//! simulator (spherical angles in degrees, Bloch vectors, and two-amplitude
//! state vectors), applies axis rotations, samples measurements, and names the
//! six cardinal states. The protocol engine and the eavesdropper detector both
//! hold one, so every Bloch coordinate in the crate comes from the same formulas.

use crate::core::errors::GeometryError;
use crate::core::utils::normalize_degrees;
use crate::core::{
    Angles, Axis, BlochVector, Gate, MeasurementOutcome, Probabilities, RandomSource, StateVector,
};
use num_complex::Complex64;
use serde::Serialize;
use std::fmt;

/// Default tolerance, in degrees, for [`BlochCalculator::identify_state_name`].
pub const DEFAULT_NAME_TOLERANCE: f64 = 1.0;

/// Default number of interpolation steps for a trajectory.
pub const DEFAULT_TRAJECTORY_POINTS: usize = 20;

/// Below this magnitude both x and y are treated as zero (the state sits on a pole).
const POLE_EPSILON: f64 = 1e-10;

/// Named single-qubit states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StateName {
    Zero,
    One,
    Plus,
    Minus,
    PlusI,
    MinusI,
    /// Anything that is not one of the six cardinal states
    Superposition,
}

impl StateName {
    /// Ket label used for display.
    pub fn ket(&self) -> &'static str {
        match self {
            StateName::Zero => "|0⟩",
            StateName::One => "|1⟩",
            StateName::Plus => "|+⟩",
            StateName::Minus => "|-⟩",
            StateName::PlusI => "|+i⟩",
            StateName::MinusI => "|-i⟩",
            StateName::Superposition => "|ψ⟩",
        }
    }
}

impl fmt::Display for StateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ket())
    }
}

/// One step of an interpolated path between two states.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrajectoryPoint {
    pub angles: Angles,
    pub bloch: BlochVector,
    pub probabilities: Probabilities,
    pub state_name: StateName,
}

/// Everything the calculator knows about a pure state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StateInfo {
    pub angles: Angles,
    pub bloch: BlochVector,
    pub probabilities: Probabilities,
    pub state_name: StateName,
    pub state_vector: StateVector,
    /// Always 1.0: the calculator only models pure states
    pub purity: f64,
    /// Always 0.0: a lone qubit cannot be entangled
    pub entanglement: f64,
}

/// Stateless calculator for single-qubit geometry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlochCalculator;

impl BlochCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Spherical angles (degrees) to Cartesian Bloch coordinates.
    pub fn angles_to_bloch(&self, theta: f64, phi: f64) -> BlochVector {
        let (sin_t, cos_t) = theta.to_radians().sin_cos();
        let (sin_p, cos_p) = phi.to_radians().sin_cos();

        BlochVector::new(sin_t * cos_p, sin_t * sin_p, cos_t)
    }

    /// Spherical angles (degrees) to amplitudes, using the half-angle convention:
    /// α = cos(θ/2), β = sin(θ/2)·e^{iφ}.
    pub fn angles_to_state_vector(&self, theta: f64, phi: f64) -> StateVector {
        let half = theta.to_radians() / 2.0;
        let alpha = Complex64::new(half.cos(), 0.0);
        let beta = Complex64::from_polar(half.sin(), phi.to_radians());

        StateVector::new(alpha, beta)
    }

    /// Expectation values of the Pauli operators for `state`.
    pub fn state_vector_to_bloch(&self, state: &StateVector) -> BlochVector {
        let cross = state.alpha.conj() * state.beta;

        BlochVector::new(
            2.0 * cross.re,
            2.0 * cross.im,
            state.alpha.norm_sqr() - state.beta.norm_sqr(),
        )
    }

    /// Computational-basis probabilities {|α|², |β|²}.
    pub fn probabilities(&self, theta: f64, phi: f64) -> Probabilities {
        self.angles_to_state_vector(theta, phi).probabilities()
    }

    /// Names the state using [`DEFAULT_NAME_TOLERANCE`].
    pub fn identify_state_name(&self, theta: f64, phi: f64) -> StateName {
        self.identify_state_name_with_tolerance(theta, phi, DEFAULT_NAME_TOLERANCE)
    }

    /// Names the state if both angles (taken mod 360) fall within `tolerance`
    /// degrees of a cardinal state.
    pub fn identify_state_name_with_tolerance(
        &self,
        theta: f64,
        phi: f64,
        tolerance: f64,
    ) -> StateName {
        let theta = normalize_degrees(theta);
        let phi = normalize_degrees(phi);
        let near = |value: f64, target: f64| (value - target).abs() < tolerance;

        if near(theta, 0.0) {
            StateName::Zero
        } else if near(theta, 180.0) {
            StateName::One
        } else if near(theta, 90.0) {
            if near(phi, 0.0) {
                StateName::Plus
            } else if near(phi, 180.0) {
                StateName::Minus
            } else if near(phi, 90.0) {
                StateName::PlusI
            } else if near(phi, 270.0) {
                StateName::MinusI
            } else {
                StateName::Superposition
            }
        } else {
            StateName::Superposition
        }
    }

    /// Linear interpolation of (θ, φ) from `start` to `end` in `num_points` steps.
    ///
    /// The trajectory yields `num_points + 1` points, both endpoints included.
    /// It is a cheap `Clone`, so it can be replayed from the start.
    pub fn generate_trajectory(&self, start: Angles, end: Angles, num_points: usize) -> Trajectory {
        Trajectory {
            calculator: *self,
            start,
            end,
            num_points,
            next: 0,
        }
    }

    /// [`generate_trajectory`](Self::generate_trajectory) with
    /// [`DEFAULT_TRAJECTORY_POINTS`] steps.
    pub fn generate_default_trajectory(&self, start: Angles, end: Angles) -> Trajectory {
        self.generate_trajectory(start, end, DEFAULT_TRAJECTORY_POINTS)
    }

    /// Rotates the state by `degrees` about `axis` and returns the new Bloch vector.
    pub fn apply_rotation(&self, theta: f64, phi: f64, axis: Axis, degrees: f64) -> BlochVector {
        let state = self.angles_to_state_vector(theta, phi);
        let rotated = Gate::rotation(axis, degrees).apply(&state);

        self.state_vector_to_bloch(&rotated)
    }

    /// Outcome probabilities for a measurement along `axis`.
    ///
    /// Z reads the amplitudes directly. X first rotates the frame by a 90° Y
    /// rotation and reads the resulting Z probabilities, so the X outcome 0
    /// corresponds to |-⟩ and 1 to |+⟩.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidMeasurementBasis`] for `Axis::Y`.
    pub fn measurement_probabilities(
        &self,
        theta: f64,
        phi: f64,
        axis: Axis,
    ) -> Result<Probabilities, GeometryError> {
        match axis {
            Axis::Z => Ok(self.probabilities(theta, phi)),
            Axis::X => {
                let rotated = self.apply_rotation(theta, phi, Axis::Y, 90.0);
                let angles = self.bloch_to_angles(&rotated);
                self.measurement_probabilities(angles.theta, angles.phi, Axis::Z)
            }
            Axis::Y => Err(GeometryError::InvalidMeasurementBasis(axis)),
        }
    }

    /// Simulates one projective measurement along `axis`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidMeasurementBasis`] for `Axis::Y`.
    pub fn measure_state<R: RandomSource + ?Sized>(
        &self,
        theta: f64,
        phi: f64,
        axis: Axis,
        rng: &mut R,
    ) -> Result<MeasurementOutcome, GeometryError> {
        let probabilities = self.measurement_probabilities(theta, phi, axis)?;
        let bit = rng.uniform() >= probabilities.p0;

        Ok(MeasurementOutcome::new(axis, probabilities, bit))
    }

    /// Bloch coordinates back to spherical angles in degrees.
    ///
    /// φ is reported in `[0, 360)`. On the poles (x = y = 0) φ is undefined and
    /// reported as 0.
    pub fn bloch_to_angles(&self, bloch: &BlochVector) -> Angles {
        let theta = bloch.z.clamp(-1.0, 1.0).acos().to_degrees();

        let phi = if bloch.x.abs() < POLE_EPSILON && bloch.y.abs() < POLE_EPSILON {
            0.0
        } else {
            normalize_degrees(bloch.y.atan2(bloch.x).to_degrees())
        };

        Angles::new(theta, phi)
    }

    /// Collects every derived quantity for a state.
    pub fn state_info(&self, theta: f64, phi: f64) -> StateInfo {
        StateInfo {
            angles: Angles::new(theta, phi),
            bloch: self.angles_to_bloch(theta, phi),
            probabilities: self.probabilities(theta, phi),
            state_name: self.identify_state_name(theta, phi),
            state_vector: self.angles_to_state_vector(theta, phi),
            purity: 1.0,
            entanglement: 0.0,
        }
    }

    fn trajectory_point(&self, theta: f64, phi: f64) -> TrajectoryPoint {
        TrajectoryPoint {
            angles: Angles::new(theta, phi),
            bloch: self.angles_to_bloch(theta, phi),
            probabilities: self.probabilities(theta, phi),
            state_name: self.identify_state_name(theta, phi),
        }
    }
}

/// Finite, restartable iterator over an interpolated path. See
/// [`BlochCalculator::generate_trajectory`].
#[derive(Debug, Clone)]
pub struct Trajectory {
    calculator: BlochCalculator,
    start: Angles,
    end: Angles,
    num_points: usize,
    next: usize,
}

impl Trajectory {
    /// Rewinds to the first point.
    pub fn restart(&mut self) {
        self.next = 0;
    }

    fn point_at(&self, step: usize) -> TrajectoryPoint {
        let t = if self.num_points == 0 {
            0.0
        } else {
            step as f64 / self.num_points as f64
        };
        let theta = self.start.theta + t * (self.end.theta - self.start.theta);
        let phi = self.start.phi + t * (self.end.phi - self.start.phi);

        self.calculator.trajectory_point(theta, phi)
    }
}

impl Iterator for Trajectory {
    type Item = TrajectoryPoint;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next > self.num_points {
            return None;
        }
        let point = self.point_at(self.next);
        self.next += 1;
        Some(point)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.num_points + 1).saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Trajectory {}
