use crate::core::errors::GeometryError;
use crate::core::{Axis, MeasurementCounts, RandomSource};
use crate::geometry::BlochCalculator;

/// A simulator for sampling single-qubit measurements.
///
/// The `Sampler` repeats a measurement on identically prepared states and
/// tallies the outcomes, standing in for the shot counts a circuit simulator
/// would report.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sampler {
    calculator: BlochCalculator,
}

impl Sampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Measures the state at `(theta, phi)` along `axis`, `num_shots` times.
    ///
    /// # Arguments
    ///
    /// * `theta`, `phi` - Angles of the prepared state, in degrees.
    /// * `axis` - Measurement basis, `X` or `Z`.
    /// * `num_shots` - The number of times to repeat the measurement.
    /// * `rng` - Source of the per-shot draws.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidMeasurementBasis`] for `Axis::Y`.
    pub fn run<R: RandomSource + ?Sized>(
        &self,
        theta: f64,
        phi: f64,
        axis: Axis,
        num_shots: usize,
        rng: &mut R,
    ) -> Result<MeasurementCounts, GeometryError> {
        // Probabilities are computed once for every shot
        let probs = self.calculator.measurement_probabilities(theta, phi, axis)?;

        let mut counts = MeasurementCounts::default();
        for _ in 0..num_shots {
            if rng.uniform() < probs.p0 {
                counts.zeros += 1;
            } else {
                counts.ones += 1;
            }
        }

        Ok(counts)
    }
}
