use crate::core::errors::GeometryError;
use crate::core::state::Probabilities;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Pauli axis of the Bloch sphere.
///
/// Used both to pick a rotation family and to name a measurement basis.
/// Only `X` and `Z` are valid measurement bases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        };
        f.write_str(label)
    }
}

impl FromStr for Axis {
    type Err = GeometryError;

    /// Parses `"x"`, `"Y"`, ... (case-insensitive, surrounding whitespace ignored).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "X" => Ok(Axis::X),
            "Y" => Ok(Axis::Y),
            "Z" => Ok(Axis::Z),
            _ => Err(GeometryError::InvalidAxis(s.to_string())),
        }
    }
}

/// Result of a single simulated projective measurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MeasurementOutcome {
    /// Basis the measurement was requested in
    pub axis: Axis,
    /// Probability of reading 0 in the final computational-basis draw
    pub p0: f64,
    /// Probability of reading 1 in the final computational-basis draw
    pub p1: f64,
    /// Sampled outcome (`false` = 0, `true` = 1)
    pub bit: bool,
}

impl MeasurementOutcome {
    pub(crate) fn new(axis: Axis, probabilities: Probabilities, bit: bool) -> Self {
        Self {
            axis,
            p0: probabilities.p0,
            p1: probabilities.p1,
            bit,
        }
    }
}

/// Aggregated outcomes of repeated measurements on identically prepared states.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MeasurementCounts {
    pub zeros: usize,
    pub ones: usize,
}

impl MeasurementCounts {
    /// Total number of shots recorded.
    pub fn shots(&self) -> usize {
        self.zeros + self.ones
    }

    /// Observed frequency of outcome 1, or 0.0 when nothing was recorded.
    pub fn frequency_of_one(&self) -> f64 {
        if self.shots() == 0 {
            return 0.0;
        }
        self.ones as f64 / self.shots() as f64
    }
}
