use crate::core::errors::ProtocolError;
use crate::core::utils::normalize_degrees;
use crate::core::{Axis, BlochVector, RandomSource};
use crate::geometry::BlochCalculator;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// BB84 encoding/measurement basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Basis {
    /// Z basis: |0⟩ / |1⟩
    #[serde(rename = "Z")]
    Rectilinear,
    /// X basis: |+⟩ / |-⟩
    #[serde(rename = "X")]
    Diagonal,
}

impl Basis {
    pub const ALL: [Basis; 2] = [Basis::Rectilinear, Basis::Diagonal];

    /// Uniformly random basis.
    pub fn random<R: RandomSource + ?Sized>(rng: &mut R) -> Basis {
        Basis::ALL[rng.choose_index(Basis::ALL.len())]
    }

    /// Bloch-sphere axis the basis measures along.
    pub fn axis(&self) -> Axis {
        match self {
            Basis::Rectilinear => Axis::Z,
            Basis::Diagonal => Axis::X,
        }
    }

    /// Angles (θ, φ) in degrees of the state encoding `bit` in this basis.
    pub fn encoding_angles(&self, bit: bool) -> (f64, f64) {
        match (self, bit) {
            (Basis::Rectilinear, false) => (0.0, 0.0),
            (Basis::Rectilinear, true) => (180.0, 0.0),
            (Basis::Diagonal, false) => (90.0, 0.0),
            (Basis::Diagonal, true) => (90.0, 180.0),
        }
    }
}

impl fmt::Display for Basis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Basis::Rectilinear => f.write_str("rectilinear"),
            Basis::Diagonal => f.write_str("diagonal"),
        }
    }
}

impl FromStr for Basis {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "z" | "rectilinear" => Ok(Basis::Rectilinear),
            "x" | "diagonal" => Ok(Basis::Diagonal),
            _ => Err(ProtocolError::InvalidBasis(s.to_string())),
        }
    }
}

/// A simulated photon in flight: the classical bit and basis it encodes plus
/// its position on the Bloch sphere.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Qubit {
    pub bit: bool,
    pub basis: Basis,
    /// Polar angle in degrees, `[0, 360)`
    pub theta: f64,
    /// Azimuthal angle in degrees, `[0, 360)`
    pub phi: f64,
    pub bloch_coords: BlochVector,
    /// Set when the qubit was re-prepared by an eavesdropper in the wrong basis
    pub disturbed: bool,
}

impl Qubit {
    /// Prepares the ideal state for `bit` in `basis`.
    pub fn encode(bit: bool, basis: Basis, calculator: &BlochCalculator) -> Self {
        let (theta, phi) = basis.encoding_angles(bit);
        Self::with_angles(bit, basis, theta, phi, false, calculator)
    }

    /// Builds a qubit at arbitrary angles; angles are normalised into `[0, 360)`.
    pub fn with_angles(
        bit: bool,
        basis: Basis,
        theta: f64,
        phi: f64,
        disturbed: bool,
        calculator: &BlochCalculator,
    ) -> Self {
        let theta = normalize_degrees(theta);
        let phi = normalize_degrees(phi);

        Self {
            bit,
            basis,
            theta,
            phi,
            bloch_coords: calculator.angles_to_bloch(theta, phi),
            disturbed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoding_table() {
        let calc = BlochCalculator::new();
        let q = Qubit::encode(false, Basis::Rectilinear, &calc);
        assert_eq!((q.theta, q.phi), (0.0, 0.0));
        assert!((q.bloch_coords.z - 1.0).abs() < 1e-12);

        let q = Qubit::encode(true, Basis::Rectilinear, &calc);
        assert_eq!((q.theta, q.phi), (180.0, 0.0));

        let q = Qubit::encode(false, Basis::Diagonal, &calc);
        assert_eq!((q.theta, q.phi), (90.0, 0.0));
        assert!((q.bloch_coords.x - 1.0).abs() < 1e-12);

        let q = Qubit::encode(true, Basis::Diagonal, &calc);
        assert_eq!((q.theta, q.phi), (90.0, 180.0));
        assert!(!q.disturbed);
    }

    #[test]
    fn with_angles_normalises() {
        let calc = BlochCalculator::new();
        let q = Qubit::with_angles(true, Basis::Diagonal, 92.0, -3.0, true, &calc);
        assert_eq!(q.phi, 357.0);
        assert!(q.disturbed);
    }

    #[test]
    fn basis_labels_parse() {
        assert_eq!("Z".parse::<Basis>(), Ok(Basis::Rectilinear));
        assert_eq!("diagonal".parse::<Basis>(), Ok(Basis::Diagonal));
        assert!(matches!(
            "Y".parse::<Basis>(),
            Err(ProtocolError::InvalidBasis(_))
        ));
        assert_eq!(Basis::Diagonal.axis(), Axis::X);
    }
}
