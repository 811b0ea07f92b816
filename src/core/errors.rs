use crate::core::measurements::Axis;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Rotation axis must be 'X', 'Y', or 'Z', got '{0}'")]
    InvalidAxis(String),

    #[error("Measurement basis must be 'X' or 'Z', got '{0}'")]
    InvalidMeasurementBasis(Axis),

    #[error("Matrix is not Unitary (U†U != I)")]
    NonUnitary,

    #[error("Matrix must be 2x2 to act on a single qubit")]
    InvalidDimensions,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProtocolError {
    #[error("Invalid probability: {0}. Must be between 0.0 and 1.0")]
    InvalidProbability(f64),

    #[error("Invalid percentage: {0}. Must be between 0 and 100")]
    InvalidPercentage(f64),

    #[error("Basis must be 'Z'/'rectilinear' or 'X'/'diagonal', got '{0}'")]
    InvalidBasis(String),
}

/// Checks that `p` is a valid probability.
pub(crate) fn validate_prob(p: f64) -> Result<(), ProtocolError> {
    if !(0.0..=1.0).contains(&p) {
        return Err(ProtocolError::InvalidProbability(p));
    }
    Ok(())
}
