use ndarray::{Array1, array};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// Spherical angles of a pure single-qubit state, in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Angles {
    /// Polar angle measured from |0⟩
    pub theta: f64,
    /// Azimuthal angle measured from the +X axis
    pub phi: f64,
}

impl Angles {
    pub fn new(theta: f64, phi: f64) -> Self {
        Self { theta, phi }
    }
}

/// Cartesian point on the Bloch sphere.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BlochVector {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl BlochVector {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean length; 1.0 for every pure state.
    pub fn norm(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

/// Computational-basis outcome probabilities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Probabilities {
    pub p0: f64,
    pub p1: f64,
}

/// Two-amplitude state vector α|0⟩ + β|1⟩.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StateVector {
    pub alpha: Complex64,
    pub beta: Complex64,
}

impl StateVector {
    pub fn new(alpha: Complex64, beta: Complex64) -> Self {
        Self { alpha, beta }
    }

    /// Column-vector view used for matrix products.
    pub fn to_array(&self) -> Array1<Complex64> {
        array![self.alpha, self.beta]
    }

    pub fn from_array(vector: &Array1<Complex64>) -> Self {
        Self {
            alpha: vector[0],
            beta: vector[1],
        }
    }

    /// Sum of squared amplitudes.
    pub fn norm_sqr(&self) -> f64 {
        self.alpha.norm_sqr() + self.beta.norm_sqr()
    }

    pub fn probabilities(&self) -> Probabilities {
        Probabilities {
            p0: self.alpha.norm_sqr(),
            p1: self.beta.norm_sqr(),
        }
    }
}
