//! Quantum Cryptography Protocols.
//!
//! This module contains the BB84 key distribution protocol and the
//! eavesdropping model used to attack and audit it.

pub mod qkd;
pub use qkd::{bb84, eavesdropper};
