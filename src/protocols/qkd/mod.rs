//! Quantum Key Distribution (QKD).
//!
//! - **bb84**: the protocol engine, one full round per call.
//! - **eavesdropper**: intercept-resend attacker and session security analysis.
//! - **report**: plain-data records both of them produce.

pub mod bb84;
pub mod eavesdropper;
mod qubit;
pub mod report;

pub use bb84::{Bb84Protocol, ProtocolConfig};
pub use eavesdropper::{DetectorConfig, EavesdropperDetector};
pub use qubit::{Basis, Qubit};
pub use report::{
    DataQuality, InterceptRecord, InterceptionReport, ProtocolRunResult, SecurityReport,
    SecuritySnapshot, SessionStatistics, SiftedKey, SystemHealth, ThreatAssessment, ThreatLevel,
};
