mod core;
pub mod geometry;
pub mod protocols;
mod sampler;
pub mod simulator;

pub use crate::core::{
    Angles, Axis, BlochVector, BoundedHistory, Clock, Gate, ManualClock, MeasurementCounts,
    MeasurementOutcome, Probabilities, RandomSource, StateVector, SystemClock, errors, utils,
};
pub use crate::geometry::{BlochCalculator, StateInfo, StateName, Trajectory, TrajectoryPoint};
pub use crate::protocols::qkd::{
    Basis, Bb84Protocol, DetectorConfig, EavesdropperDetector, ProtocolConfig, ProtocolRunResult,
    Qubit, SecurityReport,
};
pub use crate::sampler::Sampler;
pub use crate::simulator::{AttackParameters, Command, Event, RoundSummary, Simulator};
