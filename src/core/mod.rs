mod clock;
pub mod errors;
mod gates;
mod history;
mod measurements;
mod random;
mod state;
pub mod utils;

pub use clock::{Clock, ManualClock, SystemClock};
pub use gates::Gate;
pub use history::BoundedHistory;
pub use measurements::{Axis, MeasurementCounts, MeasurementOutcome};
pub use random::RandomSource;
pub use state::{Angles, BlochVector, Probabilities, StateVector};
