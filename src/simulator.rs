//! Driver-facing session object.
//!
//! [`Simulator`] bundles one protocol engine, one eavesdropper detector and the
//! current attack settings, and maps front-end commands onto them. It is an
//! ordinary owned value: a host loop creates one per demo session and passes
//! `&mut` into each command.

use crate::core::errors::{ProtocolError, validate_prob};
use crate::core::{Clock, RandomSource, SystemClock};
use crate::protocols::qkd::{
    Bb84Protocol, DetectorConfig, EavesdropperDetector, InterceptionReport, ProtocolRunResult,
    Qubit, SecurityReport, SecuritySnapshot,
};
use log::info;
use rand::rngs::ThreadRng;
use serde::{Deserialize, Serialize};

/// Eavesdropper settings controlled from the front end.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttackParameters {
    pub active: bool,
    /// Share of qubits Eve attacks, in percent
    pub attack_percentage: f64,
    /// Detection threshold, in percent QBER
    pub detection_threshold_percent: f64,
}

impl Default for AttackParameters {
    fn default() -> Self {
        Self {
            active: false,
            attack_percentage: 69.0,
            detection_threshold_percent: 11.0,
        }
    }
}

impl AttackParameters {
    /// Intercept probability Eve applies right now (0 when inactive).
    pub fn intercept_probability(&self) -> f64 {
        if self.active {
            self.attack_percentage / 100.0
        } else {
            0.0
        }
    }
}

/// Commands a transport layer forwards to the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    StartRound {
        qubits: usize,
    },
    ToggleEavesdropper {
        active: bool,
    },
    UpdateAttackParameters {
        attack_percentage: f64,
        detection_threshold_percent: f64,
    },
    ResetSession,
}

/// What a command produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    Round(RoundSummary),
    AttackParametersChanged(AttackParameters),
    SessionReset,
}

/// A protocol round plus the detector's view of it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundSummary {
    pub run: ProtocolRunResult,
    /// Mismatch rate over the full sifted keys
    pub exact_qber: f64,
    pub security: SecuritySnapshot,
}

/// Owns the state of one demo session.
#[derive(Debug)]
pub struct Simulator<R = ThreadRng, C = SystemClock> {
    protocol: Bb84Protocol<R>,
    detector: EavesdropperDetector<R, C>,
    attack: AttackParameters,
}

impl Simulator<ThreadRng, SystemClock> {
    pub fn new() -> Self {
        Self::with_parts(
            Bb84Protocol::new(),
            EavesdropperDetector::new(),
            AttackParameters::default(),
        )
    }
}

impl Default for Simulator<ThreadRng, SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RandomSource, C: Clock> Simulator<R, C> {
    /// Builds a session from already configured parts. The detector's
    /// threshold is aligned with `attack`.
    pub fn with_parts(
        protocol: Bb84Protocol<R>,
        mut detector: EavesdropperDetector<R, C>,
        attack: AttackParameters,
    ) -> Self {
        detector.set_detection_threshold(attack.detection_threshold_percent / 100.0);
        Self {
            protocol,
            detector,
            attack,
        }
    }

    /// Session seeded from two independent random sources and a clock.
    pub fn seeded(protocol_rng: R, detector_rng: R, clock: C) -> Self {
        let attack = AttackParameters::default();
        let config = DetectorConfig::default()
            .with_detection_threshold(attack.detection_threshold_percent / 100.0);
        Self::with_parts(
            Bb84Protocol::with_rng(protocol_rng),
            EavesdropperDetector::with_parts(config, detector_rng, clock),
            attack,
        )
    }

    pub fn attack(&self) -> &AttackParameters {
        &self.attack
    }

    pub fn detector(&self) -> &EavesdropperDetector<R, C> {
        &self.detector
    }

    pub fn protocol(&self) -> &Bb84Protocol<R> {
        &self.protocol
    }

    /// Dispatches a front-end command.
    pub fn handle(&mut self, command: Command) -> Result<Event, ProtocolError> {
        match command {
            Command::StartRound { qubits } => self.start_round(qubits).map(Event::Round),
            Command::ToggleEavesdropper { active } => {
                self.toggle_eavesdropper(active);
                Ok(Event::AttackParametersChanged(self.attack))
            }
            Command::UpdateAttackParameters {
                attack_percentage,
                detection_threshold_percent,
            } => {
                self.update_attack_parameters(attack_percentage, detection_threshold_percent)?;
                Ok(Event::AttackParametersChanged(self.attack))
            }
            Command::ResetSession => {
                self.reset();
                Ok(Event::SessionReset)
            }
        }
    }

    /// Runs one BB84 round under the current attack settings.
    ///
    /// Alice's qubits pass through the detector's eavesdropper on their way to
    /// Bob, so the round is credited to the session counters. The sifted keys
    /// are then scored by the detector.
    pub fn start_round(&mut self, qubits: usize) -> Result<RoundSummary, ProtocolError> {
        let probability = self.attack.intercept_probability();
        let detector = &mut self.detector;
        let run = self.protocol.run_protocol_through(qubits, |sent| {
            let (forwarded, interception) = detector.simulate_eavesdropping(sent, probability)?;
            Ok((forwarded, interception.total_intercepts))
        })?;
        let exact_qber = self.detector.exact_qber(&run.alice_key, &run.bob_key);
        let security = self.detector.analyze_security(exact_qber);

        Ok(RoundSummary {
            run,
            exact_qber,
            security,
        })
    }

    pub fn toggle_eavesdropper(&mut self, active: bool) {
        self.attack.active = active;
        info!(
            "Eavesdropper {} with {}% attack rate",
            if active { "activated" } else { "deactivated" },
            self.attack.attack_percentage
        );
    }

    /// Updates both percentages.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::InvalidPercentage`] and leaves the settings
    /// unchanged if either value is outside `[0, 100]`, or if the detection
    /// threshold is zero.
    pub fn update_attack_parameters(
        &mut self,
        attack_percentage: f64,
        detection_threshold_percent: f64,
    ) -> Result<(), ProtocolError> {
        for value in [attack_percentage, detection_threshold_percent] {
            if validate_prob(value / 100.0).is_err() {
                return Err(ProtocolError::InvalidPercentage(value));
            }
        }
        if detection_threshold_percent == 0.0 {
            return Err(ProtocolError::InvalidPercentage(detection_threshold_percent));
        }

        self.attack.attack_percentage = attack_percentage;
        self.attack.detection_threshold_percent = detection_threshold_percent;
        self.detector
            .set_detection_threshold(detection_threshold_percent / 100.0);
        info!(
            "Attack parameters updated: {}% attack, {}% detection threshold",
            attack_percentage, detection_threshold_percent
        );
        Ok(())
    }

    /// Runs the detector's eavesdropper over `qubits` at the current attack rate.
    pub fn intercept(
        &mut self,
        qubits: &[Qubit],
    ) -> Result<(Vec<Qubit>, InterceptionReport), ProtocolError> {
        self.detector
            .simulate_eavesdropping(qubits, self.attack.intercept_probability())
    }

    pub fn report(&mut self) -> SecurityReport {
        self.detector.generate_security_report()
    }

    /// Clears session counters. Attack settings and history survive.
    pub fn reset(&mut self) {
        self.detector.reset_session();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ManualClock;
    use crate::protocols::qkd::{DataQuality, SystemHealth};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn session(clock: &ManualClock) -> Simulator<StdRng, &ManualClock> {
        Simulator::seeded(StdRng::seed_from_u64(1), StdRng::seed_from_u64(2), clock)
    }

    #[test]
    fn inactive_eavesdropper_never_intercepts() {
        let clock = ManualClock::new(0.0);
        let mut sim = session(&clock);
        let summary = sim.start_round(200).unwrap();
        assert_eq!(summary.run.intercept_count, 0);
        assert_eq!(summary.exact_qber, 0.0);
        assert!(!summary.security.eavesdropper_detected);
        assert_eq!(sim.detector().qber_history().len(), 1);
    }

    #[test]
    fn commands_map_onto_operations() {
        let clock = ManualClock::new(0.0);
        let mut sim = session(&clock);

        let event = sim.handle(Command::ToggleEavesdropper { active: true }).unwrap();
        assert!(matches!(event, Event::AttackParametersChanged(p) if p.active));

        sim.handle(Command::UpdateAttackParameters {
            attack_percentage: 100.0,
            detection_threshold_percent: 20.0,
        })
        .unwrap();
        assert_eq!(sim.attack().intercept_probability(), 1.0);
        assert_eq!(sim.detector().config().detection_threshold, 0.2);

        let Event::Round(summary) = sim.handle(Command::StartRound { qubits: 300 }).unwrap() else {
            panic!("expected a round");
        };
        assert_eq!(summary.run.intercept_count, 300);

        assert_eq!(sim.detector().session_qubits(), 300);
        assert_eq!(sim.detector().session_intercepts(), 300);

        let (_, report) = sim.intercept(&summary.run.qubits_data).unwrap();
        assert_eq!(report.total_intercepts, 300);
        assert_eq!(sim.detector().session_qubits(), 600);

        assert_eq!(sim.handle(Command::ResetSession).unwrap(), Event::SessionReset);
        assert_eq!(sim.detector().session_qubits(), 0);
        assert!(sim.attack().active);
    }

    #[test]
    fn attacked_round_shows_up_in_the_report() {
        let clock = ManualClock::new(0.0);
        let mut sim = session(&clock);
        sim.toggle_eavesdropper(true);
        sim.update_attack_parameters(100.0, 11.0).unwrap();

        let summary = sim.start_round(1000).unwrap();
        assert_eq!(sim.detector().session_qubits(), 1000);
        assert_eq!(sim.detector().session_intercepts(), 1000);
        assert_eq!(sim.detector().intercept_history().len(), 1);
        assert!(sim.detector().session_detections() > 0);

        let report = sim.report();
        assert!(summary.security.eavesdropper_detected);
        assert_ne!(report.system_health, SystemHealth::Optimal);
        assert!(report
            .threat_assessment
            .risk_factors
            .contains(&"High interception rate".to_string()));
        assert_eq!(report.threat_assessment.data_quality, DataQuality::High);
        assert_eq!(report.threat_assessment.confidence_level, 100.0);
    }

    #[test]
    fn clean_round_is_still_counted() {
        let clock = ManualClock::new(0.0);
        let mut sim = session(&clock);
        sim.start_round(40).unwrap();
        assert_eq!(sim.detector().session_qubits(), 40);
        assert_eq!(sim.detector().session_intercepts(), 0);
        assert_eq!(sim.report().system_health, SystemHealth::Optimal);
    }

    #[test]
    fn out_of_range_percentages_are_rejected() {
        let clock = ManualClock::new(0.0);
        let mut sim = session(&clock);
        let before = *sim.attack();
        assert_eq!(
            sim.update_attack_parameters(150.0, 11.0),
            Err(ProtocolError::InvalidPercentage(150.0))
        );
        assert_eq!(
            sim.update_attack_parameters(50.0, -1.0),
            Err(ProtocolError::InvalidPercentage(-1.0))
        );
        assert_eq!(
            sim.update_attack_parameters(50.0, 0.0),
            Err(ProtocolError::InvalidPercentage(0.0))
        );
        assert_eq!(*sim.attack(), before);
        assert_eq!(sim.detector().config().detection_threshold, 0.11);
    }

    #[test]
    fn report_reflects_latest_round() {
        let clock = ManualClock::new(10.0);
        let mut sim = session(&clock);
        sim.start_round(100).unwrap();
        clock.advance(3.0);
        let report = sim.report();
        assert_eq!(report.timestamp, 13.0);
        assert_eq!(report.security_analysis.qber, 0.0);
        assert_eq!(report.security_analysis.statistics.uptime_seconds, 3);
    }
}
