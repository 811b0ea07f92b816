//! Intercept-resend eavesdropper model and security analysis.
//!
//! [`EavesdropperDetector`] is a long-lived session object. It models Eve on a
//! qubit stream, keeps bounded histories of QBER samples, interception reports
//! and security snapshots, and turns them into threat classifications and
//! reports.

use super::qubit::{Basis, Qubit};
use super::report::{
    DataQuality, InterceptRecord, InterceptionReport, SecurityReport, SecuritySnapshot,
    SessionStatistics, SystemHealth, ThreatAssessment, ThreatLevel,
};
use crate::core::errors::{ProtocolError, validate_prob};
use crate::core::{BoundedHistory, Clock, RandomSource, SystemClock, utils};
use crate::geometry::BlochCalculator;
use log::{debug, info};
use rand::rngs::ThreadRng;
use serde::{Deserialize, Serialize};

/// Half-width, in degrees, of the angular noise Eve's wrong-basis
/// re-preparation adds to θ and φ.
pub const RESEND_NOISE_DEGREES: f64 = 5.0;

/// Chance that a wrong-basis interception is flagged.
const MISMATCH_DETECTION_PROBABILITY: f64 = 0.5;

/// QBER at which the security score reaches zero.
const SCORE_FLOOR_QBER: f64 = 0.20;

/// Detector settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// QBER fraction above which an eavesdropper is reported
    pub detection_threshold: f64,
    /// Capacity of every history buffer
    pub window_size: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            detection_threshold: 0.11,
            window_size: 100,
        }
    }
}

impl DetectorConfig {
    pub fn with_detection_threshold(mut self, threshold: f64) -> Self {
        self.detection_threshold = threshold;
        self
    }

    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }
}

/// Session-scoped eavesdropper model and security analyzer.
#[derive(Debug)]
pub struct EavesdropperDetector<R = ThreadRng, C = SystemClock> {
    config: DetectorConfig,
    rng: R,
    clock: C,
    calculator: BlochCalculator,

    qber_history: BoundedHistory<f64>,
    intercept_history: BoundedHistory<InterceptionReport>,
    security_history: BoundedHistory<SecuritySnapshot>,

    session_intercepts: usize,
    session_detections: usize,
    session_qubits: usize,
    session_start: f64,
}

impl EavesdropperDetector<ThreadRng, SystemClock> {
    /// Detector with default settings, the thread-local generator and the wall clock.
    pub fn new() -> Self {
        Self::with_config(DetectorConfig::default())
    }

    pub fn with_config(config: DetectorConfig) -> Self {
        Self::with_parts(config, rand::rng(), SystemClock)
    }
}

impl Default for EavesdropperDetector<ThreadRng, SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RandomSource, C: Clock> EavesdropperDetector<R, C> {
    /// Detector with an explicit random source and clock.
    pub fn with_parts(config: DetectorConfig, rng: R, clock: C) -> Self {
        let session_start = clock.now();
        Self {
            config,
            rng,
            clock,
            calculator: BlochCalculator::new(),
            qber_history: BoundedHistory::new(config.window_size),
            intercept_history: BoundedHistory::new(config.window_size),
            security_history: BoundedHistory::new(config.window_size),
            session_intercepts: 0,
            session_detections: 0,
            session_qubits: 0,
            session_start,
        }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Changes the detection threshold without touching history or counters.
    pub fn set_detection_threshold(&mut self, threshold: f64) {
        self.config.detection_threshold = threshold;
    }

    pub fn qber_history(&self) -> &BoundedHistory<f64> {
        &self.qber_history
    }

    pub fn intercept_history(&self) -> &BoundedHistory<InterceptionReport> {
        &self.intercept_history
    }

    pub fn security_history(&self) -> &BoundedHistory<SecuritySnapshot> {
        &self.security_history
    }

    pub fn session_qubits(&self) -> usize {
        self.session_qubits
    }

    pub fn session_intercepts(&self) -> usize {
        self.session_intercepts
    }

    pub fn session_detections(&self) -> usize {
        self.session_detections
    }

    /// Runs Eve over `qubits`, intercepting each one independently with
    /// probability `intercept_probability`.
    ///
    /// On an intercept Eve measures in a random basis. A correct guess yields
    /// the bit (information gain 1.0), a wrong one a coin flip (0.5). She
    /// resends her own `(bit, basis)`, with ±[`RESEND_NOISE_DEGREES`] of
    /// angular noise when her basis was wrong. Whether an intercept is flagged
    /// is a separate coin: 50% for a wrong basis, never for a right one.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::InvalidProbability`] before touching any
    /// counter if `intercept_probability` is outside `[0, 1]`.
    pub fn simulate_eavesdropping(
        &mut self,
        qubits: &[Qubit],
        intercept_probability: f64,
    ) -> Result<(Vec<Qubit>, InterceptionReport), ProtocolError> {
        validate_prob(intercept_probability)?;

        let mut report = InterceptionReport::default();
        let mut total_gain = 0.0;

        let forwarded = qubits
            .iter()
            .enumerate()
            .map(|(i, qubit)| {
                if !self.rng.coin(intercept_probability) {
                    return *qubit;
                }

                report.total_intercepts += 1;
                self.session_intercepts += 1;

                let eve_basis = Basis::random(&mut self.rng);
                let (eve_bit, information_gain) = if eve_basis == qubit.basis {
                    (qubit.bit, 1.0)
                } else {
                    (self.rng.coin(0.5), 0.5)
                };
                total_gain += information_gain;

                let resent = self.prepare_disturbed_qubit(eve_bit, eve_basis, qubit.basis);

                report.attack_pattern.push(InterceptRecord {
                    qubit_index: i,
                    eve_basis,
                    original_basis: qubit.basis,
                    information_gain,
                });

                if self.would_be_detected(qubit.basis, eve_basis) {
                    report.detection_events += 1;
                    self.session_detections += 1;
                }

                resent
            })
            .collect();

        self.session_qubits += qubits.len();

        if report.total_intercepts > 0 {
            report.average_information_gain = total_gain / report.total_intercepts as f64;
        }

        debug!(
            "Eavesdropper pass: qubits={} intercepts={} detections={}",
            qubits.len(),
            report.total_intercepts,
            report.detection_events
        );

        self.intercept_history.push(report.clone());
        Ok((forwarded, report))
    }

    /// Eve's re-preparation of `(bit, eve_basis)`.
    fn prepare_disturbed_qubit(&mut self, bit: bool, eve_basis: Basis, original_basis: Basis) -> Qubit {
        let (mut theta, mut phi) = eve_basis.encoding_angles(bit);
        let disturbed = eve_basis != original_basis;

        if disturbed {
            theta += self
                .rng
                .uniform_range(-RESEND_NOISE_DEGREES, RESEND_NOISE_DEGREES);
            phi += self
                .rng
                .uniform_range(-RESEND_NOISE_DEGREES, RESEND_NOISE_DEGREES);
        }

        Qubit::with_angles(bit, eve_basis, theta, phi, disturbed, &self.calculator)
    }

    fn would_be_detected(&mut self, original_basis: Basis, eve_basis: Basis) -> bool {
        original_basis != eve_basis && self.rng.coin(MISMATCH_DETECTION_PROBABILITY)
    }

    /// Exact mismatch fraction over the whole paired sequence.
    ///
    /// Empty or mismatched-length inputs yield 0.0 and are not recorded;
    /// every other result is appended to the QBER history.
    pub fn exact_qber(&mut self, alice_bits: &[bool], bob_bits: &[bool]) -> f64 {
        if alice_bits.is_empty() || alice_bits.len() != bob_bits.len() {
            return 0.0;
        }

        let errors = alice_bits
            .iter()
            .zip(bob_bits)
            .filter(|(a, b)| a != b)
            .count();
        let qber = errors as f64 / alice_bits.len() as f64;

        self.qber_history.push(qber);
        qber
    }

    /// Classifies `qber` and records the snapshot in the security history.
    pub fn analyze_security(&mut self, qber: f64) -> SecuritySnapshot {
        let estimated_key_rate = if qber > 0.11 {
            0
        } else {
            ((1.0 - 2.0 * qber).max(0.0) * 1000.0) as u64
        };

        let snapshot = SecuritySnapshot {
            qber,
            threat_level: ThreatLevel::from_qber(qber),
            security_score: (1.0 - qber / SCORE_FLOOR_QBER).max(0.0),
            efficiency: (1.0 - 2.0 * qber).max(0.0),
            estimated_key_rate,
            detection_confidence: detection_confidence(qber, self.config.detection_threshold),
            eavesdropper_detected: qber > self.config.detection_threshold,
            recommendation: security_recommendation(qber).to_string(),
            statistics: self.session_statistics(),
        };

        self.security_history.push(snapshot.clone());
        snapshot
    }

    /// Counters, uptime and statistics over the QBER history.
    pub fn session_statistics(&self) -> SessionStatistics {
        let uptime = (self.clock.now() - self.session_start).max(0.0);
        let session_qber = self.session_detections as f64 / self.session_qubits.max(1) as f64;

        let history = self.qber_history.to_vec();
        let (average_qber, qber_trend, qber_standard_deviation) = if history.len() > 1 {
            (
                utils::mean(&history),
                utils::trend(&history),
                utils::population_std_dev(&history),
            )
        } else {
            (session_qber, 0.0, 0.0)
        };

        SessionStatistics {
            uptime_seconds: uptime as u64,
            session_qubits: self.session_qubits,
            session_intercepts: self.session_intercepts,
            session_detections: self.session_detections,
            session_qber,
            success_rate: 1.0 - session_qber,
            average_qber,
            qber_trend,
            qber_standard_deviation,
            detection_efficiency: self.session_detections as f64
                / self.session_intercepts.max(1) as f64,
        }
    }

    /// Full report built around the most recent QBER sample (0.0 if none).
    pub fn generate_security_report(&mut self) -> SecurityReport {
        let current_qber = self.qber_history.last().copied().unwrap_or(0.0);
        let analysis = self.analyze_security(current_qber);

        let stats = self.session_statistics();
        let report = SecurityReport {
            timestamp: self.clock.now(),
            threat_assessment: threat_assessment(&stats),
            mitigation_strategies: mitigation_strategies(&analysis),
            system_health: SystemHealth::from_session_qber(stats.session_qber),
            security_analysis: analysis,
        };

        info!(
            "Security report: threat={} health={:?} qber={:.3}",
            report.security_analysis.threat_level, report.system_health, current_qber
        );
        report
    }

    /// Zeroes the session counters and restarts the uptime clock.
    /// History buffers are kept.
    pub fn reset_session(&mut self) {
        self.session_intercepts = 0;
        self.session_detections = 0;
        self.session_qubits = 0;
        self.session_start = self.clock.now();
        info!("Eavesdropper detector session reset");
    }
}

/// `qber / threshold` capped at 1. A non-positive threshold flags any error at all.
fn detection_confidence(qber: f64, threshold: f64) -> f64 {
    if threshold > 0.0 {
        (qber / threshold).min(1.0)
    } else if qber > 0.0 {
        1.0
    } else {
        0.0
    }
}

fn security_recommendation(qber: f64) -> &'static str {
    if qber < 0.02 {
        "Secure - Continue normal operation"
    } else if qber < 0.05 {
        "Monitor - Slightly elevated error rate"
    } else if qber < 0.11 {
        "Caution - Approaching detection threshold"
    } else {
        "Alert - Potential eavesdropper detected! Abort key exchange"
    }
}

fn threat_assessment(stats: &SessionStatistics) -> ThreatAssessment {
    let mut risk_factors = Vec::new();
    if stats.session_qber > 0.05 {
        risk_factors.push("Elevated error rate detected".to_string());
    }
    if stats.qber_trend > 0.5 {
        risk_factors.push("Increasing error trend".to_string());
    }
    if stats.session_intercepts as f64 > stats.session_qubits as f64 * 0.1 {
        risk_factors.push("High interception rate".to_string());
    }

    ThreatAssessment {
        overall_risk: ThreatLevel::from_qber(stats.session_qber),
        risk_factors,
        confidence_level: (stats.session_qubits as f64 / 10.0).min(100.0),
        data_quality: DataQuality::from_session_qubits(stats.session_qubits),
    }
}

fn mitigation_strategies(analysis: &SecuritySnapshot) -> Vec<String> {
    let strategies: &[&str] = if analysis.eavesdropper_detected {
        &[
            "Immediately halt key distribution",
            "Increase qubit transmission rate",
            "Implement quantum error correction",
            "Switch to backup quantum channel",
        ]
    } else if analysis.qber > 0.05 {
        &[
            "Monitor channel continuously",
            "Increase basis randomization",
            "Implement privacy amplification",
        ]
    } else {
        &["Continue normal operation with regular monitoring"]
    };

    strategies.iter().map(|s| s.to_string()).collect()
}
