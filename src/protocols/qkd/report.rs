//! Plain-data records produced by the protocol engine and the eavesdropper
//! detector. Serialising them for a front end is left to the caller.

use super::qubit::{Basis, Qubit};
use serde::Serialize;
use std::fmt;

/// Key bits kept after basis reconciliation, with the positions they came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SiftedKey {
    pub key: Vec<bool>,
    /// Strictly increasing positions in the raw transmission
    pub indices: Vec<usize>,
}

/// Outcome of one full BB84 round.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProtocolRunResult {
    pub qubits_sent: usize,
    pub qubits_sifted: usize,
    pub shared_key_length: usize,
    /// Sampled estimate, see [`super::bb84::Bb84Protocol::sampled_qber`]
    pub qber: f64,
    pub eavesdropper_detected: bool,
    pub intercept_count: usize,
    /// `shared_key_length / qubits_sent`, 0.0 when nothing was sent
    pub efficiency: f64,
    /// Qubits as they reached Bob
    pub qubits_data: Vec<Qubit>,
    /// Empty whenever `eavesdropper_detected` is set
    pub shared_key: Vec<bool>,
    /// Alice's sifted key
    pub alice_key: Vec<bool>,
    /// Bob's sifted key
    pub bob_key: Vec<bool>,
}

/// A single intercept-resend event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InterceptRecord {
    pub qubit_index: usize,
    pub eve_basis: Basis,
    pub original_basis: Basis,
    /// 1.0 when Eve guessed the basis, 0.5 otherwise
    pub information_gain: f64,
}

/// Summary of one pass of the eavesdropper over a qubit sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InterceptionReport {
    pub total_intercepts: usize,
    pub detection_events: usize,
    /// Mean over intercepted qubits only, 0.0 when nothing was intercepted
    pub average_information_gain: f64,
    pub attack_pattern: Vec<InterceptRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ThreatLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl ThreatLevel {
    /// Buckets: `[0, 0.05)` low, `[0.05, 0.11)` medium, `[0.11, 0.20)` high,
    /// everything else critical.
    pub fn from_qber(qber: f64) -> Self {
        if (0.0..0.05).contains(&qber) {
            ThreatLevel::Low
        } else if (0.05..0.11).contains(&qber) {
            ThreatLevel::Medium
        } else if (0.11..0.20).contains(&qber) {
            ThreatLevel::High
        } else {
            ThreatLevel::Critical
        }
    }
}

impl fmt::Display for ThreatLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ThreatLevel::Low => "LOW",
            ThreatLevel::Medium => "MEDIUM",
            ThreatLevel::High => "HIGH",
            ThreatLevel::Critical => "CRITICAL",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SystemHealth {
    Optimal,
    Marginal,
    Degraded,
    Critical,
}

impl SystemHealth {
    pub fn from_session_qber(session_qber: f64) -> Self {
        if session_qber > 0.15 {
            SystemHealth::Critical
        } else if session_qber > 0.08 {
            SystemHealth::Degraded
        } else if session_qber > 0.03 {
            SystemHealth::Marginal
        } else {
            SystemHealth::Optimal
        }
    }
}

/// How much traffic backs the statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DataQuality {
    Low,
    Medium,
    High,
}

impl DataQuality {
    pub fn from_session_qubits(qubits: usize) -> Self {
        if qubits > 50 {
            DataQuality::High
        } else if qubits > 20 {
            DataQuality::Medium
        } else {
            DataQuality::Low
        }
    }
}

/// Counters and history statistics for the current session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SessionStatistics {
    pub uptime_seconds: u64,
    pub session_qubits: usize,
    pub session_intercepts: usize,
    pub session_detections: usize,
    /// `detections / max(1, qubits)`. Counts detection events, not bit errors.
    pub session_qber: f64,
    pub success_rate: f64,
    pub average_qber: f64,
    /// In `[-1, 1]`
    pub qber_trend: f64,
    pub qber_standard_deviation: f64,
    pub detection_efficiency: f64,
}

/// Security classification of a single QBER value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecuritySnapshot {
    pub qber: f64,
    pub threat_level: ThreatLevel,
    pub security_score: f64,
    pub efficiency: f64,
    /// Bits per second
    pub estimated_key_rate: u64,
    pub detection_confidence: f64,
    pub eavesdropper_detected: bool,
    pub recommendation: String,
    pub statistics: SessionStatistics,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThreatAssessment {
    pub overall_risk: ThreatLevel,
    pub risk_factors: Vec<String>,
    /// Percentage in `[0, 100]`
    pub confidence_level: f64,
    pub data_quality: DataQuality,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecurityReport {
    /// Seconds since the Unix epoch
    pub timestamp: f64,
    pub security_analysis: SecuritySnapshot,
    pub threat_assessment: ThreatAssessment,
    pub mitigation_strategies: Vec<String>,
    pub system_health: SystemHealth,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threat_buckets_are_half_open() {
        assert_eq!(ThreatLevel::from_qber(0.0), ThreatLevel::Low);
        assert_eq!(ThreatLevel::from_qber(0.0499), ThreatLevel::Low);
        assert_eq!(ThreatLevel::from_qber(0.05), ThreatLevel::Medium);
        assert_eq!(ThreatLevel::from_qber(0.11), ThreatLevel::High);
        assert_eq!(ThreatLevel::from_qber(0.20), ThreatLevel::Critical);
        assert_eq!(ThreatLevel::from_qber(1.5), ThreatLevel::Critical);
        assert_eq!(ThreatLevel::High.to_string(), "HIGH");
    }

    #[test]
    fn health_buckets() {
        assert_eq!(SystemHealth::from_session_qber(0.0), SystemHealth::Optimal);
        assert_eq!(SystemHealth::from_session_qber(0.03), SystemHealth::Optimal);
        assert_eq!(SystemHealth::from_session_qber(0.05), SystemHealth::Marginal);
        assert_eq!(SystemHealth::from_session_qber(0.1), SystemHealth::Degraded);
        assert_eq!(SystemHealth::from_session_qber(0.5), SystemHealth::Critical);
    }

    #[test]
    fn data_quality_buckets() {
        assert_eq!(DataQuality::from_session_qubits(20), DataQuality::Low);
        assert_eq!(DataQuality::from_session_qubits(21), DataQuality::Medium);
        assert_eq!(DataQuality::from_session_qubits(51), DataQuality::High);
    }
}
