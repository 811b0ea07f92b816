//! BB84 protocol engine.
//!
//! One call to [`Bb84Protocol::run_protocol`] walks a whole round:
//! bit generation, encoding, optional intercept-resend, Bob's measurement,
//! sifting, sampled error estimation and the accept/abort decision.
//! Nothing is retained between rounds.

use super::qubit::{Basis, Qubit};
use super::report::{ProtocolRunResult, SiftedKey};
use crate::core::RandomSource;
use crate::core::errors::{ProtocolError, validate_prob};
use crate::geometry::BlochCalculator;
use log::{debug, warn};
use rand::rngs::ThreadRng;
use serde::{Deserialize, Serialize};

/// Fixed constants of the protocol engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProtocolConfig {
    /// Sampled QBER above which the round aborts
    pub qber_threshold: f64,
    /// Upper bound on the default QBER sample
    pub max_sample_size: usize,
    /// Default sample is `sifted_len / sample_divisor`
    pub sample_divisor: usize,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            qber_threshold: 0.11,
            max_sample_size: 50,
            sample_divisor: 4,
        }
    }
}

/// Runs BB84 rounds with an injected random source.
#[derive(Debug, Clone)]
pub struct Bb84Protocol<R = ThreadRng> {
    rng: R,
    calculator: BlochCalculator,
    config: ProtocolConfig,
}

impl Bb84Protocol<ThreadRng> {
    /// Creates an engine drawing from the thread-local generator.
    pub fn new() -> Self {
        Self::with_rng(rand::rng())
    }
}

impl Default for Bb84Protocol<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RandomSource> Bb84Protocol<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            calculator: BlochCalculator::new(),
            config: ProtocolConfig::default(),
        }
    }

    /// Replaces the protocol constants.
    pub fn with_config(mut self, config: ProtocolConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ProtocolConfig {
        &self.config
    }

    /// `n` independent fair bits.
    pub fn generate_random_bits(&mut self, n: usize) -> Vec<bool> {
        (0..n).map(|_| self.rng.coin(0.5)).collect()
    }

    /// `n` independent uniformly chosen bases.
    pub fn generate_random_bases(&mut self, n: usize) -> Vec<Basis> {
        (0..n).map(|_| Basis::random(&mut self.rng)).collect()
    }

    /// Prepares one qubit per `(bit, basis)` pair. Extra entries in the longer
    /// slice are ignored.
    pub fn encode_qubits(&self, bits: &[bool], bases: &[Basis]) -> Vec<Qubit> {
        bits.iter()
            .zip(bases)
            .map(|(&bit, &basis)| Qubit::encode(bit, basis, &self.calculator))
            .collect()
    }

    /// Measures each qubit in the paired basis.
    ///
    /// A matching basis returns the encoded bit with no randomness involved.
    /// A mismatched basis returns a fair coin, regardless of the qubit's
    /// actual amplitudes.
    pub fn measure_qubits(&mut self, qubits: &[Qubit], bases: &[Basis]) -> Vec<bool> {
        qubits
            .iter()
            .zip(bases)
            .map(|(qubit, &basis)| {
                if qubit.basis == basis {
                    qubit.bit
                } else {
                    self.rng.coin(0.5)
                }
            })
            .collect()
    }

    /// Keeps the positions where Alice and Bob chose the same basis.
    pub fn sift_key(
        alice_bases: &[Basis],
        bob_bases: &[Basis],
        alice_bits: &[bool],
        bob_measurements: &[bool],
    ) -> SiftedKey {
        let mut sifted = SiftedKey::default();

        for (i, (((a_basis, b_basis), &a_bit), _)) in alice_bases
            .iter()
            .zip(bob_bases)
            .zip(alice_bits)
            .zip(bob_measurements)
            .enumerate()
        {
            if a_basis == b_basis {
                sifted.key.push(a_bit);
                sifted.indices.push(i);
            }
        }

        sifted
    }

    /// Estimates the QBER on a random subset of the key.
    ///
    /// The sample size defaults to `min(len / 4, 50)` and is drawn without
    /// replacement; the rate is computed over the sample only. Empty,
    /// mismatched or too-short keys yield 0.0.
    pub fn sampled_qber(
        &mut self,
        alice_key: &[bool],
        bob_key: &[bool],
        sample_size: Option<usize>,
    ) -> f64 {
        if alice_key.is_empty() || alice_key.len() != bob_key.len() {
            return 0.0;
        }

        let sample_size = sample_size.unwrap_or_else(|| {
            (alice_key.len() / self.config.sample_divisor.max(1)).min(self.config.max_sample_size)
        });
        if sample_size == 0 {
            return 0.0;
        }

        let test_indices = self
            .rng
            .sample_without_replacement(alice_key.len(), sample_size);
        if test_indices.is_empty() {
            return 0.0;
        }

        let errors = test_indices
            .iter()
            .filter(|&&i| alice_key[i] != bob_key[i])
            .count();

        errors as f64 / test_indices.len() as f64
    }

    /// Runs BB84 protocol.
    ///
    /// Each qubit is independently intercepted with probability
    /// `eve_intercept_probability`: Eve measures in a random basis and resends
    /// her own re-encoding. A sampled QBER above the configured threshold
    /// aborts the round and leaves the shared key empty.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::InvalidProbability`] before doing any work if
    /// `eve_intercept_probability` is outside `[0, 1]`.
    pub fn run_protocol(
        &mut self,
        num_qubits: usize,
        eve_intercept_probability: f64,
    ) -> Result<ProtocolRunResult, ProtocolError> {
        validate_prob(eve_intercept_probability)?;
        self.run_round(num_qubits, |engine, sent| {
            Ok(engine.intercept_resend(sent, eve_intercept_probability))
        })
    }

    /// Runs a round whose quantum channel is `channel`.
    ///
    /// `channel` receives Alice's encoded qubits and returns what reaches Bob
    /// together with the number of qubits it intercepted. It is how an
    /// external eavesdropper model is spliced between encoding and Bob's
    /// measurement.
    ///
    /// # Errors
    ///
    /// Propagates any error returned by `channel`.
    pub fn run_protocol_through<F>(
        &mut self,
        num_qubits: usize,
        channel: F,
    ) -> Result<ProtocolRunResult, ProtocolError>
    where
        F: FnOnce(&[Qubit]) -> Result<(Vec<Qubit>, usize), ProtocolError>,
    {
        self.run_round(num_qubits, |_, sent| channel(sent))
    }

    /// Built-in intercept-resend: Eve measures like Bob would and re-encodes.
    fn intercept_resend(&mut self, sent: &[Qubit], probability: f64) -> (Vec<Qubit>, usize) {
        let mut intercept_count = 0;
        let mut qubits = sent.to_vec();
        if probability > 0.0 {
            for qubit in qubits.iter_mut() {
                if self.rng.coin(probability) {
                    intercept_count += 1;
                    let eve_basis = Basis::random(&mut self.rng);
                    let eve_bit = self.measure_qubits(std::slice::from_ref(qubit), &[eve_basis])[0];
                    *qubit = Qubit::encode(eve_bit, eve_basis, &self.calculator);
                }
            }
        }
        (qubits, intercept_count)
    }

    fn run_round<F>(
        &mut self,
        num_qubits: usize,
        channel: F,
    ) -> Result<ProtocolRunResult, ProtocolError>
    where
        F: FnOnce(&mut Self, &[Qubit]) -> Result<(Vec<Qubit>, usize), ProtocolError>,
    {
        // Alice prepares qubits
        let alice_bits = self.generate_random_bits(num_qubits);
        let alice_bases = self.generate_random_bases(num_qubits);
        let sent = self.encode_qubits(&alice_bits, &alice_bases);

        // Quantum channel, possibly with Eve on it
        let (qubits, intercept_count) = channel(self, &sent)?;

        // Bob measures
        let bob_bases = self.generate_random_bases(num_qubits);
        let bob_measurements = self.measure_qubits(&qubits, &bob_bases);

        // Sifting stage
        let sifted = Self::sift_key(&alice_bases, &bob_bases, &alice_bits, &bob_measurements);
        let bob_key: Vec<bool> = sifted.indices.iter().map(|&i| bob_measurements[i]).collect();
        let alice_key = sifted.key;

        // Error estimation
        let qber = self.sampled_qber(&alice_key, &bob_key, None);
        let eavesdropper_detected = qber > self.config.qber_threshold;

        let shared_key = if eavesdropper_detected {
            warn!(
                "BB84 round aborted: sampled QBER {:.3} exceeds threshold {:.3}",
                qber, self.config.qber_threshold
            );
            Vec::new()
        } else {
            alice_key.clone()
        };

        let efficiency = if num_qubits > 0 {
            shared_key.len() as f64 / num_qubits as f64
        } else {
            0.0
        };

        debug!(
            "BB84 round: sent={} sifted={} key={} qber={:.3} intercepts={}",
            num_qubits,
            alice_key.len(),
            shared_key.len(),
            qber,
            intercept_count
        );

        Ok(ProtocolRunResult {
            qubits_sent: num_qubits,
            qubits_sifted: alice_key.len(),
            shared_key_length: shared_key.len(),
            qber,
            eavesdropper_detected,
            intercept_count,
            efficiency,
            qubits_data: qubits,
            shared_key,
            alice_key,
            bob_key,
        })
    }
}
