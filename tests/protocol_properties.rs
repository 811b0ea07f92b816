use bb84_sim::{
    Basis, BlochCalculator, Bb84Protocol, DetectorConfig, EavesdropperDetector, ManualClock,
    Simulator,
};
use bb84_sim::protocols::qkd::ThreatLevel;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn protocol(seed: u64) -> Bb84Protocol<StdRng> {
    Bb84Protocol::with_rng(StdRng::seed_from_u64(seed))
}

#[test]
fn generated_sequences_match_requested_length() {
    let mut p = protocol(100);
    for n in 0..64 {
        let bits = p.generate_random_bits(n);
        let bases = p.generate_random_bases(n);
        assert_eq!(bits.len(), n);
        assert_eq!(bases.len(), n);
        assert!(bases.iter().all(|b| Basis::ALL.contains(b)));
    }
}

#[test]
fn sifted_length_equals_matching_basis_count() {
    let mut p = protocol(101);
    for _ in 0..20 {
        let alice_bits = p.generate_random_bits(128);
        let alice_bases = p.generate_random_bases(128);
        let bob_bases = p.generate_random_bases(128);
        let qubits = p.encode_qubits(&alice_bits, &alice_bases);
        let bob_bits = p.measure_qubits(&qubits, &bob_bases);

        let sifted = Bb84Protocol::<StdRng>::sift_key(&alice_bases, &bob_bases, &alice_bits, &bob_bits);
        let matching = alice_bases.iter().zip(&bob_bases).filter(|(a, b)| a == b).count();

        assert_eq!(sifted.key.len(), matching);
        assert_eq!(sifted.indices.len(), matching);
        assert!(sifted.indices.windows(2).all(|w| w[0] < w[1]));
        for (&i, &bit) in sifted.indices.iter().zip(&sifted.key) {
            assert_eq!(bit, alice_bits[i]);
            assert_eq!(bob_bits[i], alice_bits[i]);
        }
    }
}

#[test]
fn clean_channel_has_zero_qber() {
    for seed in 0..25 {
        let result = protocol(seed).run_protocol(100, 0.0).unwrap();
        assert_eq!(result.qber, 0.0);
        assert!(!result.eavesdropper_detected);
        assert_eq!(result.shared_key_length, result.qubits_sifted);
    }
}

#[test]
fn full_intercept_resend_drives_qber_towards_a_quarter() {
    let mut p = protocol(7);
    let trials = 40;
    let mut total = 0.0;
    for _ in 0..trials {
        let result = p.run_protocol(2000, 1.0).unwrap();
        if result.eavesdropper_detected {
            assert_eq!(result.shared_key_length, 0);
        }
        total += result.qber;
    }
    let mean = total / trials as f64;
    assert!((mean - 0.25).abs() < 0.05, "mean sampled qber {mean}");
}

#[test]
fn security_classification_examples() {
    let clock = ManualClock::new(0.0);
    let mut detector =
        EavesdropperDetector::with_parts(DetectorConfig::default(), StdRng::seed_from_u64(1), &clock);

    let s = detector.analyze_security(0.0);
    assert_eq!(s.threat_level, ThreatLevel::Low);
    assert!(!s.eavesdropper_detected);

    let s = detector.analyze_security(0.15);
    assert_eq!(s.threat_level, ThreatLevel::High);
    assert!(s.eavesdropper_detected);

    let s = detector.analyze_security(0.25);
    assert_eq!(s.threat_level, ThreatLevel::Critical);
}

#[test]
fn every_history_stays_at_window_size() {
    let clock = ManualClock::new(0.0);
    let window = 100;
    let mut detector = EavesdropperDetector::with_parts(
        DetectorConfig::default().with_window_size(window),
        StdRng::seed_from_u64(2),
        &clock,
    );
    let mut p = protocol(3);
    let bits = p.generate_random_bits(16);
    let bases = p.generate_random_bases(16);
    let qubits = p.encode_qubits(&bits, &bases);

    for k in 0..(window + 37) {
        detector.exact_qber(&bits, &bits);
        detector.analyze_security(k as f64 / 1000.0);
        detector.simulate_eavesdropping(&qubits, 0.3).unwrap();
        assert!(detector.qber_history().len() <= window);
    }

    assert_eq!(detector.qber_history().len(), window);
    assert_eq!(detector.security_history().len(), window);
    assert_eq!(detector.intercept_history().len(), window);

    // the report appends one more snapshot, still bounded
    detector.generate_security_report();
    assert_eq!(detector.security_history().len(), window);
}

#[test]
fn reset_zeroes_counters_but_keeps_history() {
    let clock = ManualClock::new(0.0);
    let mut detector =
        EavesdropperDetector::with_parts(DetectorConfig::default(), StdRng::seed_from_u64(4), &clock);
    let mut p = protocol(5);
    let bits = p.generate_random_bits(64);
    let bases = p.generate_random_bases(64);
    let qubits = p.encode_qubits(&bits, &bases);

    let (resent, _) = detector.simulate_eavesdropping(&qubits, 1.0).unwrap();
    let bob: Vec<bool> = resent.iter().map(|q| q.bit).collect();
    detector.exact_qber(&bits, &bob);
    detector.generate_security_report();

    let qber_len = detector.qber_history().len();
    let security_len = detector.security_history().len();
    assert!(detector.session_intercepts() > 0);

    detector.reset_session();
    assert_eq!(detector.session_intercepts(), 0);
    assert_eq!(detector.session_detections(), 0);
    assert_eq!(detector.session_qubits(), 0);
    assert_eq!(detector.qber_history().len(), qber_len);
    assert_eq!(detector.security_history().len(), security_len);
}

#[test]
fn bloch_angles_round_trip() {
    let calc = BlochCalculator::new();
    for theta in (5..180).step_by(25) {
        for phi in (0..360).step_by(30) {
            let (theta, phi) = (theta as f64, phi as f64);
            let back = calc.bloch_to_angles(&calc.angles_to_bloch(theta, phi));
            assert!((back.theta - theta).abs() < 1e-6);
            assert!((back.phi - phi).abs() < 1e-6);
        }
    }
    for theta in [0.0, 180.0] {
        let back = calc.bloch_to_angles(&calc.angles_to_bloch(theta, 77.0));
        assert!((back.theta - theta).abs() < 1e-6);
        assert_eq!(back.phi, 0.0);
    }
}

#[test]
fn simulator_session_runs_end_to_end() {
    let clock = ManualClock::new(0.0);
    let mut sim = Simulator::seeded(StdRng::seed_from_u64(8), StdRng::seed_from_u64(9), &clock);
    sim.toggle_eavesdropper(true);
    sim.update_attack_parameters(100.0, 11.0).unwrap();

    let summary = sim.start_round(1000).unwrap();
    assert!(summary.exact_qber > 0.11);
    assert!(summary.security.eavesdropper_detected);

    let (_, interception) = sim.intercept(&summary.run.qubits_data).unwrap();
    assert_eq!(interception.total_intercepts, 1000);

    let report = sim.report();
    assert!(report.security_analysis.eavesdropper_detected);
    assert_eq!(report.mitigation_strategies[0], "Immediately halt key distribution");
}
