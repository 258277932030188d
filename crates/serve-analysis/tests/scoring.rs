//! Scoring scenarios driven through the public analyzer.

mod common;

use common::p;
use serve_analysis::config::{CategoryWeights, SUM_TOLERANCE};
use serve_analysis::{ScoringConfig, SegmenterConfig, ServeAnalyzer};
use serve_models::{CategoryDetails, Landmark, TechnicalAnalysis};

fn technical(sequence: &serve_models::PoseSequence) -> TechnicalAnalysis {
    ServeAnalyzer::default()
        .analyze(sequence)
        .technical_analysis
        .expect("analysis should complete")
}

#[test]
fn test_elbow_at_ideal_height() {
    // Elbow 0.015 above the shoulder for the whole clip
    let sequence = common::sequence(90, |i| {
        let x = 0.5 + 0.002 * i as f64;
        vec![
            (Landmark::RightShoulder, p(x, 0.4)),
            (Landmark::RightElbow, p(x + 0.05, 0.385)),
        ]
    });
    let elbow = technical(&sequence).elbow_position;
    let CategoryDetails::ElbowPosition(details) = &elbow.details else {
        panic!("unexpected details {:?}", elbow.details);
    };
    assert!((details.shoulder_relative_position.unwrap() - 0.015).abs() < 1e-9);
    assert_eq!(details.height_score, 10.0);
    assert!(!elbow.issues.iter().any(|i| i.starts_with("Elbow is")));
}

#[test]
fn test_shoulder_rotation_large_deficit() {
    // Shoulder line tilts up to 60 degrees; hips stay at an ideal 50
    let sequence = common::sequence(60, |i| {
        let f = (i + 1) as f64 / 60.0;
        let line = |cy: f64, degrees: f64| {
            let (dx, dy) = (0.1 * degrees.to_radians().cos(), 0.1 * degrees.to_radians().sin());
            (p(0.5 - dx, cy - dy), p(0.5 + dx, cy + dy))
        };
        let (ls, rs) = line(0.3, 60.0 * f);
        let (lh, rh) = line(0.6, 50.0 * f);
        vec![
            (Landmark::LeftShoulder, ls),
            (Landmark::RightShoulder, rs),
            (Landmark::LeftHip, lh),
            (Landmark::RightHip, rh),
        ]
    });
    let rotation = technical(&sequence).body_rotation;
    let CategoryDetails::BodyRotation(details) = &rotation.details else {
        panic!("unexpected details {:?}", rotation.details);
    };
    assert_eq!(details.shoulder_score, 4.0);
    assert!(rotation.issues.iter().any(|i| i.contains("large deficit")));
}

#[test]
fn test_toss_arm_seen_twice_is_neutral() {
    // Right arm tracked throughout; the tossing wrist shows up in two frames only
    let sequence = common::sequence(40, |i| {
        let t = i as f64 / 40.0;
        let mut pose = vec![
            (Landmark::RightShoulder, p(0.55, 0.32)),
            (Landmark::RightElbow, p(0.55 + 0.1 * t, 0.4 - 0.1 * t)),
            (Landmark::RightWrist, p(0.5 + 0.3 * t, 0.6 - 0.4 * t)),
        ];
        if i == 8 || i == 10 {
            pose.push((Landmark::LeftWrist, p(0.4, 0.3)));
        }
        pose
    });
    let toss = technical(&sequence).toss_trajectory;
    assert!(toss.insufficient_data);
    assert_eq!(toss.overall_score, 5.0);
    assert!(!toss.issues.is_empty());
    assert!(toss.issues.iter().all(|i| i.starts_with("Insufficient data")));
    assert!(toss.recommendations.is_empty());
}

#[test]
fn test_default_tables_are_total() {
    let config = ScoringConfig::default();
    let probes: Vec<f64> = (-2000..=2000)
        .map(|i| i as f64 * 0.1)
        .chain((-100..=100).map(|i| i as f64 * 0.005))
        .chain([f64::MIN, f64::MAX, -1e-12, 1e-12])
        .collect();

    for (name, table) in config.tables() {
        for band in table.bands() {
            // Probe every finite edge too
            for value in [band.lower, band.upper] {
                if let std::ops::Bound::Included(v) | std::ops::Bound::Excluded(v) = value {
                    let matches = table.bands().iter().filter(|b| b.contains(v)).count();
                    assert_eq!(matches, 1, "{name}: edge {v} matched {matches} bands");
                }
            }
        }
        for &value in &probes {
            let matches = table.bands().iter().filter(|b| b.contains(value)).count();
            assert_eq!(matches, 1, "{name}: {value} matched {matches} bands");
        }
    }
}

#[test]
fn test_default_weights_sum_to_one() {
    assert!((CategoryWeights::default().sum() - 1.0).abs() <= SUM_TOLERANCE);
}

#[test]
fn test_custom_config_changes_scores() {
    let sequence = common::serve(150, 40, 100);
    let baseline = ServeAnalyzer::default().analyze(&sequence);

    let mut scoring = ScoringConfig::default();
    scoring.weights = CategoryWeights {
        knee_movement: 0.0,
        elbow_position: 0.0,
        toss_trajectory: 0.0,
        body_rotation: 0.0,
        timing: 1.0,
        follow_through: 0.0,
    };
    let analyzer = ServeAnalyzer::new(SegmenterConfig::default(), scoring).unwrap();
    let timing_only = analyzer.analyze(&sequence);

    let timing = timing_only.technical_analysis.as_ref().unwrap().timing.overall_score;
    assert!((timing_only.overall_score - timing).abs() < 1e-9);
    assert_eq!(
        baseline.technical_analysis.unwrap().timing,
        timing_only.technical_analysis.unwrap().timing
    );
}
