use std::ops::Range;

use tracing::debug;

use serve_models::{
    BalanceMaintenance, Category, CategoryDetails, CategoryScore, FollowThroughDetails, Landmark,
    LandmarkSample, PhaseName, RacketPath, RotationCompletion, SwingCompletion, MAX_SCORE,
    NEUTRAL_SCORE,
};

use super::{apply_bands, insufficient_issue, CategoryScorer, Findings, MotionContext};
use crate::config::FollowThroughConfig;
use crate::geometry::{path_curvature_smoothness, segment_rotation};
use crate::stats::{mean, std_deviation};

const PHASE_MISSING_ISSUE: &str = "Follow-through phase could not be identified";
const PHASE_MISSING_RECOMMENDATION: &str = "Check the basic follow-through motion";

/// Path smoothness assumed when the wrist never changes direction measurably.
const UNKNOWN_PATH_SMOOTHNESS: f64 = 0.5;
/// Rotation consistency assumed from a single shoulder sample.
const UNKNOWN_CONSISTENCY: f64 = 0.5;

const POOR_RECOMMENDATIONS: [&str; 3] = [
    "Review the basic follow-through motion",
    "Practice swinging the racket fully across to the left side of the body",
    "Focus on completing the body rotation",
];
const FAIR_RECOMMENDATIONS: [&str; 2] = [
    "Improve the completeness of the follow-through",
    "Practice swinging through while keeping balance",
];
const GOOD_RECOMMENDATION: &str = "Follow-through is good. Keep it up";

/// Scores the motion after contact: swing, rotation, balance and wrist path.
#[derive(Debug, Clone)]
pub struct FollowThroughScorer {
    config: FollowThroughConfig,
}

/// A sub-metric score and whether it could be measured.
struct SubScore<T> {
    details: T,
    insufficient: bool,
}

impl FollowThroughScorer {
    pub fn new(config: FollowThroughConfig) -> Self {
        Self { config }
    }

    fn swing(&self, ctx: &MotionContext<'_>, window: Range<usize>) -> SubScore<SwingCompletion> {
        let wrist = present(ctx, Landmark::RightWrist, window);
        if wrist.len() < self.config.min_samples {
            return neutral_swing();
        }
        let (Some(start), Some(end)) = (wrist.first(), wrist.last()) else {
            return neutral_swing();
        };

        let horizontal = end.x - start.x;
        let vertical = start.y - end.y;
        let h = apply_bands("swing horizontal travel", Some(horizontal), &self.config.horizontal);
        let v = apply_bands("swing vertical travel", Some(vertical), &self.config.vertical);
        SubScore {
            details: SwingCompletion {
                score: (MAX_SCORE + h.penalty + v.penalty).clamp(0.0, MAX_SCORE),
                completion_rate: Some(((horizontal + vertical) / self.config.completion_span).min(1.0)),
                horizontal_movement: Some(horizontal),
                vertical_movement: Some(vertical),
            },
            insufficient: false,
        }
    }

    fn rotation(&self, ctx: &MotionContext<'_>, window: Range<usize>) -> SubScore<RotationCompletion> {
        let left = ctx.trajectories.get(Landmark::LeftShoulder);
        let right = ctx.trajectories.get(Landmark::RightShoulder);
        let tilts: Vec<f64> = window
            .filter_map(|i| segment_rotation(left.get(i)?, right.get(i)?))
            .collect();
        let Some(&final_rotation) = tilts.last() else {
            return SubScore {
                details: RotationCompletion {
                    score: NEUTRAL_SCORE,
                    final_rotation: None,
                    max_rotation: None,
                    consistency: None,
                },
                insufficient: true,
            };
        };

        let max_rotation = tilts.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let consistency = if tilts.len() < 2 {
            UNKNOWN_CONSISTENCY
        } else {
            let steps: Vec<f64> = tilts.windows(2).map(|w| (w[1] - w[0]).abs()).collect();
            (1.0 - std_deviation(&steps) / self.config.consistency_scale).max(0.0)
        };
        let last = apply_bands("final rotation", Some(final_rotation), &self.config.final_rotation);
        let steady = apply_bands(
            "rotation consistency",
            Some(consistency),
            &self.config.rotation_consistency,
        );
        SubScore {
            details: RotationCompletion {
                score: (MAX_SCORE + last.penalty + steady.penalty).clamp(0.0, MAX_SCORE),
                final_rotation: Some(final_rotation),
                max_rotation: Some(max_rotation),
                consistency: Some(consistency),
            },
            insufficient: false,
        }
    }

    /// `1 - (std_x + std_y) / scale`, floored at zero.
    fn stability(&self, samples: &[&LandmarkSample]) -> f64 {
        let xs: Vec<f64> = samples.iter().map(|s| s.x).collect();
        let ys: Vec<f64> = samples.iter().map(|s| s.y).collect();
        (1.0 - (std_deviation(&xs) + std_deviation(&ys)) / self.config.stability_scale).max(0.0)
    }

    fn balance(&self, ctx: &MotionContext<'_>, window: Range<usize>) -> SubScore<BalanceMaintenance> {
        let left = present(ctx, Landmark::LeftAnkle, window.clone());
        let right = present(ctx, Landmark::RightAnkle, window);
        if left.len() < self.config.min_samples || right.len() < self.config.min_samples {
            return SubScore {
                details: BalanceMaintenance {
                    score: NEUTRAL_SCORE,
                    left_stability: None,
                    right_stability: None,
                    overall_stability: None,
                },
                insufficient: true,
            };
        }

        let left_stability = self.stability(&left);
        let right_stability = self.stability(&right);
        let overall = mean(&[left_stability, right_stability]);
        let scored = apply_bands("balance", Some(overall), &self.config.balance);
        SubScore {
            details: BalanceMaintenance {
                score: scored.score,
                left_stability: Some(left_stability),
                right_stability: Some(right_stability),
                overall_stability: Some(overall),
            },
            insufficient: false,
        }
    }

    fn racket_path(&self, ctx: &MotionContext<'_>, window: Range<usize>) -> SubScore<RacketPath> {
        let wrist = ctx.trajectories.get(Landmark::RightWrist);
        let points = wrist.window(window);
        if points.iter().flatten().count() < self.config.min_samples {
            return SubScore {
                details: RacketPath {
                    score: NEUTRAL_SCORE,
                    path_smoothness: None,
                },
                insufficient: true,
            };
        }
        let smoothness = path_curvature_smoothness(points).unwrap_or(UNKNOWN_PATH_SMOOTHNESS);
        let scored = apply_bands("racket path", Some(smoothness), &self.config.racket_path);
        SubScore {
            details: RacketPath {
                score: scored.score,
                path_smoothness: Some(smoothness),
            },
            insufficient: false,
        }
    }

    fn phase_missing(&self) -> CategoryScore {
        CategoryScore {
            category: Category::FollowThrough,
            overall_score: NEUTRAL_SCORE,
            issues: vec![PHASE_MISSING_ISSUE.to_string()],
            recommendations: vec![PHASE_MISSING_RECOMMENDATION.to_string()],
            insufficient_data: true,
            details: CategoryDetails::FollowThrough(FollowThroughDetails {
                swing_completion: neutral_swing().details,
                rotation_completion: RotationCompletion {
                    score: NEUTRAL_SCORE,
                    final_rotation: None,
                    max_rotation: None,
                    consistency: None,
                },
                balance: BalanceMaintenance {
                    score: NEUTRAL_SCORE,
                    left_stability: None,
                    right_stability: None,
                    overall_stability: None,
                },
                racket_path: RacketPath {
                    score: NEUTRAL_SCORE,
                    path_smoothness: None,
                },
            }),
        }
    }
}

/// Present samples of `landmark` inside `window`.
fn present<'a>(ctx: &MotionContext<'a>, landmark: Landmark, window: Range<usize>) -> Vec<&'a LandmarkSample> {
    ctx.trajectories
        .get(landmark)
        .samples_in(window)
        .map(|(_, s)| s)
        .collect()
}

fn neutral_swing() -> SubScore<SwingCompletion> {
    SubScore {
        details: SwingCompletion {
            score: NEUTRAL_SCORE,
            completion_rate: None,
            horizontal_movement: None,
            vertical_movement: None,
        },
        insufficient: true,
    }
}

impl CategoryScorer for FollowThroughScorer {
    fn category(&self) -> Category {
        Category::FollowThrough
    }

    fn score(&self, ctx: &MotionContext<'_>) -> CategoryScore {
        let Some(phase) = ctx.phase(PhaseName::FollowThrough).filter(|p| !p.is_empty()) else {
            debug!("Follow-through phase missing");
            return self.phase_missing();
        };
        let window = phase.range();

        let swing = self.swing(ctx, window.clone());
        let rotation = self.rotation(ctx, window.clone());
        let balance = self.balance(ctx, window.clone());
        let path = self.racket_path(ctx, window);

        let w = &self.config.weights;
        let overall_score = swing.details.score * w.swing_completion
            + rotation.details.score * w.rotation_completion
            + balance.details.score * w.balance
            + path.details.score * w.racket_path;

        let mut findings = Findings::default();
        let parts = [
            ("swing completion", swing.insufficient, swing.details.score, "Racket swing-through is incomplete"),
            ("rotation completion", rotation.insufficient, rotation.details.score, "Body rotation is incomplete"),
            ("balance", balance.insufficient, balance.details.score, "Balance is not maintained"),
            ("racket path", path.insufficient, path.details.score, "Racket path is unstable"),
        ];
        for (label, insufficient, score, issue) in parts {
            if insufficient {
                findings.issue(insufficient_issue(label));
                findings.insufficient = true;
            } else if score < self.config.issue_below {
                findings.issue(issue);
            }
        }

        if overall_score < 6.0 {
            POOR_RECOMMENDATIONS.iter().for_each(|r| findings.recommend(*r));
        } else if overall_score < 8.0 {
            FAIR_RECOMMENDATIONS.iter().for_each(|r| findings.recommend(*r));
        } else {
            findings.recommend(GOOD_RECOMMENDATION);
        }
        debug!(
            swing = swing.details.score,
            rotation = rotation.details.score,
            balance = balance.details.score,
            racket_path = path.details.score,
            overall_score,
            "Follow-through measured"
        );

        CategoryScore {
            category: Category::FollowThrough,
            overall_score,
            issues: findings.issues,
            recommendations: findings.recommendations,
            insufficient_data: findings.insufficient,
            details: CategoryDetails::FollowThrough(FollowThroughDetails {
                swing_completion: swing.details,
                rotation_completion: rotation.details,
                balance: balance.details,
                racket_path: path.details,
            }),
        }
        .clamped()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScoringConfig;
    use crate::scoring::fixtures::{p, phases, sequence, trajectories};
    use serve_models::{PoseSequence, ServePhase};

    // With 100 frames the follow-through covers [80, 100)
    const TOTAL: usize = 100;

    fn scorer() -> FollowThroughScorer {
        FollowThroughScorer::new(ScoringConfig::default().follow_through)
    }

    fn details(score: &CategoryScore) -> &FollowThroughDetails {
        match &score.details {
            CategoryDetails::FollowThrough(d) => d,
            other => panic!("unexpected details {other:?}"),
        }
    }

    /// Shoulders tilted by `degrees`, ankles planted, wrist moving `dx` right and `dy` up over the clip.
    fn body(degrees: f64, dx: f64, dy: f64, ankles: bool) -> PoseSequence {
        let (cx, cy) = (0.1 * degrees.to_radians().cos(), 0.1 * degrees.to_radians().sin());
        sequence(TOTAL, |i| {
            let t = i as f64 / (TOTAL - 1) as f64;
            let mut pose = vec![
                (Landmark::LeftShoulder, p(0.5 - cx, 0.3 - cy)),
                (Landmark::RightShoulder, p(0.5 + cx, 0.3 + cy)),
                (Landmark::RightWrist, p(0.4 + dx * t, 0.9 - dy * t)),
            ];
            if ankles {
                pose.push((Landmark::LeftAnkle, p(0.45, 0.9)));
                pose.push((Landmark::RightAnkle, p(0.55, 0.9)));
            }
            pose
        })
    }

    fn score(seq: PoseSequence) -> CategoryScore {
        let traj = trajectories(&seq);
        let phases = phases(TOTAL);
        scorer().score(&MotionContext::new(&traj, &phases, 30.0))
    }

    #[test]
    fn test_complete_follow_through() {
        // Over the last 20 frames the wrist travels about 0.19 across and 0.14 up
        let result = score(body(120.0, 1.0, 0.75, true));
        let d = details(&result);

        assert_eq!(d.swing_completion.score, 10.0);
        assert_eq!(d.swing_completion.completion_rate, Some(1.0));
        assert!((d.rotation_completion.final_rotation.unwrap() - 120.0).abs() < 1e-6);
        assert_eq!(d.rotation_completion.score, 10.0);
        assert_eq!(d.balance.overall_stability, Some(1.0));
        assert_eq!(d.balance.score, 10.0);
        assert_eq!(d.racket_path.score, 10.0);
        assert!((result.overall_score - 10.0).abs() < 1e-9);
        assert!(result.issues.is_empty());
        assert_eq!(result.recommendations, vec![GOOD_RECOMMENDATION.to_string()]);
    }

    #[test]
    fn test_stalled_swing() {
        // Wrist frozen, shoulders square to the camera
        let result = score(body(90.0, 0.0, 0.0, true));
        let d = details(&result);

        assert_eq!(d.swing_completion.score, 5.0);
        assert_eq!(d.rotation_completion.score, 7.0);
        assert_eq!(d.balance.score, 10.0);
        assert_eq!(d.racket_path.path_smoothness, Some(UNKNOWN_PATH_SMOOTHNESS));
        assert_eq!(d.racket_path.score, 7.0);
        assert!((result.overall_score - 7.15).abs() < 1e-9);
        assert_eq!(result.issues, vec!["Racket swing-through is incomplete".to_string()]);
        assert_eq!(result.recommendations.len(), 2);
    }

    #[test]
    fn test_missing_ankles_flag_balance() {
        let result = score(body(120.0, 1.0, 0.75, false));
        let d = details(&result);
        assert_eq!(d.balance.score, NEUTRAL_SCORE);
        assert!(d.balance.overall_stability.is_none());
        assert!(result.insufficient_data);
        assert_eq!(result.issues, vec!["Insufficient data to measure balance".to_string()]);
    }

    #[test]
    fn test_missing_phase_is_neutral() {
        let seq = body(120.0, 1.0, 0.75, true);
        let traj = trajectories(&seq);
        let mut phases = phases(TOTAL);
        phases.retain(|p| p.name != PhaseName::FollowThrough);
        let result = scorer().score(&MotionContext::new(&traj, &phases, 30.0));
        assert_eq!(result.overall_score, NEUTRAL_SCORE);
        assert_eq!(result.issues, vec![PHASE_MISSING_ISSUE.to_string()]);
        assert_eq!(result.recommendations, vec![PHASE_MISSING_RECOMMENDATION.to_string()]);

        // An empty phase counts as missing
        phases.push(ServePhase::new(PhaseName::FollowThrough, TOTAL, TOTAL, 30.0));
        let result = scorer().score(&MotionContext::new(&traj, &phases, 30.0));
        assert!(result.insufficient_data);
        assert_eq!(result.overall_score, NEUTRAL_SCORE);
    }
}
