use tracing::debug;

use serve_models::{Category, CategoryDetails, CategoryScore, Landmark, LandmarkSample, PhaseName, TossDetails};

use super::{apply_bands, CategoryScorer, Findings, MotionContext};
use crate::config::TossConfig;
use crate::geometry::trajectory_smoothness;

/// Scores the tossing-wrist path during the ball toss phase.
#[derive(Debug, Clone)]
pub struct TossScorer {
    config: TossConfig,
    min_phase_samples: usize,
    min_sequence_samples: usize,
}

/// Raw toss measurements.
#[derive(Debug, Clone, Copy, PartialEq)]
struct TossMeasurements {
    height: Option<f64>,
    distance: Option<f64>,
    consistency: Option<f64>,
}

impl TossScorer {
    pub fn new(config: TossConfig, min_phase_samples: usize, min_sequence_samples: usize) -> Self {
        Self {
            config,
            min_phase_samples,
            min_sequence_samples,
        }
    }

    fn measure(&self, ctx: &MotionContext<'_>) -> TossMeasurements {
        const UNMEASURED: TossMeasurements = TossMeasurements {
            height: None,
            distance: None,
            consistency: None,
        };

        let wrist = ctx.trajectories.get(Landmark::LeftWrist);
        if wrist.valid_count() < self.min_sequence_samples {
            return UNMEASURED;
        }
        let window = ctx
            .phase(PhaseName::BallToss)
            .map(|phase| wrist.window(phase.range()))
            .unwrap_or_default();
        let samples: Vec<&LandmarkSample> = window.iter().flatten().collect();

        if samples.len() < self.min_phase_samples || samples.is_empty() {
            return UNMEASURED;
        }

        let apex = samples.iter().map(|s| s.y).fold(f64::INFINITY, f64::min);
        let travel = match (samples.first(), samples.last()) {
            (Some(first), Some(last)) => Some((last.x - first.x).abs()),
            _ => None,
        };
        TossMeasurements {
            height: Some(1.0 - apex),
            distance: travel,
            consistency: (samples.len() >= 3).then(|| trajectory_smoothness(window)),
        }
    }
}

impl CategoryScorer for TossScorer {
    fn category(&self) -> Category {
        Category::TossTrajectory
    }

    fn score(&self, ctx: &MotionContext<'_>) -> CategoryScore {
        let raw = self.measure(ctx);
        let height = apply_bands("toss height", raw.height, &self.config.height);
        let distance = apply_bands("toss forward distance", raw.distance, &self.config.distance);
        let consistency = apply_bands("toss consistency", raw.consistency, &self.config.consistency);
        debug!(
            max_height = ?raw.height,
            forward_distance = ?raw.distance,
            consistency = ?raw.consistency,
            "Toss trajectory measured"
        );

        let mut findings = Findings::default();
        findings.absorb(&height);
        findings.absorb(&distance);
        findings.absorb(&consistency);

        CategoryScore {
            category: Category::TossTrajectory,
            overall_score: (height.score + distance.score + consistency.score) / 3.0,
            issues: findings.issues,
            recommendations: findings.recommendations,
            insufficient_data: findings.insufficient,
            details: CategoryDetails::TossTrajectory(TossDetails {
                max_height: raw.height,
                forward_distance: raw.distance,
                consistency: raw.consistency,
                height_score: height.score,
                distance_score: distance.score,
                consistency_score: consistency.score,
            }),
        }
        .clamped()
    }
}
