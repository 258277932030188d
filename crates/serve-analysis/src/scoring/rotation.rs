use tracing::debug;

use serve_models::{Category, CategoryDetails, CategoryScore, Landmark, RotationDetails};

use super::{BandedMetric, CategoryScorer, Findings, MotionContext};
use crate::bands::BandTable;
use crate::config::RotationConfig;
use crate::geometry::segment_rotation_series;
use crate::stats::max_present;

/// Scores the peak tilt of the shoulder and hip lines.
///
/// The tilt is a 2-D proxy for trunk rotation; see
/// [`segment_rotation`](crate::geometry::segment_rotation).
#[derive(Debug, Clone)]
pub struct RotationScorer {
    config: RotationConfig,
    min_samples: usize,
}

/// Largest tilt of the line between two landmarks over the clip.
struct LineTilt<'a> {
    label: &'static str,
    left: Landmark,
    right: Landmark,
    table: &'a BandTable,
    min_samples: usize,
}

impl BandedMetric for LineTilt<'_> {
    fn label(&self) -> &'static str {
        self.label
    }

    fn measure(&self, ctx: &MotionContext<'_>) -> Option<f64> {
        let tilts = segment_rotation_series(
            ctx.trajectories.get(self.left),
            ctx.trajectories.get(self.right),
        );
        if tilts.iter().flatten().count() < self.min_samples {
            return None;
        }
        max_present(tilts)
    }

    fn table(&self) -> &BandTable {
        self.table
    }
}

impl RotationScorer {
    pub fn new(config: RotationConfig, min_samples: usize) -> Self {
        Self {
            config,
            min_samples,
        }
    }
}

impl CategoryScorer for RotationScorer {
    fn category(&self) -> Category {
        Category::BodyRotation
    }

    fn score(&self, ctx: &MotionContext<'_>) -> CategoryScore {
        let shoulder = LineTilt {
            label: "shoulder rotation",
            left: Landmark::LeftShoulder,
            right: Landmark::RightShoulder,
            table: &self.config.shoulder,
            min_samples: self.min_samples,
        }
        .evaluate(ctx);
        let hip = LineTilt {
            label: "hip rotation",
            left: Landmark::LeftHip,
            right: Landmark::RightHip,
            table: &self.config.hip,
            min_samples: self.min_samples,
        }
        .evaluate(ctx);
        debug!(
            max_shoulder_rotation = ?shoulder.value,
            max_hip_rotation = ?hip.value,
            "Body rotation measured"
        );

        let mut findings = Findings::default();
        findings.absorb(&shoulder);
        findings.absorb(&hip);

        CategoryScore {
            category: Category::BodyRotation,
            overall_score: (shoulder.score + hip.score) / 2.0,
            issues: findings.issues,
            recommendations: findings.recommendations,
            insufficient_data: findings.insufficient,
            details: CategoryDetails::BodyRotation(RotationDetails {
                max_shoulder_rotation: shoulder.value,
                max_hip_rotation: hip.value,
                shoulder_score: shoulder.score,
                hip_score: hip.score,
            }),
        }
        .clamped()
    }
}
