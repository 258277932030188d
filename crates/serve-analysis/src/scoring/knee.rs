use tracing::debug;

use serve_models::{
    Category, CategoryDetails, CategoryScore, KneeDetails, Landmark, PhaseName, MAX_SCORE,
    NEUTRAL_SCORE,
};

use super::{BandedMetric, CategoryScorer, Findings, MotionContext};
use crate::bands::BandTable;
use crate::config::KneeConfig;
use crate::geometry::joint_angle_series;
use crate::stats::argmin;

/// Scores knee flexion depth and when the deepest bend happens.
#[derive(Debug, Clone)]
pub struct KneeScorer {
    config: KneeConfig,
    min_samples: usize,
}

/// Smallest right hip-knee-ankle angle over the clip.
struct KneeDepth<'a> {
    table: &'a BandTable,
    min_samples: usize,
}

impl KneeDepth<'_> {
    /// Sequence position and angle of the deepest bend.
    fn deepest(&self, ctx: &MotionContext<'_>) -> Option<(usize, f64)> {
        let t = ctx.trajectories;
        let angles = joint_angle_series(
            t.get(Landmark::RightHip),
            t.get(Landmark::RightKnee),
            t.get(Landmark::RightAnkle),
        );
        let valid = angles.iter().flatten().count();
        if valid < self.min_samples {
            return None;
        }
        argmin(angles)
    }
}

impl BandedMetric for KneeDepth<'_> {
    fn label(&self) -> &'static str {
        "knee bend"
    }

    fn measure(&self, ctx: &MotionContext<'_>) -> Option<f64> {
        self.deepest(ctx).map(|(_, angle)| angle)
    }

    fn table(&self) -> &BandTable {
        self.table
    }
}

impl KneeScorer {
    pub fn new(config: KneeConfig, min_samples: usize) -> Self {
        Self {
            config,
            min_samples,
        }
    }
}

impl CategoryScorer for KneeScorer {
    fn category(&self) -> Category {
        Category::KneeMovement
    }

    fn score(&self, ctx: &MotionContext<'_>) -> CategoryScore {
        let depth_metric = KneeDepth {
            table: &self.config.depth,
            min_samples: self.min_samples,
        };
        let deepest = depth_metric.deepest(ctx);
        let depth = depth_metric.evaluate(ctx);

        let mut timing_findings = Findings::default();
        let timing_score = match (deepest, ctx.phase(PhaseName::TrophyPosition)) {
            (Some((frame, _)), Some(trophy)) if frame < trophy.start_frame => {
                timing_findings.issue(self.config.early_issue.clone());
                timing_findings.recommend(self.config.early_recommendation.clone());
                MAX_SCORE + self.config.timing_penalty
            }
            (Some((frame, _)), Some(trophy)) if frame >= trophy.end_frame => {
                timing_findings.issue(self.config.late_issue.clone());
                timing_findings.recommend(self.config.late_recommendation.clone());
                MAX_SCORE + self.config.timing_penalty
            }
            (Some(_), Some(_)) => MAX_SCORE,
            _ => NEUTRAL_SCORE,
        };
        debug!(
            max_bend_angle = ?depth.value,
            max_bend_frame = ?deepest.map(|(f, _)| f),
            depth_score = depth.score,
            timing_score,
            "Knee movement measured"
        );

        let mut findings = Findings::default();
        findings.issues.extend(timing_findings.issues);
        findings.absorb(&depth);
        for rec in timing_findings.recommendations {
            findings.recommend(rec);
        }
        if deepest.is_some() && ctx.phase(PhaseName::TrophyPosition).is_none() {
            findings.insufficient = true;
        }

        CategoryScore {
            category: Category::KneeMovement,
            overall_score: (depth.score + timing_score) / 2.0,
            issues: findings.issues,
            recommendations: findings.recommendations,
            insufficient_data: findings.insufficient,
            details: CategoryDetails::KneeMovement(KneeDetails {
                max_bend_angle: depth.value,
                max_bend_frame: deepest.map(|(frame, _)| frame),
                depth_score: depth.score,
                timing_score,
            }),
        }
        .clamped()
    }
}
