use tracing::debug;

use serve_models::{
    Category, CategoryDetails, CategoryScore, ElbowDetails, Landmark, LandmarkSample, PhaseName,
};

use super::{BandedMetric, CategoryScorer, Findings, MotionContext};
use crate::bands::BandTable;
use crate::config::ElbowConfig;
use crate::geometry::trajectory_smoothness;
use crate::stats::mean;

/// Scores hitting-elbow height in the trophy position and elbow path stability.
#[derive(Debug, Clone)]
pub struct ElbowScorer {
    config: ElbowConfig,
    min_phase_samples: usize,
    min_sequence_samples: usize,
}

/// Paired shoulder/elbow samples during the trophy position.
fn trophy_pairs<'a>(ctx: &MotionContext<'a>) -> Vec<(&'a LandmarkSample, &'a LandmarkSample)> {
    let Some(trophy) = ctx.phase(PhaseName::TrophyPosition) else {
        return Vec::new();
    };
    let shoulder = ctx.trajectories.get(Landmark::RightShoulder);
    let elbow = ctx.trajectories.get(Landmark::RightElbow);
    trophy
        .range()
        .filter_map(|i| Some((shoulder.get(i)?, elbow.get(i)?)))
        .collect()
}

/// Mean `shoulder.y - elbow.y` in the trophy position; positive when the
/// elbow is above the shoulder.
///
/// Both landmarks need `min_sequence_samples` over the whole clip before the
/// phase window is considered at all.
struct ElbowHeight<'a> {
    table: &'a BandTable,
    min_samples: usize,
    min_sequence_samples: usize,
}

impl BandedMetric for ElbowHeight<'_> {
    fn label(&self) -> &'static str {
        "elbow height"
    }

    fn measure(&self, ctx: &MotionContext<'_>) -> Option<f64> {
        let t = ctx.trajectories;
        let tracked = t
            .get(Landmark::RightShoulder)
            .valid_count()
            .min(t.get(Landmark::RightElbow).valid_count());
        if tracked < self.min_sequence_samples {
            return None;
        }
        let pairs = trophy_pairs(ctx);
        if pairs.len() < self.min_samples {
            return None;
        }
        let shoulder: Vec<f64> = pairs.iter().map(|(s, _)| s.y).collect();
        let elbow: Vec<f64> = pairs.iter().map(|(_, e)| e.y).collect();
        Some(mean(&shoulder) - mean(&elbow))
    }

    fn table(&self) -> &BandTable {
        self.table
    }
}

/// Smoothness of the elbow path over the whole clip.
struct ElbowStability<'a> {
    table: &'a BandTable,
    min_samples: usize,
}

impl BandedMetric for ElbowStability<'_> {
    fn label(&self) -> &'static str {
        "elbow stability"
    }

    fn measure(&self, ctx: &MotionContext<'_>) -> Option<f64> {
        let elbow = ctx.trajectories.get(Landmark::RightElbow);
        if elbow.valid_count() < self.min_samples.max(3) {
            return None;
        }
        Some(trajectory_smoothness(elbow.points()))
    }

    fn table(&self) -> &BandTable {
        self.table
    }
}

impl ElbowScorer {
    pub fn new(config: ElbowConfig, min_phase_samples: usize, min_sequence_samples: usize) -> Self {
        Self {
            config,
            min_phase_samples,
            min_sequence_samples,
        }
    }
}

impl CategoryScorer for ElbowScorer {
    fn category(&self) -> Category {
        Category::ElbowPosition
    }

    fn score(&self, ctx: &MotionContext<'_>) -> CategoryScore {
        let height = ElbowHeight {
            table: &self.config.height,
            min_samples: self.min_phase_samples,
            min_sequence_samples: self.min_sequence_samples,
        }
        .evaluate(ctx);
        let stability = ElbowStability {
            table: &self.config.stability,
            min_samples: self.min_sequence_samples,
        }
        .evaluate(ctx);

        let average_height = height.value.map(|_| {
            let elbow: Vec<f64> = trophy_pairs(ctx).iter().map(|(_, e)| e.y).collect();
            mean(&elbow)
        });
        debug!(
            shoulder_relative = ?height.value,
            smoothness = ?stability.value,
            height_score = height.score,
            stability_score = stability.score,
            "Elbow position measured"
        );

        let mut findings = Findings::default();
        findings.absorb(&height);
        findings.absorb(&stability);

        CategoryScore {
            category: Category::ElbowPosition,
            overall_score: (height.score + stability.score) / 2.0,
            issues: findings.issues,
            recommendations: findings.recommendations,
            insufficient_data: findings.insufficient,
            details: CategoryDetails::ElbowPosition(ElbowDetails {
                average_height,
                shoulder_relative_position: height.value,
                smoothness: stability.value,
                height_score: height.score,
                stability_score: stability.score,
            }),
        }
        .clamped()
    }
}
