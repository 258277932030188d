use std::collections::BTreeMap;

use tracing::debug;

use serve_models::{
    Category, CategoryDetails, CategoryScore, PhaseTiming, TimingDetails, NEUTRAL_SCORE,
};

use super::{insufficient_issue, CategoryScorer, Findings, MotionContext};
use crate::bands::Deviation;
use crate::config::TimingConfig;
use crate::stats::mean;

/// Scores how the serve's duration is shared between phases.
///
/// Every phase outside the ideal band gets an issue: "too long"/"too short"
/// below `flag_below`, "slightly long"/"slightly short" otherwise. Only the
/// former trigger the rhythm recommendations.
#[derive(Debug, Clone)]
pub struct TimingScorer {
    config: TimingConfig,
}

impl TimingScorer {
    pub fn new(config: TimingConfig) -> Self {
        Self { config }
    }
}

impl CategoryScorer for TimingScorer {
    fn category(&self) -> Category {
        Category::Timing
    }

    fn score(&self, ctx: &MotionContext<'_>) -> CategoryScore {
        let total_duration: f64 = ctx.phases.iter().map(|p| p.duration).sum();
        let mut findings = Findings::default();
        let mut phases = BTreeMap::new();
        let mut flagged = false;

        if total_duration <= 0.0 || ctx.phases.is_empty() {
            findings.issue(insufficient_issue("phase timing"));
            findings.insufficient = true;
        } else {
            for phase in ctx.phases {
                let ratio = phase.duration / total_duration;
                let ideal_ratio = self.config.ideal_ratios.get(phase.name);
                let outcome = self.config.deviation.evaluate((ratio - ideal_ratio).abs());
                let score = outcome.as_ref().map_or(NEUTRAL_SCORE, |o| o.score);
                let off_ideal = outcome.is_some_and(|o| o.deviation != Deviation::Ideal);

                let length = if ratio > ideal_ratio { "long" } else { "short" };
                if score < self.config.flag_below {
                    findings.issue(format!("{} phase is too {length}", phase.name));
                    flagged = true;
                } else if off_ideal {
                    findings.issue(format!("{} phase is slightly {length}", phase.name));
                }
                phases.insert(
                    phase.name,
                    PhaseTiming {
                        ratio,
                        ideal_ratio,
                        score,
                    },
                );
            }
            if flagged {
                for rec in &self.config.recommendations {
                    findings.recommend(rec.clone());
                }
            }
        }

        let scores: Vec<f64> = phases.values().map(|t| t.score).collect();
        let overall_score = if scores.is_empty() {
            NEUTRAL_SCORE
        } else {
            mean(&scores)
        };
        debug!(total_duration, overall_score, "Timing measured");

        CategoryScore {
            category: Category::Timing,
            overall_score,
            issues: findings.issues,
            recommendations: findings.recommendations,
            insufficient_data: findings.insufficient,
            details: CategoryDetails::Timing(TimingDetails {
                total_duration,
                phases,
            }),
        }
        .clamped()
    }
}
