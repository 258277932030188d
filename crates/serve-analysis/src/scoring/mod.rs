//! Kinematic scorers.
//!
//! Each technique category has one scorer implementing [`CategoryScorer`].
//! Scalar measurements go through [`BandedMetric`], which pairs a raw
//! quantity with its [`BandTable`] so every scorer applies bands the same way:
//!
//! - a measured value scores `10 + penalty` of its band, reporting the band's
//!   issue and recommendation
//! - an unmeasurable value scores [`NEUTRAL_SCORE`] with an
//!   "insufficient data" issue

mod elbow;
mod follow_through;
mod knee;
mod rotation;
mod timing;
mod toss;

pub use elbow::ElbowScorer;
pub use follow_through::FollowThroughScorer;
pub use knee::KneeScorer;
pub use rotation::RotationScorer;
pub use timing::TimingScorer;
pub use toss::TossScorer;

use serve_models::{Category, CategoryScore, PhaseName, ServePhase, NEUTRAL_SCORE};

use crate::bands::BandTable;
use crate::trajectory::TrajectorySet;

/// Read-only inputs shared by all scorers for one analysis.
#[derive(Debug, Clone, Copy)]
pub struct MotionContext<'a> {
    pub trajectories: &'a TrajectorySet,
    pub phases: &'a [ServePhase],
    pub fps: f64,
}

impl<'a> MotionContext<'a> {
    pub fn new(trajectories: &'a TrajectorySet, phases: &'a [ServePhase], fps: f64) -> Self {
        Self {
            trajectories,
            phases,
            fps,
        }
    }

    pub fn phase(&self, name: PhaseName) -> Option<&'a ServePhase> {
        self.phases.iter().find(|p| p.name == name)
    }
}

/// Produces the score of one technique category.
pub trait CategoryScorer: Send + Sync {
    fn category(&self) -> Category;

    fn score(&self, ctx: &MotionContext<'_>) -> CategoryScore;
}

/// A scalar quantity scored against a band table.
pub trait BandedMetric {
    /// What is measured, used in "insufficient data" issues.
    fn label(&self) -> &'static str;

    /// Raw quantity, or `None` when it cannot be measured.
    fn measure(&self, ctx: &MotionContext<'_>) -> Option<f64>;

    fn table(&self) -> &BandTable;

    fn evaluate(&self, ctx: &MotionContext<'_>) -> MetricScore {
        apply_bands(self.label(), self.measure(ctx), self.table())
    }
}

/// Scored measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricScore {
    pub value: Option<f64>,
    pub score: f64,
    pub penalty: f64,
    pub issue: Option<String>,
    pub recommendation: Option<String>,
    pub insufficient: bool,
}

impl MetricScore {
    fn insufficient(label: &str) -> Self {
        Self {
            value: None,
            score: NEUTRAL_SCORE,
            penalty: 0.0,
            issue: Some(insufficient_issue(label)),
            recommendation: None,
            insufficient: true,
        }
    }
}

pub(crate) fn insufficient_issue(label: &str) -> String {
    format!("Insufficient data to measure {label}")
}

/// Score `value` against `table`, or return the neutral score when absent.
pub fn apply_bands(label: &str, value: Option<f64>, table: &BandTable) -> MetricScore {
    let Some(value) = value else {
        return MetricScore::insufficient(label);
    };
    match table.evaluate(value) {
        Some(outcome) => MetricScore {
            value: Some(value),
            score: outcome.score,
            penalty: outcome.penalty,
            issue: outcome.issue,
            recommendation: outcome.recommendation,
            insufficient: false,
        },
        None => MetricScore::insufficient(label),
    }
}

/// Issues and recommendations gathered while scoring a category.
#[derive(Debug, Default)]
pub(crate) struct Findings {
    pub issues: Vec<String>,
    pub recommendations: Vec<String>,
    pub insufficient: bool,
}

impl Findings {
    pub fn absorb(&mut self, metric: &MetricScore) {
        if let Some(issue) = &metric.issue {
            self.issue(issue.clone());
        }
        if let Some(rec) = &metric.recommendation {
            self.recommend(rec.clone());
        }
        self.insufficient |= metric.insufficient;
    }

    pub fn issue(&mut self, text: impl Into<String>) {
        self.issues.push(text.into());
    }

    pub fn recommend(&mut self, text: impl Into<String>) {
        let text = text.into();
        if !self.recommendations.contains(&text) {
            self.recommendations.push(text);
        }
    }
}

/// The default scorer set, in reporting order.
pub fn default_scorers(config: &crate::config::ScoringConfig) -> Vec<Box<dyn CategoryScorer>> {
    vec![
        Box::new(KneeScorer::new(config.knee.clone(), config.min_sequence_samples)),
        Box::new(ElbowScorer::new(
            config.elbow.clone(),
            config.min_phase_samples,
            config.min_sequence_samples,
        )),
        Box::new(TossScorer::new(
            config.toss.clone(),
            config.min_phase_samples,
            config.min_sequence_samples,
        )),
        Box::new(RotationScorer::new(config.rotation.clone(), config.min_sequence_samples)),
        Box::new(TimingScorer::new(config.timing.clone())),
        Box::new(FollowThroughScorer::new(config.follow_through.clone())),
    ]
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::bands::Step;

    fn table() -> BandTable {
        BandTable::at_least(0.5, vec![Step::flagged(f64::NEG_INFINITY, -3.0, "too low").recommend("raise it")])
    }

    #[test]
    fn test_apply_bands_scores_value() {
        let metric = apply_bands("thing", Some(0.2), &table());
        assert_eq!(metric.score, 7.0);
        assert_eq!(metric.issue.as_deref(), Some("too low"));
        assert_eq!(metric.recommendation.as_deref(), Some("raise it"));
        assert!(!metric.insufficient);
    }

    #[test]
    fn test_apply_bands_missing_value_is_neutral() {
        let metric = apply_bands("thing", None, &table());
        assert_eq!(metric.score, NEUTRAL_SCORE);
        assert!(metric.insufficient);
        assert_eq!(metric.issue.as_deref(), Some("Insufficient data to measure thing"));

        let nan = apply_bands("thing", Some(f64::NAN), &table());
        assert!(nan.insufficient);
    }

    #[test]
    fn test_findings_deduplicate_recommendations() {
        let mut findings = Findings::default();
        let metric = apply_bands("thing", Some(0.1), &table());
        findings.absorb(&metric);
        findings.absorb(&metric);
        assert_eq!(findings.issues.len(), 2);
        assert_eq!(findings.recommendations, vec!["raise it"]);
    }

    #[test]
    fn test_default_scorers_cover_every_category() {
        let scorers = default_scorers(&crate::config::ScoringConfig::default());
        let categories: Vec<Category> = scorers.iter().map(|s| s.category()).collect();
        assert_eq!(categories, Category::ALL.to_vec());
    }
}
