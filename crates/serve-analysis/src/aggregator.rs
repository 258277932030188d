//! Weighted combination of category scores.

use serve_models::{Category, CategoryScore, SkillTier, TechnicalAnalysis, MAX_SCORE};

use crate::config::{CategoryWeights, TierThresholds};
use crate::error::{AnalysisError, AnalysisResult};

/// Overall score, tier and merged recommendations.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    pub overall_score: f64,
    pub skill_tier: SkillTier,
    pub recommendations: Vec<String>,
}

/// Combines the six category scores.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    weights: CategoryWeights,
    tiers: TierThresholds,
}

impl Aggregator {
    pub fn new(weights: CategoryWeights, tiers: TierThresholds) -> Self {
        Self { weights, tiers }
    }

    /// `Σ weight × score`, clamped to `[0, 10]`.
    pub fn overall_score(&self, analysis: &TechnicalAnalysis) -> f64 {
        Category::ALL
            .iter()
            .map(|c| self.weights.get(*c) * analysis.get(*c).overall_score)
            .sum::<f64>()
            .clamp(0.0, MAX_SCORE)
    }

    pub fn aggregate(&self, analysis: &TechnicalAnalysis) -> Aggregate {
        let overall_score = self.overall_score(analysis);
        Aggregate {
            overall_score,
            skill_tier: self.tiers.classify(overall_score),
            recommendations: analysis
                .iter()
                .flat_map(|score| score.recommendations.iter().cloned())
                .collect(),
        }
    }
}

/// Arrange scorer output into the fixed category slots.
///
/// Every category must be scored exactly once.
pub fn technical_analysis(scores: Vec<CategoryScore>) -> AnalysisResult<TechnicalAnalysis> {
    let mut slots: [Option<CategoryScore>; 6] = Default::default();
    for score in scores {
        let slot = &mut slots[slot_index(score.category)];
        if slot.is_some() {
            return Err(AnalysisError::internal(format!(
                "category {} scored twice",
                score.category
            )));
        }
        *slot = Some(score);
    }

    let mut take = |category: Category| {
        slots[slot_index(category)]
            .take()
            .ok_or_else(|| AnalysisError::internal(format!("category {category} was not scored")))
    };
    Ok(TechnicalAnalysis {
        knee_movement: take(Category::KneeMovement)?,
        elbow_position: take(Category::ElbowPosition)?,
        toss_trajectory: take(Category::TossTrajectory)?,
        body_rotation: take(Category::BodyRotation)?,
        timing: take(Category::Timing)?,
        follow_through: take(Category::FollowThrough)?,
    })
}

/// Position of `category` in [`Category::ALL`].
fn slot_index(category: Category) -> usize {
    match category {
        Category::KneeMovement => 0,
        Category::ElbowPosition => 1,
        Category::TossTrajectory => 2,
        Category::BodyRotation => 3,
        Category::Timing => 4,
        Category::FollowThrough => 5,
    }
}
