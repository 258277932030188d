//! Per-category technique scores.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::phase::PhaseName;

/// Score assigned when a quantity cannot be measured at all.
pub const NEUTRAL_SCORE: f64 = 5.0;

/// Upper bound of every score.
pub const MAX_SCORE: f64 = 10.0;

/// Technique category scored by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    KneeMovement,
    ElbowPosition,
    TossTrajectory,
    BodyRotation,
    Timing,
    FollowThrough,
}

impl Category {
    /// All categories in reporting order.
    pub const ALL: [Category; 6] = [
        Category::KneeMovement,
        Category::ElbowPosition,
        Category::TossTrajectory,
        Category::BodyRotation,
        Category::Timing,
        Category::FollowThrough,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::KneeMovement => "knee_movement",
            Category::ElbowPosition => "elbow_position",
            Category::TossTrajectory => "toss_trajectory",
            Category::BodyRotation => "body_rotation",
            Category::Timing => "timing",
            Category::FollowThrough => "follow_through",
        }
    }

    /// Categories whose issues are reported against a serve phase.
    pub fn for_phase(phase: PhaseName) -> &'static [Category] {
        match phase {
            PhaseName::Preparation => &[],
            PhaseName::BallToss => &[Category::TossTrajectory],
            PhaseName::TrophyPosition => &[Category::ElbowPosition, Category::KneeMovement],
            PhaseName::Acceleration => &[Category::BodyRotation],
            PhaseName::Contact => &[Category::Timing],
            PhaseName::FollowThrough => &[Category::FollowThrough],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s.to_lowercase())
            .ok_or_else(|| CategoryParseError(s.to_string()))
    }
}

#[derive(Debug, Error)]
#[error("Unknown score category: {0}")]
pub struct CategoryParseError(String);

/// Score for one technique category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CategoryScore {
    pub category: Category,
    /// Score in `[0, 10]`
    pub overall_score: f64,
    /// Human-readable problems found, one per triggered band
    pub issues: Vec<String>,
    /// Practice suggestions keyed by the triggered bands
    pub recommendations: Vec<String>,
    /// True when at least one quantity could not be measured
    #[serde(default)]
    pub insufficient_data: bool,
    /// Category-specific measurements
    pub details: CategoryDetails,
}

impl CategoryScore {
    /// Clamp the score into `[0, 10]`.
    pub fn clamped(mut self) -> Self {
        self.overall_score = self.overall_score.clamp(0.0, MAX_SCORE);
        self
    }
}

/// Diagnostic measurements, tagged by category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CategoryDetails {
    KneeMovement(KneeDetails),
    ElbowPosition(ElbowDetails),
    TossTrajectory(TossDetails),
    BodyRotation(RotationDetails),
    Timing(TimingDetails),
    FollowThrough(FollowThroughDetails),
}

/// Knee flexion measurements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct KneeDetails {
    /// Smallest hip-knee-ankle angle in degrees (most bent)
    pub max_bend_angle: Option<f64>,
    /// Sequence position where the deepest bend occurred
    pub max_bend_frame: Option<usize>,
    pub depth_score: f64,
    pub timing_score: f64,
}

/// Hitting-elbow measurements during the trophy position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ElbowDetails {
    /// Mean elbow y during the trophy phase
    pub average_height: Option<f64>,
    /// Mean (shoulder.y - elbow.y); positive means elbow above shoulder
    pub shoulder_relative_position: Option<f64>,
    /// Elbow path smoothness in `[0, 1]`
    pub smoothness: Option<f64>,
    pub height_score: f64,
    pub stability_score: f64,
}

/// Ball toss measurements taken from the tossing wrist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TossDetails {
    /// Apex height as `1 - min(y)`
    pub max_height: Option<f64>,
    /// Absolute horizontal travel over the toss phase
    pub forward_distance: Option<f64>,
    /// Toss path smoothness in `[0, 1]`
    pub consistency: Option<f64>,
    pub height_score: f64,
    pub distance_score: f64,
    pub consistency_score: f64,
}

/// Shoulder and hip line tilt measurements.
///
/// These are 2-D tilt angles of the shoulder and hip lines, not a true torso twist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RotationDetails {
    pub max_shoulder_rotation: Option<f64>,
    pub max_hip_rotation: Option<f64>,
    pub shoulder_score: f64,
    pub hip_score: f64,
}

/// Duration share of a single phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PhaseTiming {
    /// Share of the serve spent in this phase
    pub ratio: f64,
    /// Target share
    pub ideal_ratio: f64,
    pub score: f64,
}

/// Rhythm measurements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TimingDetails {
    /// Sum of phase durations in seconds
    pub total_duration: f64,
    pub phases: BTreeMap<PhaseName, PhaseTiming>,
}

/// Racket-arm swing completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SwingCompletion {
    pub score: f64,
    pub completion_rate: Option<f64>,
    pub horizontal_movement: Option<f64>,
    pub vertical_movement: Option<f64>,
}

/// Shoulder-line rotation at the end of the serve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RotationCompletion {
    pub score: f64,
    pub final_rotation: Option<f64>,
    pub max_rotation: Option<f64>,
    pub consistency: Option<f64>,
}

/// Footing stability after the strike.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BalanceMaintenance {
    pub score: f64,
    pub left_stability: Option<f64>,
    pub right_stability: Option<f64>,
    pub overall_stability: Option<f64>,
}

/// Shape of the racket-wrist path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RacketPath {
    pub score: f64,
    pub path_smoothness: Option<f64>,
}

/// Follow-through sub-metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FollowThroughDetails {
    pub swing_completion: SwingCompletion,
    pub rotation_completion: RotationCompletion,
    pub balance: BalanceMaintenance,
    pub racket_path: RacketPath,
}
