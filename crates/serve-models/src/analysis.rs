//! Serve analysis result models.
//!
//! [`ServeAnalysis`] is the terminal artifact of the engine and the input of
//! the advice generator, which reads the per-phase reports and the overall
//! score / skill tier.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::phase::{PhaseName, SegmentationMethod, ServePhase};
use crate::score::{Category, CategoryScore};

/// Version of the analysis result format.
pub const ANALYSIS_VERSION: &str = "2.0.0";

/// Coarse skill bucket derived from the overall score by the configured
/// tier thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SkillTier {
    Beginner,
    Intermediate,
    Advanced,
    Professional,
}

impl SkillTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillTier::Beginner => "beginner",
            SkillTier::Intermediate => "intermediate",
            SkillTier::Advanced => "advanced",
            SkillTier::Professional => "professional",
        }
    }

    /// Human-readable label.
    pub fn display_name(&self) -> &'static str {
        match self {
            SkillTier::Beginner => "Beginner",
            SkillTier::Intermediate => "Intermediate",
            SkillTier::Advanced => "Advanced",
            SkillTier::Professional => "Professional level",
        }
    }
}

impl fmt::Display for SkillTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SkillTier {
    type Err = SkillTierParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "beginner" => Ok(SkillTier::Beginner),
            "intermediate" => Ok(SkillTier::Intermediate),
            "advanced" => Ok(SkillTier::Advanced),
            "professional" | "pro" => Ok(SkillTier::Professional),
            _ => Err(SkillTierParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown skill tier: {0}")]
pub struct SkillTierParseError(String);

/// Summary of the analyzed clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VideoMetadata {
    /// Number of sampled frames
    pub total_frames: usize,
    /// Frames in which a pose was found
    pub detected_frames: usize,
    /// `detected_frames / total_frames`
    pub detection_rate: f64,
    /// Effective frames per second used for durations
    pub fps: f64,
    /// Clip duration in seconds
    pub duration: f64,
}

/// Per-phase summary consumed by the advice generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PhaseReport {
    /// Pose-detection coverage of the phase on a 0-10 scale
    pub score: f64,
    /// Issues of the categories associated with the phase
    pub issues: Vec<String>,
    /// Frames in the phase
    pub frame_count: usize,
    /// Frames in the phase with a detected pose
    pub pose_detected: usize,
}

/// All six category scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TechnicalAnalysis {
    pub knee_movement: CategoryScore,
    pub elbow_position: CategoryScore,
    pub toss_trajectory: CategoryScore,
    pub body_rotation: CategoryScore,
    pub timing: CategoryScore,
    pub follow_through: CategoryScore,
}

impl TechnicalAnalysis {
    /// Look up a category score.
    pub fn get(&self, category: Category) -> &CategoryScore {
        match category {
            Category::KneeMovement => &self.knee_movement,
            Category::ElbowPosition => &self.elbow_position,
            Category::TossTrajectory => &self.toss_trajectory,
            Category::BodyRotation => &self.body_rotation,
            Category::Timing => &self.timing,
            Category::FollowThrough => &self.follow_through,
        }
    }

    /// Iterate over the scores in reporting order.
    pub fn iter(&self) -> impl Iterator<Item = &CategoryScore> {
        Category::ALL.into_iter().map(move |c| self.get(c))
    }
}

/// Outcome of an analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    Completed,
    Failed,
}

/// Complete serve analysis result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ServeAnalysis {
    /// Deterministic identifier derived from the first frame timestamp
    pub analysis_id: String,
    pub analysis_version: String,
    pub status: AnalysisStatus,
    pub video_metadata: VideoMetadata,
    /// The six phases in temporal order; empty on failure
    pub serve_phases: Vec<ServePhase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segmentation: Option<SegmentationMethod>,
    /// Category scores; absent on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technical_analysis: Option<TechnicalAnalysis>,
    pub phase_analysis: BTreeMap<PhaseName, PhaseReport>,
    /// Weighted score in `[0, 10]`
    pub overall_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill_tier: Option<SkillTier>,
    /// All category recommendations in reporting order
    pub recommendations: Vec<String>,
    /// Explanation when the analysis failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ServeAnalysis {
    /// Build a failure result carrying no category scores.
    pub fn failed(
        analysis_id: impl Into<String>,
        video_metadata: VideoMetadata,
        message: impl Into<String>,
    ) -> Self {
        Self {
            analysis_id: analysis_id.into(),
            analysis_version: ANALYSIS_VERSION.to_string(),
            status: AnalysisStatus::Failed,
            video_metadata,
            serve_phases: Vec::new(),
            segmentation: None,
            technical_analysis: None,
            phase_analysis: BTreeMap::new(),
            overall_score: 0.0,
            skill_tier: None,
            recommendations: Vec::new(),
            message: Some(message.into()),
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == AnalysisStatus::Completed
    }

    /// Phase scores keyed by phase, as surfaced to clients.
    pub fn phase_scores(&self) -> BTreeMap<PhaseName, f64> {
        self.phase_analysis
            .iter()
            .map(|(name, report)| (*name, report.score))
            .collect()
    }
}
