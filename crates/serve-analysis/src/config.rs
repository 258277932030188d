//! Configuration for segmentation and scoring.
//!
//! Every threshold used by the engine lives here as data. `Default` carries
//! the hand-tuned values; a JSON file can override any subset of them.

use serde::{Deserialize, Serialize};
use std::path::Path;

use serve_models::{Category, PhaseName, SkillTier};

use crate::bands::{BandTable, Step};
use crate::error::{AnalysisError, AnalysisResult};

/// Tolerance for weight and ratio sums.
pub const SUM_TOLERANCE: f64 = 1e-9;

/// One value per serve phase.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseRatios {
    pub preparation: f64,
    pub ball_toss: f64,
    pub trophy_position: f64,
    pub acceleration: f64,
    pub contact: f64,
    pub follow_through: f64,
}

impl PhaseRatios {
    pub fn get(&self, phase: PhaseName) -> f64 {
        match phase {
            PhaseName::Preparation => self.preparation,
            PhaseName::BallToss => self.ball_toss,
            PhaseName::TrophyPosition => self.trophy_position,
            PhaseName::Acceleration => self.acceleration,
            PhaseName::Contact => self.contact,
            PhaseName::FollowThrough => self.follow_through,
        }
    }

    pub fn sum(&self) -> f64 {
        PhaseName::ALL.iter().map(|p| self.get(*p)).sum()
    }

    fn validate(&self, what: &str) -> AnalysisResult<()> {
        if PhaseName::ALL.iter().any(|p| !(self.get(*p) >= 0.0)) {
            return Err(AnalysisError::invalid_config(format!("{what} must be non-negative")));
        }
        if (self.sum() - 1.0).abs() > SUM_TOLERANCE {
            return Err(AnalysisError::invalid_config(format!(
                "{what} must sum to 1.0, got {}",
                self.sum()
            )));
        }
        Ok(())
    }
}

impl Default for PhaseRatios {
    fn default() -> Self {
        Self {
            preparation: 0.15,
            ball_toss: 0.20,
            trophy_position: 0.25,
            acceleration: 0.15,
            contact: 0.05,
            follow_through: 0.20,
        }
    }
}

/// Phase segmentation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmenterConfig {
    /// Valid samples required in both wrist trajectories (default: 10)
    pub min_valid_samples: usize,

    /// Preparation ends this many frames before the toss apex (default: 20)
    pub preparation_lead: usize,

    /// Ball toss ends this many frames after the toss apex (default: 5)
    pub toss_trail: usize,

    /// Trophy position ends this many frames before contact (default: 10)
    pub trophy_lead: usize,

    /// Acceleration ends this many frames after contact (default: 2)
    pub acceleration_trail: usize,

    /// Contact ends this many frames after contact (default: 5)
    pub contact_trail: usize,

    /// Phase shares used when the wrist signal is unusable
    pub fallback_ratios: PhaseRatios,

    /// Frame rate assumed when neither the caller nor the timestamps give one (default: 30)
    pub default_fps: f64,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            min_valid_samples: 10,
            preparation_lead: 20,
            toss_trail: 5,
            trophy_lead: 10,
            acceleration_trail: 2,
            contact_trail: 5,
            fallback_ratios: PhaseRatios::default(),
            default_fps: 30.0,
        }
    }
}

impl SegmenterConfig {
    pub fn validate(&self) -> AnalysisResult<()> {
        self.fallback_ratios.validate("fallback ratios")?;
        if !(self.default_fps.is_finite() && self.default_fps > 0.0) {
            return Err(AnalysisError::invalid_config("default_fps must be positive"));
        }
        if self.acceleration_trail >= self.contact_trail {
            return Err(AnalysisError::invalid_config(
                "acceleration_trail must be smaller than contact_trail",
            ));
        }
        Ok(())
    }
}

/// Weight of each category in the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryWeights {
    pub knee_movement: f64,
    pub elbow_position: f64,
    pub toss_trajectory: f64,
    pub body_rotation: f64,
    pub timing: f64,
    pub follow_through: f64,
}

impl CategoryWeights {
    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::KneeMovement => self.knee_movement,
            Category::ElbowPosition => self.elbow_position,
            Category::TossTrajectory => self.toss_trajectory,
            Category::BodyRotation => self.body_rotation,
            Category::Timing => self.timing,
            Category::FollowThrough => self.follow_through,
        }
    }

    pub fn sum(&self) -> f64 {
        Category::ALL.iter().map(|c| self.get(*c)).sum()
    }
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            knee_movement: 0.05,
            elbow_position: 0.20,
            toss_trajectory: 0.15,
            body_rotation: 0.30,
            timing: 0.05,
            follow_through: 0.25,
        }
    }
}

/// Minimum overall score of each skill tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierThresholds {
    /// (default: 8.5)
    pub professional: f64,
    /// (default: 7.0)
    pub advanced: f64,
    /// (default: 5.5)
    pub intermediate: f64,
}

impl TierThresholds {
    pub fn classify(&self, score: f64) -> SkillTier {
        if score >= self.professional {
            SkillTier::Professional
        } else if score >= self.advanced {
            SkillTier::Advanced
        } else if score >= self.intermediate {
            SkillTier::Intermediate
        } else {
            SkillTier::Beginner
        }
    }
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            professional: 8.5,
            advanced: 7.0,
            intermediate: 5.5,
        }
    }
}

/// Knee flexion thresholds (degrees of the hip-knee-ankle angle).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KneeConfig {
    pub depth: BandTable,
    /// Penalty when the deepest bend falls outside the trophy position
    pub timing_penalty: f64,
    pub early_issue: String,
    pub early_recommendation: String,
    pub late_issue: String,
    pub late_recommendation: String,
}

impl Default for KneeConfig {
    fn default() -> Self {
        let deeper = "Bend the knees a little less to keep your balance";
        let lower = "Bend the knees more deeply to generate more power";
        Self {
            depth: BandTable::symmetric(
                135.0,
                145.0,
                vec![
                    Step::flagged(125.0, -1.5, "Knee bend is slightly too deep"),
                    Step::flagged(115.0, -3.5, "Knee bend is too deep").recommend(deeper),
                    Step::flagged(f64::NEG_INFINITY, -6.0, "Knee bend is far too deep").recommend(deeper),
                ],
                vec![
                    Step::flagged(150.0, -1.0, "Knee bend is a little shallow"),
                    Step::flagged(160.0, -2.5, "Knee bend is somewhat shallow"),
                    Step::flagged(170.0, -4.5, "Knee bend is too shallow").recommend(lower),
                    Step::flagged(f64::INFINITY, -6.0, "Knee bend is far too shallow").recommend(lower),
                ],
            ),
            timing_penalty: -2.0,
            early_issue: "Knee bend starts too early".to_string(),
            early_recommendation: "Practice starting the knee bend together with the toss".to_string(),
            late_issue: "Knee bend starts too late".to_string(),
            late_recommendation: "Start bending the knees a little earlier".to_string(),
        }
    }
}

/// Hitting-elbow thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElbowConfig {
    /// Bands over `shoulder.y - elbow.y` during the trophy position
    pub height: BandTable,
    /// Bands over the elbow path smoothness
    pub stability: BandTable,
}

impl Default for ElbowConfig {
    fn default() -> Self {
        let raise = "Keep the elbow a little higher in the trophy position";
        let drop = "Lower the elbow slightly and keep the motion natural";
        let steady = "Stabilize the elbow path with slow practice swings";
        Self {
            height: BandTable::symmetric(
                0.0,
                0.03,
                vec![
                    Step::flagged(-0.03, -1.5, "Elbow is slightly low"),
                    Step::flagged(-0.06, -4.0, "Elbow is too low").recommend(raise),
                    Step::flagged(f64::NEG_INFINITY, -6.0, "Elbow is far too low").recommend(raise),
                ],
                vec![
                    Step::flagged(0.06, -2.0, "Elbow is slightly high"),
                    Step::flagged(0.1, -4.0, "Elbow is too high"),
                    Step::flagged(f64::INFINITY, -6.0, "Elbow is far too high").recommend(drop),
                ],
            ),
            stability: BandTable::at_least(
                0.8,
                vec![
                    Step::flagged(0.7, -1.0, "Elbow movement is slightly unstable"),
                    Step::flagged(0.6, -2.5, "Elbow movement is unstable").recommend(steady),
                    Step::flagged(f64::NEG_INFINITY, -4.0, "Elbow movement is very unstable")
                        .recommend(steady),
                ],
            ),
        }
    }
}

/// Ball toss thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TossConfig {
    /// Bands over the apex height `1 - min(y)`
    pub height: BandTable,
    /// Bands over the absolute horizontal travel
    pub distance: BandTable,
    /// Bands over the toss path smoothness
    pub consistency: BandTable,
}

impl Default for TossConfig {
    fn default() -> Self {
        let higher = "Toss the ball higher to give yourself more time";
        let lower = "Lower the toss slightly for better control";
        let further = "Toss the ball further forward to create an effective contact point";
        let closer = "Keep the toss closer to stay balanced";
        Self {
            height: BandTable::symmetric(
                0.4,
                0.6,
                vec![
                    Step::flagged(0.3, -1.5, "Toss is slightly low"),
                    Step::flagged(0.2, -3.0, "Toss is too low").recommend(higher),
                    Step::flagged(f64::NEG_INFINITY, -4.0, "Toss is far too low").recommend(higher),
                ],
                vec![
                    Step::flagged(0.7, -1.0, "Toss is slightly high"),
                    Step::flagged(0.8, -2.5, "Toss is too high").recommend(lower),
                    Step::flagged(f64::INFINITY, -4.0, "Toss is far too high").recommend(lower),
                ],
            ),
            distance: BandTable::symmetric(
                0.08,
                0.15,
                vec![
                    Step::flagged(0.05, -1.0, "Toss lacks a little forward travel"),
                    Step::flagged(0.03, -2.5, "Toss lacks forward travel").recommend(further),
                    Step::flagged(f64::NEG_INFINITY, -4.0, "Toss lacks a lot of forward travel")
                        .recommend(further),
                ],
                vec![
                    Step::flagged(0.2, -1.0, "Toss goes slightly too far forward"),
                    Step::flagged(0.25, -2.5, "Toss goes too far forward").recommend(closer),
                    Step::flagged(f64::INFINITY, -4.0, "Toss goes far too far forward").recommend(closer),
                ],
            ),
            consistency: BandTable::at_least(
                0.7,
                vec![
                    Step::flagged(0.6, -1.0, "Toss path is slightly unsteady"),
                    Step::flagged(0.5, -2.5, "Toss path is unsteady"),
                    Step::flagged(f64::NEG_INFINITY, -4.0, "Toss path is very unsteady"),
                ],
            ),
        }
    }
}

/// Shoulder and hip line tilt thresholds, in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationConfig {
    pub shoulder: BandTable,
    pub hip: BandTable,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            shoulder: BandTable::symmetric(
                88.0,
                92.0,
                vec![
                    Step::flagged(83.0, -2.0, "Shoulder rotation shows a slight deficit"),
                    Step::flagged(75.0, -4.0, "Shoulder rotation shows a deficit"),
                    Step::flagged(f64::NEG_INFINITY, -6.0, "Shoulder rotation shows a large deficit")
                        .recommend("Turn the shoulders further to add power"),
                ],
                vec![
                    Step::flagged(98.0, -2.5, "Shoulder rotation is slightly excessive"),
                    Step::flagged(f64::INFINITY, -5.0, "Shoulder rotation is excessive")
                        .recommend("Rein in the shoulder turn for better control"),
                ],
            ),
            hip: BandTable::symmetric(
                45.0,
                55.0,
                vec![
                    Step::flagged(40.0, -2.0, "Hip rotation shows a slight deficit"),
                    Step::flagged(30.0, -4.0, "Hip rotation shows a deficit"),
                    Step::flagged(f64::NEG_INFINITY, -6.0, "Hip rotation shows a large deficit")
                        .recommend("Drive the hips to transfer power from the lower body"),
                ],
                vec![
                    Step::flagged(65.0, -2.5, "Hip rotation is slightly excessive"),
                    Step::flagged(f64::INFINITY, -5.0, "Hip rotation is excessive"),
                ],
            ),
        }
    }
}

/// Rhythm thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Target share of the serve for each phase
    pub ideal_ratios: PhaseRatios,
    /// Bands over `|ratio - ideal|`
    pub deviation: BandTable,
    /// Phases scoring below this are reported as too long or too short, and
    /// trigger the recommendations; other non-ideal phases are reported as
    /// slightly long or short (default: 4.0)
    pub flag_below: f64,
    /// Emitted once when any phase is flagged
    pub recommendations: Vec<String>,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            ideal_ratios: PhaseRatios::default(),
            deviation: BandTable::below(
                0.03,
                vec![
                    Step::new(0.06, -1.5),
                    Step::new(0.10, -3.0),
                    Step::new(0.15, -4.5),
                    Step::new(0.20, -6.0),
                    Step::new(f64::INFINITY, -8.0),
                ],
            ),
            flag_below: 4.0,
            recommendations: vec![
                "Pay attention to the timing of each phase for a rhythmic serve".to_string(),
                "Practice with a metronome to build a steady rhythm".to_string(),
            ],
        }
    }
}

/// Weight of each follow-through sub-metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FollowThroughWeights {
    pub swing_completion: f64,
    pub rotation_completion: f64,
    pub balance: f64,
    pub racket_path: f64,
}

impl FollowThroughWeights {
    pub fn sum(&self) -> f64 {
        self.swing_completion + self.rotation_completion + self.balance + self.racket_path
    }
}

impl Default for FollowThroughWeights {
    fn default() -> Self {
        Self {
            swing_completion: 0.30,
            rotation_completion: 0.25,
            balance: 0.25,
            racket_path: 0.20,
        }
    }
}

/// Follow-through thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FollowThroughConfig {
    pub weights: FollowThroughWeights,
    /// Samples needed for the swing, balance and path sub-metrics (default: 3)
    pub min_samples: usize,
    /// Bands over the right-wrist horizontal travel
    pub horizontal: BandTable,
    /// Bands over the right-wrist vertical drop
    pub vertical: BandTable,
    /// Travel that counts as a full swing (default: 0.3)
    pub completion_span: f64,
    /// Bands over the last shoulder tilt, in degrees
    pub final_rotation: BandTable,
    /// Bands over the shoulder tilt consistency
    pub rotation_consistency: BandTable,
    /// Standard deviation of tilt steps that zeroes consistency (default: 30 degrees)
    pub consistency_scale: f64,
    /// Bands over the mean ankle stability
    pub balance: BandTable,
    /// Summed ankle spread that zeroes stability (default: 0.2)
    pub stability_scale: f64,
    /// Bands over the wrist path curvature smoothness
    pub racket_path: BandTable,
    /// Sub-scores below this are reported as issues (default: 7.0)
    pub issue_below: f64,
}

impl Default for FollowThroughConfig {
    fn default() -> Self {
        Self {
            weights: FollowThroughWeights::default(),
            min_samples: 3,
            horizontal: BandTable::at_least(
                0.15,
                vec![Step::new(0.10, -1.5), Step::new(f64::NEG_INFINITY, -3.0)],
            ),
            vertical: BandTable::at_least(
                0.10,
                vec![Step::new(0.05, -1.0), Step::new(f64::NEG_INFINITY, -2.0)],
            ),
            completion_span: 0.3,
            final_rotation: BandTable::at_least(
                110.0,
                vec![Step::new(100.0, -1.5), Step::new(f64::NEG_INFINITY, -3.0)],
            ),
            rotation_consistency: BandTable::at_least(0.7, vec![Step::new(f64::NEG_INFINITY, -2.0)]),
            consistency_scale: 30.0,
            balance: BandTable::at_least(
                0.85,
                vec![
                    Step::new(0.75, -1.0),
                    Step::new(0.6, -2.0),
                    Step::new(f64::NEG_INFINITY, -4.0),
                ],
            ),
            stability_scale: 0.2,
            racket_path: BandTable::at_least(
                0.75,
                vec![Step::new(0.6, -1.5), Step::new(f64::NEG_INFINITY, -3.0)],
            ),
            issue_below: 7.0,
        }
    }
}

/// Complete scoring configuration injected into every scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Valid samples needed for quantities measured over the whole clip (default: 10)
    pub min_sequence_samples: usize,
    /// Valid samples needed for quantities measured inside one phase (default: 1)
    pub min_phase_samples: usize,
    pub knee: KneeConfig,
    pub elbow: ElbowConfig,
    pub toss: TossConfig,
    pub rotation: RotationConfig,
    pub timing: TimingConfig,
    pub follow_through: FollowThroughConfig,
    pub weights: CategoryWeights,
    pub tiers: TierThresholds,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            min_sequence_samples: 10,
            min_phase_samples: 1,
            knee: KneeConfig::default(),
            elbow: ElbowConfig::default(),
            toss: TossConfig::default(),
            rotation: RotationConfig::default(),
            timing: TimingConfig::default(),
            follow_through: FollowThroughConfig::default(),
            weights: CategoryWeights::default(),
            tiers: TierThresholds::default(),
        }
    }
}

impl ScoringConfig {
    /// Load and validate a configuration file. Missing fields keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> AnalysisResult<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// All band tables with a label for error messages.
    pub fn tables(&self) -> Vec<(&'static str, &BandTable)> {
        let ft = &self.follow_through;
        vec![
            ("knee.depth", &self.knee.depth),
            ("elbow.height", &self.elbow.height),
            ("elbow.stability", &self.elbow.stability),
            ("toss.height", &self.toss.height),
            ("toss.distance", &self.toss.distance),
            ("toss.consistency", &self.toss.consistency),
            ("rotation.shoulder", &self.rotation.shoulder),
            ("rotation.hip", &self.rotation.hip),
            ("timing.deviation", &self.timing.deviation),
            ("follow_through.horizontal", &ft.horizontal),
            ("follow_through.vertical", &ft.vertical),
            ("follow_through.final_rotation", &ft.final_rotation),
            ("follow_through.rotation_consistency", &ft.rotation_consistency),
            ("follow_through.balance", &ft.balance),
            ("follow_through.racket_path", &ft.racket_path),
        ]
    }

    pub fn validate(&self) -> AnalysisResult<()> {
        for (name, table) in self.tables() {
            table
                .validate()
                .map_err(|e| AnalysisError::invalid_config(format!("{name}: {e}")))?;
        }

        let weights = self.weights.sum();
        if (weights - 1.0).abs() > SUM_TOLERANCE {
            return Err(AnalysisError::invalid_config(format!(
                "category weights must sum to 1.0, got {weights}"
            )));
        }
        let ft_weights = self.follow_through.weights.sum();
        if (ft_weights - 1.0).abs() > SUM_TOLERANCE {
            return Err(AnalysisError::invalid_config(format!(
                "follow-through weights must sum to 1.0, got {ft_weights}"
            )));
        }
        self.timing.ideal_ratios.validate("ideal phase ratios")?;

        let tiers = &self.tiers;
        if !(tiers.professional >= tiers.advanced && tiers.advanced >= tiers.intermediate) {
            return Err(AnalysisError::invalid_config("skill tier thresholds must descend"));
        }
        if self.knee.timing_penalty > 0.0 {
            return Err(AnalysisError::invalid_config("knee timing penalty must not be positive"));
        }
        if self.follow_through.consistency_scale <= 0.0
            || self.follow_through.stability_scale <= 0.0
            || self.follow_through.completion_span <= 0.0
        {
            return Err(AnalysisError::invalid_config("follow-through scales must be positive"));
        }
        if self.min_phase_samples == 0 || self.min_sequence_samples == 0 {
            return Err(AnalysisError::invalid_config("sample minimums must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        ScoringConfig::default().validate().unwrap();
        SegmenterConfig::default().validate().unwrap();
    }

    #[test]
    fn test_default_weights_sum_to_one() {
        assert!((CategoryWeights::default().sum() - 1.0).abs() <= SUM_TOLERANCE);
        assert!((FollowThroughWeights::default().sum() - 1.0).abs() <= SUM_TOLERANCE);
        assert!((PhaseRatios::default().sum() - 1.0).abs() <= SUM_TOLERANCE);
    }

    #[test]
    fn test_every_default_table_is_total() {
        let config = ScoringConfig::default();
        for (name, table) in config.tables() {
            assert!(table.validate().is_ok(), "{name} is not total");
        }
    }

    #[test]
    fn test_rejects_bad_weights() {
        let mut config = ScoringConfig::default();
        config.weights.timing = 0.5;
        assert!(matches!(config.validate(), Err(AnalysisError::InvalidConfig(_))));
    }

    #[test]
    fn test_default_tier_thresholds() {
        let tiers = TierThresholds::default();
        let expected = [
            (10.0, SkillTier::Professional),
            (8.5, SkillTier::Professional),
            (8.49, SkillTier::Advanced),
            (7.0, SkillTier::Advanced),
            (6.99, SkillTier::Intermediate),
            (5.5, SkillTier::Intermediate),
            (5.49, SkillTier::Beginner),
            (0.0, SkillTier::Beginner),
        ];
        for (score, tier) in expected {
            assert_eq!(tiers.classify(score), tier, "score {score}");
        }
    }

    #[test]
    fn test_tier_override_changes_classification() {
        let tiers = TierThresholds {
            professional: 9.5,
            ..TierThresholds::default()
        };
        assert_eq!(tiers.classify(9.0), SkillTier::Advanced);
        assert_eq!(tiers.classify(9.5), SkillTier::Professional);
    }

    #[test]
    fn test_partial_json_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"min_sequence_samples": 5, "tiers": {{"professional": 9.0, "advanced": 7.0, "intermediate": 5.5}}}}"#).unwrap();

        let config = ScoringConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.min_sequence_samples, 5);
        assert_eq!(config.tiers.professional, 9.0);
        assert_eq!(config.knee, KneeConfig::default());
    }

    #[test]
    fn test_invalid_json_file_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"weights": {{"knee_movement": 1.0, "elbow_position": 1.0, "toss_trajectory": 0.0, "body_rotation": 0.0, "timing": 0.0, "follow_through": 0.0}}}}"#).unwrap();
        assert!(ScoringConfig::from_json_file(file.path()).is_err());
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let config = ScoringConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: ScoringConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
