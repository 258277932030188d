//! Shared data models for the serve analysis engine.
//!
//! This crate provides Serde-serializable types for:
//! - Landmark samples and per-frame detector output
//! - Serve phases and segmentation methods
//! - Per-category technique scores
//! - The aggregated analysis result handed to the advice generator

pub mod analysis;
pub mod landmark;
pub mod phase;
pub mod pose;
pub mod score;

// Re-export common types
pub use analysis::{
    AnalysisStatus, PhaseReport, ServeAnalysis, SkillTier, TechnicalAnalysis, VideoMetadata,
    ANALYSIS_VERSION,
};
pub use landmark::{Landmark, LandmarkSample};
pub use phase::{PhaseName, SegmentationMethod, ServePhase};
pub use pose::{FramePose, PoseSequence, PoseSequenceError};
pub use score::{
    BalanceMaintenance, Category, CategoryDetails, CategoryScore, ElbowDetails,
    FollowThroughDetails, KneeDetails, PhaseTiming, RacketPath, RotationCompletion,
    RotationDetails, SwingCompletion, TimingDetails, TossDetails, MAX_SCORE, NEUTRAL_SCORE,
};
