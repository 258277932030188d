//! Serve phase definitions.
//!
//! A serve is split into six consecutive phases, always in this order:
//!
//! - `preparation`: stance until the motion starts
//! - `ball_toss`: tossing arm rises and releases the ball
//! - `trophy_position`: hitting arm cocked, toss near its apex
//! - `acceleration`: racket drop and upward swing
//! - `contact`: ball strike
//! - `follow_through`: deceleration and landing

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use std::str::FromStr;
use thiserror::Error;

/// One of the six fixed serve phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PhaseName {
    Preparation,
    BallToss,
    TrophyPosition,
    Acceleration,
    Contact,
    FollowThrough,
}

impl PhaseName {
    /// All phases in temporal order.
    pub const ALL: [PhaseName; 6] = [
        PhaseName::Preparation,
        PhaseName::BallToss,
        PhaseName::TrophyPosition,
        PhaseName::Acceleration,
        PhaseName::Contact,
        PhaseName::FollowThrough,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PhaseName::Preparation => "preparation",
            PhaseName::BallToss => "ball_toss",
            PhaseName::TrophyPosition => "trophy_position",
            PhaseName::Acceleration => "acceleration",
            PhaseName::Contact => "contact",
            PhaseName::FollowThrough => "follow_through",
        }
    }

    /// Event tags attached to a phase found from motion anchors.
    pub fn key_events(&self) -> &'static [&'static str] {
        match self {
            PhaseName::Preparation => &["stance_setup", "initial_position"],
            PhaseName::BallToss => &["toss_initiation", "ball_release"],
            PhaseName::TrophyPosition => &["trophy_formation", "weight_transfer"],
            PhaseName::Acceleration => &["racket_acceleration", "kinetic_chain"],
            PhaseName::Contact => &["ball_contact", "maximum_reach"],
            PhaseName::FollowThrough => &["deceleration", "landing"],
        }
    }
}

impl fmt::Display for PhaseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PhaseName {
    type Err = PhaseNameParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "preparation" => Ok(PhaseName::Preparation),
            "ball_toss" | "toss" => Ok(PhaseName::BallToss),
            "trophy_position" | "trophy" => Ok(PhaseName::TrophyPosition),
            "acceleration" => Ok(PhaseName::Acceleration),
            "contact" => Ok(PhaseName::Contact),
            "follow_through" => Ok(PhaseName::FollowThrough),
            _ => Err(PhaseNameParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown serve phase: {0}")]
pub struct PhaseNameParseError(String);

/// A segmented serve phase.
///
/// Frame bounds are positions in the pose sequence and form the half-open
/// range `[start_frame, end_frame)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ServePhase {
    pub name: PhaseName,
    /// First position in the phase
    pub start_frame: usize,
    /// One past the last position in the phase
    pub end_frame: usize,
    /// Duration in seconds
    pub duration: f64,
    /// Motion events expected in this phase
    pub key_events: Vec<String>,
}

impl ServePhase {
    /// Create a phase, deriving its duration from the frame rate.
    pub fn new(name: PhaseName, start_frame: usize, end_frame: usize, fps: f64) -> Self {
        let frames = end_frame.saturating_sub(start_frame);
        Self {
            name,
            start_frame,
            end_frame,
            duration: if fps > 0.0 { frames as f64 / fps } else { 0.0 },
            key_events: Vec::new(),
        }
    }

    /// Attach the phase's standard key events.
    pub fn with_key_events(mut self) -> Self {
        self.key_events = self.name.key_events().iter().map(|e| e.to_string()).collect();
        self
    }

    /// Number of frames in the phase.
    pub fn frame_count(&self) -> usize {
        self.end_frame.saturating_sub(self.start_frame)
    }

    pub fn is_empty(&self) -> bool {
        self.frame_count() == 0
    }

    /// Frame positions covered by the phase.
    pub fn range(&self) -> Range<usize> {
        self.start_frame..self.end_frame.max(self.start_frame)
    }

    pub fn contains(&self, position: usize) -> bool {
        self.range().contains(&position)
    }
}

/// How phase boundaries were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SegmentationMethod {
    /// Boundaries placed around the toss apex and contact anchors
    Anchored,
    /// Fixed-ratio split used when the wrist signal is unusable
    Proportional,
}
