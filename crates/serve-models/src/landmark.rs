//! Body landmark definitions.
//!
//! Landmark names follow the 33-point body topology emitted by the pose
//! detector. Only the subset consumed by the analysis engine is modelled as
//! an enum; frames may carry additional names, which are kept verbatim.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A single detected landmark in normalized image coordinates.
///
/// `x` grows to the right and `y` grows downward, both in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LandmarkSample {
    /// Horizontal position (0.0 = left edge, 1.0 = right edge)
    pub x: f64,
    /// Vertical position (0.0 = top edge, 1.0 = bottom edge)
    pub y: f64,
    /// Relative depth, when the detector provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
    /// Detector visibility / confidence in `[0, 1]`
    #[serde(default = "default_visibility")]
    pub visibility: f64,
}

fn default_visibility() -> f64 {
    1.0
}

impl LandmarkSample {
    /// Create a 2-D sample with full visibility.
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            z: None,
            visibility: 1.0,
        }
    }

    /// Attach a depth coordinate.
    pub fn with_z(mut self, z: f64) -> Self {
        self.z = Some(z);
        self
    }

    /// Attach a visibility score.
    pub fn with_visibility(mut self, visibility: f64) -> Self {
        self.visibility = visibility;
        self
    }

    /// True when every coordinate is a finite number.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.z.map_or(true, f64::is_finite)
            && self.visibility.is_finite()
    }
}

/// Landmarks used by the serve analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Landmark {
    Nose,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
    LeftHeel,
    RightHeel,
}

impl Landmark {
    /// All landmarks tracked by the engine.
    pub const ALL: &'static [Landmark] = &[
        Landmark::Nose,
        Landmark::LeftShoulder,
        Landmark::RightShoulder,
        Landmark::LeftElbow,
        Landmark::RightElbow,
        Landmark::LeftWrist,
        Landmark::RightWrist,
        Landmark::LeftHip,
        Landmark::RightHip,
        Landmark::LeftKnee,
        Landmark::RightKnee,
        Landmark::LeftAnkle,
        Landmark::RightAnkle,
        Landmark::LeftHeel,
        Landmark::RightHeel,
    ];

    /// Key used in per-frame landmark maps.
    pub fn as_str(&self) -> &'static str {
        match self {
            Landmark::Nose => "nose",
            Landmark::LeftShoulder => "left_shoulder",
            Landmark::RightShoulder => "right_shoulder",
            Landmark::LeftElbow => "left_elbow",
            Landmark::RightElbow => "right_elbow",
            Landmark::LeftWrist => "left_wrist",
            Landmark::RightWrist => "right_wrist",
            Landmark::LeftHip => "left_hip",
            Landmark::RightHip => "right_hip",
            Landmark::LeftKnee => "left_knee",
            Landmark::RightKnee => "right_knee",
            Landmark::LeftAnkle => "left_ankle",
            Landmark::RightAnkle => "right_ankle",
            Landmark::LeftHeel => "left_heel",
            Landmark::RightHeel => "right_heel",
        }
    }
}

impl fmt::Display for Landmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Landmark {
    type Err = LandmarkParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Landmark::ALL
            .iter()
            .copied()
            .find(|l| l.as_str() == s)
            .ok_or_else(|| LandmarkParseError(s.to_string()))
    }
}

#[derive(Debug, Error)]
#[error("Unknown landmark: {0}")]
pub struct LandmarkParseError(String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landmark_round_trip_names() {
        for landmark in Landmark::ALL {
            assert_eq!(landmark.as_str().parse::<Landmark>().unwrap(), *landmark);
        }
        assert!("left_pinky".parse::<Landmark>().is_err());
    }

    #[test]
    fn test_sample_defaults_visibility() {
        let sample: LandmarkSample = serde_json::from_str(r#"{"x":0.4,"y":0.6}"#).unwrap();
        assert_eq!(sample.visibility, 1.0);
        assert!(sample.z.is_none());
    }

    #[test]
    fn test_sample_finiteness() {
        assert!(LandmarkSample::new(0.1, 0.2).with_z(-0.3).is_finite());
        assert!(!LandmarkSample::new(f64::NAN, 0.2).is_finite());
        assert!(!LandmarkSample::new(0.1, 0.2).with_z(f64::INFINITY).is_finite());
    }
}
