//! Per-frame detector output.
//!
//! A [`PoseSequence`] is produced once by the landmark detector and is
//! read-only afterwards. Position in `frames` is temporal order; the detector
//! may sub-sample the source video, so `frame_index` values can skip.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::landmark::{Landmark, LandmarkSample};

/// Pose detection result for a single sampled frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FramePose {
    /// Index of the frame in the source video
    pub frame_index: u64,
    /// Presentation time in seconds
    pub timestamp: f64,
    /// Whether the detector found a person in this frame
    pub has_pose: bool,
    /// Landmarks keyed by name (`right_wrist`, `left_knee`, ...). Empty when
    /// `has_pose` is false.
    #[serde(default)]
    pub landmarks: BTreeMap<String, LandmarkSample>,
}

impl FramePose {
    /// A frame where the detector found nobody.
    pub fn empty(frame_index: u64, timestamp: f64) -> Self {
        Self {
            frame_index,
            timestamp,
            has_pose: false,
            landmarks: BTreeMap::new(),
        }
    }

    /// A detected frame with the given landmarks.
    pub fn detected(
        frame_index: u64,
        timestamp: f64,
        landmarks: impl IntoIterator<Item = (Landmark, LandmarkSample)>,
    ) -> Self {
        Self {
            frame_index,
            timestamp,
            has_pose: true,
            landmarks: landmarks
                .into_iter()
                .map(|(name, sample)| (name.as_str().to_string(), sample))
                .collect(),
        }
    }

    /// Look up a landmark. Always `None` when no pose was found.
    pub fn landmark(&self, landmark: Landmark) -> Option<&LandmarkSample> {
        if !self.has_pose {
            return None;
        }
        self.landmarks.get(landmark.as_str())
    }
}

/// Ordered detector output for one clip plus the timing metadata needed to
/// convert frame counts to durations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PoseSequence {
    /// Sampled frames in temporal order
    pub frames: Vec<FramePose>,
    /// Frames per second of the sampled sequence, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fps: Option<f64>,
    /// Total clip duration in seconds, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

impl PoseSequence {
    /// Create a sequence without timing metadata.
    pub fn new(frames: Vec<FramePose>) -> Self {
        Self {
            frames,
            fps: None,
            duration: None,
        }
    }

    /// Set the sampling rate.
    pub fn with_fps(mut self, fps: f64) -> Self {
        self.fps = Some(fps);
        self
    }

    /// Set the clip duration.
    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Number of sampled frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Number of frames in which a pose was found.
    pub fn detected_frames(&self) -> usize {
        self.frames.iter().filter(|f| f.has_pose).count()
    }

    /// Check the ordering and numeric invariants of the sequence.
    ///
    /// An empty sequence is considered valid here; callers decide how to treat it.
    pub fn validate(&self) -> Result<(), PoseSequenceError> {
        if let Some(fps) = self.fps {
            if !(fps.is_finite() && fps > 0.0) {
                return Err(PoseSequenceError::InvalidFps(fps));
            }
        }
        if let Some(duration) = self.duration {
            if !(duration.is_finite() && duration >= 0.0) {
                return Err(PoseSequenceError::InvalidDuration(duration));
            }
        }

        for (position, pair) in self.frames.windows(2).enumerate() {
            let (prev, next) = (&pair[0], &pair[1]);
            if next.frame_index <= prev.frame_index {
                return Err(PoseSequenceError::FrameOrder {
                    position: position + 1,
                    previous: prev.frame_index,
                    current: next.frame_index,
                });
            }
            if next.timestamp < prev.timestamp {
                return Err(PoseSequenceError::TimestampOrder {
                    position: position + 1,
                });
            }
        }

        for (position, frame) in self.frames.iter().enumerate() {
            if !frame.timestamp.is_finite() {
                return Err(PoseSequenceError::TimestampOrder { position });
            }
            if let Some((name, _)) = frame.landmarks.iter().find(|(_, s)| !s.is_finite()) {
                return Err(PoseSequenceError::NonFiniteLandmark {
                    position,
                    landmark: name.clone(),
                });
            }
        }

        Ok(())
    }
}

/// Violations of the [`PoseSequence`] invariants.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PoseSequenceError {
    #[error("Frame indices must strictly increase (position {position}: {previous} -> {current})")]
    FrameOrder {
        position: usize,
        previous: u64,
        current: u64,
    },

    #[error("Timestamps must be finite and non-decreasing (position {position})")]
    TimestampOrder { position: usize },

    #[error("Non-finite coordinate for {landmark} at position {position}")]
    NonFiniteLandmark { position: usize, landmark: String },

    #[error("Invalid fps: {0}")]
    InvalidFps(f64),

    #[error("Invalid duration: {0}")]
    InvalidDuration(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(index: u64, t: f64) -> FramePose {
        FramePose::detected(index, t, [(Landmark::RightWrist, LandmarkSample::new(0.5, 0.5))])
    }

    #[test]
    fn test_landmark_lookup_respects_has_pose() {
        let mut f = frame(0, 0.0);
        assert!(f.landmark(Landmark::RightWrist).is_some());
        assert!(f.landmark(Landmark::LeftWrist).is_none());

        f.has_pose = false;
        assert!(f.landmark(Landmark::RightWrist).is_none());
    }

    #[test]
    fn test_validate_accepts_strided_frames() {
        let seq = PoseSequence::new(vec![frame(0, 0.0), frame(6, 0.2), frame(12, 0.4)]).with_fps(5.0);
        assert!(seq.validate().is_ok());
        assert_eq!(seq.detected_frames(), 3);
    }

    #[test]
    fn test_validate_rejects_reordered_frames() {
        let seq = PoseSequence::new(vec![frame(6, 0.2), frame(6, 0.2)]);
        assert!(matches!(
            seq.validate(),
            Err(PoseSequenceError::FrameOrder { position: 1, .. })
        ));

        let seq = PoseSequence::new(vec![frame(0, 0.5), frame(1, 0.4)]);
        assert!(matches!(seq.validate(), Err(PoseSequenceError::TimestampOrder { .. })));
    }

    #[test]
    fn test_validate_rejects_bad_metadata() {
        assert!(PoseSequence::new(vec![]).with_fps(0.0).validate().is_err());
        assert!(PoseSequence::new(vec![]).with_duration(f64::NAN).validate().is_err());
        assert!(PoseSequence::default().validate().is_ok());
    }

    #[test]
    fn test_deserialize_detector_output() {
        let json = r#"{
            "frames": [
                {"frame_index": 0, "timestamp": 0.0, "has_pose": false},
                {"frame_index": 6, "timestamp": 0.2, "has_pose": true,
                 "landmarks": {"right_wrist": {"x": 0.6, "y": 0.3, "z": -0.1, "visibility": 0.9}}}
            ],
            "fps": 5.0
        }"#;
        let seq: PoseSequence = serde_json::from_str(json).unwrap();
        assert_eq!(seq.len(), 2);
        assert!(seq.frames[0].landmarks.is_empty());
        assert_eq!(seq.frames[1].landmark(Landmark::RightWrist).unwrap().z, Some(-0.1));
    }
}
