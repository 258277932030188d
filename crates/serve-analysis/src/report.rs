//! Clip metadata and per-phase summaries attached to every result.

use std::collections::BTreeMap;

use serve_models::{
    Category, PhaseName, PhaseReport, PoseSequence, ServePhase, TechnicalAnalysis, VideoMetadata,
    MAX_SCORE,
};

/// Deterministic identifier built from the first frame timestamp.
pub fn analysis_id(sequence: &PoseSequence) -> String {
    let first = sequence.frames.first().map_or(0.0, |f| f.timestamp);
    format!("analysis_{}", (first * 1000.0).round() as i64)
}

/// Frame rate used to convert frame counts into seconds.
///
/// The caller's value wins, then the rate implied by the timestamps, then
/// `default_fps`.
pub fn effective_fps(sequence: &PoseSequence, default_fps: f64) -> f64 {
    if let Some(fps) = sequence.fps.filter(|f| f.is_finite() && *f > 0.0) {
        return fps;
    }
    match (sequence.frames.first(), sequence.frames.last()) {
        (Some(first), Some(last)) if sequence.len() > 1 => {
            let span = last.timestamp - first.timestamp;
            if span > 0.0 {
                (sequence.len() - 1) as f64 / span
            } else {
                default_fps
            }
        }
        _ => default_fps,
    }
}

pub fn video_metadata(sequence: &PoseSequence, fps: f64) -> VideoMetadata {
    let total_frames = sequence.len();
    let detected_frames = sequence.detected_frames();
    let span = match (sequence.frames.first(), sequence.frames.last()) {
        (Some(first), Some(last)) => last.timestamp - first.timestamp,
        _ => 0.0,
    };
    let duration = match sequence.duration {
        Some(duration) => duration,
        None if span > 0.0 => span,
        None if fps > 0.0 => total_frames as f64 / fps,
        None => 0.0,
    };

    VideoMetadata {
        total_frames,
        detected_frames,
        detection_rate: if total_frames == 0 {
            0.0
        } else {
            detected_frames as f64 / total_frames as f64
        },
        fps,
        duration,
    }
}

/// Per-phase detection coverage and the issues of the phase's categories.
pub fn phase_reports(
    sequence: &PoseSequence,
    phases: &[ServePhase],
    analysis: &TechnicalAnalysis,
) -> BTreeMap<PhaseName, PhaseReport> {
    phases
        .iter()
        .map(|phase| {
            let frames = sequence.frames.get(phase.range()).unwrap_or_default();
            let pose_detected = frames.iter().filter(|f| f.has_pose).count();
            let frame_count = phase.frame_count();
            let score = if frame_count == 0 {
                0.0
            } else {
                pose_detected as f64 / frame_count as f64 * MAX_SCORE
            };
            let issues = Category::for_phase(phase.name)
                .iter()
                .flat_map(|c| analysis.get(*c).issues.iter().cloned())
                .collect();
            (
                phase.name,
                PhaseReport {
                    score,
                    issues,
                    frame_count,
                    pose_detected,
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serve_models::{FramePose, Landmark, LandmarkSample};

    fn frames(n: usize, dt: f64) -> Vec<FramePose> {
        (0..n)
            .map(|i| {
                let t = 1.5 + i as f64 * dt;
                if i % 4 == 3 {
                    FramePose::empty(i as u64, t)
                } else {
                    FramePose::detected(i as u64, t, [(Landmark::Nose, LandmarkSample::new(0.5, 0.1))])
                }
            })
            .collect()
    }

    #[test]
    fn test_analysis_id_uses_first_timestamp() {
        let seq = PoseSequence::new(frames(3, 0.1));
        assert_eq!(analysis_id(&seq), "analysis_1500");
        assert_eq!(analysis_id(&PoseSequence::default()), "analysis_0");
    }

    #[test]
    fn test_fps_resolution_order() {
        let seq = PoseSequence::new(frames(11, 0.04));
        assert!((effective_fps(&seq, 30.0) - 25.0).abs() < 1e-9);
        assert_eq!(effective_fps(&seq.clone().with_fps(60.0), 30.0), 60.0);

        let frozen = PoseSequence::new(frames(5, 0.0));
        assert_eq!(effective_fps(&frozen, 30.0), 30.0);
        assert_eq!(effective_fps(&PoseSequence::default(), 30.0), 30.0);
    }

    #[test]
    fn test_video_metadata() {
        let seq = PoseSequence::new(frames(8, 0.5));
        let meta = video_metadata(&seq, 2.0);
        assert_eq!(meta.total_frames, 8);
        assert_eq!(meta.detected_frames, 6);
        assert_eq!(meta.detection_rate, 0.75);
        assert!((meta.duration - 3.5).abs() < 1e-9);

        let frozen = PoseSequence::new(frames(6, 0.0));
        assert_eq!(video_metadata(&frozen, 30.0).duration, 0.2);
        assert_eq!(video_metadata(&frozen.with_duration(4.0), 30.0).duration, 4.0);
    }
}
