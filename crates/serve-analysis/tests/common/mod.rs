//! Synthetic pose sequences shared by the integration tests.

#![allow(dead_code)]

use serve_models::{FramePose, Landmark, LandmarkSample, PoseSequence};

pub const FPS: f64 = 30.0;

pub fn p(x: f64, y: f64) -> LandmarkSample {
    LandmarkSample::new(x, y)
}

/// A sequence of `total` detected frames at 30 fps built from `pose(i)`.
pub fn sequence<F>(total: usize, pose: F) -> PoseSequence
where
    F: Fn(usize) -> Vec<(Landmark, LandmarkSample)>,
{
    PoseSequence::new(
        (0..total)
            .map(|i| FramePose::detected(i as u64, i as f64 / FPS, pose(i)))
            .collect(),
    )
    .with_fps(FPS)
}

/// Static lower body and torso shared by the full-body fixtures.
fn body() -> Vec<(Landmark, LandmarkSample)> {
    vec![
        (Landmark::Nose, p(0.5, 0.15)),
        (Landmark::LeftShoulder, p(0.45, 0.3)),
        (Landmark::RightShoulder, p(0.55, 0.32)),
        (Landmark::LeftHip, p(0.46, 0.55)),
        (Landmark::RightHip, p(0.54, 0.56)),
        (Landmark::LeftKnee, p(0.45, 0.72)),
        (Landmark::RightKnee, p(0.56, 0.72)),
        (Landmark::LeftAnkle, p(0.44, 0.9)),
        (Landmark::RightAnkle, p(0.57, 0.9)),
    ]
}

/// A right wrist sweeping right and up across the whole clip, every frame
/// detected.
pub fn swing(total: usize) -> PoseSequence {
    sequence(total, |i| {
        let t = i as f64 / total as f64;
        let mut pose = body();
        pose.push((Landmark::LeftWrist, p(0.4, 0.5 - 0.2 * (t * std::f64::consts::PI).sin())));
        pose.push((Landmark::RightElbow, p(0.55 + 0.1 * t, 0.4 - 0.1 * t)));
        pose.push((Landmark::RightWrist, p(0.5 + 0.3 * t, 0.6 - 0.4 * t)));
        pose
    })
}

/// Full-body serve with the tossing wrist peaking at `toss` and the hitting
/// wrist peaking at `contact`.
pub fn serve(total: usize, toss: usize, contact: usize) -> PoseSequence {
    sequence(total, |i| {
        let left_y = 0.2 + 0.005 * (i as f64 - toss as f64).abs();
        let right_y = 0.1 + 0.005 * (i as f64 - contact as f64).abs();
        let mut pose = body();
        pose.push((Landmark::LeftWrist, p(0.4 + 0.001 * i as f64, left_y)));
        pose.push((Landmark::LeftElbow, p(0.42, 0.4)));
        pose.push((Landmark::RightElbow, p(0.6, right_y + 0.15)));
        pose.push((Landmark::RightWrist, p(0.62 + 0.001 * i as f64, right_y)));
        pose
    })
}

/// Serve whose hitting wrist rises higher during the follow-through (at
/// `flourish`) than at the actual strike (at `contact`).
pub fn high_follow_through(total: usize, toss: usize, contact: usize, flourish: usize) -> PoseSequence {
    sequence(total, |i| {
        let left_y = 0.2 + 0.005 * (i as f64 - toss as f64).abs();
        let strike = 0.12 + 0.005 * (i as f64 - contact as f64).abs();
        let finish = 0.08 + 0.01 * (i as f64 - flourish as f64).abs();
        let mut pose = body();
        pose.push((Landmark::LeftWrist, p(0.4, left_y)));
        pose.push((Landmark::RightWrist, p(0.62, strike.min(finish))));
        pose
    })
}
