//! Per-landmark trajectories.
//!
//! A [`Trajectory`] is aligned 1:1 with the [`PoseSequence`] it was taken
//! from. Frames without a pose, or without the landmark, are kept as holes
//! (`None`); nothing is interpolated.

use std::ops::Range;

use serve_models::{Landmark, LandmarkSample, PoseSequence};

/// Positions of one landmark over the whole clip.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    landmark: Landmark,
    points: Vec<Option<LandmarkSample>>,
}

impl Trajectory {
    /// Pull `landmark` out of every frame of `sequence`.
    pub fn extract(sequence: &PoseSequence, landmark: Landmark) -> Self {
        let points = sequence
            .frames
            .iter()
            .map(|frame| frame.landmark(landmark).copied())
            .collect();
        Self { landmark, points }
    }

    pub fn landmark(&self) -> Landmark {
        self.landmark
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Option<LandmarkSample>] {
        &self.points
    }

    pub fn get(&self, position: usize) -> Option<&LandmarkSample> {
        self.points.get(position).and_then(Option::as_ref)
    }

    /// Number of positions holding a sample.
    pub fn valid_count(&self) -> usize {
        self.points.iter().filter(|p| p.is_some()).count()
    }

    /// True when the landmark was never observed.
    pub fn is_all_holes(&self) -> bool {
        self.points.iter().all(Option::is_none)
    }

    /// Points inside `range`, clamped to the trajectory length.
    pub fn window(&self, range: Range<usize>) -> &[Option<LandmarkSample>] {
        let end = range.end.min(self.points.len());
        let start = range.start.min(end);
        &self.points[start..end]
    }

    /// Present samples inside `range` with their sequence positions.
    pub fn samples_in(&self, range: Range<usize>) -> impl Iterator<Item = (usize, &LandmarkSample)> {
        let offset = range.start.min(self.points.len());
        self.window(range)
            .iter()
            .enumerate()
            .filter_map(move |(i, p)| p.as_ref().map(|s| (offset + i, s)))
    }

    /// Vertical coordinate per position.
    pub fn ys(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        self.points.iter().map(|p| p.map(|s| s.y))
    }

    /// Sequence position and `y` of the highest on-screen point (smallest `y`).
    ///
    /// Ties resolve to the earliest position.
    pub fn highest_point(&self) -> Option<(usize, f64)> {
        crate::stats::argmin(self.ys())
    }
}

/// Trajectories of every tracked landmark for one clip.
#[derive(Debug, Clone)]
pub struct TrajectorySet {
    frames: usize,
    trajectories: Vec<Trajectory>,
}

impl TrajectorySet {
    pub fn extract(sequence: &PoseSequence) -> Self {
        Self {
            frames: sequence.len(),
            trajectories: Landmark::ALL
                .iter()
                .map(|landmark| Trajectory::extract(sequence, *landmark))
                .collect(),
        }
    }

    /// Trajectory of a landmark.
    pub fn get(&self, landmark: Landmark) -> &Trajectory {
        // `Landmark::ALL` lists variants in declaration order.
        &self.trajectories[landmark as usize]
    }

    /// Number of frames every trajectory spans.
    pub fn frames(&self) -> usize {
        self.frames
    }
}
