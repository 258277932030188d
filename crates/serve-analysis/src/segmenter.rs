//! Serve phase segmentation.
//!
//! The segmenter looks for two anchors in the wrist trajectories:
//!
//! - **toss apex**: highest on-screen point of the left (tossing) wrist
//! - **contact**: highest on-screen point of the right (hitting) wrist
//!
//! Phase boundaries sit at fixed offsets from these anchors. When either wrist
//! has too few samples, or the offsets do not produce six ordered phases, the
//! clip is split by fixed ratios instead. Segmentation never fails.
//!
//! The contact anchor is a plain height extremum. On serves whose follow-through
//! carries the hitting wrist above the contact point, the anchor lands in the
//! follow-through.

use tracing::{debug, warn};

use serve_models::{Landmark, PhaseName, SegmentationMethod, ServePhase};

use crate::config::SegmenterConfig;
use crate::trajectory::TrajectorySet;

/// Anchor positions found in the wrist trajectories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchors {
    pub toss_apex: usize,
    pub contact: usize,
}

/// Output of [`PhaseSegmenter::segment`].
#[derive(Debug, Clone, PartialEq)]
pub struct Segmentation {
    /// Six phases in temporal order covering `[0, total_frames)`
    pub phases: Vec<ServePhase>,
    pub method: SegmentationMethod,
    /// Anchors, even when they were rejected in favor of the fallback
    pub anchors: Option<Anchors>,
}

impl Segmentation {
    pub fn phase(&self, name: PhaseName) -> Option<&ServePhase> {
        self.phases.iter().find(|p| p.name == name)
    }
}

/// Splits a clip into the six serve phases.
#[derive(Debug, Clone, Default)]
pub struct PhaseSegmenter {
    config: SegmenterConfig,
}

impl PhaseSegmenter {
    pub fn new(config: SegmenterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SegmenterConfig {
        &self.config
    }

    /// Segment a clip whose trajectories span `trajectories.frames()` positions.
    pub fn segment(&self, trajectories: &TrajectorySet, fps: f64) -> Segmentation {
        let total = trajectories.frames();
        let left = trajectories.get(Landmark::LeftWrist);
        let right = trajectories.get(Landmark::RightWrist);

        let gate = self.config.min_valid_samples;
        if left.valid_count() < gate || right.valid_count() < gate {
            warn!(
                left_valid = left.valid_count(),
                right_valid = right.valid_count(),
                required = gate,
                "Wrist signal too sparse, using proportional phases"
            );
            return self.proportional(total, fps, None);
        }

        let anchors = match (left.highest_point(), right.highest_point()) {
            (Some((toss_apex, _)), Some((contact, _))) => Anchors { toss_apex, contact },
            _ => return self.proportional(total, fps, None),
        };
        debug!(
            toss_apex = anchors.toss_apex,
            contact = anchors.contact,
            "Located wrist anchors"
        );

        match self.anchored_boundaries(anchors, total) {
            Some(boundaries) => Segmentation {
                phases: build_phases(&boundaries, total, fps, true),
                method: SegmentationMethod::Anchored,
                anchors: Some(anchors),
            },
            None => {
                warn!(
                    toss_apex = anchors.toss_apex,
                    contact = anchors.contact,
                    total_frames = total,
                    "Anchors do not yield ordered phases, using proportional phases"
                );
                self.proportional(total, fps, Some(anchors))
            }
        }
    }

    /// Inner boundaries derived from the anchors, if they are strictly
    /// increasing and inside `(0, total)`.
    fn anchored_boundaries(&self, anchors: Anchors, total: usize) -> Option<[usize; 5]> {
        let c = &self.config;
        let boundaries = [
            anchors.toss_apex.saturating_sub(c.preparation_lead).max(1),
            anchors.toss_apex + c.toss_trail,
            anchors.contact.checked_sub(c.trophy_lead)?,
            anchors.contact + c.acceleration_trail,
            anchors.contact + c.contact_trail,
        ];

        let ordered = boundaries.windows(2).all(|w| w[0] < w[1]);
        let inside = boundaries[0] > 0 && boundaries[4] < total;
        (ordered && inside).then_some(boundaries)
    }

    /// Split `total` frames by the configured ratios. The last phase takes the
    /// rounding remainder.
    fn proportional(&self, total: usize, fps: f64, anchors: Option<Anchors>) -> Segmentation {
        Segmentation {
            phases: proportional_phases(&self.config, total, fps),
            method: SegmentationMethod::Proportional,
            anchors,
        }
    }
}

/// Fixed-ratio partition of `[0, total)` into the six phases.
pub fn proportional_phases(config: &SegmenterConfig, total: usize, fps: f64) -> Vec<ServePhase> {
    let ratios = &config.fallback_ratios;
    let mut boundaries = [0usize; 5];
    let mut cursor = 0usize;
    for (slot, phase) in boundaries.iter_mut().zip(PhaseName::ALL) {
        // Guard against 0.2 * 5 landing just under 1.0.
        let len = (total as f64 * ratios.get(phase) + 1e-9).floor() as usize;
        cursor = (cursor + len).min(total);
        *slot = cursor;
    }
    build_phases(&boundaries, total, fps, false)
}

fn build_phases(boundaries: &[usize; 5], total: usize, fps: f64, key_events: bool) -> Vec<ServePhase> {
    let starts = std::iter::once(0).chain(boundaries.iter().copied());
    let ends = boundaries.iter().copied().chain(std::iter::once(total));
    PhaseName::ALL
        .into_iter()
        .zip(starts.zip(ends))
        .map(|(name, (start, end))| {
            let phase = ServePhase::new(name, start, end, fps);
            if key_events {
                phase.with_key_events()
            } else {
                phase
            }
        })
        .collect()
}
