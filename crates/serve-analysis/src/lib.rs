//! Tennis serve analysis engine.
//!
//! Turns a [`PoseSequence`](serve_models::PoseSequence) of per-frame body
//! landmarks into a [`ServeAnalysis`](serve_models::ServeAnalysis):
//!
//! 1. per-landmark trajectories with explicit holes ([`trajectory`])
//! 2. six serve phases anchored on the wrist extrema, or a fixed-ratio split
//!    when the signal is unusable ([`segmenter`])
//! 3. six category scores, each built from banded measurements ([`scoring`])
//! 4. a weighted overall score and skill tier ([`aggregator`])
//!
//! Every threshold lives in [`config`]. The engine performs no I/O and keeps
//! no state between analyses.
//!
//! ```no_run
//! use serve_analysis::ServeAnalyzer;
//! use serve_models::PoseSequence;
//!
//! let sequence: PoseSequence = serde_json::from_str("{\"frames\": []}").unwrap();
//! let result = ServeAnalyzer::default().analyze(&sequence);
//! println!("{}", result.overall_score);
//! ```

pub mod aggregator;
pub mod bands;
pub mod config;
pub mod error;
pub mod geometry;
pub mod metrics;
pub mod pipeline;
pub mod report;
pub mod scoring;
pub mod segmenter;
pub mod stats;
pub mod trajectory;

pub use aggregator::{Aggregate, Aggregator};
pub use bands::{Band, BandOutcome, BandTable, Deviation, Step};
pub use config::{ScoringConfig, SegmenterConfig};
pub use error::{AnalysisError, AnalysisResult};
pub use pipeline::ServeAnalyzer;
pub use scoring::{BandedMetric, CategoryScorer, MetricScore, MotionContext};
pub use segmenter::{Anchors, PhaseSegmenter, Segmentation};
pub use trajectory::{Trajectory, TrajectorySet};
