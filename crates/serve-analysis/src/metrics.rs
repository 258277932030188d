//! Analysis metrics.
//!
//! Recorded through the `metrics` facade; nothing is exported unless the
//! host process installs a recorder.

use metrics::{counter, histogram};
use serve_models::SegmentationMethod;

// =============================================================================
// Metric Names
// =============================================================================

/// Metric name constants for consistency.
pub mod names {
    /// Total analyses by status.
    pub const ANALYSES_TOTAL: &str = "serve_analyses_total";

    /// Segmentations by method (anchored or proportional).
    pub const SEGMENTATION_TOTAL: &str = "serve_segmentation_total";

    /// Category scores computed from insufficient data, by category.
    pub const INSUFFICIENT_DATA_TOTAL: &str = "serve_insufficient_data_total";

    /// Distribution of overall scores.
    pub const OVERALL_SCORE: &str = "serve_overall_score";

    /// Wall-clock analysis time in seconds.
    pub const DURATION_SECONDS: &str = "serve_analysis_duration_seconds";
}

// =============================================================================
// Recording Functions
// =============================================================================

/// Record a finished analysis.
pub fn record_analysis(status: &str, duration_secs: f64) {
    counter!(names::ANALYSES_TOTAL, "status" => status.to_string()).increment(1);
    histogram!(names::DURATION_SECONDS, "status" => status.to_string()).record(duration_secs);
}

pub fn record_segmentation(method: SegmentationMethod) {
    let method = match method {
        SegmentationMethod::Anchored => "anchored",
        SegmentationMethod::Proportional => "proportional",
    };
    counter!(names::SEGMENTATION_TOTAL, "method" => method).increment(1);
}

pub fn record_insufficient_data(category: &str) {
    counter!(names::INSUFFICIENT_DATA_TOTAL, "category" => category.to_string()).increment(1);
}

pub fn record_overall_score(score: f64) {
    histogram!(names::OVERALL_SCORE).record(score);
}

// =============================================================================
// Tests
// =============================================================================
