//! Structured per-file logging utilities.
//!
//! Every event carries the input file and the stage of the batch run so
//! JSON logs can be filtered per document.

use tracing::{error, info, warn, Span};

/// Logger bound to one input document.
#[derive(Debug, Clone)]
pub struct AnalysisLogger {
    input: String,
    stage: String,
}

impl AnalysisLogger {
    /// Create a logger for an input document and stage (e.g. "analyze", "write").
    pub fn new(input: impl Into<String>, stage: &str) -> Self {
        Self {
            input: input.into(),
            stage: stage.to_string(),
        }
    }

    pub fn log_start(&self, message: &str) {
        info!(
            input = %self.input,
            stage = %self.stage,
            "Analysis started: {}", message
        );
    }

    pub fn log_progress(&self, message: &str) {
        info!(
            input = %self.input,
            stage = %self.stage,
            "Analysis progress: {}", message
        );
    }

    pub fn log_warning(&self, message: &str) {
        warn!(
            input = %self.input,
            stage = %self.stage,
            "Analysis warning: {}", message
        );
    }

    pub fn log_error(&self, message: &str) {
        error!(
            input = %self.input,
            stage = %self.stage,
            "Analysis error: {}", message
        );
    }

    pub fn log_completion(&self, message: &str) {
        info!(
            input = %self.input,
            stage = %self.stage,
            "Analysis completed: {}", message
        );
    }

    /// Create a tracing span for this document.
    pub fn create_span(&self) -> Span {
        tracing::info_span!("document", input = %self.input, stage = %self.stage)
    }
}
