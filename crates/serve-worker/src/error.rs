//! Worker error types.

use std::path::PathBuf;
use std::time::Duration;

use serve_analysis::AnalysisError;
use thiserror::Error;

pub type WorkerResult<T> = Result<T, WorkerError>;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Job failed: {0}")]
    JobFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Analysis of {path} timed out after {timeout:?}")]
    Timeout { path: PathBuf, timeout: Duration },

    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WorkerError {
    pub fn job_failed(msg: impl Into<String>) -> Self {
        Self::JobFailed(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Check if the error came from the input document rather than the worker.
    pub fn is_bad_input(&self) -> bool {
        matches!(self, WorkerError::Json(_))
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, WorkerError::Timeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        let json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(WorkerError::from(json).is_bad_input());

        let timeout = WorkerError::Timeout {
            path: PathBuf::from("a.json"),
            timeout: Duration::from_secs(1),
        };
        assert!(timeout.is_timeout());
        assert!(timeout.to_string().contains("a.json"));

        assert!(!WorkerError::job_failed("boom").is_timeout());
    }

    #[test]
    fn test_analysis_error_converts() {
        let err: WorkerError = AnalysisError::EmptyInput.into();
        assert!(matches!(err, WorkerError::Analysis(AnalysisError::EmptyInput)));
    }
}
