//! Worker configuration.

use std::path::PathBuf;
use std::time::Duration;

use serve_analysis::{ScoringConfig, SegmenterConfig, ServeAnalyzer};

use crate::error::WorkerResult;

/// Worker configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Directory scanned for pose sequence JSON files
    pub input_dir: PathBuf,
    /// Directory receiving `<name>.analysis.json` results
    pub output_dir: PathBuf,
    /// Maximum analyses running at once
    pub max_parallel: usize,
    /// Per-file analysis timeout
    pub job_timeout: Duration,
    /// Optional scoring threshold overrides
    pub scoring_config: Option<PathBuf>,
    /// Frame rate assumed when a sequence carries no timing
    pub default_fps: f64,
    /// Port for the Prometheus exporter; disabled when unset
    pub metrics_port: Option<u16>,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("./poses"),
            output_dir: PathBuf::from("./analyses"),
            max_parallel: 4,
            job_timeout: Duration::from_secs(60),
            scoring_config: None,
            default_fps: 30.0,
            metrics_port: None,
        }
    }
}

impl WorkerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            input_dir: std::env::var("SERVE_INPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.input_dir),
            output_dir: std::env::var("SERVE_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            max_parallel: std::env::var("SERVE_MAX_PARALLEL")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|n: &usize| *n > 0)
                .unwrap_or(defaults.max_parallel),
            job_timeout: Duration::from_secs(
                std::env::var("SERVE_JOB_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(60),
            ),
            scoring_config: std::env::var("SERVE_SCORING_CONFIG")
                .ok()
                .filter(|s| !s.is_empty())
                .map(PathBuf::from),
            default_fps: std::env::var("SERVE_DEFAULT_FPS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|f: &f64| f.is_finite() && *f > 0.0)
                .unwrap_or(defaults.default_fps),
            metrics_port: std::env::var("METRICS_PORT")
                .ok()
                .and_then(|s| s.parse().ok()),
        }
    }

    /// Build the analyzer described by this configuration.
    pub fn analyzer(&self) -> WorkerResult<ServeAnalyzer> {
        let scoring = match &self.scoring_config {
            Some(path) => ScoringConfig::from_json_file(path)?,
            None => ScoringConfig::default(),
        };
        let segmenter = SegmenterConfig {
            default_fps: self.default_fps,
            ..SegmenterConfig::default()
        };
        Ok(ServeAnalyzer::new(segmenter, scoring)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = WorkerConfig::default();
        assert_eq!(config.max_parallel, 4);
        assert_eq!(config.job_timeout, Duration::from_secs(60));
        assert!(config.metrics_port.is_none());
        assert!(config.analyzer().is_ok());
    }

    #[test]
    fn test_analyzer_loads_scoring_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"min_phase_samples": 2}}"#).unwrap();
        let config = WorkerConfig {
            scoring_config: Some(file.path().to_path_buf()),
            ..WorkerConfig::default()
        };
        assert!(config.analyzer().is_ok());
    }

    #[test]
    fn test_analyzer_rejects_bad_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"min_phase_samples": 0}}"#).unwrap();
        let config = WorkerConfig {
            scoring_config: Some(file.path().to_path_buf()),
            ..WorkerConfig::default()
        };
        assert!(config.analyzer().is_err());

        let missing = WorkerConfig {
            scoring_config: Some(PathBuf::from("/nonexistent/scoring.json")),
            ..WorkerConfig::default()
        };
        assert!(missing.analyzer().is_err());
    }
}
