//! Batch executor: analyzes every pose sequence in the input directory.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Semaphore;
use tracing::{debug, info, Instrument};

use serve_analysis::ServeAnalyzer;
use serve_models::{AnalysisStatus, PoseSequence};

use crate::config::WorkerConfig;
use crate::error::{WorkerError, WorkerResult};
use crate::logging::AnalysisLogger;
use crate::metrics;

/// Suffix of the result documents written by the worker.
pub const OUTPUT_SUFFIX: &str = ".analysis.json";

/// Outcome counts for one batch run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchSummary {
    /// Input files picked up
    pub processed: usize,
    /// Results written with `completed` status
    pub completed: usize,
    /// Results written with `failed` status
    pub failed: usize,
    /// Files for which no result could be written, in input order
    pub errors: Vec<(PathBuf, String)>,
}

impl BatchSummary {
    fn record(&mut self, path: PathBuf, result: WorkerResult<AnalysisStatus>) {
        self.processed += 1;
        match result {
            Ok(AnalysisStatus::Completed) => self.completed += 1,
            Ok(AnalysisStatus::Failed) => self.failed += 1,
            Err(e) => self.errors.push((path, e.to_string())),
        }
    }

    /// True when every input produced a completed analysis.
    pub fn is_clean(&self) -> bool {
        self.failed == 0 && self.errors.is_empty()
    }
}

/// Runs analyses concurrently, bounded by `max_parallel`.
pub struct BatchExecutor {
    config: WorkerConfig,
    analyzer: Arc<ServeAnalyzer>,
    semaphore: Arc<Semaphore>,
}

impl BatchExecutor {
    /// Create an executor, loading scoring overrides from the config.
    pub fn new(config: WorkerConfig) -> WorkerResult<Self> {
        let analyzer = config.analyzer()?;
        Ok(Self::with_analyzer(config, analyzer))
    }

    pub fn with_analyzer(config: WorkerConfig, analyzer: ServeAnalyzer) -> Self {
        let semaphore = Arc::new(Semaphore::new(config.max_parallel.max(1)));
        Self {
            config,
            analyzer: Arc::new(analyzer),
            semaphore,
        }
    }

    /// Analyze every input document once and write the results.
    pub async fn run(&self) -> WorkerResult<BatchSummary> {
        tokio::fs::create_dir_all(&self.config.output_dir).await?;

        let inputs = discover_inputs(&self.config.input_dir).await?;
        metrics::record_batch_size(inputs.len());
        info!(
            "Found {} pose sequences in {}",
            inputs.len(),
            self.config.input_dir.display()
        );

        let mut handles = Vec::with_capacity(inputs.len());
        for path in inputs {
            let permit = self
                .semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|_| WorkerError::job_failed("Semaphore closed"))?;
            let analyzer = Arc::clone(&self.analyzer);
            let output_dir = self.config.output_dir.clone();
            let timeout = self.config.job_timeout;

            handles.push(tokio::spawn(async move {
                let _permit = permit;
                let result = process_file(analyzer, &path, &output_dir, timeout).await;
                (path, result)
            }));
        }

        let mut summary = BatchSummary::default();
        for handle in handles {
            let (path, result) = handle
                .await
                .map_err(|e| WorkerError::job_failed(format!("Analysis task aborted: {e}")))?;
            summary.record(path, result);
        }

        info!(
            processed = summary.processed,
            completed = summary.completed,
            failed = summary.failed,
            errors = summary.errors.len(),
            "Batch finished"
        );
        Ok(summary)
    }
}

/// List `*.json` inputs in name order, skipping previously written results.
pub async fn discover_inputs(dir: &Path) -> WorkerResult<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut inputs = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if !entry.file_type().await?.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name.ends_with(".json") && !name.ends_with(OUTPUT_SUFFIX) {
            inputs.push(path);
        }
    }
    inputs.sort();
    Ok(inputs)
}

/// Result path for an input document: `<output_dir>/<stem>.analysis.json`.
pub fn output_path(output_dir: &Path, input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "sequence".to_string());
    output_dir.join(format!("{stem}{OUTPUT_SUFFIX}"))
}

async fn process_file(
    analyzer: Arc<ServeAnalyzer>,
    path: &Path,
    output_dir: &Path,
    timeout: Duration,
) -> WorkerResult<AnalysisStatus> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let logger = AnalysisLogger::new(name, "analyze");
    let span = logger.create_span();

    let start = Instant::now();
    metrics::file_started();
    let result = analyze_file(&logger, analyzer, path, output_dir, timeout)
        .instrument(span)
        .await;
    metrics::file_finished();

    let outcome = match &result {
        Ok(AnalysisStatus::Completed) => "completed",
        Ok(AnalysisStatus::Failed) => "failed",
        Err(e) if e.is_timeout() => "timeout",
        Err(e) if e.is_bad_input() => "invalid",
        Err(_) => "error",
    };
    metrics::record_file(outcome, start.elapsed().as_secs_f64());

    match &result {
        Err(e) if e.is_bad_input() => {
            logger.log_warning(&format!("Skipping unreadable pose document: {e}"))
        }
        Err(e) => logger.log_error(&e.to_string()),
        Ok(_) => {}
    }
    result
}

async fn analyze_file(
    logger: &AnalysisLogger,
    analyzer: Arc<ServeAnalyzer>,
    path: &Path,
    output_dir: &Path,
    timeout: Duration,
) -> WorkerResult<AnalysisStatus> {
    let raw = tokio::fs::read(path).await?;
    let sequence: PoseSequence = serde_json::from_slice(&raw)?;
    logger.log_start(&format!("{} frames", sequence.len()));

    // On timeout the blocking task runs to completion and its result is dropped.
    let task = tokio::task::spawn_blocking(move || analyzer.analyze(&sequence));
    let analysis = match tokio::time::timeout(timeout, task).await {
        Ok(joined) => joined
            .map_err(|e| WorkerError::job_failed(format!("Analysis task failed: {e}")))?,
        Err(_) => {
            return Err(WorkerError::Timeout {
                path: path.to_path_buf(),
                timeout,
            })
        }
    };

    if let Some(message) = &analysis.message {
        logger.log_warning(message);
    }

    let target = output_path(output_dir, path);
    logger.log_progress(&format!("writing {}", target.display()));
    let body = serde_json::to_vec_pretty(&analysis)?;
    tokio::fs::write(&target, body).await?;
    debug!("Wrote {}", target.display());

    logger.log_completion(&format!(
        "status={:?} overall_score={:.2} tier={}",
        analysis.status,
        analysis.overall_score,
        analysis.skill_tier.map(|t| t.as_str()).unwrap_or("none"),
    ));
    Ok(analysis.status)
}
