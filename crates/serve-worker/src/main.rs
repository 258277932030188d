//! Serve analysis worker binary.

use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use serve_worker::{metrics, BatchExecutor, WorkerConfig};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("serve_worker=info,serve_analysis=info"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    info!("Starting serve-worker");

    let config = WorkerConfig::from_env();
    info!("Worker config: {:?}", config);

    if let Some(port) = config.metrics_port {
        match metrics::init_metrics(port) {
            Ok(()) => info!("Prometheus metrics listening on port {}", port),
            Err(e) => {
                error!("{}", e);
                std::process::exit(1);
            }
        }
    }

    let executor = match BatchExecutor::new(config) {
        Ok(e) => e,
        Err(e) => {
            error!("Failed to create batch executor: {}", e);
            std::process::exit(1);
        }
    };

    let summary = tokio::select! {
        result = executor.run() => match result {
            Ok(summary) => summary,
            Err(e) => {
                error!("Batch error: {}", e);
                std::process::exit(1);
            }
        },
        _ = tokio::signal::ctrl_c() => {
            warn!("Received shutdown signal, abandoning batch");
            std::process::exit(130);
        }
    };

    for (path, message) in &summary.errors {
        warn!("{}: {}", path.display(), message);
    }
    info!(
        "Worker finished: {} processed, {} completed, {} failed, {} errors",
        summary.processed,
        summary.completed,
        summary.failed,
        summary.errors.len()
    );

    if !summary.is_clean() {
        std::process::exit(2);
    }
}
