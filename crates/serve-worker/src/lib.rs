//! Serve analysis batch worker.
//!
//! This crate provides:
//! - Environment-driven worker configuration
//! - A bounded concurrent executor over a directory of pose sequences
//! - Structured per-file logging
//! - Prometheus exporter setup

pub mod config;
pub mod error;
pub mod executor;
pub mod logging;
pub mod metrics;

pub use config::WorkerConfig;
pub use error::{WorkerError, WorkerResult};
pub use executor::{BatchExecutor, BatchSummary};
pub use logging::AnalysisLogger;
