//! Shared error types for the services crate.

use std::time::Duration;

use thiserror::Error;

use storage::sqlite::SqliteInitError;

/// Faults at the engine boundary. Errors raised by learner code are not
/// engine faults; the evaluation harness returns them as ordinary text.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EngineError {
    #[error("engine failed to start: {0}")]
    Init(String),
    #[error("engine is not ready")]
    NotReady,
    #[error("{0}")]
    Evaluation(String),
    #[error("evaluation timed out after {}s", .0.as_secs())]
    TimedOut(Duration),
    #[error("engine I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("engine stream closed")]
    Closed,
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Curriculum(#[from] lesson_core::Error),
}
