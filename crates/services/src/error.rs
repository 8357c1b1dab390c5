//! Shared error types for the services crate.

use thiserror::Error;

use exam_core::model::{ExamError, ExamId};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `ExamStore`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExamStoreError {
    #[error("exam {0} already exists")]
    DuplicateId(ExamId),
    #[error("exam {0} not found")]
    NotFound(ExamId),
    #[error(transparent)]
    Exam(#[from] ExamError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error("invalid database url: {0}")]
    InvalidDbUrl(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Store(#[from] ExamStoreError),
}
