use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::category::ExamCategory;
use crate::model::ids::ExamId;
use crate::model::result::SubjectResult;
use crate::model::subject::SubjectPath;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExamError {
    #[error("exam name cannot be empty")]
    EmptyName,
}

/// Flat mapping from dotted subject path to that subject's result.
pub type ExamResults = BTreeMap<SubjectPath, SubjectResult>;

//
// ─── EXAM RECORD ───────────────────────────────────────────────────────────────
//

/// One saved practice-exam attempt.
///
/// Records are immutable once created; the only lifecycle event after
/// creation is whole-record deletion.
#[derive(Debug, Clone, PartialEq)]
pub struct ExamRecord {
    id: ExamId,
    date: DateTime<Utc>,
    name: String,
    category: ExamCategory,
    results: ExamResults,
}

impl ExamRecord {
    /// Creates a record.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::EmptyName` if the name is empty. Whitespace-only
    /// names are kept as entered.
    pub fn new(
        id: ExamId,
        date: DateTime<Utc>,
        name: impl Into<String>,
        category: ExamCategory,
        results: ExamResults,
    ) -> Result<Self, ExamError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ExamError::EmptyName);
        }
        Ok(Self {
            id,
            date,
            name,
            category,
            results,
        })
    }

    #[must_use]
    pub fn id(&self) -> ExamId {
        self.id
    }

    #[must_use]
    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn category(&self) -> ExamCategory {
        self.category
    }

    #[must_use]
    pub fn results(&self) -> &ExamResults {
        &self.results
    }

    #[must_use]
    pub fn result(&self, path: &SubjectPath) -> Option<&SubjectResult> {
        self.results.get(path)
    }
}
