use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::model::category::ExamCategory;
use crate::model::exam::{ExamError, ExamRecord, ExamResults};
use crate::model::ids::ExamId;
use crate::model::result::SubjectResult;
use crate::model::subject::SubjectPath;
use crate::scoring;
use crate::taxonomy::Taxonomy;

/// Raw text typed into the correct/wrong fields for one subject.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEntry {
    pub correct: String,
    pub wrong: String,
}

impl RawEntry {
    #[must_use]
    pub fn new(correct: impl Into<String>, wrong: impl Into<String>) -> Self {
        Self {
            correct: correct.into(),
            wrong: wrong.into(),
        }
    }

    /// Coerces both fields with the scoring rules (junk and negatives become 0).
    #[must_use]
    pub fn to_result(&self) -> SubjectResult {
        SubjectResult::counts(
            scoring::parse_count(&self.correct),
            scoring::parse_count(&self.wrong),
        )
    }
}

/// Unvalidated state of the new-exam form.
///
/// Only subjects the user touched have entries; untouched subjects are
/// simply absent from the saved record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamDraft {
    name: String,
    category: ExamCategory,
    entries: BTreeMap<SubjectPath, RawEntry>,
}

impl ExamDraft {
    #[must_use]
    pub fn new(category: ExamCategory) -> Self {
        Self {
            name: String::new(),
            category,
            entries: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_correct(&mut self, path: SubjectPath, raw: impl Into<String>) {
        self.entries.entry(path).or_default().correct = raw.into();
    }

    pub fn set_wrong(&mut self, path: SubjectPath, raw: impl Into<String>) {
        self.entries.entry(path).or_default().wrong = raw.into();
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
    pub fn entry(&self, path: &SubjectPath) -> Option<&RawEntry> {
        self.entries.get(path)
    }

    /// Live net for one subject while the form is being filled in.
    #[must_use]
    pub fn live_net(&self, path: &SubjectPath) -> f64 {
        self.entries
            .get(path)
            .map_or(0.0, |entry| scoring::net_score_raw(&entry.correct, &entry.wrong))
    }

    /// Questions left blank for a leaf, or `None` if the path is not a leaf
    /// of this draft's category.
    #[must_use]
    pub fn blank(&self, path: &SubjectPath, taxonomy: &Taxonomy) -> Option<i64> {
        let question_count = taxonomy.question_count(self.category, path)?;
        let result = self
            .entries
            .get(path)
            .map(RawEntry::to_result)
            .unwrap_or_default();
        result.blank(question_count)
    }

    /// Turns the draft into a record.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::EmptyName` if no name was entered.
    pub fn into_record(self, id: ExamId, date: DateTime<Utc>) -> Result<ExamRecord, ExamError> {
        let results: ExamResults = self
            .entries
            .iter()
            .map(|(path, entry)| (path.clone(), entry.to_result()))
            .collect();
        ExamRecord::new(id, date, self.name, self.category, results)
    }
}
