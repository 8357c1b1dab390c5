use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use exam_core::model::{ExamDraft, ExamId, ExamRecord};
use storage::repository::{ExamRepository, StorageError};

use crate::Clock;
use crate::error::ExamStoreError;

/// Whether the last mutation reached persistent storage.
///
/// The in-memory collection is already updated either way; `Unsaved` means
/// the change will be lost on restart unless a later save succeeds.
#[must_use = "a failed save leaves the change in memory only"]
#[derive(Debug)]
pub enum SaveStatus {
    Saved,
    Unsaved(StorageError),
}

impl SaveStatus {
    #[must_use]
    pub fn is_saved(&self) -> bool {
        matches!(self, SaveStatus::Saved)
    }

    #[must_use]
    pub fn warning(&self) -> Option<&StorageError> {
        match self {
            SaveStatus::Saved => None,
            SaveStatus::Unsaved(err) => Some(err),
        }
    }
}

/// The single owner of the exam collection.
///
/// Holds records most-recent-first in insertion order and writes the whole
/// collection through the repository after every mutation.
pub struct ExamStore {
    clock: Clock,
    exams: Arc<dyn ExamRepository>,
    records: Vec<ExamRecord>,
}

impl ExamStore {
    /// Load the saved collection.
    ///
    /// # Errors
    ///
    /// Returns `ExamStoreError::Storage` if the backend cannot be read.
    /// Unparseable saved state is not an error; it loads as empty.
    pub async fn load(clock: Clock, exams: Arc<dyn ExamRepository>) -> Result<Self, ExamStoreError> {
        let records = exams.load_exams().await?;
        Ok(Self {
            clock,
            exams,
            records,
        })
    }

    /// An empty store that has not read anything from `exams`.
    #[must_use]
    pub fn empty(clock: Clock, exams: Arc<dyn ExamRepository>) -> Self {
        Self {
            clock,
            exams,
            records: Vec::new(),
        }
    }

    /// Current snapshot, most recently added first.
    #[must_use]
    pub fn records(&self) -> &[ExamRecord] {
        &self.records
    }

    #[must_use]
    pub fn get(&self, id: ExamId) -> Option<&ExamRecord> {
        self.records.iter().find(|record| record.id() == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Add a fully formed record to the front of the collection and save.
    ///
    /// # Errors
    ///
    /// Returns `ExamStoreError::DuplicateId` if a record with the same id
    /// exists; nothing is changed in that case.
    pub async fn append(&mut self, record: ExamRecord) -> Result<SaveStatus, ExamStoreError> {
        if self.get(record.id()).is_some() {
            return Err(ExamStoreError::DuplicateId(record.id()));
        }
        info!(exam_id = %record.id(), category = %record.category(), "adding exam");
        self.records.insert(0, record);
        Ok(self.persist().await)
    }

    /// Turn a submitted form into a record stamped with the clock's time and
    /// a fresh id, then append it.
    ///
    /// # Errors
    ///
    /// Returns `ExamStoreError::Exam` if the draft fails validation.
    pub async fn record_draft(
        &mut self,
        draft: ExamDraft,
    ) -> Result<(ExamId, SaveStatus), ExamStoreError> {
        let now = self.clock.now();
        let id = self.next_id(now);
        let record = draft.into_record(id, now)?;
        let status = self.append(record).await?;
        Ok((id, status))
    }

    /// Permanently remove every record with this id and save.
    ///
    /// A loaded collection may hold duplicate ids; all of them go.
    ///
    /// # Errors
    ///
    /// Returns `ExamStoreError::NotFound` if no record has this id; nothing
    /// is saved in that case.
    pub async fn delete(&mut self, id: ExamId) -> Result<SaveStatus, ExamStoreError> {
        let before = self.records.len();
        self.records.retain(|record| record.id() != id);
        let removed = before - self.records.len();
        if removed == 0 {
            return Err(ExamStoreError::NotFound(id));
        }
        info!(exam_id = %id, removed, "deleted exam");
        Ok(self.persist().await)
    }

    /// Timestamp-derived id, bumped past every existing id so two saves in
    /// the same millisecond still get distinct ids.
    fn next_id(&self, now: DateTime<Utc>) -> ExamId {
        let from_clock = ExamId::new(u64::try_from(now.timestamp_millis()).unwrap_or(0));
        self.records
            .iter()
            .map(|record| record.id().next())
            .max()
            .map_or(from_clock, |after_last| after_last.max(from_clock))
    }

    async fn persist(&self) -> SaveStatus {
        match self.exams.save_exams(&self.records).await {
            Ok(()) => SaveStatus::Saved,
            Err(err) => {
                warn!(count = self.records.len(), "failed to save exams: {err}");
                SaveStatus::Unsaved(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use exam_core::model::{ExamCategory, ExamResults, SubjectPath, SubjectResult};
    use exam_core::time::{fixed_clock, fixed_now};
    use std::sync::atomic::{AtomicBool, Ordering};
    use storage::repository::Storage;

    fn build_exam(id: u64) -> ExamRecord {
        let mut results = ExamResults::new();
        results.insert(
            SubjectPath::new("turkce").unwrap(),
            SubjectResult::counts(30, 4),
        );
        ExamRecord::new(
            ExamId::new(id),
            fixed_now(),
            format!("Deneme {id}"),
            ExamCategory::Tyt,
            results,
        )
        .unwrap()
    }

    /// Repository whose writes can be switched off.
    #[derive(Default)]
    struct FlakyRepository {
        fail_writes: AtomicBool,
    }

    #[async_trait]
    impl ExamRepository for FlakyRepository {
        async fn load_exams(&self) -> Result<Vec<ExamRecord>, StorageError> {
            Ok(Vec::new())
        }

        async fn save_exams(&self, _exams: &[ExamRecord]) -> Result<(), StorageError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(StorageError::Connection("quota exceeded".into()));
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn append_puts_newest_first_and_persists() {
        let storage = Storage::in_memory();
        let mut store = ExamStore::load(fixed_clock(), Arc::clone(&storage.exams))
            .await
            .unwrap();

        assert!(store.append(build_exam(1)).await.unwrap().is_saved());
        assert!(store.append(build_exam(2)).await.unwrap().is_saved());

        let ids: Vec<u64> = store.records().iter().map(|r| r.id().value()).collect();
        assert_eq!(ids, [2, 1]);

        let reloaded = ExamStore::load(fixed_clock(), storage.exams).await.unwrap();
        assert_eq!(reloaded.records(), store.records());
    }

    #[tokio::test]
    async fn append_then_delete_restores_prior_state() {
        let storage = Storage::in_memory();
        let mut store = ExamStore::load(fixed_clock(), Arc::clone(&storage.exams))
            .await
            .unwrap();
        let _ = store.append(build_exam(1)).await.unwrap();
        let before = store.records().to_vec();

        let _ = store.append(build_exam(2)).await.unwrap();
        let status = store.delete(ExamId::new(2)).await.unwrap();

        assert!(status.is_saved());
        assert_eq!(store.records(), before.as_slice());
        assert_eq!(storage.exams.load_exams().await.unwrap(), before);
    }

    #[tokio::test]
    async fn duplicate_and_missing_ids_are_rejected() {
        let mut store = ExamStore::empty(fixed_clock(), Storage::in_memory().exams);
        let _ = store.append(build_exam(1)).await.unwrap();

        let dup = store.append(build_exam(1)).await.unwrap_err();
        assert!(matches!(dup, ExamStoreError::DuplicateId(id) if id == ExamId::new(1)));

        let missing = store.delete(ExamId::new(9)).await.unwrap_err();
        assert!(matches!(missing, ExamStoreError::NotFound(_)));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn delete_removes_every_copy_of_a_loaded_duplicate() {
        let storage = Storage::in_memory();
        storage
            .exams
            .save_exams(&[build_exam(5), build_exam(1), build_exam(5)])
            .await
            .unwrap();
        let mut store = ExamStore::load(fixed_clock(), Arc::clone(&storage.exams))
            .await
            .unwrap();
        assert_eq!(store.len(), 3);

        assert!(store.delete(ExamId::new(5)).await.unwrap().is_saved());

        let ids: Vec<u64> = store.records().iter().map(|r| r.id().value()).collect();
        assert_eq!(ids, [1]);
        assert_eq!(storage.exams.load_exams().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn record_draft_assigns_unique_timestamp_ids() {
        let mut store = ExamStore::empty(fixed_clock(), Storage::in_memory().exams);
        let draft = || ExamDraft::new(ExamCategory::Tyt).with_name("Deneme");

        let (first, _) = store.record_draft(draft()).await.unwrap();
        let (second, _) = store.record_draft(draft()).await.unwrap();

        let millis = u64::try_from(fixed_now().timestamp_millis()).unwrap();
        assert_eq!(first, ExamId::new(millis));
        assert_eq!(second, ExamId::new(millis + 1));
        assert_eq!(store.get(second).unwrap().date(), fixed_now());
    }

    #[tokio::test]
    async fn record_draft_without_name_changes_nothing() {
        let mut store = ExamStore::empty(fixed_clock(), Storage::in_memory().exams);
        let err = store
            .record_draft(ExamDraft::new(ExamCategory::Ayt))
            .await
            .unwrap_err();
        assert!(matches!(err, ExamStoreError::Exam(_)));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn failed_save_is_reported_but_memory_keeps_the_change() {
        let repo = Arc::new(FlakyRepository::default());
        let mut store = ExamStore::load(fixed_clock(), repo.clone()).await.unwrap();

        repo.fail_writes.store(true, Ordering::SeqCst);
        let status = store.append(build_exam(1)).await.unwrap();

        assert!(!status.is_saved());
        assert!(matches!(status.warning(), Some(StorageError::Connection(_))));
        assert_eq!(store.len(), 1);

        repo.fail_writes.store(false, Ordering::SeqCst);
        assert!(store.delete(ExamId::new(1)).await.unwrap().is_saved());
    }
}
