use std::sync::Arc;

use tracing::info;

use exam_core::DayZone;
use exam_core::taxonomy::Taxonomy;
use storage::repository::Storage;

use crate::Clock;
use crate::analysis::AnalysisService;
use crate::config::{StorageConfig, prepare_sqlite_file};
use crate::error::AppServicesError;
use crate::exam_store::ExamStore;

/// Assembles the exam store and the read-side views.
pub struct AppServices {
    store: ExamStore,
    analysis: AnalysisService,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the database file cannot be prepared,
    /// storage initialization fails, or the saved collection cannot be read.
    pub async fn new_sqlite(config: &StorageConfig, clock: Clock) -> Result<Self, AppServicesError> {
        prepare_sqlite_file(&config.db_url)?;
        let storage = Storage::sqlite(&config.db_url, &config.storage_key).await?;
        let services = Self::from_storage(&storage, clock).await?;
        info!(
            db_url = %config.db_url,
            key = %config.storage_key,
            exams = services.store.len(),
            "exam services ready"
        );
        Ok(services)
    }

    /// Build services over a fresh in-memory store.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the in-memory backend fails to load.
    pub async fn in_memory(clock: Clock) -> Result<Self, AppServicesError> {
        Self::from_storage(&Storage::in_memory(), clock).await
    }

    /// Load the collection from `storage` and wire the default taxonomy.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Store` if the backend cannot be read.
    pub async fn from_storage(storage: &Storage, clock: Clock) -> Result<Self, AppServicesError> {
        let store = ExamStore::load(clock, Arc::clone(&storage.exams)).await?;
        Ok(Self {
            store,
            analysis: AnalysisService::new(Taxonomy::standard(), DayZone::System),
        })
    }

    #[must_use]
    pub fn with_analysis(mut self, analysis: AnalysisService) -> Self {
        self.analysis = analysis;
        self
    }

    #[must_use]
    pub fn store(&self) -> &ExamStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ExamStore {
        &mut self.store
    }

    #[must_use]
    pub fn analysis(&self) -> &AnalysisService {
        &self.analysis
    }
}
