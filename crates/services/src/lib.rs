#![forbid(unsafe_code)]

pub mod analysis;
pub mod app_services;
pub mod config;
pub mod error;
pub mod exam_store;

pub use exam_core::Clock;

pub use analysis::{
    AnalysisService, DashboardView, ExamDetailView, HistoryItem, SubjectLine, TrendView,
};
pub use app_services::AppServices;
pub use config::StorageConfig;
pub use error::{AppServicesError, ExamStoreError};
pub use exam_store::{ExamStore, SaveStatus};
