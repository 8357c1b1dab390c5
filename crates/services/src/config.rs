use std::path::{Path, PathBuf};

use storage::repository::DEFAULT_EXAMS_KEY;

use crate::error::AppServicesError;

pub const DB_URL_ENV: &str = "EXAMS_DB_URL";
pub const STORAGE_KEY_ENV: &str = "EXAMS_STORAGE_KEY";
pub const DEFAULT_DB_URL: &str = "sqlite://exams.sqlite3";

const MEMORY_URL: &str = "sqlite::memory:";

/// Where the exam collection lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    pub db_url: String,
    pub storage_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_url: DEFAULT_DB_URL.to_owned(),
            storage_key: DEFAULT_EXAMS_KEY.to_owned(),
        }
    }
}

impl StorageConfig {
    /// Read `EXAMS_DB_URL` and `EXAMS_STORAGE_KEY`, falling back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as `from_env` but with an injectable variable source.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let db_url = lookup(DB_URL_ENV)
            .filter(|value| !value.trim().is_empty())
            .map_or_else(|| DEFAULT_DB_URL.to_owned(), normalize_sqlite_url);
        let storage_key = lookup(STORAGE_KEY_ENV)
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_EXAMS_KEY.to_owned());
        Self { db_url, storage_key }
    }

    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        is_memory_url(&self.db_url)
    }
}

fn is_memory_url(db_url: &str) -> bool {
    db_url == MEMORY_URL || db_url.contains("mode=memory")
}

/// Turn a bare or `sqlite:`-prefixed path into an absolute `sqlite://` URL.
#[must_use]
pub fn normalize_sqlite_url(raw: String) -> String {
    if is_memory_url(&raw) || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim();
    let path = Path::new(trimmed.strip_prefix("sqlite:").unwrap_or(trimmed));
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

/// Make sure the database file and its parent directory exist.
///
/// # Errors
///
/// Returns `AppServicesError::InvalidDbUrl` for URLs without a file path and
/// `AppServicesError::Io` if the file cannot be created.
pub fn prepare_sqlite_file(db_url: &str) -> Result<(), AppServicesError> {
    if is_memory_url(db_url) {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| AppServicesError::InvalidDbUrl(db_url.to_owned()))?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(AppServicesError::InvalidDbUrl(db_url.to_owned()));
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }
    Ok(())
}
