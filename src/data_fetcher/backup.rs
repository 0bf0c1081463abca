//! Local backup file holding a previously seen match listing.
//!
//! The file is a JSON array of canonical match records. It is read only when
//! the upstream is unavailable, and written only when write-back is enabled.

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

use crate::data_fetcher::models::Match;
use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct BackupStore {
    path: PathBuf,
}

impl BackupStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and parses the backup file. A missing, unreadable or malformed
    /// file is reported as [`AppError::BackupUnavailable`].
    pub async fn load(&self) -> Result<Vec<Match>, AppError> {
        let content = fs::read_to_string(&self.path)
            .await
            .map_err(|e| self.unavailable(e))?;

        let matches: Vec<Match> =
            serde_json::from_str(&content).map_err(|e| self.unavailable(e))?;

        debug!(
            "Loaded {} matches from backup {}",
            matches.len(),
            self.path.display()
        );
        Ok(matches)
    }

    /// Last modification time of the backup file, i.e. when its listing was
    /// observed. `None` when the file or its metadata cannot be read.
    pub async fn modified_at(&self) -> Option<DateTime<Utc>> {
        let metadata = fs::metadata(&self.path).await.ok()?;
        metadata.modified().ok().map(DateTime::<Utc>::from)
    }

    /// Overwrites the backup file with `matches`, creating parent
    /// directories as needed.
    pub async fn save(&self, matches: &[Match]) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(matches)?;
        fs::write(&self.path, content).await?;

        info!(
            "Wrote {} matches to backup {}",
            matches.len(),
            self.path.display()
        );
        Ok(())
    }

    fn unavailable(&self, e: impl std::fmt::Display) -> AppError {
        AppError::backup_unavailable(self.path.display().to_string(), e.to_string())
    }
}
