//! Database backup operations
//!
//! Copies are written with SQLite's `VACUUM INTO`, which produces a
//! consistent, compacted snapshot while the database stays in use.

use std::path::{Path, PathBuf};

use chrono::Utc;
use rusqlite::params;
use serde::Serialize;
use tracing::info;

use super::Database;
use crate::error::{Error, Result};

/// What a backup contains and where it went
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackupResult {
    pub path: PathBuf,
    pub size: u64,
    pub flights: i64,
    pub insights: i64,
}

/// Timestamped backup file name, e.g. `skyfare-2025-03-04-101500.db`
pub fn generate_backup_name() -> String {
    format!("skyfare-{}.db", Utc::now().format("%Y-%m-%d-%H%M%S"))
}

impl Database {
    /// Write a snapshot of the database to `destination`
    ///
    /// The destination must not exist yet; an existing file is never
    /// overwritten.
    pub fn create_backup(&self, destination: &Path) -> Result<BackupResult> {
        if destination.exists() {
            return Err(Error::Backup(format!(
                "{} already exists",
                destination.display()
            )));
        }

        let stats = self.get_statistics()?;
        let target = destination
            .to_str()
            .ok_or_else(|| Error::Backup(format!("Non-UTF-8 path: {}", destination.display())))?;

        let conn = self.conn()?;
        conn.execute("VACUUM INTO ?", params![target])
            .map_err(|e| Error::Backup(format!("Failed to write backup: {}", e)))?;

        let size = std::fs::metadata(destination)?.len();
        info!(path = %destination.display(), size, "Backup complete");

        Ok(BackupResult {
            path: destination.to_path_buf(),
            size,
            flights: stats.total_flights,
            insights: stats.total_insights,
        })
    }
}
