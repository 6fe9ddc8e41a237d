//! Database access layer with connection pooling and migrations
//!
//! This module is organized by domain:
//! - `flights` - Flight record storage, retention-window reads, search
//! - `insights` - Generated market insight storage
//! - `maintenance` - Statistics, cleanup and data quality checks
//! - `trends` - Daily price trends per route
//! - `backup` - Consistent on-line database copies

use chrono::{DateTime, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use tracing::info;

use crate::error::Result;

mod backup;
mod flights;
mod insights;
mod maintenance;
mod trends;

pub use insights::StoredInsight;
pub use backup::{generate_backup_name, BackupResult};
pub use maintenance::{CleanupResult, DataQualityReport, DatabaseStats, TopRoute};
pub use trends::PriceTrend;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// Parse a SQLite datetime string into a DateTime<Utc>
pub(crate) fn parse_datetime(s: &str) -> DateTime<Utc> {
    // SQLite stores as "YYYY-MM-DD HH:MM:SS" format
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|dt| dt.and_utc())
        .unwrap_or_else(|_| Utc::now())
}

/// SQLite modifier for "now minus N days", e.g. `-30 days`
pub(crate) fn days_ago(days: u32) -> String {
    format!("-{} days", days)
}

/// Database wrapper with connection pooling
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
    /// Path to the database file
    db_path: String,
}

impl Database {
    /// Open (or create) a database file and run migrations
    pub fn new(path: &str) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path);
        let pool = Pool::builder().max_size(10).build(manager)?;

        let db = Self {
            pool,
            db_path: path.to_string(),
        };
        db.run_migrations()?;

        info!(path = %path, "Database ready");
        Ok(db)
    }

    /// Get the path to the database file
    pub fn path(&self) -> &str {
        &self.db_path
    }

    /// Create a throwaway database (for testing)
    ///
    /// Uses a temporary file rather than `:memory:` so every pooled
    /// connection sees the same data.
    pub fn in_memory() -> Result<Self> {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        let path = std::env::temp_dir().join(format!(
            "skyfare_test_{}_{}.db",
            std::process::id(),
            id
        ));
        let path = path.to_string_lossy().into_owned();

        // Remove any existing file
        let _ = std::fs::remove_file(&path);

        Self::new(&path)
    }

    /// Get a connection from the pool
    pub fn conn(&self) -> Result<DbConn> {
        Ok(self.pool.get()?)
    }

    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            -- WAL mode: readers don't block writers
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;

            -- Collected flight prices
            -- flight_number is '' when unknown so the unique key still
            -- deduplicates (NULLs never compare equal in SQLite)
            CREATE TABLE IF NOT EXISTS flight_data (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                route TEXT NOT NULL,
                origin TEXT NOT NULL,
                destination TEXT NOT NULL,
                airline TEXT NOT NULL,
                price REAL NOT NULL,
                date TEXT NOT NULL,
                demand_score REAL NOT NULL,
                flight_number TEXT NOT NULL DEFAULT '',
                aircraft_type TEXT,
                duration INTEGER,
                distance REAL,
                booking_class TEXT NOT NULL DEFAULT 'Economy',
                availability INTEGER,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                UNIQUE(route, airline, date, flight_number)
            );

            CREATE INDEX IF NOT EXISTS idx_flight_route ON flight_data(route);
            CREATE INDEX IF NOT EXISTS idx_flight_date ON flight_data(date);
            CREATE INDEX IF NOT EXISTS idx_flight_airline ON flight_data(airline);
            CREATE INDEX IF NOT EXISTS idx_flight_price ON flight_data(price);
            CREATE INDEX IF NOT EXISTS idx_flight_created ON flight_data(created_at);

            -- Generated market insights
            CREATE TABLE IF NOT EXISTS market_insights (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                insight_type TEXT NOT NULL,
                description TEXT NOT NULL,
                value REAL NOT NULL,
                trend TEXT NOT NULL,
                confidence REAL NOT NULL DEFAULT 0.8,
                category TEXT NOT NULL,
                severity TEXT NOT NULL DEFAULT 'medium',
                actionable INTEGER NOT NULL DEFAULT 1,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_insight_type ON market_insights(insight_type);
            CREATE INDEX IF NOT EXISTS idx_insight_category ON market_insights(category);
            "#,
        )?;

        Ok(())
    }
}
