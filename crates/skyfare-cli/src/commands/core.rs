//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `load_config` - Resolve the analyzer config
//! - `load_dataset` - Read flights inside the retention window
//! - `cmd_init` - Initialize the database

use std::path::Path;

use anyhow::{Context, Result};
use skyfare_core::{config::default_config_path, AnalyzerConfig, Database, Dataset};

pub fn open_db(db_path: &Path) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .with_context(|| format!("Database path is not valid UTF-8: {}", db_path.display()))?;
    Database::new(path_str).context("Failed to open database")
}

/// Explicit `--config` path, else the data-dir override, else built-in defaults
pub fn load_config(path: Option<&Path>) -> Result<AnalyzerConfig> {
    match path {
        Some(path) => AnalyzerConfig::from_path(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => AnalyzerConfig::load().context("Failed to load config"),
    }
}

/// Flights stored within the configured retention window
pub fn load_dataset(db: &Database, config: &AnalyzerConfig) -> Result<Dataset> {
    db.get_flight_data(config.data_retention_days, config.max_records)
        .context("Failed to load flight data")
}

pub fn cmd_init(db_path: &Path, config: &AnalyzerConfig) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    open_db(db_path)?;

    match &config.source {
        Some(path) => println!("   Config: {}", path.display()),
        None => {
            println!("   Config: built-in defaults");
            if let Some(path) = default_config_path() {
                println!("   (override with {})", path.display());
            }
        }
    }
    println!(
        "   Retention: {} days (flights), {} days (insights)",
        config.data_retention_days, config.insight_retention_days
    );

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Import flights: skyfare import --file flights.csv");
    println!("  2. Generate insights: skyfare insights");

    Ok(())
}
