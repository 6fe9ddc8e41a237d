//! Flight CSV import

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use skyfare_core::{import::parse_flights_csv, Database};

use super::open_db;

pub fn cmd_import(db_path: &Path, file: &Path) -> Result<()> {
    let db = open_db(db_path)?;
    let imported = import_file(&db, file)?;

    println!("✅ Import complete!");
    println!("   Stored: {} flights", imported);
    println!();
    println!("Run 'skyfare insights' to analyze the market.");

    Ok(())
}

/// Parse a flight CSV and store its records, returning how many were written
pub fn import_file(db: &Database, file: &Path) -> Result<usize> {
    println!("📥 Importing flights from {}...", file.display());

    let csv_file =
        File::open(file).with_context(|| format!("Failed to open file: {}", file.display()))?;
    let records = parse_flights_csv(csv_file)
        .with_context(|| format!("Failed to parse {}", file.display()))?;

    println!("   Found {} flights", records.len());

    let stored = db
        .save_flight_records(&records)
        .context("Failed to store flights")?;
    Ok(stored)
}
