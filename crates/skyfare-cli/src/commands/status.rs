//! Status-related command implementations (stats, quality, clean, backup)

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use skyfare_core::{db::generate_backup_name, AnalyzerConfig, CleanupResult, Database};

pub fn cmd_stats(db: &Database) -> Result<()> {
    let stats = db.get_statistics()?;
    let top_routes = db.get_top_routes(5)?;

    println!();
    println!("📊 Skyfare Status");
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Database:        {}", db.path());
    println!("   Flights:         {}", stats.total_flights);
    println!("   Last 24h:        {}", stats.flights_last_24h);
    println!("   Routes:          {}", stats.total_routes);
    println!("   Airlines:        {}", stats.total_airlines);
    println!("   Average price:   ${:.2}", stats.avg_price);
    println!("   Average demand:  {:.2}", stats.avg_demand);
    println!("   Saved insights:  {}", stats.total_insights);

    if !top_routes.is_empty() {
        println!();
        println!("   Top routes:");
        for route in top_routes {
            println!(
                "     {} ({} flights, avg ${:.2}, demand {:.2})",
                route.route, route.flight_count, route.avg_price, route.avg_demand
            );
        }
    }

    println!();
    Ok(())
}

pub fn cmd_quality(db: &Database) -> Result<()> {
    let report = db.get_data_quality_report()?;

    println!();
    println!("🩺 Data Quality");
    println!("   ─────────────────────────────");
    println!("   Invalid prices:         {}", report.invalid_prices);
    println!("   Invalid demand scores:  {}", report.invalid_demand_scores);
    println!("   Missing routes:         {}", report.missing_routes);
    println!("   Missing airlines:       {}", report.missing_airlines);
    println!("   Duplicate flights:      {}", report.duplicate_flights);

    match (report.latest_data_timestamp, report.data_age_hours) {
        (Some(latest), Some(age)) => {
            println!("   Latest data:            {}", latest.format("%Y-%m-%d %H:%M:%S"));
            println!("   Data age:               {:.1} hours", age);
        }
        _ => println!("   Latest data:            (none)"),
    }

    let issues = report.invalid_prices
        + report.invalid_demand_scores
        + report.missing_routes
        + report.missing_airlines
        + report.duplicate_flights;
    println!();
    if issues > 0 {
        println!("⚠️  {} potential data issues found.", issues);
    } else {
        println!("✅ No data issues found.");
    }

    Ok(())
}

/// Apply both retention windows, returning what was deleted
pub fn clean(db: &Database, config: &AnalyzerConfig, days: Option<u32>) -> Result<CleanupResult> {
    let days = days.unwrap_or(config.data_retention_days);

    let mut result = db.clean_old_data(days).context("Failed to clean old data")?;
    result.insights_deleted += db
        .clean_old_insights(config.insight_retention_days)
        .context("Failed to clean old insights")?;

    Ok(result)
}

pub fn cmd_clean(db: &Database, config: &AnalyzerConfig, days: Option<u32>) -> Result<()> {
    let result = clean(db, config, days)?;

    println!("🧹 Cleanup complete");
    println!("   Flights deleted:  {}", result.flights_deleted);
    println!("   Insights deleted: {}", result.insights_deleted);

    Ok(())
}

pub fn cmd_backup(db: &Database, output: Option<&Path>) -> Result<()> {
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(generate_backup_name()));

    let result = db.create_backup(&output).context("Failed to back up database")?;

    println!("💾 Backup created");
    println!("   Path:      {}", result.path.display());
    println!("   Size:      {} bytes", result.size);
    println!("   Flights:   {}", result.flights);
    println!("   Insights:  {}", result.insights);

    Ok(())
}
