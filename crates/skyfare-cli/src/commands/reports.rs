//! Route statistics, flight search, dashboard, price trends and flight export

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use skyfare_core::{
    analysis::{dashboard_summary, route_statistics},
    write_flights_csv, AnalyzerConfig, Database, FlightFilter,
};

use super::{load_dataset, truncate};

fn parse_date(value: &str, flag: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("Invalid {} date format (use YYYY-MM-DD)", flag))
}

#[allow(clippy::too_many_arguments)]
pub fn build_filter(
    origin: Option<String>,
    destination: Option<String>,
    airline: Option<String>,
    min_price: Option<f64>,
    max_price: Option<f64>,
    from: Option<&str>,
    to: Option<&str>,
    limit: Option<usize>,
) -> Result<FlightFilter> {
    Ok(FlightFilter {
        origin,
        destination,
        airline,
        min_price,
        max_price,
        date_from: from.map(|d| parse_date(d, "--from")).transpose()?,
        date_to: to.map(|d| parse_date(d, "--to")).transpose()?,
        limit,
    })
}

pub fn cmd_routes(db: &Database, config: &AnalyzerConfig, limit: usize) -> Result<()> {
    let dataset = load_dataset(db, config)?;
    let routes = route_statistics(&dataset);

    if routes.is_empty() {
        println!("No flight data found.");
        return Ok(());
    }

    println!();
    println!("🛫 Routes");
    println!(
        "   {:30} │ {:>7} │ {:>9} │ {:>9} │ {:>9} │ {:>6}",
        "Route", "Flights", "Avg", "Min", "Max", "Demand"
    );
    println!("   ───────────────────────────────┼─────────┼───────────┼───────────┼───────────┼───────");

    for route in routes.iter().take(limit) {
        println!(
            "   {:30} │ {:>7} │ {:>9.2} │ {:>9.2} │ {:>9.2} │ {:>6.2}",
            truncate(&route.route, 30),
            route.flight_count,
            route.avg_price,
            route.min_price,
            route.max_price,
            route.demand_score
        );
    }

    if routes.len() > limit {
        println!("   ... and {} more", routes.len() - limit);
    }

    Ok(())
}

pub fn cmd_search(db: &Database, filter: &FlightFilter) -> Result<()> {
    let flights = db.search_flights(filter).context("Failed to search flights")?;

    if flights.is_empty() {
        println!("No flights match the search.");
        return Ok(());
    }

    println!();
    println!("🔎 Flights ({})", flights.len());
    println!("   ─────────────────────────────────────────────────────────────");

    for flight in &flights {
        println!(
            "   {} {:30} {:15} {:>9.2}  demand {:.2}{}",
            flight.date(),
            truncate(flight.route(), 30),
            truncate(flight.airline(), 15),
            flight.price(),
            flight.demand_score(),
            flight
                .availability()
                .map(|seats| format!("  seats {}", seats))
                .unwrap_or_default()
        );
    }

    Ok(())
}

/// Dashboard aggregates over the retention window, narrowed by `filter`
pub fn cmd_dashboard(db: &Database, config: &AnalyzerConfig, filter: &FlightFilter) -> Result<()> {
    let dataset = load_dataset(db, config)?.filter(filter);
    let summary = dashboard_summary(&dataset);
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

pub fn cmd_trends(db: &Database, route: Option<&str>, days: u32) -> Result<()> {
    let trends = db
        .get_price_trends(route, days)
        .context("Failed to load price trends")?;

    if trends.is_empty() {
        println!("No flights stored in the last {} days.", days);
        return Ok(());
    }

    println!();
    println!("📈 Price Trends (last {} days)", days);
    println!("   {:10} │ {:30} │ {:>9} │ {:>7}", "Date", "Route", "Avg", "Flights");
    println!("   ───────────┼────────────────────────────────┼───────────┼────────");

    for trend in &trends {
        println!(
            "   {:10} │ {:30} │ {:>9.2} │ {:>7}",
            trend.date,
            truncate(&trend.route, 30),
            trend.avg_price,
            trend.flight_count
        );
    }

    Ok(())
}

/// Default flight export file name, e.g. `skyfare-flights-2025-03-04-101500.csv`
pub fn flight_export_name() -> String {
    format!(
        "skyfare-flights-{}.csv",
        chrono::Utc::now().format("%Y-%m-%d-%H%M%S")
    )
}

/// Write the retention window's flights as CSV, returning how many were written
pub fn export_flights(db: &Database, config: &AnalyzerConfig, output: &Path) -> Result<usize> {
    let dataset = load_dataset(db, config)?;
    let content = write_flights_csv(dataset.records())?;
    fs::write(output, content).with_context(|| format!("Failed to write {}", output.display()))?;
    Ok(dataset.len())
}

pub fn cmd_export_flights(db: &Database, config: &AnalyzerConfig, output: Option<&Path>) -> Result<()> {
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(flight_export_name()));

    let count = export_flights(db, config, &output)?;
    println!("✅ Exported {} flights to {}", count, output.display());
    Ok(())
}
