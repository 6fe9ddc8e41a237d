//! Skyfare Core Library
//!
//! Shared functionality for the Skyfare flight market analyzer:
//! - Flight record model and validated datasets
//! - Rule-based market insight engine with seven evaluators
//! - Summary reports and strategic recommendations
//! - Insight cache keyed by dataset content
//! - Insight export (JSON, CSV, text) and flight CSV import
//! - Dashboard aggregates for charting
//! - SQLite storage with retention windows, quality checks, price trends and backups

pub mod analysis;
pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod import;
pub mod insights;
pub mod models;
pub mod stats;

#[cfg(test)]
mod test_utils;

pub use analysis::{dashboard_summary, route_statistics, DashboardSummary, RouteStats};
pub use cache::{CacheStats, InsightCache};
pub use config::AnalyzerConfig;
pub use db::{
    BackupResult, CleanupResult, DataQualityReport, Database, DatabaseStats, PriceTrend,
    StoredInsight, TopRoute,
};
pub use error::{Error, Result};
pub use export::{export_insights, export_insights_as, ExportFormat};
pub use import::{parse_flights_csv, write_flights_csv};
pub use insights::{
    generate_recommendations, generate_summary_report, Insight, InsightCategory, InsightEngine,
    InsightSummary, InsightType, Severity, SummaryReport, Trend,
};
pub use models::{Column, Dataset, FlightFilter, FlightRecord, NewFlightRecord};
