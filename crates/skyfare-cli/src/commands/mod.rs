//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Init plus shared utilities (open_db, load_config, load_dataset)
//! - `import` - Flight CSV import
//! - `insights` - Insight generation, summary report, export, combined analyze
//! - `reports` - Route statistics, flight search, dashboard aggregates,
//!   price trends, flight CSV export
//! - `status` - Stats, data quality, retention cleanup, backup

pub mod core;
pub mod import;
pub mod insights;
pub mod reports;
pub mod status;

// Re-export command functions for main.rs
pub use core::*;
pub use import::*;
pub use insights::*;
pub use reports::*;
pub use status::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
