//! CLI argument definitions using clap
//!
//! The command implementations live in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Skyfare - Market insights from flight pricing data
#[derive(Parser)]
#[command(name = "skyfare")]
#[command(about = "Flight pricing market insight analyzer", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "skyfare.db", global = true)]
    pub db: PathBuf,

    /// Analyzer config file (defaults to the data-dir override, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Import flight records from CSV
    Import {
        /// CSV file to import
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Generate market insights from stored flights and save them
    Insights {
        /// Only show one category: price, demand, route, airline, seasonal, competition
        #[arg(short, long)]
        category: Option<String>,

        /// Only show high-priority insights
        #[arg(long)]
        priority: bool,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Summary report with key findings and recommendations (JSON)
    Report,

    /// Save insights, print the summary report and optionally export them in one pass
    Analyze {
        /// Also export in this format: json, csv, text
        #[arg(short, long)]
        format: Option<String>,

        /// Also export to this file (configured format unless --format is given)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export generated insights
    Export {
        /// Output format: json, csv, text (defaults to the configured format)
        #[arg(short, long)]
        format: Option<String>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Per-route price and demand statistics
    Routes {
        /// Maximum routes to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Search stored flights
    Search {
        #[arg(long)]
        origin: Option<String>,

        #[arg(long)]
        destination: Option<String>,

        #[arg(long)]
        airline: Option<String>,

        #[arg(long)]
        min_price: Option<f64>,

        #[arg(long)]
        max_price: Option<f64>,

        /// Earliest flight date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Latest flight date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        #[arg(short, long, default_value = "50")]
        limit: usize,
    },

    /// Database statistics
    Stats,

    /// Dashboard aggregates (JSON)
    Dashboard {
        #[arg(long)]
        origin: Option<String>,

        #[arg(long)]
        destination: Option<String>,

        #[arg(long)]
        airline: Option<String>,

        #[arg(long)]
        min_price: Option<f64>,

        #[arg(long)]
        max_price: Option<f64>,
    },

    /// Daily average prices per route
    Trends {
        /// Only this route, e.g. "Sydney - Melbourne"
        #[arg(short, long)]
        route: Option<String>,

        /// Flights stored within this many days
        #[arg(short, long, default_value = "30")]
        days: u32,
    },

    /// Export stored flights inside the retention window as CSV
    ExportFlights {
        /// Output file (defaults to a timestamped name)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write a consistent copy of the database
    Backup {
        /// Backup file (defaults to a timestamped name)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Data quality report
    Quality,

    /// Delete flights and insights past their retention window
    Clean {
        /// Keep flights newer than this many days (defaults to configured retention)
        #[arg(short, long)]
        days: Option<u32>,
    },
}
