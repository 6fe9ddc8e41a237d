//! Skyfare CLI - Flight market insight analyzer
//!
//! Usage:
//!   skyfare init                    Initialize database
//!   skyfare import --file CSV       Import flight records
//!   skyfare insights                Generate and save market insights
//!   skyfare export --format csv     Export insights
//!   skyfare analyze                 Save, report and export in one pass
//!   skyfare backup                  Copy the database

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = commands::load_config(cli.config.as_deref())?;
    let mut analyzer = commands::Analyzer::new(&config);

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, &config),
        Commands::Import { file } => commands::cmd_import(&cli.db, &file),
        Commands::Insights {
            category,
            priority,
            json,
        } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_insights(
                &db,
                &config,
                &mut analyzer,
                category.as_deref(),
                priority,
                json,
            )
        }
        Commands::Report => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_report(&db, &config, &mut analyzer)
        }
        Commands::Export { format, output } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_export(&db, &config, &mut analyzer, format.as_deref(), output.as_deref())
        }
        Commands::Analyze { format, output } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_analyze(&db, &config, &mut analyzer, format.as_deref(), output.as_deref())
        }
        Commands::Routes { limit } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_routes(&db, &config, limit)
        }
        Commands::Search {
            origin,
            destination,
            airline,
            min_price,
            max_price,
            from,
            to,
            limit,
        } => {
            let db = commands::open_db(&cli.db)?;
            let filter = commands::build_filter(
                origin,
                destination,
                airline,
                min_price,
                max_price,
                from.as_deref(),
                to.as_deref(),
                Some(limit),
            )?;
            commands::cmd_search(&db, &filter)
        }
        Commands::Stats => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_stats(&db)
        }
        Commands::Dashboard {
            origin,
            destination,
            airline,
            min_price,
            max_price,
        } => {
            let db = commands::open_db(&cli.db)?;
            let filter = commands::build_filter(
                origin,
                destination,
                airline,
                min_price,
                max_price,
                None,
                None,
                None,
            )?;
            commands::cmd_dashboard(&db, &config, &filter)
        }
        Commands::Trends { route, days } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_trends(&db, route.as_deref(), days)
        }
        Commands::ExportFlights { output } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_export_flights(&db, &config, output.as_deref())
        }
        Commands::Backup { output } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_backup(&db, output.as_deref())
        }
        Commands::Quality => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_quality(&db)
        }
        Commands::Clean { days } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_clean(&db, &config, days)
        }
    }
}
