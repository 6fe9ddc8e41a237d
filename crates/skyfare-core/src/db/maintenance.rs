//! Database statistics, cleanup and data quality checks

use chrono::{DateTime, Utc};
use rusqlite::params;
use serde::Serialize;

use super::{days_ago, parse_datetime, Database};
use crate::error::Result;
use crate::stats::round2;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatabaseStats {
    pub total_flights: i64,
    pub total_routes: i64,
    pub total_airlines: i64,
    pub avg_price: f64,
    pub avg_demand: f64,
    pub total_insights: i64,
    pub flights_last_24h: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopRoute {
    pub route: String,
    pub flight_count: i64,
    pub avg_price: f64,
    pub avg_demand: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleanupResult {
    pub flights_deleted: usize,
    pub insights_deleted: usize,
}

/// Counts of suspicious rows plus data freshness
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataQualityReport {
    pub invalid_prices: i64,
    pub invalid_demand_scores: i64,
    pub missing_routes: i64,
    pub missing_airlines: i64,
    /// (route, airline, date) groups holding more than one row
    pub duplicate_flights: i64,
    pub latest_data_timestamp: Option<DateTime<Utc>>,
    pub data_age_hours: Option<f64>,
}

impl Database {
    pub fn get_statistics(&self) -> Result<DatabaseStats> {
        let conn = self.conn()?;

        let (total_flights, total_routes, total_airlines, avg_price, avg_demand): (
            i64,
            i64,
            i64,
            Option<f64>,
            Option<f64>,
        ) = conn.query_row(
            r#"
            SELECT COUNT(*), COUNT(DISTINCT route), COUNT(DISTINCT airline),
                   AVG(price), AVG(demand_score)
            FROM flight_data
            "#,
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?)),
        )?;

        let total_insights: i64 =
            conn.query_row("SELECT COUNT(*) FROM market_insights", [], |row| row.get(0))?;

        let flights_last_24h: i64 = conn.query_row(
            "SELECT COUNT(*) FROM flight_data WHERE created_at >= datetime('now', '-1 days')",
            [],
            |row| row.get(0),
        )?;

        Ok(DatabaseStats {
            total_flights,
            total_routes,
            total_airlines,
            avg_price: avg_price.map(round2).unwrap_or(0.0),
            avg_demand: avg_demand.map(round2).unwrap_or(0.0),
            total_insights,
            flights_last_24h,
        })
    }

    /// Routes with the most stored flights
    pub fn get_top_routes(&self, limit: usize) -> Result<Vec<TopRoute>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT route, COUNT(*) AS flight_count, AVG(price), AVG(demand_score)
            FROM flight_data
            GROUP BY route
            ORDER BY flight_count DESC, route ASC
            LIMIT ?
            "#,
        )?;

        let routes = stmt
            .query_map(params![limit as i64], |row| {
                Ok(TopRoute {
                    route: row.get(0)?,
                    flight_count: row.get(1)?,
                    avg_price: round2(row.get(2)?),
                    avg_demand: round2(row.get(3)?),
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(routes)
    }

    /// Delete flights and insights older than `days` days
    pub fn clean_old_data(&self, days: u32) -> Result<CleanupResult> {
        let conn = self.conn()?;
        let cutoff = days_ago(days);

        let flights_deleted = conn.execute(
            "DELETE FROM flight_data WHERE created_at < datetime('now', ?)",
            params![cutoff],
        )?;
        let insights_deleted = conn.execute(
            "DELETE FROM market_insights WHERE created_at < datetime('now', ?)",
            params![cutoff],
        )?;

        tracing::info!(
            days,
            flights_deleted,
            insights_deleted,
            "Cleaned old data"
        );

        Ok(CleanupResult {
            flights_deleted,
            insights_deleted,
        })
    }

    /// Delete only insights older than `days` days
    pub fn clean_old_insights(&self, days: u32) -> Result<usize> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM market_insights WHERE created_at < datetime('now', ?)",
            params![days_ago(days)],
        )?;
        tracing::info!(days, deleted, "Cleaned old insights");
        Ok(deleted)
    }

    pub fn get_data_quality_report(&self) -> Result<DataQualityReport> {
        let conn = self.conn()?;
        let count = |sql: &str| -> rusqlite::Result<i64> { conn.query_row(sql, [], |row| row.get(0)) };

        let invalid_prices = count("SELECT COUNT(*) FROM flight_data WHERE price IS NULL OR price <= 0")?;
        let invalid_demand_scores = count(
            "SELECT COUNT(*) FROM flight_data WHERE demand_score IS NULL OR demand_score < 0 OR demand_score > 1",
        )?;
        let missing_routes = count("SELECT COUNT(*) FROM flight_data WHERE route IS NULL OR route = ''")?;
        let missing_airlines =
            count("SELECT COUNT(*) FROM flight_data WHERE airline IS NULL OR airline = ''")?;
        let duplicate_flights = count(
            r#"
            SELECT COUNT(*) FROM (
                SELECT route, airline, date
                FROM flight_data
                GROUP BY route, airline, date
                HAVING COUNT(*) > 1
            )
            "#,
        )?;

        let latest: Option<String> =
            conn.query_row("SELECT MAX(created_at) FROM flight_data", [], |row| row.get(0))?;
        let latest_data_timestamp = latest.as_deref().map(parse_datetime);
        let data_age_hours = latest_data_timestamp.map(|ts| {
            let seconds = (Utc::now() - ts).num_seconds() as f64;
            round2(seconds / 3600.0)
        });

        Ok(DataQualityReport {
            invalid_prices,
            invalid_demand_scores,
            missing_routes,
            missing_airlines,
            duplicate_flights,
            latest_data_timestamp,
            data_age_hours,
        })
    }
}
