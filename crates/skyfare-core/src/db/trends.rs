//! Daily price trends per route

use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::params_from_iter;
use serde::Serialize;

use super::{days_ago, Database};
use crate::error::Result;
use crate::stats::round2;

/// Average price of one route on one flight date
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceTrend {
    pub date: NaiveDate,
    pub route: String,
    pub avg_price: f64,
    pub flight_count: i64,
}

impl Database {
    /// Per-date, per-route average prices for flights stored in the last
    /// `days` days, newest flight date first
    ///
    /// With `route` set, only that route is returned.
    pub fn get_price_trends(&self, route: Option<&str>, days: u32) -> Result<Vec<PriceTrend>> {
        let mut sql = String::from(
            r#"
            SELECT date, route, AVG(price), COUNT(*)
            FROM flight_data
            WHERE created_at >= datetime('now', ?)
            "#,
        );
        let mut values: Vec<Value> = vec![Value::Text(days_ago(days))];

        if let Some(route) = route {
            sql.push_str(" AND route = ?");
            values.push(Value::Text(route.to_string()));
        }
        sql.push_str(" GROUP BY date, route ORDER BY date DESC, route ASC");

        let conn = self.conn()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(values), |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, f64>(2)?,
                    row.get::<_, i64>(3)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut trends = Vec::with_capacity(rows.len());
        for (date, route, avg_price, flight_count) in rows {
            match NaiveDate::parse_from_str(&date, "%Y-%m-%d") {
                Ok(date) => trends.push(PriceTrend {
                    date,
                    route,
                    avg_price: round2(avg_price),
                    flight_count,
                }),
                Err(_) => tracing::warn!(route = %route, date = %date, "Skipping trend row with invalid date"),
            }
        }
        Ok(trends)
    }
}
