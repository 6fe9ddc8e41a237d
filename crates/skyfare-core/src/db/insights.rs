//! Market insight database operations

use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Row};
use serde::Serialize;

use super::{days_ago, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::insights::{Insight, InsightCategory, InsightType, Severity, Trend};

/// An insight as persisted, with its storage id and timestamp
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredInsight {
    pub id: i64,
    #[serde(flatten)]
    pub insight: Insight,
    pub created_at: DateTime<Utc>,
}

struct InsightRow {
    id: i64,
    insight_type: String,
    description: String,
    value: f64,
    trend: String,
    confidence: f64,
    severity: String,
    actionable: bool,
    created_at: String,
}

impl InsightRow {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            insight_type: row.get(1)?,
            description: row.get(2)?,
            value: row.get(3)?,
            trend: row.get(4)?,
            confidence: row.get(5)?,
            severity: row.get(6)?,
            actionable: row.get(7)?,
            created_at: row.get(8)?,
        })
    }

    fn into_stored(self) -> Result<StoredInsight> {
        let insight_type: InsightType = self.insight_type.parse().map_err(Error::InvalidArgument)?;
        let trend: Trend = self.trend.parse().map_err(Error::InvalidArgument)?;
        let severity: Severity = self.severity.parse().map_err(Error::InvalidArgument)?;

        Ok(StoredInsight {
            id: self.id,
            insight: Insight::new(insight_type, self.description, self.value, trend)
                .with_confidence(self.confidence)
                .with_severity(severity)
                .with_actionable(self.actionable),
            created_at: parse_datetime(&self.created_at),
        })
    }
}

impl Database {
    /// Persist generated insights; returns the number stored
    pub fn save_market_insights(&self, insights: &[Insight]) -> Result<usize> {
        if insights.is_empty() {
            return Ok(0);
        }

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let mut saved = 0;

        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO market_insights
                    (insight_type, description, value, trend, confidence, category, severity, actionable)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )?;

            for insight in insights {
                stmt.execute(params![
                    insight.insight_type().as_str(),
                    insight.description(),
                    insight.value(),
                    insight.trend().as_str(),
                    insight.confidence(),
                    insight.category().as_str(),
                    insight.severity().as_str(),
                    insight.is_actionable(),
                ])?;
                saved += 1;
            }
        }

        tx.commit()?;
        tracing::info!(count = saved, "Saved market insights");
        Ok(saved)
    }

    /// Insights stored within the last `days` days, newest first
    pub fn get_market_insights(
        &self,
        days: u32,
        category: Option<InsightCategory>,
    ) -> Result<Vec<StoredInsight>> {
        let mut sql = String::from(
            r#"
            SELECT id, insight_type, description, value, trend, confidence, severity,
                   actionable, created_at
            FROM market_insights
            WHERE created_at >= datetime('now', ?)
            "#,
        );
        let mut values: Vec<Value> = vec![Value::Text(days_ago(days))];

        if let Some(category) = category {
            sql.push_str(" AND category = ?");
            values.push(Value::Text(category.as_str().to_string()));
        }
        sql.push_str(" ORDER BY created_at DESC, id DESC");

        let conn = self.conn()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(values), InsightRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut stored = Vec::with_capacity(rows.len());
        for row in rows {
            let id = row.id;
            match row.into_stored() {
                Ok(insight) => stored.push(insight),
                Err(e) => tracing::warn!(id, error = %e, "Skipping unreadable insight row"),
            }
        }
        Ok(stored)
    }
}
