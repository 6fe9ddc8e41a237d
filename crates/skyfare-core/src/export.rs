//! Insight export
//!
//! Supports:
//! - JSON array of insight records (also accepted as "structured")
//! - CSV table with one row per insight (also accepted as "table")
//! - Plain-text report

use std::fmt::{self, Write as _};
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::insights::Insight;

/// Column order shared by the CSV and JSON layouts
pub const CSV_HEADER: [&str; 8] = [
    "type",
    "description",
    "value",
    "trend",
    "confidence",
    "category",
    "severity",
    "actionable",
];

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Text,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Text => "text",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "json" | "structured" => Ok(ExportFormat::Json),
            "csv" | "table" => Ok(ExportFormat::Csv),
            "text" => Ok(ExportFormat::Text),
            other => Err(Error::InvalidArgument(format!(
                "Unsupported format: {}",
                other
            ))),
        }
    }
}

/// Render insights in the named format
pub fn export_insights(insights: &[Insight], format: &str) -> Result<String> {
    let format: ExportFormat = format.parse()?;
    export_insights_as(insights, format)
}

pub fn export_insights_as(insights: &[Insight], format: ExportFormat) -> Result<String> {
    tracing::debug!(count = insights.len(), format = %format, "Exporting insights");
    match format {
        ExportFormat::Json => Ok(serde_json::to_string_pretty(insights)?),
        ExportFormat::Csv => export_csv(insights),
        ExportFormat::Text => Ok(export_text(insights)),
    }
}

fn export_csv(insights: &[Insight]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(CSV_HEADER)?;

    for insight in insights {
        let value = format_value(insight.value());
        let confidence = format_value(insight.confidence());
        wtr.write_record([
            insight.insight_type().as_str(),
            insight.description(),
            value.as_str(),
            insight.trend().as_str(),
            confidence.as_str(),
            insight.category().as_str(),
            insight.severity().as_str(),
            if insight.is_actionable() { "true" } else { "false" },
        ])?;
    }

    let bytes = wtr.into_inner().map_err(|e| Error::Io(e.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

fn export_text(insights: &[Insight]) -> String {
    let mut out = String::from("Market Insights Report\n");
    out.push_str(&"=".repeat(50));
    out.push_str("\n\n");

    for insight in insights {
        // Writing to a String cannot fail
        let _ = writeln!(out, "Type: {}", insight.insight_type());
        let _ = writeln!(out, "Description: {}", insight.description());
        let _ = writeln!(out, "Value: {}", format_value(insight.value()));
        let _ = writeln!(out, "Trend: {}", insight.trend());
        let _ = writeln!(out, "Confidence: {:.1}%", insight.confidence() * 100.0);
        let _ = writeln!(out, "Category: {}", insight.category());
        let _ = writeln!(out, "Severity: {}", insight.severity());
        out.push_str(&"-".repeat(30));
        out.push_str("\n\n");
    }

    out
}

/// Whole numbers keep one decimal place ("2.0"), others print as-is
fn format_value(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::{InsightType, Severity, Trend};

    fn sample() -> Vec<Insight> {
        vec![
            Insight::new(
                InsightType::MonopolisticRoutes,
                "2 routes served by single airline",
                2.0,
                Trend::Stable,
            )
            .with_confidence(0.9)
            .with_severity(Severity::High),
            Insight::new(
                InsightType::PriceVolatility,
                "Market shows moderate price volatility at 25.0%",
                0.25,
                Trend::Stable,
            )
            .with_confidence(0.85)
            .with_actionable(false),
        ]
    }

    #[test]
    fn test_format_aliases() {
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("structured".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("csv".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("table".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("text".parse::<ExportFormat>().unwrap(), ExportFormat::Text);
    }

    #[test]
    fn test_unsupported_format() {
        match export_insights(&sample(), "xml") {
            Err(Error::InvalidArgument(msg)) => assert_eq!(msg, "Unsupported format: xml"),
            other => panic!("expected InvalidArgument, got {:?}", other),
        }
    }

    #[test]
    fn test_json_export_keys_in_order() {
        let json = export_insights(&sample(), "json").unwrap();
        let type_pos = json.find("\"type\"").unwrap();
        let desc_pos = json.find("\"description\"").unwrap();
        let actionable_pos = json.find("\"actionable\"").unwrap();
        assert!(type_pos < desc_pos && desc_pos < actionable_pos);

        let parsed: Vec<Insight> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, sample());

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["type"], "Monopolistic Routes");
        assert_eq!(value[0]["category"], "competition");
        assert_eq!(value[0]["severity"], "high");
    }

    #[test]
    fn test_csv_export() {
        let csv = export_insights(&sample(), "table").unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "type,description,value,trend,confidence,category,severity,actionable"
        );
        assert_eq!(
            lines.next().unwrap(),
            "Monopolistic Routes,2 routes served by single airline,2.0,stable,0.9,competition,high,true"
        );
        assert_eq!(
            lines.next().unwrap(),
            "Price Volatility,Market shows moderate price volatility at 25.0%,0.25,stable,0.85,price,medium,false"
        );
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_text_export() {
        let text = export_insights(&sample(), "text").unwrap();
        let expected_header = format!("Market Insights Report\n{}\n\n", "=".repeat(50));
        assert!(text.starts_with(&expected_header));
        assert!(text.contains("Type: Monopolistic Routes\n"));
        assert!(text.contains("Value: 2.0\n"));
        assert!(text.contains("Confidence: 90.0%\n"));
        assert!(text.contains("Confidence: 85.0%\n"));
        assert!(text.contains("Category: competition\n"));
        assert!(text.contains("Severity: high\n"));
        assert!(text.ends_with(&format!("{}\n\n", "-".repeat(30))));
        assert_eq!(text.matches(&"-".repeat(30)).count(), 2);
    }

    #[test]
    fn test_empty_text_export_is_header_only() {
        let text = export_insights(&[], "text").unwrap();
        assert_eq!(text, format!("Market Insights Report\n{}\n\n", "=".repeat(50)));
    }
}
