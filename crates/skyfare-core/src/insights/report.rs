//! Summary reports and recommendations over a set of insights

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::types::{Insight, InsightCategory, InsightType, Severity};

/// Confidence above which an insight is listed as a key finding
const KEY_FINDING_CONFIDENCE: f64 = 0.8;

/// Price volatility above which dynamic pricing is recommended
const DYNAMIC_PRICING_VOLATILITY: f64 = 0.3;

/// Mean demand score above which added capacity is recommended
const CAPACITY_DEMAND: f64 = 0.7;

/// Aggregate view over one engine run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SummaryReport {
    /// Nothing was generated for the dataset
    NoInsights { summary: String },
    #[serde(rename = "complete")]
    Report(InsightSummary),
}

impl SummaryReport {
    pub fn is_empty(&self) -> bool {
        matches!(self, SummaryReport::NoInsights { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightSummary {
    pub total_insights: usize,
    pub categories: BTreeMap<InsightCategory, usize>,
    /// Every severity tier is present, zero when unused
    pub severity_distribution: BTreeMap<Severity, usize>,
    pub actionable_insights: usize,
    pub key_findings: Vec<KeyFinding>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyFinding {
    #[serde(rename = "type")]
    pub insight_type: InsightType,
    pub description: String,
    pub confidence: f64,
}

/// Summarize insights by category, severity and actionability
pub fn generate_summary_report(insights: &[Insight]) -> SummaryReport {
    if insights.is_empty() {
        return SummaryReport::NoInsights {
            summary: "No insights generated".to_string(),
        };
    }

    let mut categories = BTreeMap::new();
    let mut severity_distribution: BTreeMap<Severity, usize> =
        [Severity::High, Severity::Medium, Severity::Low]
            .into_iter()
            .map(|s| (s, 0))
            .collect();
    let mut actionable_insights = 0;
    let mut key_findings = vec![];

    for insight in insights {
        *categories.entry(insight.category()).or_insert(0) += 1;
        *severity_distribution.entry(insight.severity()).or_insert(0) += 1;

        if insight.is_actionable() {
            actionable_insights += 1;
        }

        if insight.confidence() > KEY_FINDING_CONFIDENCE {
            key_findings.push(KeyFinding {
                insight_type: insight.insight_type(),
                description: insight.description().to_string(),
                confidence: insight.confidence(),
            });
        }
    }

    SummaryReport::Report(InsightSummary {
        total_insights: insights.len(),
        categories,
        severity_distribution,
        actionable_insights,
        key_findings,
        recommendations: generate_recommendations(insights),
    })
}

/// Recommendations in fixed rule order: price, demand, route, competition
pub fn generate_recommendations(insights: &[Insight]) -> Vec<String> {
    let of_type = |kind: InsightType| {
        insights
            .iter()
            .filter(move |i| i.insight_type() == kind)
    };

    let rules: [(bool, &str); 4] = [
        (
            of_type(InsightType::PriceVolatility).any(|i| i.value() > DYNAMIC_PRICING_VOLATILITY),
            "Consider dynamic pricing strategies to capitalize on price volatility",
        ),
        (
            of_type(InsightType::OverallDemand).any(|i| i.value() > CAPACITY_DEMAND),
            "Increase capacity on high-demand routes to capture market share",
        ),
        (
            of_type(InsightType::ValueRoutes).next().is_some(),
            "Focus marketing efforts on value routes with high demand and competitive pricing",
        ),
        (
            of_type(InsightType::MonopolisticRoutes).next().is_some(),
            "Explore opportunities on monopolistic routes for potential market entry",
        ),
    ];

    rules
        .into_iter()
        .filter(|(fired, _)| *fired)
        .map(|(_, text)| text.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::types::Trend;

    fn insight(kind: InsightType, value: f64) -> Insight {
        Insight::new(kind, "test", value, Trend::Stable)
    }

    #[test]
    fn test_empty_report() {
        let report = generate_summary_report(&[]);
        assert!(report.is_empty());

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "no_insights");
        assert_eq!(json["summary"], "No insights generated");
    }

    #[test]
    fn test_summary_counts() {
        let insights = vec![
            insight(InsightType::PriceVolatility, 0.1).with_confidence(0.85),
            insight(InsightType::PriceSegment, 60.0).with_confidence(0.9),
            insight(InsightType::MonopolisticRoutes, 2.0)
                .with_confidence(0.9)
                .with_severity(Severity::High)
                .with_actionable(false),
            insight(InsightType::MarketOpportunity, 1.0).with_confidence(0.6),
        ];

        let SummaryReport::Report(summary) = generate_summary_report(&insights) else {
            panic!("expected a report");
        };
        assert_eq!(summary.total_insights, 4);
        assert_eq!(summary.categories[&InsightCategory::Price], 2);
        assert_eq!(summary.categories[&InsightCategory::Competition], 1);
        assert_eq!(summary.categories[&InsightCategory::Route], 1);
        assert!(!summary.categories.contains_key(&InsightCategory::Seasonal));

        assert_eq!(summary.severity_distribution[&Severity::High], 1);
        assert_eq!(summary.severity_distribution[&Severity::Medium], 3);
        assert_eq!(summary.severity_distribution[&Severity::Low], 0);
        assert_eq!(summary.actionable_insights, 3);

        // Confidence must be strictly above 0.8
        assert_eq!(summary.key_findings.len(), 3);
        assert_eq!(summary.key_findings[0].insight_type, InsightType::PriceVolatility);

        assert_eq!(
            summary.recommendations,
            vec!["Explore opportunities on monopolistic routes for potential market entry"]
        );
    }

    #[test]
    fn test_report_json_shape() {
        let report = generate_summary_report(&[insight(InsightType::ValueRoutes, 1.0)]);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "complete");
        assert_eq!(json["total_insights"], 1);
        assert_eq!(json["categories"]["route"], 1);
        assert_eq!(json["severity_distribution"]["low"], 0);
        assert_eq!(json["severity_distribution"]["medium"], 1);
    }

    #[test]
    fn test_recommendation_order_and_thresholds() {
        let insights = vec![
            insight(InsightType::MonopolisticRoutes, 3.0),
            insight(InsightType::ValueRoutes, 2.0),
            insight(InsightType::OverallDemand, 0.75),
            insight(InsightType::PriceVolatility, 0.31),
        ];
        assert_eq!(
            generate_recommendations(&insights),
            vec![
                "Consider dynamic pricing strategies to capitalize on price volatility",
                "Increase capacity on high-demand routes to capture market share",
                "Focus marketing efforts on value routes with high demand and competitive pricing",
                "Explore opportunities on monopolistic routes for potential market entry",
            ]
        );

        let quiet = vec![
            insight(InsightType::PriceVolatility, 0.3),
            insight(InsightType::OverallDemand, 0.7),
        ];
        assert!(generate_recommendations(&quiet).is_empty());
    }
}
