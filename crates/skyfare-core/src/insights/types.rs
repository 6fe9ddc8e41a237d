//! Core types for the Insight Engine

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Direction of the quantity an insight describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
    Volatile,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Increasing => "increasing",
            Trend::Decreasing => "decreasing",
            Trend::Stable => "stable",
            Trend::Volatile => "volatile",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Trend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "increasing" => Ok(Trend::Increasing),
            "decreasing" => Ok(Trend::Decreasing),
            "stable" => Ok(Trend::Stable),
            "volatile" => Ok(Trend::Volatile),
            _ => Err(format!("Unknown trend: {}", s)),
        }
    }
}

/// Analytical angle an insight belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightCategory {
    Price,
    Demand,
    Route,
    Airline,
    Seasonal,
    Competition,
}

impl InsightCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightCategory::Price => "price",
            InsightCategory::Demand => "demand",
            InsightCategory::Route => "route",
            InsightCategory::Airline => "airline",
            InsightCategory::Seasonal => "seasonal",
            InsightCategory::Competition => "competition",
        }
    }

    pub fn all() -> &'static [InsightCategory] {
        &[
            InsightCategory::Price,
            InsightCategory::Demand,
            InsightCategory::Route,
            InsightCategory::Airline,
            InsightCategory::Seasonal,
            InsightCategory::Competition,
        ]
    }
}

impl fmt::Display for InsightCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InsightCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "price" => Ok(InsightCategory::Price),
            "demand" => Ok(InsightCategory::Demand),
            "route" => Ok(InsightCategory::Route),
            "airline" => Ok(InsightCategory::Airline),
            "seasonal" => Ok(InsightCategory::Seasonal),
            "competition" => Ok(InsightCategory::Competition),
            _ => Err(format!("Unknown insight category: {}", s)),
        }
    }
}

/// Qualitative impact tier of an insight
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }

    /// Numeric priority for sorting (higher = more urgent)
    pub fn priority(&self) -> u8 {
        match self {
            Severity::Low => 1,
            Severity::Medium => 2,
            Severity::High => 3,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            _ => Err(format!("Unknown severity: {}", s)),
        }
    }
}

/// Overall market demand tier derived from the mean demand score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DemandLevel {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl DemandLevel {
    /// very_high > 0.8, high > 0.6, medium > 0.4, else low
    pub fn from_score(score: f64) -> Self {
        if score > 0.8 {
            DemandLevel::VeryHigh
        } else if score > 0.6 {
            DemandLevel::High
        } else if score > 0.4 {
            DemandLevel::Medium
        } else {
            DemandLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DemandLevel::Low => "low",
            DemandLevel::Medium => "medium",
            DemandLevel::High => "high",
            DemandLevel::VeryHigh => "very_high",
        }
    }
}

impl fmt::Display for DemandLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The fixed catalog of insights the evaluators can emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InsightType {
    #[serde(rename = "Price Volatility")]
    PriceVolatility,
    #[serde(rename = "Price Segment")]
    PriceSegment,
    #[serde(rename = "Price-Demand Correlation")]
    PriceDemandCorrelation,
    #[serde(rename = "Overall Demand")]
    OverallDemand,
    #[serde(rename = "High Demand Route")]
    HighDemandRoute,
    #[serde(rename = "Demand Variability")]
    DemandVariability,
    #[serde(rename = "Most Popular Route")]
    MostPopularRoute,
    #[serde(rename = "Route Concentration")]
    RouteConcentration,
    #[serde(rename = "Value Routes")]
    ValueRoutes,
    #[serde(rename = "Market Leader")]
    MarketLeader,
    #[serde(rename = "Market Concentration")]
    MarketConcentration,
    #[serde(rename = "Premium Airlines")]
    PremiumAirlines,
    #[serde(rename = "Peak Demand Month")]
    PeakDemandMonth,
    #[serde(rename = "Weekend Premium")]
    WeekendPremium,
    #[serde(rename = "Competitive Routes")]
    CompetitiveRoutes,
    #[serde(rename = "Monopolistic Routes")]
    MonopolisticRoutes,
    #[serde(rename = "Price Competition")]
    PriceCompetition,
    #[serde(rename = "Price Prediction")]
    PricePrediction,
    #[serde(rename = "Market Opportunity")]
    MarketOpportunity,
    #[serde(rename = "Capacity Constraint")]
    CapacityConstraint,
}

impl InsightType {
    /// Display label, e.g. "Price Volatility"
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightType::PriceVolatility => "Price Volatility",
            InsightType::PriceSegment => "Price Segment",
            InsightType::PriceDemandCorrelation => "Price-Demand Correlation",
            InsightType::OverallDemand => "Overall Demand",
            InsightType::HighDemandRoute => "High Demand Route",
            InsightType::DemandVariability => "Demand Variability",
            InsightType::MostPopularRoute => "Most Popular Route",
            InsightType::RouteConcentration => "Route Concentration",
            InsightType::ValueRoutes => "Value Routes",
            InsightType::MarketLeader => "Market Leader",
            InsightType::MarketConcentration => "Market Concentration",
            InsightType::PremiumAirlines => "Premium Airlines",
            InsightType::PeakDemandMonth => "Peak Demand Month",
            InsightType::WeekendPremium => "Weekend Premium",
            InsightType::CompetitiveRoutes => "Competitive Routes",
            InsightType::MonopolisticRoutes => "Monopolistic Routes",
            InsightType::PriceCompetition => "Price Competition",
            InsightType::PricePrediction => "Price Prediction",
            InsightType::MarketOpportunity => "Market Opportunity",
            InsightType::CapacityConstraint => "Capacity Constraint",
        }
    }

    /// Category every insight of this type is filed under
    pub fn category(&self) -> InsightCategory {
        match self {
            InsightType::PriceVolatility
            | InsightType::PriceSegment
            | InsightType::PriceDemandCorrelation
            | InsightType::PricePrediction => InsightCategory::Price,
            InsightType::OverallDemand
            | InsightType::DemandVariability
            | InsightType::CapacityConstraint => InsightCategory::Demand,
            InsightType::HighDemandRoute
            | InsightType::MostPopularRoute
            | InsightType::RouteConcentration
            | InsightType::ValueRoutes
            | InsightType::MarketOpportunity => InsightCategory::Route,
            InsightType::MarketLeader
            | InsightType::MarketConcentration
            | InsightType::PremiumAirlines => InsightCategory::Airline,
            InsightType::PeakDemandMonth | InsightType::WeekendPremium => {
                InsightCategory::Seasonal
            }
            InsightType::CompetitiveRoutes
            | InsightType::MonopolisticRoutes
            | InsightType::PriceCompetition => InsightCategory::Competition,
        }
    }

    pub fn all() -> &'static [InsightType] {
        &[
            InsightType::PriceVolatility,
            InsightType::PriceSegment,
            InsightType::PriceDemandCorrelation,
            InsightType::OverallDemand,
            InsightType::HighDemandRoute,
            InsightType::DemandVariability,
            InsightType::MostPopularRoute,
            InsightType::RouteConcentration,
            InsightType::ValueRoutes,
            InsightType::MarketLeader,
            InsightType::MarketConcentration,
            InsightType::PremiumAirlines,
            InsightType::PeakDemandMonth,
            InsightType::WeekendPremium,
            InsightType::CompetitiveRoutes,
            InsightType::MonopolisticRoutes,
            InsightType::PriceCompetition,
            InsightType::PricePrediction,
            InsightType::MarketOpportunity,
            InsightType::CapacityConstraint,
        ]
    }
}

impl fmt::Display for InsightType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InsightType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InsightType::all()
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("Unknown insight type: {}", s))
    }
}

/// A single derived observation about a flight dataset
///
/// Field order matches the exported record layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    #[serde(rename = "type")]
    insight_type: InsightType,
    description: String,
    value: f64,
    trend: Trend,
    confidence: f64,
    category: InsightCategory,
    severity: Severity,
    actionable: bool,
}

impl Insight {
    /// Default confidence for a new insight
    pub const DEFAULT_CONFIDENCE: f64 = 0.8;

    /// Create an insight with default confidence, severity and actionable flag
    pub fn new(
        insight_type: InsightType,
        description: impl Into<String>,
        value: f64,
        trend: Trend,
    ) -> Self {
        Self {
            insight_type,
            description: description.into(),
            value,
            trend,
            confidence: Self::DEFAULT_CONFIDENCE,
            category: insight_type.category(),
            severity: Severity::default(),
            actionable: true,
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_actionable(mut self, actionable: bool) -> Self {
        self.actionable = actionable;
        self
    }

    pub fn insight_type(&self) -> InsightType {
        self.insight_type
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn trend(&self) -> Trend {
        self.trend
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn category(&self) -> InsightCategory {
        self.category
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn is_actionable(&self) -> bool {
        self.actionable
    }

    /// High confidence (> 0.8), actionable and high severity
    pub fn is_high_priority(&self) -> bool {
        self.confidence > 0.8 && self.actionable && self.severity == Severity::High
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_round_trip_strings() {
        for category in InsightCategory::all() {
            assert_eq!(InsightCategory::from_str(category.as_str()).unwrap(), *category);
        }
        assert_eq!(Trend::from_str("volatile").unwrap(), Trend::Volatile);
        assert_eq!(Severity::from_str("high").unwrap(), Severity::High);
        assert!(Severity::from_str("critical").is_err());
        assert_eq!(
            InsightType::from_str("Price-Demand Correlation").unwrap(),
            InsightType::PriceDemandCorrelation
        );
    }

    #[test]
    fn test_demand_level_thresholds() {
        assert_eq!(DemandLevel::from_score(0.85), DemandLevel::VeryHigh);
        assert_eq!(DemandLevel::from_score(0.8), DemandLevel::High);
        assert_eq!(DemandLevel::from_score(0.6), DemandLevel::Medium);
        assert_eq!(DemandLevel::from_score(0.4), DemandLevel::Low);
        assert_eq!(DemandLevel::VeryHigh.to_string(), "very_high");
    }

    #[test]
    fn test_insight_defaults() {
        let insight = Insight::new(
            InsightType::ValueRoutes,
            "Found 2 routes with high demand but competitive pricing",
            2.0,
            Trend::Stable,
        );
        assert_eq!(insight.confidence(), 0.8);
        assert_eq!(insight.severity(), Severity::Medium);
        assert!(insight.is_actionable());
        assert_eq!(insight.category(), InsightCategory::Route);
    }

    #[test]
    fn test_catalog_categories() {
        assert_eq!(InsightType::HighDemandRoute.category(), InsightCategory::Route);
        assert_eq!(InsightType::PricePrediction.category(), InsightCategory::Price);
        assert_eq!(InsightType::MarketOpportunity.category(), InsightCategory::Route);
        assert_eq!(InsightType::CapacityConstraint.category(), InsightCategory::Demand);
    }

    #[test]
    fn test_insight_serialization_field_order() {
        let insight = Insight::new(
            InsightType::MonopolisticRoutes,
            "1 routes served by single airline",
            1.0,
            Trend::Stable,
        )
        .with_confidence(0.9)
        .with_severity(Severity::High);

        let json = serde_json::to_string(&insight).unwrap();
        assert!(json.starts_with(r#"{"type":"Monopolistic Routes","description":"#));
        let type_pos = json.find("\"type\"").unwrap();
        let severity_pos = json.find("\"severity\"").unwrap();
        let actionable_pos = json.find("\"actionable\"").unwrap();
        assert!(type_pos < severity_pos && severity_pos < actionable_pos);
    }

    #[test]
    fn test_high_priority() {
        let base = Insight::new(InsightType::CapacityConstraint, "x", 1.0, Trend::Decreasing);
        assert!(!base.clone().with_severity(Severity::High).is_high_priority());
        assert!(base
            .clone()
            .with_confidence(0.85)
            .with_severity(Severity::High)
            .is_high_priority());
        assert!(!base
            .with_confidence(0.85)
            .with_severity(Severity::High)
            .with_actionable(false)
            .is_high_priority());
    }
}
