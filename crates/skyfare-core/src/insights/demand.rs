//! Demand Evaluator
//!
//! Overall demand tier, the route with the most high-demand flights, and
//! how much demand varies across the market.

use crate::error::{Error, Result};
use crate::models::{Column, Dataset};
use crate::stats;

use super::engine::Evaluator;
use super::types::{DemandLevel, Insight, InsightType, Severity, Trend};

/// Demand score above which a flight counts as high demand
pub(crate) const HIGH_DEMAND_SCORE: f64 = 0.7;

const VARIABILITY_THRESHOLD: f64 = 0.2;

pub struct DemandEvaluator;

impl Evaluator for DemandEvaluator {
    fn name(&self) -> &'static str {
        "demand"
    }

    fn evaluate(&self, dataset: &Dataset, out: &mut Vec<Insight>) -> Result<()> {
        let demand = dataset.demand_scores()?;
        let avg_demand =
            stats::mean(&demand).ok_or_else(|| Error::Computation("no demand scores".into()))?;

        // 1. Overall demand level
        let level = DemandLevel::from_score(avg_demand);
        let severity = match level {
            DemandLevel::VeryHigh | DemandLevel::High => Severity::High,
            DemandLevel::Medium | DemandLevel::Low => Severity::Medium,
        };

        out.push(
            Insight::new(
                InsightType::OverallDemand,
                format!(
                    "Market demand is {} with an average score of {:.2}",
                    level, avg_demand
                ),
                avg_demand,
                Trend::Stable,
            )
            .with_confidence(0.9)
            .with_severity(severity),
        );

        // 2. Route with the most high-demand flights
        dataset.require(Column::Route)?;
        let high_demand_routes = stats::value_counts(
            dataset
                .iter()
                .filter(|r| r.demand_score() > HIGH_DEMAND_SCORE)
                .map(|r| r.route()),
        );

        if let Some((route, count)) = high_demand_routes.first() {
            out.push(
                Insight::new(
                    InsightType::HighDemandRoute,
                    format!(
                        "Route '{}' shows highest demand with {} high-demand flights",
                        route, count
                    ),
                    *count as f64,
                    Trend::Increasing,
                )
                .with_confidence(0.85),
            );
        }

        // 3. Variability
        if let Some(demand_std) = stats::sample_std(&demand) {
            if demand_std > VARIABILITY_THRESHOLD {
                out.push(
                    Insight::new(
                        InsightType::DemandVariability,
                        format!(
                            "High variability in demand across routes (std: {:.2})",
                            demand_std
                        ),
                        demand_std,
                        Trend::Volatile,
                    )
                    .with_confidence(0.8)
                    .with_severity(Severity::Medium),
                );
            }
        }

        Ok(())
    }
}
