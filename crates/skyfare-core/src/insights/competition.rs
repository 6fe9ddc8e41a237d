//! Competition Evaluator
//!
//! Counts carriers per route to find contested and single-carrier routes,
//! then checks how widely prices spread on the contested ones.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::Result;
use crate::models::{Column, Dataset};
use crate::stats;

use super::engine::Evaluator;
use super::types::{Insight, InsightType, Severity, Trend};

/// Distinct airlines on a route that make it competitive
const COMPETITIVE_AIRLINES: usize = 3;

/// Mean per-route price std (currency units) above which competition is reported
const PRICE_SPREAD_THRESHOLD: f64 = 50.0;

pub struct CompetitionEvaluator;

impl Evaluator for CompetitionEvaluator {
    fn name(&self) -> &'static str {
        "competition"
    }

    fn evaluate(&self, dataset: &Dataset, out: &mut Vec<Insight>) -> Result<()> {
        dataset.require(Column::Route)?;
        dataset.require(Column::Airline)?;

        let mut carriers: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        for record in dataset {
            carriers
                .entry(record.route())
                .or_default()
                .insert(record.airline());
        }

        let competitive: BTreeSet<&str> = carriers
            .iter()
            .filter(|(_, airlines)| airlines.len() >= COMPETITIVE_AIRLINES)
            .map(|(route, _)| *route)
            .collect();
        let monopolistic = carriers.values().filter(|a| a.len() == 1).count();

        tracing::debug!(
            routes = carriers.len(),
            competitive = competitive.len(),
            monopolistic,
            "Route competition"
        );

        if !competitive.is_empty() {
            out.push(
                Insight::new(
                    InsightType::CompetitiveRoutes,
                    format!("{} routes have 3+ airlines competing", competitive.len()),
                    competitive.len() as f64,
                    Trend::Increasing,
                )
                .with_confidence(0.9),
            );
        }

        if monopolistic > 0 {
            out.push(
                Insight::new(
                    InsightType::MonopolisticRoutes,
                    format!("{} routes served by single airline", monopolistic),
                    monopolistic as f64,
                    Trend::Stable,
                )
                .with_confidence(0.9)
                .with_severity(Severity::High),
            );
        }

        if competitive.is_empty() {
            return Ok(());
        }

        // Price spread on competitive routes
        dataset.require(Column::Price)?;
        let route_stds: Vec<f64> = stats::group_values(
            dataset
                .iter()
                .filter(|r| competitive.contains(r.route()))
                .map(|r| (r.route(), r.price())),
        )
        .into_iter()
        .filter_map(|(_, prices)| stats::sample_std(&prices))
        .collect();

        if let Some(avg_std) = stats::mean(&route_stds) {
            if avg_std > PRICE_SPREAD_THRESHOLD {
                out.push(
                    Insight::new(
                        InsightType::PriceCompetition,
                        format!(
                            "Competitive routes show high price variance (avg std: ${:.2})",
                            avg_std
                        ),
                        avg_std,
                        Trend::Volatile,
                    )
                    .with_confidence(0.8),
                );
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::types::InsightCategory;
    use crate::test_utils::flight;

    fn run(dataset: &Dataset) -> Vec<Insight> {
        let mut out = vec![];
        CompetitionEvaluator.evaluate(dataset, &mut out).unwrap();
        out
    }

    #[test]
    fn test_competitive_route_with_price_spread() {
        let dataset = Dataset::new(vec![
            flight("Sydney", "Melbourne", "Qantas", 100.0, 0.5),
            flight("Sydney", "Melbourne", "Jetstar", 200.0, 0.5),
            flight("Sydney", "Melbourne", "Virgin Australia", 300.0, 0.5),
        ]);
        let insights = run(&dataset);
        assert_eq!(insights.len(), 2);

        let competitive = &insights[0];
        assert_eq!(competitive.insight_type(), InsightType::CompetitiveRoutes);
        assert_eq!(competitive.category(), InsightCategory::Competition);
        assert_eq!(competitive.value(), 1.0);
        assert_eq!(competitive.trend(), Trend::Increasing);
        assert_eq!(competitive.description(), "1 routes have 3+ airlines competing");

        let spread = &insights[1];
        assert_eq!(spread.insight_type(), InsightType::PriceCompetition);
        assert_eq!(spread.value(), 100.0);
        assert_eq!(spread.trend(), Trend::Volatile);
        assert_eq!(
            spread.description(),
            "Competitive routes show high price variance (avg std: $100.00)"
        );
    }

    #[test]
    fn test_narrow_spread_not_reported() {
        let dataset = Dataset::new(vec![
            flight("Sydney", "Melbourne", "Qantas", 190.0, 0.5),
            flight("Sydney", "Melbourne", "Jetstar", 200.0, 0.5),
            flight("Sydney", "Melbourne", "Virgin Australia", 210.0, 0.5),
        ]);
        let insights = run(&dataset);
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].insight_type(), InsightType::CompetitiveRoutes);
    }

    #[test]
    fn test_monopolistic_routes() {
        let dataset = Dataset::new(vec![
            flight("Perth", "Darwin", "Qantas", 300.0, 0.5),
            flight("Perth", "Darwin", "Qantas", 320.0, 0.5),
            flight("Hobart", "Adelaide", "Rex", 180.0, 0.5),
            flight("Sydney", "Melbourne", "Qantas", 150.0, 0.5),
            flight("Sydney", "Melbourne", "Jetstar", 120.0, 0.5),
        ]);
        let insights = run(&dataset);
        assert_eq!(insights.len(), 1);

        let mono = &insights[0];
        assert_eq!(mono.insight_type(), InsightType::MonopolisticRoutes);
        assert_eq!(mono.value(), 2.0);
        assert_eq!(mono.severity(), Severity::High);
        assert_eq!(mono.trend(), Trend::Stable);
        assert_eq!(mono.description(), "2 routes served by single airline");
    }
}
