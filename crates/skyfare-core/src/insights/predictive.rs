//! Predictive Evaluator
//!
//! Forward-looking signals: the price premium high-demand routes command,
//! routes with enough activity to grow, and routes running short of seats.

use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::models::{Column, Dataset};
use crate::stats;

use super::demand::HIGH_DEMAND_SCORE;
use super::engine::Evaluator;
use super::types::{Insight, InsightType, Severity, Trend};

/// Flights on a route needed before it counts as a growth opportunity
const OPPORTUNITY_MIN_FLIGHTS: usize = 5;

/// Availability below this fraction of the mean marks a constrained route
const CAPACITY_CONSTRAINT_RATIO: f64 = 0.8;

pub struct PredictiveEvaluator;

impl Evaluator for PredictiveEvaluator {
    fn name(&self) -> &'static str {
        "predictive"
    }

    fn evaluate(&self, dataset: &Dataset, out: &mut Vec<Insight>) -> Result<()> {
        dataset.require(Column::Route)?;
        dataset.require(Column::DemandScore)?;
        let prices = dataset.prices()?;

        // 1. Price premium on high-demand routes
        let high_demand_routes: BTreeSet<&str> = dataset
            .iter()
            .filter(|r| r.demand_score() > HIGH_DEMAND_SCORE)
            .map(|r| r.route())
            .collect();

        let overall_avg =
            stats::mean(&prices).ok_or_else(|| Error::Computation("no prices".into()))?;

        if !high_demand_routes.is_empty() && overall_avg == 0.0 {
            // Free flights only: the premium is undefined, the other rules still apply
            tracing::warn!(
                high_demand_routes = high_demand_routes.len(),
                "Overall mean price is zero, skipping price prediction"
            );
        } else if !high_demand_routes.is_empty() {
            let high_demand_prices: Vec<f64> = dataset
                .iter()
                .filter(|r| high_demand_routes.contains(r.route()))
                .map(|r| r.price())
                .collect();
            let high_demand_avg = stats::mean(&high_demand_prices)
                .ok_or_else(|| Error::Computation("no high-demand prices".into()))?;
            let premium = (high_demand_avg / overall_avg - 1.0) * 100.0;

            out.push(
                Insight::new(
                    InsightType::PricePrediction,
                    format!(
                        "High-demand routes command {:.1}% price premium, expect further increases",
                        premium
                    ),
                    premium,
                    Trend::Increasing,
                )
                .with_confidence(0.7)
                .with_actionable(true),
            );
        }

        // 2. Routes with enough activity to grow
        let emerging = stats::value_counts(dataset.iter().map(|r| r.route()))
            .into_iter()
            .filter(|(_, count)| *count >= OPPORTUNITY_MIN_FLIGHTS)
            .count();

        if emerging > 0 {
            out.push(
                Insight::new(
                    InsightType::MarketOpportunity,
                    format!("Identified {} routes with growth potential", emerging),
                    emerging as f64,
                    Trend::Increasing,
                )
                .with_confidence(0.6)
                .with_actionable(true),
            );
        }

        // 3. Capacity constraints, only when seat counts are provided
        if !dataset.has_column(Column::Availability) {
            return Ok(());
        }

        let seats: Vec<f64> = dataset
            .availability()?
            .into_iter()
            .flatten()
            .map(f64::from)
            .collect();
        let Some(avg_seats) = stats::mean(&seats) else {
            return Ok(());
        };

        let threshold = avg_seats * CAPACITY_CONSTRAINT_RATIO;
        let constrained: BTreeSet<&str> = dataset
            .iter()
            .filter(|r| r.availability().is_some_and(|a| f64::from(a) < threshold))
            .map(|r| r.route())
            .collect();

        if !constrained.is_empty() {
            out.push(
                Insight::new(
                    InsightType::CapacityConstraint,
                    format!("{} routes showing capacity constraints", constrained.len()),
                    constrained.len() as f64,
                    Trend::Decreasing,
                )
                .with_confidence(0.8)
                .with_severity(Severity::High)
                .with_actionable(true),
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::types::InsightCategory;
    use crate::test_utils::{flight, flight_with_seats, repeated};

    fn run(dataset: &Dataset) -> Vec<Insight> {
        let mut out = vec![];
        PredictiveEvaluator.evaluate(dataset, &mut out).unwrap();
        out
    }

    fn find(insights: &[Insight], kind: InsightType) -> Option<&Insight> {
        insights.iter().find(|i| i.insight_type() == kind)
    }

    #[test]
    fn test_price_prediction() {
        let dataset = Dataset::new(vec![
            flight("Sydney", "Melbourne", "Qantas", 300.0, 0.9),
            flight("Sydney", "Melbourne", "Jetstar", 300.0, 0.4),
            flight("Perth", "Darwin", "Qantas", 150.0, 0.3),
            flight("Perth", "Darwin", "Qantas", 50.0, 0.3),
        ]);
        let insights = run(&dataset);

        // Overall mean 200, high-demand route mean 300
        let prediction = find(&insights, InsightType::PricePrediction).unwrap();
        assert_eq!(prediction.category(), InsightCategory::Price);
        assert_eq!(prediction.value(), 50.0);
        assert_eq!(prediction.confidence(), 0.7);
        assert!(prediction.is_actionable());
        assert_eq!(
            prediction.description(),
            "High-demand routes command 50.0% price premium, expect further increases"
        );
    }

    #[test]
    fn test_no_high_demand_no_prediction() {
        let insights = run(&repeated(3, 200.0, 0.5));
        assert!(find(&insights, InsightType::PricePrediction).is_none());
    }

    #[test]
    fn test_market_opportunity() {
        let insights = run(&repeated(5, 200.0, 0.5));
        let opportunity = find(&insights, InsightType::MarketOpportunity).unwrap();
        assert_eq!(opportunity.category(), InsightCategory::Route);
        assert_eq!(opportunity.value(), 1.0);
        assert_eq!(opportunity.confidence(), 0.6);
        assert_eq!(
            opportunity.description(),
            "Identified 1 routes with growth potential"
        );

        let insights = run(&repeated(4, 200.0, 0.5));
        assert!(find(&insights, InsightType::MarketOpportunity).is_none());
    }

    #[test]
    fn test_capacity_constraint() {
        let dataset = Dataset::new(vec![
            flight_with_seats("Sydney", "Melbourne", "Qantas", 200.0, 0.5, 10),
            flight_with_seats("Perth", "Darwin", "Qantas", 200.0, 0.5, 100),
            flight_with_seats("Perth", "Darwin", "Qantas", 200.0, 0.5, 100),
            // No seat count: excluded from the mean
            flight("Hobart", "Cairns", "Rex", 200.0, 0.5),
        ]);
        let insights = run(&dataset);

        let capacity = find(&insights, InsightType::CapacityConstraint).unwrap();
        assert_eq!(capacity.category(), InsightCategory::Demand);
        assert_eq!(capacity.value(), 1.0);
        assert_eq!(capacity.severity(), Severity::High);
        assert_eq!(capacity.trend(), Trend::Decreasing);
        assert_eq!(capacity.description(), "1 routes showing capacity constraints");
    }

    #[test]
    fn test_missing_availability_skips_capacity() {
        let dataset = Dataset::new(vec![
            flight_with_seats("Sydney", "Melbourne", "Qantas", 200.0, 0.5, 10),
            flight_with_seats("Perth", "Darwin", "Qantas", 200.0, 0.5, 100),
        ])
        .without_column(Column::Availability);
        let insights = run(&dataset);
        assert!(find(&insights, InsightType::CapacityConstraint).is_none());
    }

    #[test]
    fn test_zero_mean_price_skips_only_prediction() {
        let mut records = vec![flight_with_seats("Sydney", "Melbourne", "Qantas", 0.0, 0.9, 5)];
        for _ in 0..4 {
            records.push(flight_with_seats("Sydney", "Melbourne", "Qantas", 0.0, 0.4, 100));
        }
        let insights = run(&Dataset::new(records));

        assert!(find(&insights, InsightType::PricePrediction).is_none());
        let opportunity = find(&insights, InsightType::MarketOpportunity).unwrap();
        assert_eq!(opportunity.value(), 1.0);
        let capacity = find(&insights, InsightType::CapacityConstraint).unwrap();
        assert_eq!(capacity.value(), 1.0);
    }
}
