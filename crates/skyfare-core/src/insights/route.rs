//! Route Evaluator
//!
//! Route popularity, how concentrated traffic is on the busiest routes, and
//! routes that combine high demand with below-average prices.

use crate::error::{Error, Result};
use crate::models::{Column, Dataset};
use crate::stats;

use super::engine::Evaluator;
use super::types::{Insight, InsightType, Severity, Trend};

/// Number of busiest routes considered for concentration
const TOP_ROUTES: usize = 10;

/// Share of all flights (percent) held by the top routes that is reported
const CONCENTRATION_PERCENT: f64 = 50.0;

/// Route mean demand above which a cheaper-than-average route is a value route
const VALUE_ROUTE_DEMAND: f64 = 0.6;

pub struct RouteEvaluator;

impl Evaluator for RouteEvaluator {
    fn name(&self) -> &'static str {
        "route"
    }

    fn evaluate(&self, dataset: &Dataset, out: &mut Vec<Insight>) -> Result<()> {
        dataset.require(Column::Route)?;
        let route_counts = stats::value_counts(dataset.iter().map(|r| r.route()));

        let prices = dataset.prices()?;
        let avg_price =
            stats::mean(&prices).ok_or_else(|| Error::Computation("no prices".into()))?;

        // 1. Most popular route
        if let Some((route, count)) = route_counts.first() {
            out.push(
                Insight::new(
                    InsightType::MostPopularRoute,
                    format!("Route '{}' is most popular with {} flights", route, count),
                    *count as f64,
                    Trend::Increasing,
                )
                .with_confidence(0.95),
            );
        }

        // 2. Concentration on the busiest routes
        let top_flights: usize = route_counts.iter().take(TOP_ROUTES).map(|(_, n)| n).sum();
        let concentration = top_flights as f64 * 100.0 / dataset.len() as f64;

        if concentration > CONCENTRATION_PERCENT {
            out.push(
                Insight::new(
                    InsightType::RouteConcentration,
                    format!(
                        "Top {} routes account for {:.1}% of all flights",
                        TOP_ROUTES, concentration
                    ),
                    concentration,
                    Trend::Stable,
                )
                .with_confidence(0.9)
                .with_severity(Severity::Medium),
            );
        }

        // 3. Value routes: high demand, below-average price
        dataset.require(Column::DemandScore)?;
        let route_prices = stats::grouped_means(dataset.iter().map(|r| (r.route(), r.price())));
        let route_demand =
            stats::grouped_means(dataset.iter().map(|r| (r.route(), r.demand_score())));

        let value_routes = route_prices
            .iter()
            .zip(&route_demand)
            .filter(|((_, price), (_, demand))| *demand > VALUE_ROUTE_DEMAND && *price < avg_price)
            .count();

        if value_routes > 0 {
            out.push(
                Insight::new(
                    InsightType::ValueRoutes,
                    format!(
                        "Found {} routes with high demand but competitive pricing",
                        value_routes
                    ),
                    value_routes as f64,
                    Trend::Stable,
                )
                .with_confidence(0.8)
                .with_actionable(true),
            );
        }

        Ok(())
    }
}
