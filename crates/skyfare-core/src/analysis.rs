//! Route statistics and dashboard aggregates
//!
//! Chart-ready numbers only; rendering is left to the caller.

use std::collections::BTreeMap;

use chrono::Datelike;
use serde::Serialize;

use crate::models::Dataset;
use crate::stats::{self, round2};

/// Number of equal-width bins in the price histogram
pub const PRICE_HISTOGRAM_BINS: usize = 30;

/// Routes listed in the demand ranking
const TOP_DEMAND_ROUTES: usize = 10;

/// Per-route price and demand summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteStats {
    pub route: String,
    pub avg_price: f64,
    pub min_price: f64,
    pub max_price: f64,
    pub flight_count: usize,
    pub demand_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteDemand {
    pub route: String,
    pub demand_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AirlineShare {
    pub airline: String,
    pub flights: usize,
    /// Percent of all flights
    pub share: f64,
}

/// Aggregates behind the dashboard view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total_flights: usize,
    pub avg_price: f64,
    pub avg_demand: f64,
    pub total_routes: usize,
    pub price_distribution: Vec<HistogramBin>,
    pub route_demand: Vec<RouteDemand>,
    pub market_share: Vec<AirlineShare>,
    /// Mean demand keyed by month number (1-12)
    pub monthly_demand: BTreeMap<u32, f64>,
}

/// Price and demand per route, busiest first
pub fn route_statistics(dataset: &Dataset) -> Vec<RouteStats> {
    let mut demand_by_route: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for record in dataset {
        demand_by_route
            .entry(record.route())
            .or_default()
            .push(record.demand_score());
    }

    let mut routes: Vec<RouteStats> =
        stats::group_values(dataset.iter().map(|r| (r.route(), r.price())))
            .into_iter()
            .filter_map(|(route, prices)| {
                let avg = stats::mean(&prices)?;
                let min = prices.iter().copied().fold(f64::INFINITY, f64::min);
                let max = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                let demand = demand_by_route
                    .get(route)
                    .and_then(|d| stats::mean(d))
                    .unwrap_or(0.0);
                Some(RouteStats {
                    route: route.to_string(),
                    avg_price: round2(avg),
                    min_price: round2(min),
                    max_price: round2(max),
                    flight_count: prices.len(),
                    demand_score: round2(demand),
                })
            })
            .collect();

    // Stable: equal counts keep first-appearance order
    routes.sort_by(|a, b| b.flight_count.cmp(&a.flight_count));
    routes
}

/// Equal-width price histogram; the last bin includes the maximum
pub fn price_histogram(prices: &[f64], bins: usize) -> Vec<HistogramBin> {
    if prices.is_empty() || bins == 0 {
        return vec![];
    }

    let min = prices.iter().copied().fold(f64::INFINITY, f64::min);
    let max = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if max <= min {
        return vec![HistogramBin {
            lower: min,
            upper: max,
            count: prices.len(),
        }];
    }

    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for price in prices {
        let i = (((price - min) / width) as usize).min(bins - 1);
        counts[i] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: min + width * i as f64,
            upper: if i + 1 == bins {
                max
            } else {
                min + width * (i + 1) as f64
            },
            count,
        })
        .collect()
}

/// Everything the dashboard shows, zeroed for an empty dataset
pub fn dashboard_summary(dataset: &Dataset) -> DashboardSummary {
    let prices: Vec<f64> = dataset.iter().map(|r| r.price()).collect();
    let demand: Vec<f64> = dataset.iter().map(|r| r.demand_score()).collect();
    let total_flights = dataset.len();

    let mut route_demand: Vec<RouteDemand> =
        stats::grouped_means(dataset.iter().map(|r| (r.route(), r.demand_score())))
            .into_iter()
            .map(|(route, demand_score)| RouteDemand {
                route: route.to_string(),
                demand_score: round2(demand_score),
            })
            .collect();
    let total_routes = route_demand.len();
    route_demand.sort_by(|a, b| b.demand_score.total_cmp(&a.demand_score));
    route_demand.truncate(TOP_DEMAND_ROUTES);

    let market_share = stats::value_counts(dataset.iter().map(|r| r.airline()))
        .into_iter()
        .map(|(airline, flights)| AirlineShare {
            airline: airline.to_string(),
            flights,
            share: round2(flights as f64 * 100.0 / total_flights as f64),
        })
        .collect();

    let mut by_month: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
    for record in dataset {
        by_month
            .entry(record.date().month())
            .or_default()
            .push(record.demand_score());
    }
    let monthly_demand = by_month
        .into_iter()
        .filter_map(|(month, values)| stats::mean(&values).map(|m| (month, round2(m))))
        .collect();

    DashboardSummary {
        total_flights,
        avg_price: stats::mean(&prices).map(round2).unwrap_or(0.0),
        avg_demand: stats::mean(&demand).map(round2).unwrap_or(0.0),
        total_routes,
        price_distribution: price_histogram(&prices, PRICE_HISTOGRAM_BINS),
        route_demand,
        market_share,
        monthly_demand,
    }
}
