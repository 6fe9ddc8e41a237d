//! Airline Evaluator
//!
//! Market share of the leading carrier, concentration among the top three,
//! and carriers pricing well above the market.

use crate::error::{Error, Result};
use crate::models::{Column, Dataset};
use crate::stats;

use super::engine::Evaluator;
use super::types::{Insight, InsightType, Severity, Trend};

/// Airline mean price relative to the market mean that marks a premium carrier
const PREMIUM_PRICE_RATIO: f64 = 1.2;

/// Top-3 share (percent) above which concentration is high severity
const HIGH_CONCENTRATION_PERCENT: f64 = 70.0;

pub struct AirlineEvaluator;

impl Evaluator for AirlineEvaluator {
    fn name(&self) -> &'static str {
        "airline"
    }

    fn evaluate(&self, dataset: &Dataset, out: &mut Vec<Insight>) -> Result<()> {
        dataset.require(Column::Airline)?;
        let airline_counts = stats::value_counts(dataset.iter().map(|r| r.airline()));
        let total_flights = dataset.len() as f64;

        // 1. Market leader
        if let Some((leader, count)) = airline_counts.first() {
            let market_share = *count as f64 * 100.0 / total_flights;
            out.push(
                Insight::new(
                    InsightType::MarketLeader,
                    format!(
                        "{} leads the market with {:.1}% market share",
                        leader, market_share
                    ),
                    market_share,
                    Trend::Stable,
                )
                .with_confidence(0.95),
            );
        }

        // 2. Concentration among the top three
        let top_three: usize = airline_counts.iter().take(3).map(|(_, n)| n).sum();
        let concentration = top_three as f64 * 100.0 / total_flights;

        out.push(
            Insight::new(
                InsightType::MarketConcentration,
                format!("Top 3 airlines control {:.1}% of the market", concentration),
                concentration,
                Trend::Stable,
            )
            .with_confidence(0.9)
            .with_severity(if concentration > HIGH_CONCENTRATION_PERCENT {
                Severity::High
            } else {
                Severity::Medium
            }),
        );

        // 3. Premium carriers
        let prices = dataset.prices()?;
        let avg_price =
            stats::mean(&prices).ok_or_else(|| Error::Computation("no prices".into()))?;
        let premium_airlines = stats::grouped_means(dataset.iter().map(|r| (r.airline(), r.price())))
            .into_iter()
            .filter(|(_, airline_avg)| *airline_avg > avg_price * PREMIUM_PRICE_RATIO)
            .count();

        if premium_airlines > 0 {
            out.push(
                Insight::new(
                    InsightType::PremiumAirlines,
                    format!(
                        "{} airlines operate in the premium segment",
                        premium_airlines
                    ),
                    premium_airlines as f64,
                    Trend::Stable,
                )
                .with_confidence(0.8),
            );
        }

        Ok(())
    }
}
