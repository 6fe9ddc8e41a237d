//! Price Evaluator
//!
//! Looks at the overall price distribution:
//! - Volatility (coefficient of variation)
//! - Dominant price segments
//! - Correlation between price and demand

use crate::error::{Error, Result};
use crate::models::{Column, Dataset};
use crate::stats;

use super::engine::Evaluator;
use super::types::{Insight, InsightType, Severity, Trend};

/// Segment bounds as [min, max) in currency units
const PRICE_SEGMENTS: [(&str, f64, f64); 3] = [
    ("Budget", 0.0, 150.0),
    ("Mid_Range", 150.0, 300.0),
    ("Premium", 300.0, f64::INFINITY),
];

/// Segment share (percent) above which a segment is reported
const SEGMENT_DOMINANCE_PERCENT: f64 = 40.0;

const HIGH_VOLATILITY: f64 = 0.3;
const MODERATE_VOLATILITY: f64 = 0.15;

/// Minimum |r| for a reported price-demand correlation
const CORRELATION_THRESHOLD: f64 = 0.3;

pub struct PriceEvaluator;

impl PriceEvaluator {
    fn volatility_label(volatility: f64) -> &'static str {
        if volatility > HIGH_VOLATILITY {
            "high"
        } else if volatility > MODERATE_VOLATILITY {
            "moderate"
        } else {
            "low"
        }
    }

    fn correlation_label(r: f64) -> &'static str {
        if r > 0.5 {
            "Strong positive"
        } else if r > 0.3 {
            "Moderate positive"
        } else if r < -0.3 {
            "Moderate negative"
        } else {
            "Strong negative"
        }
    }
}

impl Evaluator for PriceEvaluator {
    fn name(&self) -> &'static str {
        "price"
    }

    fn evaluate(&self, dataset: &Dataset, out: &mut Vec<Insight>) -> Result<()> {
        let prices = dataset.prices()?;
        let avg_price =
            stats::mean(&prices).ok_or_else(|| Error::Computation("no prices".into()))?;
        let median_price = stats::median(&prices).unwrap_or(avg_price);
        // A single flight has no spread
        let price_std = stats::sample_std(&prices).unwrap_or(0.0);

        tracing::debug!(avg_price, median_price, price_std, "Price statistics");

        // 1. Volatility
        let volatility = if avg_price > 0.0 {
            price_std / avg_price
        } else {
            0.0
        };
        let is_high = volatility > HIGH_VOLATILITY;

        out.push(
            Insight::new(
                InsightType::PriceVolatility,
                format!(
                    "Market shows {} price volatility at {:.1}%",
                    Self::volatility_label(volatility),
                    volatility * 100.0
                ),
                volatility,
                if is_high { Trend::Volatile } else { Trend::Stable },
            )
            .with_confidence(0.85)
            .with_severity(if is_high {
                Severity::High
            } else {
                Severity::Medium
            }),
        );

        // 2. Dominant segments
        let total = prices.len() as f64;
        for (label, min, max) in PRICE_SEGMENTS {
            let count = prices.iter().filter(|p| **p >= min && **p < max).count();
            let percentage = count as f64 * 100.0 / total;

            if percentage > SEGMENT_DOMINANCE_PERCENT {
                out.push(
                    Insight::new(
                        InsightType::PriceSegment,
                        format!("{} flights dominate the market at {:.1}%", label, percentage),
                        percentage,
                        Trend::Stable,
                    )
                    .with_confidence(0.9),
                );
            }
        }

        // 3. Price-demand correlation (needs the demand column)
        if dataset.has_column(Column::DemandScore) {
            let demand = dataset.demand_scores()?;
            if let Some(r) = stats::pearson(&prices, &demand) {
                if r.abs() > CORRELATION_THRESHOLD {
                    out.push(
                        Insight::new(
                            InsightType::PriceDemandCorrelation,
                            format!(
                                "{} correlation between price and demand",
                                Self::correlation_label(r)
                            ),
                            r,
                            if r > 0.0 {
                                Trend::Increasing
                            } else {
                                Trend::Decreasing
                            },
                        )
                        .with_confidence(0.8),
                    );
                }
            }
        }

        Ok(())
    }
}
