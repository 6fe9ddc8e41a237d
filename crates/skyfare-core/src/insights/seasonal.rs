//! Seasonal Evaluator
//!
//! Groups demand by calendar month and compares weekend with weekday demand.

use std::collections::BTreeMap;

use chrono::{Datelike, Weekday};

use crate::error::{Error, Result};
use crate::models::{Column, Dataset};
use crate::stats;

use super::engine::Evaluator;
use super::types::{Insight, InsightType, Trend};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Weekend/weekday demand ratio above which a weekend premium is reported
const WEEKEND_PREMIUM_RATIO: f64 = 1.1;

pub struct SeasonalEvaluator;

/// Full English name for a month number (1-12)
pub fn month_name(month: u32) -> Option<&'static str> {
    month
        .checked_sub(1)
        .and_then(|i| MONTH_NAMES.get(i as usize))
        .copied()
}

fn is_weekend(weekday: Weekday) -> bool {
    matches!(weekday, Weekday::Sat | Weekday::Sun)
}

/// Month with the highest mean; ties go to the earliest month
fn peak_month(monthly: &BTreeMap<u32, Vec<f64>>) -> Option<(u32, f64)> {
    let mut peak: Option<(u32, f64)> = None;
    for (month, values) in monthly {
        if let Some(m) = stats::mean(values) {
            match peak {
                Some((_, best)) if m <= best => {}
                _ => peak = Some((*month, m)),
            }
        }
    }
    peak
}

impl Evaluator for SeasonalEvaluator {
    fn name(&self) -> &'static str {
        "seasonal"
    }

    fn evaluate(&self, dataset: &Dataset, out: &mut Vec<Insight>) -> Result<()> {
        dataset.require(Column::Date)?;
        dataset.require(Column::DemandScore)?;
        dataset.require(Column::Price)?;

        let mut monthly_demand: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
        let mut monthly_price: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
        for record in dataset {
            let month = record.date().month();
            monthly_demand
                .entry(month)
                .or_default()
                .push(record.demand_score());
            monthly_price.entry(month).or_default().push(record.price());
        }

        // 1. Peak demand month
        let (peak_demand_month, peak_demand) = peak_month(&monthly_demand)
            .ok_or_else(|| Error::Computation("no monthly demand".into()))?;
        if let Some((peak_price_month, peak_price)) = peak_month(&monthly_price) {
            tracing::debug!(peak_price_month, peak_price, "Peak price month");
        }

        let month = month_name(peak_demand_month)
            .ok_or_else(|| Error::Computation(format!("invalid month {}", peak_demand_month)))?;

        out.push(
            Insight::new(
                InsightType::PeakDemandMonth,
                format!(
                    "{} shows highest demand with score {:.2}",
                    month, peak_demand
                ),
                peak_demand,
                Trend::Increasing,
            )
            .with_confidence(0.8),
        );

        // 2. Weekend vs weekday demand
        let (weekend, weekday): (Vec<_>, Vec<_>) =
            dataset.iter().partition(|r| is_weekend(r.date().weekday()));
        let weekend: Vec<f64> = weekend.iter().map(|r| r.demand_score()).collect();
        let weekday: Vec<f64> = weekday.iter().map(|r| r.demand_score()).collect();

        if let (Some(weekend_demand), Some(weekday_demand)) =
            (stats::mean(&weekend), stats::mean(&weekday))
        {
            if weekend_demand > weekday_demand * WEEKEND_PREMIUM_RATIO {
                if weekday_demand <= 0.0 {
                    return Err(Error::Computation(
                        "weekday demand is zero, weekend uplift undefined".into(),
                    ));
                }

                let ratio = weekend_demand / weekday_demand;
                out.push(
                    Insight::new(
                        InsightType::WeekendPremium,
                        format!(
                            "Weekend flights show {:.1}% higher demand",
                            (ratio - 1.0) * 100.0
                        ),
                        ratio,
                        Trend::Increasing,
                    )
                    .with_confidence(0.85),
                );
            }
        }

        Ok(())
    }
}
