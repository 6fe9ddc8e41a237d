//! Insight Engine - Flight Market Insights
//!
//! A fixed sequence of rule evaluators reads a flight dataset and produces
//! typed market insights. Each evaluator looks at the market from one angle;
//! a failure in one never stops the others.
//!
//! ## Evaluators (in run order)
//!
//! - **Price** - volatility, dominant segments, price-demand correlation
//! - **Demand** - overall demand tier, high-demand route, variability
//! - **Route** - popularity, concentration, value routes
//! - **Airline** - market leader, concentration, premium carriers
//! - **Seasonal** - peak demand month, weekend premium
//! - **Competition** - contested and single-carrier routes, price spread
//! - **Predictive** - price premium, growth routes, capacity constraints
//!
//! ## Usage
//!
//! ```rust,ignore
//! use skyfare_core::insights::{generate_summary_report, InsightEngine};
//!
//! let engine = InsightEngine::new();
//! let insights = engine.generate_insights(&dataset);
//! let report = generate_summary_report(&insights);
//! ```

pub mod airline;
pub mod competition;
pub mod demand;
pub mod engine;
pub mod predictive;
pub mod price;
pub mod report;
pub mod route;
pub mod seasonal;
pub mod types;

pub use airline::AirlineEvaluator;
pub use competition::CompetitionEvaluator;
pub use demand::DemandEvaluator;
pub use engine::{get_high_priority_insights, get_insights_by_category, Evaluator, InsightEngine};
pub use predictive::PredictiveEvaluator;
pub use price::PriceEvaluator;
pub use report::{
    generate_recommendations, generate_summary_report, InsightSummary, KeyFinding, SummaryReport,
};
pub use route::RouteEvaluator;
pub use seasonal::SeasonalEvaluator;
pub use types::{DemandLevel, Insight, InsightCategory, InsightType, Severity, Trend};
