//! Insight Engine - runs the rule evaluators and aggregates their output

use crate::cache::InsightCache;
use crate::error::Result;
use crate::models::Dataset;

use super::types::{Insight, InsightCategory};
use super::{
    AirlineEvaluator, CompetitionEvaluator, DemandEvaluator, PredictiveEvaluator, PriceEvaluator,
    RouteEvaluator, SeasonalEvaluator,
};

/// A rule module producing insights from one analytical angle
///
/// Evaluators append to `out` as they go. When `evaluate` returns an error,
/// whatever was already appended is kept and the engine moves on to the
/// next evaluator.
pub trait Evaluator: Send + Sync {
    /// Human-readable name used in diagnostics
    fn name(&self) -> &'static str;

    /// Analyze the dataset and append insights
    fn evaluate(&self, dataset: &Dataset, out: &mut Vec<Insight>) -> Result<()>;
}

/// The main insight engine that orchestrates the evaluators
pub struct InsightEngine {
    evaluators: Vec<Box<dyn Evaluator>>,
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightEngine {
    /// Create an engine with the built-in evaluators in their fixed order
    pub fn new() -> Self {
        let mut engine = Self::empty();

        engine.register(Box::new(PriceEvaluator));
        engine.register(Box::new(DemandEvaluator));
        engine.register(Box::new(RouteEvaluator));
        engine.register(Box::new(AirlineEvaluator));
        engine.register(Box::new(SeasonalEvaluator));
        engine.register(Box::new(CompetitionEvaluator));
        engine.register(Box::new(PredictiveEvaluator));

        engine
    }

    /// Create an engine with no evaluators registered
    pub fn empty() -> Self {
        Self { evaluators: vec![] }
    }

    /// Register an evaluator; it runs after those already registered
    pub fn register(&mut self, evaluator: Box<dyn Evaluator>) {
        self.evaluators.push(evaluator);
    }

    /// Names of the registered evaluators, in call order
    pub fn evaluator_names(&self) -> Vec<&'static str> {
        self.evaluators.iter().map(|e| e.name()).collect()
    }

    /// Run every evaluator and concatenate their output in registration order
    ///
    /// Never fails: an evaluator error is logged and only drops the insights
    /// that evaluator had not produced yet.
    pub fn generate_insights(&self, dataset: &Dataset) -> Vec<Insight> {
        if dataset.is_empty() {
            return vec![];
        }

        let mut all_insights = vec![];

        for evaluator in &self.evaluators {
            let mut produced = vec![];
            match evaluator.evaluate(dataset, &mut produced) {
                Ok(()) => {
                    tracing::debug!(
                        evaluator = evaluator.name(),
                        count = produced.len(),
                        "Evaluator complete"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        evaluator = evaluator.name(),
                        dataset_size = dataset.len(),
                        kept = produced.len(),
                        error = %e,
                        "Evaluator failed"
                    );
                }
            }
            all_insights.extend(produced);
        }

        tracing::info!(count = all_insights.len(), "Generated market insights");
        all_insights
    }

    /// Like [`generate_insights`](Self::generate_insights), reusing a cached
    /// result for a dataset with identical content
    pub fn generate_insights_cached(
        &self,
        dataset: &Dataset,
        cache: &mut InsightCache,
    ) -> Vec<Insight> {
        let key = dataset.content_hash();
        if let Some(hit) = cache.get(&key) {
            tracing::debug!(key = %key, "Insight cache hit");
            return hit.to_vec();
        }

        let insights = self.generate_insights(dataset);
        cache.insert(key, insights.clone());
        insights
    }
}

/// Insights filed under the given category, in their original order
pub fn get_insights_by_category(insights: &[Insight], category: InsightCategory) -> Vec<Insight> {
    insights
        .iter()
        .filter(|i| i.category() == category)
        .cloned()
        .collect()
}

/// Insights with confidence > 0.8 that are actionable and high severity
pub fn get_high_priority_insights(insights: &[Insight]) -> Vec<Insight> {
    insights
        .iter()
        .filter(|i| i.is_high_priority())
        .cloned()
        .collect()
}
