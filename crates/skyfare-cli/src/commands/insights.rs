//! Insight generation, summary report and export commands
//!
//! All of these go through one [`Analyzer`] per process, so a command that
//! generates several times over the same flights only runs the engine once.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use skyfare_core::{
    export::export_insights_as,
    insights::{get_high_priority_insights, get_insights_by_category},
    AnalyzerConfig, CacheStats, Database, Dataset, ExportFormat, Insight, InsightCache,
    InsightCategory, InsightEngine, Severity,
};

use super::{load_dataset, truncate};

/// Insight engine plus a result cache sized from the config
pub struct Analyzer {
    engine: InsightEngine,
    cache: InsightCache,
}

impl Analyzer {
    pub fn new(config: &AnalyzerConfig) -> Self {
        Self {
            engine: InsightEngine::new(),
            cache: InsightCache::new(config.cache_capacity),
        }
    }

    pub fn analyze(&mut self, dataset: &Dataset) -> Vec<Insight> {
        self.engine.generate_insights_cached(dataset, &mut self.cache)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

/// Load the retention window and run the engine over it
pub fn generate(
    db: &Database,
    config: &AnalyzerConfig,
    analyzer: &mut Analyzer,
) -> Result<Vec<Insight>> {
    let dataset = load_dataset(db, config)?;
    if dataset.is_empty() {
        println!(
            "No flight data in the last {} days. Import flights with:",
            config.data_retention_days
        );
        println!("  skyfare import --file flights.csv");
        return Ok(vec![]);
    }

    Ok(analyzer.analyze(&dataset))
}

/// Most urgent first, keeping engine order within a severity
pub fn sort_by_priority(insights: &mut [Insight]) {
    insights.sort_by_key(|i| std::cmp::Reverse(i.severity().priority()));
}

fn severity_icon(severity: Severity) -> &'static str {
    match severity {
        Severity::High => "🔴",
        Severity::Medium => "🟡",
        Severity::Low => "🟢",
    }
}

pub fn cmd_insights(
    db: &Database,
    config: &AnalyzerConfig,
    analyzer: &mut Analyzer,
    category: Option<&str>,
    priority_only: bool,
    json: bool,
) -> Result<()> {
    let category: Option<InsightCategory> = category
        .map(|c| c.parse().map_err(|e: String| anyhow::anyhow!(e)))
        .transpose()?;

    let insights = generate(db, config, analyzer)?;
    if insights.is_empty() {
        return Ok(());
    }

    // Persist the full set, filters only narrow what is shown
    db.save_market_insights(&insights)
        .context("Failed to save insights")?;

    let mut shown = match category {
        Some(category) => get_insights_by_category(&insights, category),
        None => insights,
    };
    if priority_only {
        shown = get_high_priority_insights(&shown);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&shown)?);
        return Ok(());
    }

    println!();
    println!("💡 Market Insights ({})", shown.len());
    println!("   ─────────────────────────────────────────────────────────────");

    if shown.is_empty() {
        println!("   No insights match the filter.");
        return Ok(());
    }

    sort_by_priority(&mut shown);

    for insight in &shown {
        println!(
            "   {} {:24} {}",
            severity_icon(insight.severity()),
            insight.insight_type(),
            truncate(insight.description(), 70)
        );
        println!(
            "      {} · {} · {:.0}% confidence{}",
            insight.category(),
            insight.trend(),
            insight.confidence() * 100.0,
            if insight.is_actionable() { " · actionable" } else { "" }
        );
    }

    Ok(())
}

pub fn cmd_report(db: &Database, config: &AnalyzerConfig, analyzer: &mut Analyzer) -> Result<()> {
    let insights = generate(db, config, analyzer)?;
    let report = skyfare_core::generate_summary_report(&insights);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

pub fn cmd_export(
    db: &Database,
    config: &AnalyzerConfig,
    analyzer: &mut Analyzer,
    format: Option<&str>,
    output: Option<&Path>,
) -> Result<()> {
    let format: ExportFormat = match format {
        Some(name) => name.parse()?,
        None => config.default_export_format,
    };

    let insights = generate(db, config, analyzer)?;
    let content = export_insights_as(&insights, format)?;

    match output {
        Some(path) => {
            fs::write(path, &content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!(
                "✅ Exported {} insights as {} to {}",
                insights.len(),
                format,
                path.display()
            );
        }
        None => print!("{}", content),
    }

    Ok(())
}

/// Save insights, print the summary report and optionally export, running
/// the engine once for all three
pub fn cmd_analyze(
    db: &Database,
    config: &AnalyzerConfig,
    analyzer: &mut Analyzer,
    format: Option<&str>,
    output: Option<&Path>,
) -> Result<()> {
    let insights = generate(db, config, analyzer)?;
    if insights.is_empty() {
        return Ok(());
    }

    let saved = db
        .save_market_insights(&insights)
        .context("Failed to save insights")?;
    println!("💾 Saved {} insights", saved);

    cmd_report(db, config, analyzer)?;

    if format.is_some() || output.is_some() {
        cmd_export(db, config, analyzer, format, output)?;
    }

    let stats = analyzer.cache_stats();
    tracing::debug!(
        hits = stats.hits,
        misses = stats.misses,
        hit_rate = stats.hit_rate(),
        "Insight cache"
    );

    Ok(())
}
