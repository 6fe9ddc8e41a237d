//! Analyzer configuration
//!
//! Config is loaded with a two-layer resolution:
//! 1. An explicit path, or the override in the data dir
//!    (~/.local/share/skyfare/config/analyzer.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Rule thresholds are fixed and not part of the config.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::cache::DEFAULT_CAPACITY;
use crate::error::{Error, Result};
use crate::export::ExportFormat;

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/analyzer.toml");

#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerConfig {
    /// Age in days of the flight records considered for analysis and kept on cleanup
    pub data_retention_days: u32,
    /// Age in days of stored insights kept on cleanup
    pub insight_retention_days: u32,
    /// Optional cap on records read per analysis run
    pub max_records: Option<usize>,
    pub cache_capacity: usize,
    pub default_export_format: ExportFormat,
    /// Where the config was read from, `None` for embedded defaults
    pub source: Option<PathBuf>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            data_retention_days: 30,
            insight_retention_days: 7,
            max_records: None,
            cache_capacity: DEFAULT_CAPACITY,
            default_export_format: ExportFormat::Json,
            source: None,
        }
    }
}

impl AnalyzerConfig {
    /// Load from the override location if present, else embedded defaults
    pub fn load() -> Result<Self> {
        load_config(None)
    }

    /// Load from an explicit file
    pub fn from_path(path: &Path) -> Result<Self> {
        load_config(Some(path))
    }

    /// Parse a TOML document; missing keys keep their defaults
    pub fn parse(content: &str) -> Result<Self> {
        let raw: RawConfig =
            toml::from_str(content).map_err(|e| Error::Config(format!("Invalid config: {}", e)))?;

        let mut config = Self::default();

        if let Some(retention) = raw.retention {
            if let Some(days) = retention.data_retention_days {
                config.data_retention_days = days;
            }
            if let Some(days) = retention.insight_retention_days {
                config.insight_retention_days = days;
            }
        }

        if let Some(analysis) = raw.analysis {
            config.max_records = analysis.max_records;
            if let Some(capacity) = analysis.cache_capacity {
                config.cache_capacity = capacity;
            }
        }

        if let Some(export) = raw.export {
            if let Some(format) = export.default_format {
                config.default_export_format = format.parse()?;
            }
        }

        Ok(config)
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("skyfare").join("config").join("analyzer.toml"))
}

fn read_config(path: &Path) -> Result<AnalyzerConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Failed to read config {}: {}", path.display(), e))
    })?;
    let mut config = AnalyzerConfig::parse(&content)?;
    config.source = Some(path.to_path_buf());
    Ok(config)
}

/// Load configuration (explicit path, then override, then embedded default)
fn load_config(explicit: Option<&Path>) -> Result<AnalyzerConfig> {
    if let Some(path) = explicit {
        return read_config(path);
    }

    if let Some(default_path) = default_config_path() {
        if default_path.exists() {
            tracing::debug!(path = %default_path.display(), "Loading config override");
            return read_config(&default_path);
        }
    }

    AnalyzerConfig::parse(DEFAULT_CONFIG)
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    retention: Option<RawRetention>,
    analysis: Option<RawAnalysis>,
    export: Option<RawExport>,
}

#[derive(Debug, Deserialize)]
struct RawRetention {
    data_retention_days: Option<u32>,
    insight_retention_days: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RawAnalysis {
    max_records: Option<usize>,
    cache_capacity: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawExport {
    default_format: Option<String>,
}
