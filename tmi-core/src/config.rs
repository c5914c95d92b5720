//! Run configuration — basket symbols, weights, window, output path.
//!
//! Loaded from a TOML file or built from defaults matching the reference
//! basket: the four CME index futures, equal weight, trailing one year,
//! `data/TMI.csv`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::composite::equal_weights;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Configuration for one composite index build.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexConfig {
    /// Index name, used in messages and the run manifest.
    #[serde(default = "default_name")]
    pub name: String,

    /// Constituent symbols (Yahoo Finance tickers).
    #[serde(default = "default_symbols")]
    pub symbols: Vec<String>,

    /// Explicit per-symbol weights. Omit for equal weight `1/N`.
    #[serde(default)]
    pub weights: Option<HashMap<String, f64>>,

    /// Fixed day-count window. Omit for the trailing calendar year.
    #[serde(default)]
    pub lookback_days: Option<i64>,

    /// Output CSV path; fully replaced on every run.
    #[serde(default = "default_output")]
    pub output: PathBuf,
}

fn default_name() -> String {
    "TMI".to_string()
}

fn default_symbols() -> Vec<String> {
    ["ES=F", "NQ=F", "RTY=F", "YM=F"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_output() -> PathBuf {
    PathBuf::from("data/TMI.csv")
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            symbols: default_symbols(),
            weights: None,
            lookback_days: None,
            output: default_output(),
        }
    }
}

impl IndexConfig {
    /// Load and validate a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check structural invariants.
    ///
    /// Explicit weights must cover exactly the configured symbols and be
    /// finite and non-negative. The weight sum is deliberately not
    /// checked; the aggregator applies whatever weights it is given.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.symbols.is_empty() {
            return Err(ConfigError::Invalid("no symbols configured".into()));
        }

        let mut seen = std::collections::BTreeSet::new();
        for symbol in &self.symbols {
            if symbol.trim().is_empty() {
                return Err(ConfigError::Invalid("blank symbol".into()));
            }
            if !seen.insert(symbol) {
                return Err(ConfigError::Invalid(format!("duplicate symbol '{symbol}'")));
            }
        }

        if let Some(weights) = &self.weights {
            for symbol in weights.keys() {
                if !seen.contains(symbol) {
                    return Err(ConfigError::Invalid(format!(
                        "weight for unknown symbol '{symbol}'"
                    )));
                }
            }
            for symbol in &self.symbols {
                match weights.get(symbol) {
                    None => {
                        return Err(ConfigError::Invalid(format!(
                            "no weight for symbol '{symbol}'"
                        )))
                    }
                    Some(w) if !w.is_finite() || *w < 0.0 => {
                        return Err(ConfigError::Invalid(format!(
                            "weight for '{symbol}' must be finite and non-negative"
                        )))
                    }
                    Some(_) => {}
                }
            }
        }

        if let Some(days) = self.lookback_days {
            if days <= 0 {
                return Err(ConfigError::Invalid("lookback_days must be positive".into()));
            }
        }

        Ok(())
    }

    /// Effective per-symbol weights: the explicit map, or equal `1/N`.
    pub fn resolved_weights(&self) -> HashMap<String, f64> {
        match &self.weights {
            Some(weights) => weights.clone(),
            None => equal_weights(&self.symbols),
        }
    }
}
