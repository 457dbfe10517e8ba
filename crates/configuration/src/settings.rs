use crate::error::ConfigError;
use core_types::WeightVector;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};

/// The root configuration structure for one analytics run.
///
/// Constructed once, validated, and passed explicitly into the pipeline and
/// the metrics engine. There is no ambient global state: two runs with
/// different portfolios can coexist in one process.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub portfolio: Portfolio,
    #[serde(default)]
    pub analytics: Analytics,
}

/// The asset universe and its aggregation weights.
#[derive(Debug, Clone, Deserialize)]
pub struct Portfolio {
    /// The tickers to analyze (e.g., ["AAPL", "MSFT"]).
    pub tickers: Vec<String>,
    /// Per-ticker linear-combination weights. Must cover exactly the ticker
    /// set; the sum is intentionally NOT required to be 1.
    pub weights: BTreeMap<String, f64>,
}

/// Parameters for the metrics engine.
#[derive(Debug, Clone, Deserialize)]
pub struct Analytics {
    /// Trading days per year used for annualization.
    #[serde(default = "default_trading_days")]
    pub trading_days_per_year: u32,
    /// Annual risk-free rate for Sharpe/Sortino numerators.
    #[serde(default)]
    pub risk_free_rate: f64,
    /// Historical VaR confidence levels, each in (0, 1).
    #[serde(default = "default_var_levels")]
    pub var_confidence_levels: Vec<f64>,
}

impl Default for Analytics {
    fn default() -> Self {
        Self {
            trading_days_per_year: default_trading_days(),
            risk_free_rate: 0.0,
            var_confidence_levels: default_var_levels(),
        }
    }
}

fn default_trading_days() -> u32 {
    252
}

fn default_var_levels() -> Vec<f64> {
    vec![0.95]
}

impl Config {
    /// Validates cross-field constraints the type system cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.portfolio.tickers.is_empty() {
            return Err(ConfigError::ValidationError(
                "portfolio.tickers must not be empty".to_string(),
            ));
        }

        let tickers: BTreeSet<&str> =
            self.portfolio.tickers.iter().map(String::as_str).collect();
        if tickers.len() != self.portfolio.tickers.len() {
            return Err(ConfigError::ValidationError(
                "portfolio.tickers contains duplicates".to_string(),
            ));
        }

        let weighted: BTreeSet<&str> =
            self.portfolio.weights.keys().map(String::as_str).collect();
        if tickers != weighted {
            return Err(ConfigError::ValidationError(format!(
                "portfolio.weights keys {:?} must match portfolio.tickers {:?}",
                weighted, tickers
            )));
        }

        if self.analytics.trading_days_per_year == 0 {
            return Err(ConfigError::ValidationError(
                "analytics.trading_days_per_year must be greater than 0".to_string(),
            ));
        }

        if self.analytics.var_confidence_levels.is_empty() {
            return Err(ConfigError::ValidationError(
                "analytics.var_confidence_levels must not be empty".to_string(),
            ));
        }
        for &level in &self.analytics.var_confidence_levels {
            if !(level > 0.0 && level < 1.0) {
                return Err(ConfigError::ValidationError(format!(
                    "VaR confidence level {level} must lie strictly between 0 and 1"
                )));
            }
        }

        Ok(())
    }

    /// The configured weights as the aggregator's input type.
    pub fn weight_vector(&self) -> WeightVector {
        self.portfolio
            .weights
            .iter()
            .map(|(ticker, weight)| (ticker.clone(), *weight))
            .collect()
    }
}
