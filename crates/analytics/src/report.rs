use serde::{Deserialize, Serialize};

/// A historical Value-at-Risk figure at one confidence level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueAtRisk {
    /// Confidence level in (0, 1), e.g. 0.95.
    pub confidence: f64,
    /// The loss threshold: the negated (1 - confidence) percentile of the
    /// return distribution. Positive for a series with meaningful downside.
    pub value: f64,
}

/// The standardized statistic set produced by the `MetricsEngine` for one
/// return series.
///
/// This struct is the data transfer object for performance results handed to
/// downstream reporting collaborators. A value may legitimately be NaN where
/// the metric documents that sentinel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    /// Geometric average yearly return implied by the series.
    pub annualized_return: f64,
    /// Yearly-scaled sample standard deviation of daily returns. NaN for a
    /// single-observation series.
    pub annualized_volatility: f64,
    /// Excess annualized return over total volatility. NaN when the
    /// volatility is exactly 0 (flat series) or itself NaN.
    pub sharpe_ratio: f64,
    /// Excess annualized return over downside-only volatility. NaN when
    /// fewer than two strictly negative returns exist or their deviation
    /// is 0.
    pub sortino_ratio: f64,
    /// Largest peak-to-trough decline of the cumulative growth factor.
    /// Always <= 0; 0 only for a series that never declines.
    pub max_drawdown: f64,
    /// Historical VaR at each configured confidence level, in input order.
    pub value_at_risk: Vec<ValueAtRisk>,
}

impl MetricsReport {
    /// Flattens the report into (metric name, value) pairs for tabular
    /// summaries. VaR entries are keyed by confidence, e.g. `var_95`.
    pub fn entries(&self) -> Vec<(String, f64)> {
        let mut entries = vec![
            ("annualized_return".to_string(), self.annualized_return),
            ("annualized_volatility".to_string(), self.annualized_volatility),
            ("sharpe_ratio".to_string(), self.sharpe_ratio),
            ("sortino_ratio".to_string(), self.sortino_ratio),
            ("max_drawdown".to_string(), self.max_drawdown),
        ];
        for var in &self.value_at_risk {
            entries.push((var_label(var.confidence), var.value));
        }
        entries
    }
}

fn var_label(confidence: f64) -> String {
    let pct = format!("{:.1}", confidence * 100.0);
    let pct = pct.trim_end_matches(".0");
    format!("var_{pct}")
}
