use crate::error::AnalyticsError;
use crate::report::{MetricsReport, ValueAtRisk};
use core_types::ReturnSeries;
use tracing::debug;

/// Trading days per year used for annualization unless configured otherwise.
pub const DEFAULT_TRADING_DAYS: u32 = 252;

/// Default VaR confidence level.
pub const DEFAULT_VAR_CONFIDENCE: f64 = 0.95;

/// A stateless calculator deriving the risk/performance statistic set from a
/// return series.
///
/// The engine imposes no minimum sample size beyond what each formula
/// structurally requires (one observation). Annualized figures computed from
/// very short series are statistically unreliable; that is a usage caveat,
/// not an enforced rule.
#[derive(Debug, Clone)]
pub struct MetricsEngine {
    trading_days: u32,
    risk_free_rate: f64,
    var_confidence_levels: Vec<f64>,
}

impl Default for MetricsEngine {
    fn default() -> Self {
        Self {
            trading_days: DEFAULT_TRADING_DAYS,
            risk_free_rate: 0.0,
            var_confidence_levels: vec![DEFAULT_VAR_CONFIDENCE],
        }
    }
}

impl MetricsEngine {
    /// Creates an engine with explicit parameters. Confidence levels are
    /// expected in (0, 1); configuration validates them before they reach
    /// this point.
    pub fn new(trading_days: u32, risk_free_rate: f64, var_confidence_levels: Vec<f64>) -> Self {
        Self {
            trading_days,
            risk_free_rate,
            var_confidence_levels,
        }
    }

    /// The main entry point: computes every metric for one return series.
    ///
    /// Applied identically to the portfolio series and to each asset series.
    pub fn calculate(&self, series: &ReturnSeries) -> Result<MetricsReport, AnalyticsError> {
        if series.is_empty() {
            return Err(AnalyticsError::EmptySeries);
        }
        let returns = series.values();

        let annualized_return = self.annualized_return(returns)?;
        let annualized_volatility = self.annualized_volatility(returns);
        let excess_return = annualized_return - self.risk_free_rate;

        let report = MetricsReport {
            annualized_return,
            annualized_volatility,
            sharpe_ratio: ratio_or_nan(excess_return, annualized_volatility),
            sortino_ratio: ratio_or_nan(excess_return, self.downside_volatility(returns)),
            max_drawdown: max_drawdown(returns),
            value_at_risk: self
                .var_confidence_levels
                .iter()
                .map(|&confidence| ValueAtRisk {
                    confidence,
                    value: historical_var(returns, confidence),
                })
                .collect(),
        };

        debug!(observations = returns.len(), "metrics computed");
        Ok(report)
    }

    /// Geometric annualization: `(prod(1+r))^(trading_days / n) - 1`.
    ///
    /// A non-positive cumulative growth factor under a fractional exponent
    /// has no real-valued power; that is surfaced as a numeric domain error
    /// rather than silently coerced to NaN.
    fn annualized_return(&self, returns: &[f64]) -> Result<f64, AnalyticsError> {
        let growth: f64 = returns.iter().fold(1.0, |acc, r| acc * (1.0 + r));
        let exponent = f64::from(self.trading_days) / returns.len() as f64;
        if growth <= 0.0 && exponent.fract() != 0.0 {
            return Err(AnalyticsError::NumericDomain { growth, exponent });
        }
        Ok(growth.powf(exponent) - 1.0)
    }

    /// Sample standard deviation scaled by sqrt(trading days). NaN for n < 2.
    fn annualized_volatility(&self, returns: &[f64]) -> f64 {
        sample_std(returns) * f64::from(self.trading_days).sqrt()
    }

    /// Downside deviation: the annualized sample standard deviation of the
    /// strictly negative returns only. NaN when fewer than two exist.
    fn downside_volatility(&self, returns: &[f64]) -> f64 {
        let downside: Vec<f64> = returns.iter().copied().filter(|r| *r < 0.0).collect();
        sample_std(&downside) * f64::from(self.trading_days).sqrt()
    }
}

/// `numerator / denominator`, degrading to NaN instead of infinity when the
/// denominator is exactly zero. A NaN denominator propagates on its own.
fn ratio_or_nan(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        f64::NAN
    } else {
        numerator / denominator
    }
}

/// Sample standard deviation (ddof = 1). NaN for fewer than two values.
fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    variance.sqrt()
}

/// Largest peak-to-trough decline of the cumulative growth factor:
/// `min over t of (cum[t] - running_max[t]) / running_max[t]`. Always <= 0.
fn max_drawdown(returns: &[f64]) -> f64 {
    let mut cumulative = 1.0;
    let mut peak = f64::NEG_INFINITY;
    let mut worst: f64 = 0.0;
    for r in returns {
        cumulative *= 1.0 + r;
        if cumulative > peak {
            peak = cumulative;
        }
        let drawdown = (cumulative - peak) / peak;
        if drawdown < worst {
            worst = drawdown;
        }
    }
    worst
}

/// Historical VaR: the negated `(1 - confidence) * 100`th percentile of the
/// return distribution.
///
/// The percentile uses linear interpolation between order statistics
/// (`idx = q * (n - 1)` into the ascending sort, fractional part
/// interpolating).
/// The method is pinned: different numeric libraries default to different
/// interpolations and downstream results are compared exactly.
fn historical_var(returns: &[f64], confidence: f64) -> f64 {
    let mut sorted = returns.to_vec();
    sorted.sort_unstable_by(f64::total_cmp);
    -percentile_linear(&sorted, 1.0 - confidence)
}

fn percentile_linear(sorted: &[f64], q: f64) -> f64 {
    let idx = q * (sorted.len() - 1) as f64;
    let lo = idx.floor() as usize;
    let hi = idx.ceil() as usize;
    let frac = idx - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn series(values: &[f64]) -> ReturnSeries {
        let start: NaiveDate = "2024-01-02".parse().unwrap();
        let dates = (0..values.len() as i64)
            .map(|i| start + chrono::Days::new(i as u64))
            .collect();
        ReturnSeries::new(dates, values.to_vec()).unwrap()
    }

    #[test]
    fn annualized_return_matches_geometric_formula() {
        let report = MetricsEngine::default()
            .calculate(&series(&[0.01, 0.01, 0.01]))
            .unwrap();

        // Growth 1.01^3 raised to 252/3 is exactly one year of 1% days.
        let expected = 1.01f64.powi(3).powf(252.0 / 3.0) - 1.0;
        assert!((report.annualized_return - expected).abs() < 1e-9);
    }

    #[test]
    fn flat_series_yields_nan_sharpe_not_an_error() {
        let report = MetricsEngine::default()
            .calculate(&series(&[0.01, 0.01, 0.01]))
            .unwrap();

        assert_eq!(report.annualized_volatility, 0.0);
        assert!(report.sharpe_ratio.is_nan());
    }

    #[test]
    fn annualized_volatility_scales_sample_std() {
        let report = MetricsEngine::default()
            .calculate(&series(&[0.01, 0.03]))
            .unwrap();

        let expected = 0.0002f64.sqrt() * 252f64.sqrt();
        assert!((report.annualized_volatility - expected).abs() < 1e-12);
    }

    #[test]
    fn single_observation_volatility_is_nan() {
        let report = MetricsEngine::default().calculate(&series(&[0.01])).unwrap();
        assert!(report.annualized_volatility.is_nan());
        assert!(report.sharpe_ratio.is_nan());
    }

    #[test]
    fn sortino_is_nan_without_downside_observations() {
        let no_negatives = MetricsEngine::default()
            .calculate(&series(&[0.01, 0.02, 0.0]))
            .unwrap();
        assert!(no_negatives.sortino_ratio.is_nan());

        // One negative return: its sample deviation is undefined.
        let one_negative = MetricsEngine::default()
            .calculate(&series(&[0.01, -0.02, 0.03]))
            .unwrap();
        assert!(one_negative.sortino_ratio.is_nan());
    }

    #[test]
    fn sortino_uses_downside_deviation_only() {
        let report = MetricsEngine::default()
            .calculate(&series(&[0.01, -0.02, 0.03, -0.04]))
            .unwrap();

        // Downside subset {-0.02, -0.04}: sample std 0.01 * sqrt(2).
        let downside_vol = 0.01 * 2f64.sqrt() * 252f64.sqrt();
        let expected = report.annualized_return / downside_vol;
        assert!((report.sortino_ratio - expected).abs() < 1e-12);
    }

    #[test]
    fn max_drawdown_is_never_positive() {
        let report = MetricsEngine::default()
            .calculate(&series(&[0.1, -0.5, 0.2]))
            .unwrap();
        assert!((report.max_drawdown - (-0.5)).abs() < 1e-12);
    }

    #[test]
    fn max_drawdown_is_zero_for_non_decreasing_growth() {
        let report = MetricsEngine::default()
            .calculate(&series(&[0.0, 0.1, 0.0, 0.05]))
            .unwrap();
        assert_eq!(report.max_drawdown, 0.0);
    }

    #[test]
    fn historical_var_golden_value() {
        let report = MetricsEngine::default()
            .calculate(&series(&[-0.05, -0.02, 0.00, 0.01, 0.03]))
            .unwrap();

        // 5th percentile with linear interpolation: idx 0.2 between -0.05
        // and -0.02 gives -0.044; VaR negates it.
        let var = &report.value_at_risk[0];
        assert_eq!(var.confidence, 0.95);
        assert!((var.value - 0.044).abs() < 1e-12);
    }

    #[test]
    fn multiple_var_levels_are_reported_in_order() {
        let engine = MetricsEngine::new(252, 0.0, vec![0.95, 0.99]);
        let report = engine
            .calculate(&series(&[-0.05, -0.02, 0.00, 0.01, 0.03]))
            .unwrap();

        assert_eq!(report.value_at_risk.len(), 2);
        assert_eq!(report.value_at_risk[0].confidence, 0.95);
        assert_eq!(report.value_at_risk[1].confidence, 0.99);
        // The 1% percentile interpolates closer to the worst observation.
        assert!(report.value_at_risk[1].value > report.value_at_risk[0].value);
    }

    #[test]
    fn non_positive_growth_with_fractional_exponent_is_a_domain_error() {
        // Growth factor (1 - 2) = -1 under exponent 252/5 = 50.4.
        let err = MetricsEngine::default()
            .calculate(&series(&[-2.0, 0.0, 0.0, 0.0, 0.0]))
            .unwrap_err();
        assert!(matches!(err, AnalyticsError::NumericDomain { .. }));
    }

    #[test]
    fn nonzero_risk_free_rate_shifts_the_numerator() {
        let base = MetricsEngine::new(252, 0.0, vec![0.95]);
        let shifted = MetricsEngine::new(252, 0.02, vec![0.95]);
        let s = series(&[0.01, -0.02, 0.03, -0.01]);

        let r0 = base.calculate(&s).unwrap();
        let r2 = shifted.calculate(&s).unwrap();
        let delta = 0.02 / r0.annualized_volatility;
        assert!((r0.sharpe_ratio - r2.sharpe_ratio - delta).abs() < 1e-12);
    }

    #[test]
    fn empty_series_is_rejected() {
        let err = MetricsEngine::default().calculate(&series(&[])).unwrap_err();
        assert!(matches!(err, AnalyticsError::EmptySeries));
    }
}
