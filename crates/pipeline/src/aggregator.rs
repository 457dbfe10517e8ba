use crate::error::PipelineError;
use core_types::{ReturnMatrix, ReturnSeries, WeightVector};
use std::collections::BTreeSet;
use tracing::debug;

/// Combines per-asset return series into a single weighted portfolio series.
///
/// The combination is a plain weighted sum: weights are linear-combination
/// coefficients and are never renormalized, so a weight vector that does not
/// sum to 1 produces a scaled series rather than an error.
#[derive(Debug, Default)]
pub struct PortfolioAggregator {}

impl PortfolioAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes `portfolio[t] = sum over k of weight[k] * return[k][t]`.
    ///
    /// The weight key set must exactly equal the matrix ticker set
    /// (order-independent); any missing or unexpected ticker fails the run
    /// with [`PipelineError::WeightMismatch`].
    pub fn aggregate(
        &self,
        returns: &ReturnMatrix,
        weights: &WeightVector,
    ) -> Result<ReturnSeries, PipelineError> {
        let matrix_tickers: BTreeSet<&str> =
            returns.tickers().iter().map(String::as_str).collect();
        let weight_tickers: BTreeSet<&str> = weights.tickers().collect();

        if matrix_tickers != weight_tickers {
            let missing = matrix_tickers
                .difference(&weight_tickers)
                .map(|t| t.to_string())
                .collect();
            let unexpected = weight_tickers
                .difference(&matrix_tickers)
                .map(|t| t.to_string())
                .collect();
            return Err(PipelineError::WeightMismatch { missing, unexpected });
        }

        let mut values = vec![0.0; returns.len()];
        for (ticker, column) in returns.iter_columns() {
            // Key equality was checked above.
            let weight = weights.get(ticker).unwrap_or(0.0);
            for (acc, r) in values.iter_mut().zip(column) {
                *acc += weight * r;
            }
        }

        debug!(rows = values.len(), "aggregated portfolio return series");
        Ok(ReturnSeries::new(returns.dates().to_vec(), values)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn matrix() -> ReturnMatrix {
        ReturnMatrix::new(
            vec![d("2024-01-03"), d("2024-01-04")],
            vec!["A".to_string(), "B".to_string()],
            vec![vec![0.01, -0.02], vec![0.03, 0.04]],
        )
        .unwrap()
    }

    #[test]
    fn one_hot_weights_reproduce_the_asset_series_exactly() {
        let weights: WeightVector =
            [("A".to_string(), 1.0), ("B".to_string(), 0.0)].into_iter().collect();

        let portfolio = PortfolioAggregator::new()
            .aggregate(&matrix(), &weights)
            .unwrap();

        assert_eq!(portfolio, matrix().series("A").unwrap());
    }

    #[test]
    fn weighted_sum_is_not_renormalized() {
        // Weights summing to 2 scale the combination, by design.
        let weights: WeightVector =
            [("A".to_string(), 1.0), ("B".to_string(), 1.0)].into_iter().collect();

        let portfolio = PortfolioAggregator::new()
            .aggregate(&matrix(), &weights)
            .unwrap();

        assert!((portfolio.values()[0] - 0.04).abs() < 1e-12);
        assert!((portfolio.values()[1] - 0.02).abs() < 1e-12);
    }

    #[test]
    fn missing_weight_key_is_a_mismatch() {
        let weights: WeightVector = [("A".to_string(), 1.0)].into_iter().collect();

        let err = PortfolioAggregator::new()
            .aggregate(&matrix(), &weights)
            .unwrap_err();
        match err {
            PipelineError::WeightMismatch { missing, unexpected } => {
                assert_eq!(missing, vec!["B".to_string()]);
                assert!(unexpected.is_empty());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unexpected_weight_key_is_a_mismatch() {
        let weights: WeightVector = [
            ("A".to_string(), 0.5),
            ("B".to_string(), 0.5),
            ("C".to_string(), 0.0),
        ]
        .into_iter()
        .collect();

        let err = PortfolioAggregator::new()
            .aggregate(&matrix(), &weights)
            .unwrap_err();
        assert!(matches!(err, PipelineError::WeightMismatch { .. }));
    }
}
