use crate::error::PipelineError;
use core_types::{AlignedPriceMatrix, ReturnMatrix};
use tracing::debug;

/// Derives simple daily returns from an aligned price matrix.
#[derive(Debug, Default)]
pub struct ReturnCalculator {}

impl ReturnCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes `return[t] = price[t] / price[t-1] - 1` per ticker.
    ///
    /// The output has one row fewer than the input: the first aligned date
    /// has no predecessor. Fails with [`PipelineError::InsufficientData`]
    /// when fewer than two aligned dates are available.
    pub fn calculate(&self, prices: &AlignedPriceMatrix) -> Result<ReturnMatrix, PipelineError> {
        if prices.len() < 2 {
            return Err(PipelineError::InsufficientData(prices.len()));
        }

        let dates = prices.dates()[1..].to_vec();
        let mut tickers = Vec::new();
        let mut columns = Vec::new();
        for (ticker, column) in prices.iter_columns() {
            let returns: Vec<f64> = column
                .windows(2)
                .map(|w| w[1] / w[0] - 1.0)
                .collect();
            tickers.push(ticker.to_string());
            columns.push(returns);
        }

        debug!(rows = dates.len(), tickers = tickers.len(), "derived return matrix");
        Ok(ReturnMatrix::new(dates, tickers, columns)?)
    }
}
