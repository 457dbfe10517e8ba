use crate::error::CoreError;
use crate::series::ReturnSeries;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A gap-free price matrix over a common date index.
///
/// Invariants, enforced at construction:
/// - the date index is strictly increasing with no duplicates;
/// - every ticker column has exactly one finite value per date.
///
/// Columns are stored ticker-major, in the same order as `tickers`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedPriceMatrix {
    dates: Vec<NaiveDate>,
    tickers: Vec<String>,
    columns: Vec<Vec<f64>>,
}

impl AlignedPriceMatrix {
    pub fn new(
        dates: Vec<NaiveDate>,
        tickers: Vec<String>,
        columns: Vec<Vec<f64>>,
    ) -> Result<Self, CoreError> {
        validate_frame(&dates, &tickers, &columns)?;
        Ok(Self { dates, tickers, columns })
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    /// Number of dates (rows).
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// The full price column for a ticker, if present.
    pub fn column(&self, ticker: &str) -> Option<&[f64]> {
        let idx = self.tickers.iter().position(|t| t == ticker)?;
        Some(&self.columns[idx])
    }

    /// Iterates over (ticker, column) pairs in ticker order.
    pub fn iter_columns(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.tickers
            .iter()
            .map(String::as_str)
            .zip(self.columns.iter().map(Vec::as_slice))
    }
}

/// Per-ticker simple-return columns over a common date index.
///
/// Same shape and invariants as [`AlignedPriceMatrix`], but the index starts
/// at the second aligned date (the first date has no predecessor to compute a
/// return against).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnMatrix {
    dates: Vec<NaiveDate>,
    tickers: Vec<String>,
    columns: Vec<Vec<f64>>,
}

impl ReturnMatrix {
    pub fn new(
        dates: Vec<NaiveDate>,
        tickers: Vec<String>,
        columns: Vec<Vec<f64>>,
    ) -> Result<Self, CoreError> {
        validate_frame(&dates, &tickers, &columns)?;
        Ok(Self { dates, tickers, columns })
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn column(&self, ticker: &str) -> Option<&[f64]> {
        let idx = self.tickers.iter().position(|t| t == ticker)?;
        Some(&self.columns[idx])
    }

    pub fn iter_columns(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.tickers
            .iter()
            .map(String::as_str)
            .zip(self.columns.iter().map(Vec::as_slice))
    }

    /// Extracts one ticker's column as a standalone [`ReturnSeries`].
    pub fn series(&self, ticker: &str) -> Option<ReturnSeries> {
        let column = self.column(ticker)?.to_vec();
        // Shape already validated at construction.
        ReturnSeries::new(self.dates.clone(), column).ok()
    }
}

fn validate_frame(
    dates: &[NaiveDate],
    tickers: &[String],
    columns: &[Vec<f64>],
) -> Result<(), CoreError> {
    if tickers.len() != columns.len() {
        return Err(CoreError::ShapeMismatch(format!(
            "{} tickers but {} columns",
            tickers.len(),
            columns.len()
        )));
    }
    for window in dates.windows(2) {
        if window[1] <= window[0] {
            return Err(CoreError::ShapeMismatch(format!(
                "date index not strictly increasing at {}",
                window[1]
            )));
        }
    }
    for (ticker, column) in tickers.iter().zip(columns) {
        if column.len() != dates.len() {
            return Err(CoreError::ShapeMismatch(format!(
                "column '{}' has {} values for {} dates",
                ticker,
                column.len(),
                dates.len()
            )));
        }
        if column.iter().any(|v| !v.is_finite()) {
            return Err(CoreError::ShapeMismatch(format!(
                "column '{ticker}' contains a non-finite value"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn matrix_rejects_ragged_columns() {
        let err = AlignedPriceMatrix::new(
            vec![d("2024-01-02"), d("2024-01-03")],
            vec!["A".to_string()],
            vec![vec![100.0]],
        );
        assert!(matches!(err, Err(CoreError::ShapeMismatch(_))));
    }

    #[test]
    fn matrix_rejects_unsorted_dates() {
        let err = AlignedPriceMatrix::new(
            vec![d("2024-01-03"), d("2024-01-02")],
            vec!["A".to_string()],
            vec![vec![100.0, 101.0]],
        );
        assert!(matches!(err, Err(CoreError::ShapeMismatch(_))));
    }

    #[test]
    fn matrix_rejects_gaps() {
        let err = AlignedPriceMatrix::new(
            vec![d("2024-01-02")],
            vec!["A".to_string()],
            vec![vec![f64::NAN]],
        );
        assert!(matches!(err, Err(CoreError::ShapeMismatch(_))));
    }

    #[test]
    fn return_matrix_series_extraction_matches_column() {
        let matrix = ReturnMatrix::new(
            vec![d("2024-01-03"), d("2024-01-04")],
            vec!["A".to_string(), "B".to_string()],
            vec![vec![0.01, -0.02], vec![0.005, 0.0]],
        )
        .unwrap();

        let series = matrix.series("B").unwrap();
        assert_eq!(series.values(), &[0.005, 0.0]);
        assert_eq!(series.dates(), matrix.dates());
        assert!(matrix.series("C").is_none());
    }
}
