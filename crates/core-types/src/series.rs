use crate::error::CoreError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single dated close-price observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// The ordered close-price history of a single ticker, as handed over by the
/// fetch collaborator. Dates are strictly increasing and unique; calendar gaps
/// between observations are allowed and resolved later during alignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    ticker: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Validates and constructs a price series.
    ///
    /// Fails if the dates are not strictly increasing or if any price is not
    /// a finite number. An empty series is valid; the alignment stage decides
    /// whether it is usable.
    pub fn new(ticker: impl Into<String>, points: Vec<PricePoint>) -> Result<Self, CoreError> {
        let ticker = ticker.into();
        for (i, point) in points.iter().enumerate() {
            if !point.close.is_finite() {
                return Err(CoreError::NonFinitePrice {
                    ticker,
                    date: point.date,
                });
            }
            if i > 0 && point.date <= points[i - 1].date {
                return Err(CoreError::NonMonotonicDates {
                    ticker,
                    date: point.date,
                });
            }
        }
        Ok(Self { ticker, points })
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// An ordered sequence of dated simple returns.
///
/// Produced by the return calculator (one series per ticker) and by the
/// portfolio aggregator (the weighted combination). Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnSeries {
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl ReturnSeries {
    /// Constructs a return series from parallel date and value vectors.
    pub fn new(dates: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self, CoreError> {
        if dates.len() != values.len() {
            return Err(CoreError::ShapeMismatch(format!(
                "return series has {} dates but {} values",
                dates.len(),
                values.len()
            )));
        }
        Ok(Self { dates, values })
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over (date, return) pairs in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }
}

/// Per-ticker linear-combination coefficients for portfolio aggregation.
///
/// Weights are NOT renormalized and the sum is NOT required to be 1: the
/// aggregator computes a plain weighted sum, so a non-unit weight sum yields
/// a scaled combination. Callers that want an allocation must normalize
/// before constructing the vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightVector(BTreeMap<String, f64>);

impl WeightVector {
    pub fn new(weights: BTreeMap<String, f64>) -> Self {
        Self(weights)
    }

    pub fn get(&self, ticker: &str) -> Option<f64> {
        self.0.get(ticker).copied()
    }

    /// Tickers in lexicographic order.
    pub fn tickers(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, f64)> for WeightVector {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
