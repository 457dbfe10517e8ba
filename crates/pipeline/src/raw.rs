use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// One row of a raw provider price table: an observation date plus whatever
/// columns the provider emitted for it.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPriceRow {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub columns: Map<String, Value>,
}

/// A raw per-ticker price table, exactly as parsed from the provider payload.
///
/// Providers disagree on where the close price lives. Three layouts are
/// recognized, probed in order:
///
/// 1. a flat numeric column named like `close` / `adj_close`;
/// 2. a `close` object keyed by ticker (`{"close": {"AAPL": 101.0}}`);
/// 3. a ticker object carrying a close field (`{"AAPL": {"close": 101.0}}`).
///
/// A row where none of these yields a finite number is a gap for that ticker;
/// gaps are resolved later by the aligner, never here.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct RawPriceTable {
    rows: Vec<RawPriceRow>,
}

impl RawPriceTable {
    pub fn new(rows: Vec<RawPriceRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[RawPriceRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Locates the close prices for `ticker`, keyed and deduplicated by date.
    /// On duplicate dates the last row wins.
    pub fn close_prices(&self, ticker: &str) -> BTreeMap<NaiveDate, f64> {
        self.rows
            .iter()
            .filter_map(|row| row.close_price(ticker).map(|price| (row.date, price)))
            .collect()
    }
}

impl RawPriceRow {
    /// Probes the row's columns for a close price, trying the flat layout
    /// first and then the two hierarchical ones.
    pub fn close_price(&self, ticker: &str) -> Option<f64> {
        // Flat: a numeric column named like "close".
        for (key, value) in &self.columns {
            if is_close_key(key) {
                if let Some(price) = finite_number(value) {
                    return Some(price);
                }
            }
        }

        // Hierarchical: {"close": {ticker: price}}.
        for (key, value) in &self.columns {
            if is_close_key(key) {
                if let Some(price) = value.get(ticker).and_then(finite_number) {
                    return Some(price);
                }
            }
        }

        // Hierarchical: {ticker: {"close": price}}.
        if let Some(Value::Object(nested)) = self.columns.get(ticker) {
            for (key, value) in nested {
                if is_close_key(key) {
                    if let Some(price) = finite_number(value) {
                        return Some(price);
                    }
                }
            }
        }

        None
    }
}

/// Column-name match for the close field: case-insensitive, tolerating the
/// separator variants providers use ("Adj Close", "adj_close", "adjclose").
fn is_close_key(key: &str) -> bool {
    let normalized: String = key
        .chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .collect::<String>()
        .to_ascii_lowercase();
    normalized == "close" || normalized == "adjclose"
}

fn finite_number(value: &Value) -> Option<f64> {
    value.as_f64().filter(|v| v.is_finite())
}
