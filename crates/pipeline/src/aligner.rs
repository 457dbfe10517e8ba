use crate::error::PipelineError;
use crate::raw::RawPriceTable;
use chrono::NaiveDate;
use core_types::{AlignedPriceMatrix, PricePoint, PriceSeries};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

/// Normalizes heterogeneous per-ticker price tables into one gap-free
/// aligned price matrix.
///
/// The date index is the union of every date on which at least one ticker has
/// a readable close (a date no ticker observed would be an all-missing row
/// and is therefore never indexed). Per-cell gaps are resolved by propagating
/// the nearest earlier observation forward, then the nearest later
/// observation backward, so leading gaps before a ticker's first observation
/// are also filled. This fill policy is pinned behavior: it trades accuracy
/// on long gaps for determinism and must not be swapped for interpolation
/// without revisiting the regression tests.
#[derive(Debug, Default)]
pub struct PriceAligner {}

impl PriceAligner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aligns raw provider tables, locating each ticker's close column
    /// regardless of flat or hierarchical layout.
    ///
    /// A ticker whose table yields no readable close at all is excluded and
    /// logged, unless every ticker is excluded; then the run fails with
    /// [`PipelineError::EmptyData`] rather than producing an empty matrix.
    pub fn align(
        &self,
        tables: &BTreeMap<String, RawPriceTable>,
    ) -> Result<AlignedPriceMatrix, PipelineError> {
        let mut series = Vec::with_capacity(tables.len());
        for (ticker, table) in tables {
            let closes = table.close_prices(ticker);
            let points = closes
                .into_iter()
                .map(|(date, close)| PricePoint { date, close })
                .collect();
            series.push(PriceSeries::new(ticker.clone(), points)?);
        }
        self.align_series(&series)
    }

    /// Aligns already-extracted per-ticker price series onto the union of
    /// their dates.
    pub fn align_series(
        &self,
        series: &[PriceSeries],
    ) -> Result<AlignedPriceMatrix, PipelineError> {
        let mut usable: Vec<(&str, BTreeMap<NaiveDate, f64>)> = Vec::with_capacity(series.len());
        for s in series {
            if s.is_empty() {
                debug!(ticker = s.ticker(), "excluding ticker with no usable rows");
                continue;
            }
            let closes = s.points().iter().map(|p| (p.date, p.close)).collect();
            usable.push((s.ticker(), closes));
        }

        if usable.is_empty() {
            return Err(PipelineError::EmptyData(
                "no ticker contributed a usable close column".to_string(),
            ));
        }

        let index: BTreeSet<NaiveDate> = usable
            .iter()
            .flat_map(|(_, closes)| closes.keys().copied())
            .collect();
        if index.is_empty() {
            return Err(PipelineError::EmptyData(
                "no dates remain after alignment".to_string(),
            ));
        }

        let dates: Vec<NaiveDate> = index.into_iter().collect();
        let mut tickers = Vec::with_capacity(usable.len());
        let mut columns = Vec::with_capacity(usable.len());
        for (ticker, closes) in &usable {
            if let Some(column) = filled_column(&dates, closes) {
                tickers.push(ticker.to_string());
                columns.push(column);
            }
        }

        info!(
            tickers = tickers.len(),
            dates = dates.len(),
            "aligned price matrix assembled"
        );
        Ok(AlignedPriceMatrix::new(dates, tickers, columns)?)
    }
}

/// Resolves one ticker's column over the common index: forward-fill from the
/// nearest earlier observation, backward-fill where none exists yet. Returns
/// `None` for a ticker with no observations at all.
fn filled_column(dates: &[NaiveDate], closes: &BTreeMap<NaiveDate, f64>) -> Option<Vec<f64>> {
    let first = *closes.values().next()?;
    let column = dates
        .iter()
        .map(|date| match closes.range(..=*date).next_back() {
            Some((_, price)) => *price,
            // Leading gap: no earlier observation exists, so the nearest
            // later one is the first observation overall.
            None => first,
        })
        .collect();
    Some(column)
}
