use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Cannot compute metrics for an empty return series")]
    EmptySeries,

    #[error(
        "Annualized return is undefined: cumulative growth factor {growth} is non-positive and the annualization exponent {exponent} is fractional"
    )]
    NumericDomain { growth: f64, exponent: f64 },
}
