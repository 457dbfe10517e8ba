use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("No usable price data survives alignment: {0}")]
    EmptyData(String),

    #[error("At least two aligned dates are required to compute returns, got {0}")]
    InsufficientData(usize),

    #[error("Weight keys do not match the return matrix tickers: missing {missing:?}, unexpected {unexpected:?}")]
    WeightMismatch {
        missing: Vec<String>,
        unexpected: Vec<String>,
    },

    #[error(transparent)]
    Core(#[from] CoreError),
}
