use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Dates for '{ticker}' must be strictly increasing; violation at {date}")]
    NonMonotonicDates { ticker: String, date: NaiveDate },

    #[error("Non-finite price for '{ticker}' on {date}")]
    NonFinitePrice { ticker: String, date: NaiveDate },

    #[error("Invalid matrix shape: {0}")]
    ShapeMismatch(String),
}
