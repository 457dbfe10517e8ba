pub mod error;
pub mod matrix;
pub mod series;

// Re-export the core types to provide a clean public API.
pub use error::CoreError;
pub use matrix::{AlignedPriceMatrix, ReturnMatrix};
pub use series::{PricePoint, PriceSeries, ReturnSeries, WeightVector};
