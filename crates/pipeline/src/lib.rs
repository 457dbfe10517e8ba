//! # Meridian Pipeline
//!
//! The deterministic transformation stages between raw provider price tables
//! and the return series consumed by the analytics engine:
//!
//! 1. [`PriceAligner`] builds one gap-free price matrix from heterogeneous
//!    per-ticker tables.
//! 2. [`ReturnCalculator`] derives simple daily returns from it.
//! 3. [`PortfolioAggregator`] combines those into the weighted portfolio
//!    return series.
//!
//! Every stage is a pure, synchronous function of its inputs. The crate does
//! no I/O; raw tables are handed in already parsed.

pub mod aggregator;
pub mod aligner;
pub mod error;
pub mod raw;
pub mod returns;

// Re-export the key components to create a clean, public-facing API.
pub use aggregator::PortfolioAggregator;
pub use aligner::PriceAligner;
pub use error::PipelineError;
pub use raw::{RawPriceRow, RawPriceTable};
pub use returns::ReturnCalculator;
