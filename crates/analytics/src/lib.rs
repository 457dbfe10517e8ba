//! # Meridian Analytics Engine
//!
//! This crate computes the scalar risk/performance statistic set from a
//! return series. It acts as the "unbiased judge" of the system: the same
//! engine is applied to the portfolio series and to each asset series.
//!
//! ## Architectural Principles
//!
//! - **Pure logic crate:** no knowledge of external systems; depends only on
//!   `core-types`.
//! - **Stateless calculation:** the `MetricsEngine` holds only its
//!   parameters (trading days per year, risk-free rate, VaR confidence
//!   levels). Given the same series it always produces the same
//!   `MetricsReport`.
//!
//! ## NaN semantics
//!
//! Sharpe and Sortino legitimately degrade to `f64::NAN` (flat series, no
//! downside observations); that is a documented sentinel, not an error.
//! The only numeric failure is a fractional power of a non-positive
//! cumulative growth factor in the annualized return, surfaced as
//! [`AnalyticsError::NumericDomain`].

pub mod engine;
pub mod error;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use engine::MetricsEngine;
pub use error::AnalyticsError;
pub use report::{MetricsReport, ValueAtRisk};
