use tracing::info;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use error::ConfigError;
pub use settings::{Analytics, Config, Portfolio};

/// Loads and validates the application configuration from a TOML file.
///
/// This function is the primary entry point for this crate. It reads the
/// configuration file, deserializes it into our strongly-typed `Config`
/// struct, validates cross-field constraints, and returns it.
pub fn load_config(path: &str) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::with_name(path))
        .build()?;

    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    info!(
        tickers = config.portfolio.tickers.len(),
        trading_days = config.analytics.trading_days_per_year,
        "configuration loaded"
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    // Uses the crate-root re-exports on purpose: they are the public API
    // callers see, and this keeps them compiling.
    #[test]
    fn missing_file_is_a_load_error() {
        let err = crate::load_config("no-such-config").unwrap_err();
        assert!(matches!(err, crate::ConfigError::LoadError(_)));
    }
}
