// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use error::ConfigError;
pub use settings::{AlertThresholds, AnalyticsParams, Config, Universe};

/// Loads and validates the application configuration from the `config.toml`
/// file.
///
/// The file is optional: every section carries serde defaults, so a missing
/// file (or a file with only a few overrides) still produces a complete
/// `Config` matching the stock policy constants.
pub fn load_config() -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::with_name("config.toml").required(false))
        .build()?;

    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    tracing::debug!(
        tickers = config.universe.tickers.len(),
        min_days_needed = config.analytics.min_days_needed,
        volatility_window = config.analytics.volatility_window,
        drawdown_window = config.analytics.drawdown_window,
        "configuration loaded"
    );

    Ok(config)
}
