use crate::error::ConfigError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

/// The root configuration structure for the entire application.
///
/// Every section has serde defaults, so a partial (or absent) `config.toml`
/// still yields a fully usable configuration with the stock defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub universe: Universe,
    #[serde(default)]
    pub analytics: AnalyticsParams,
    #[serde(default)]
    pub alerts: AlertThresholds,
}

impl Config {
    /// Checks the universe for values the rest of the pipeline cannot act
    /// on. Engine and alerter parameters carry their own validation in the
    /// crates that consume them.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.universe.tickers.is_empty() {
            return Err(ConfigError::ValidationError(
                "universe.tickers must name at least one symbol".to_string(),
            ));
        }
        if let Some(end) = self.universe.end_date {
            if end < self.universe.start_date {
                return Err(ConfigError::ValidationError(format!(
                    "universe.end_date {} precedes start_date {}",
                    end, self.universe.start_date
                )));
            }
        }
        Ok(())
    }
}

/// The ticker universe and the calendar window to analyze.
#[derive(Debug, Clone, Deserialize)]
pub struct Universe {
    /// The tickers the pipeline processes by default.
    #[serde(default = "default_tickers")]
    pub tickers: Vec<String>,
    /// The first calendar date of the data window.
    #[serde(default = "default_start_date")]
    pub start_date: NaiveDate,
    /// The last calendar date of the data window. `None` means "up to the
    /// latest bar available".
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

/// Parameters for the rolling analytics engine.
///
/// These are policy constants, not laws of nature; they are configurable so
/// tests and experiments can use arbitrary windows without patching code.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyticsParams {
    /// Minimum number of daily bars a symbol must have to enter the engine.
    /// Must exceed `drawdown_window` so at least one fully-populated row
    /// comes out the other end.
    #[serde(default = "default_min_days_needed")]
    pub min_days_needed: usize,
    /// Trailing window (in trading days) for volatility and rolling yield.
    #[serde(default = "default_volatility_window")]
    pub volatility_window: usize,
    /// Trailing window (in trading days) for the max-drawdown metric.
    #[serde(default = "default_drawdown_window")]
    pub drawdown_window: usize,
    /// Trading days per year, used to annualize the Sharpe ratio.
    #[serde(default = "default_trading_days_per_year")]
    pub trading_days_per_year: u32,
    /// Weight of volatility in the composite risk score.
    #[serde(default = "default_risk_weight_volatility")]
    pub risk_weight_volatility: Decimal,
    /// Weight of max drawdown in the composite risk score.
    #[serde(default = "default_risk_weight_drawdown")]
    pub risk_weight_drawdown: Decimal,
}

/// Thresholds for the alert scan over each symbol's latest analytics row.
#[derive(Debug, Clone, Deserialize)]
pub struct AlertThresholds {
    /// Rolling daily yield above which a symbol is flagged (0.01 = 1%).
    #[serde(default = "default_yield_threshold")]
    pub yield_threshold: Decimal,
    /// Composite risk score above which a symbol is flagged.
    #[serde(default = "default_risk_threshold")]
    pub risk_threshold: Decimal,
}

impl Default for Universe {
    fn default() -> Self {
        Self {
            tickers: default_tickers(),
            start_date: default_start_date(),
            end_date: None,
        }
    }
}

impl Default for AnalyticsParams {
    fn default() -> Self {
        Self {
            min_days_needed: default_min_days_needed(),
            volatility_window: default_volatility_window(),
            drawdown_window: default_drawdown_window(),
            trading_days_per_year: default_trading_days_per_year(),
            risk_weight_volatility: default_risk_weight_volatility(),
            risk_weight_drawdown: default_risk_weight_drawdown(),
        }
    }
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            yield_threshold: default_yield_threshold(),
            risk_threshold: default_risk_threshold(),
        }
    }
}

fn default_tickers() -> Vec<String> {
    [
        "AAPL", "MSFT", "GOOGL", "AMZN", "NVDA", "TSLA", "META", "JPM", "V", "UNH", "HD", "MA",
        "LLY", "ABBV", "MRK", "XOM", "PFE", "PEP", "COST", "WMT", "BAC", "DIS", "NKE", "CVX",
        "CSCO", "KO", "TMO", "QCOM", "ORCL", "ABT",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_start_date() -> NaiveDate {
    // Matches the data window the dashboard was originally tuned on.
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default()
}

fn default_min_days_needed() -> usize {
    // 65: enough history for the 63-day drawdown lookback plus headroom.
    65
}

fn default_volatility_window() -> usize {
    21
}

fn default_drawdown_window() -> usize {
    63
}

fn default_trading_days_per_year() -> u32 {
    252
}

fn default_risk_weight_volatility() -> Decimal {
    dec!(0.7)
}

fn default_risk_weight_drawdown() -> Decimal {
    dec!(0.3)
}

fn default_yield_threshold() -> Decimal {
    dec!(0.01)
}

fn default_risk_threshold() -> Decimal {
    dec!(0.06)
}
