use crate::error::AnalyticsError;
use configuration::AnalyticsParams;
use core_types::{AnalyticsRow, SymbolSeries};
use rust_decimal::{Decimal, MathematicalOps};

/// A stateless calculator deriving rolling risk/return metrics from one
/// symbol's daily price series at a time.
#[derive(Debug, Clone)]
pub struct AnalyticsEngine {
    params: AnalyticsParams,
    /// sqrt(trading_days_per_year), precomputed once for the Sharpe ratio.
    annualization: Decimal,
}

impl AnalyticsEngine {
    /// Creates a new `AnalyticsEngine`, validating the rolling parameters.
    pub fn new(params: AnalyticsParams) -> Result<Self, AnalyticsError> {
        if params.volatility_window < 2 {
            return Err(AnalyticsError::InvalidParameters(
                "volatility_window must be at least 2".to_string(),
            ));
        }
        if params.drawdown_window == 0 {
            return Err(AnalyticsError::InvalidParameters(
                "drawdown_window must be at least 1".to_string(),
            ));
        }
        let largest_window = params.volatility_window.max(params.drawdown_window);
        if params.min_days_needed <= largest_window {
            return Err(AnalyticsError::InvalidParameters(format!(
                "min_days_needed ({}) must exceed the largest rolling window ({})",
                params.min_days_needed, largest_window
            )));
        }
        if params.trading_days_per_year == 0 {
            return Err(AnalyticsError::InvalidParameters(
                "trading_days_per_year must be positive".to_string(),
            ));
        }
        if params.risk_weight_volatility < Decimal::ZERO
            || params.risk_weight_drawdown < Decimal::ZERO
        {
            return Err(AnalyticsError::InvalidParameters(
                "risk score weights must not be negative".to_string(),
            ));
        }

        let annualization = Decimal::from(params.trading_days_per_year)
            .sqrt()
            .ok_or_else(|| {
                AnalyticsError::InternalError(
                    "failed to take square root of trading_days_per_year".to_string(),
                )
            })?;

        Ok(Self {
            params,
            annualization,
        })
    }

    /// Computes analytics for every series in the universe and concatenates
    /// the per-symbol outputs in input order. Symbols share no state, so the
    /// result does not depend on processing order.
    pub fn compute_universe(&self, universe: &[SymbolSeries]) -> Vec<AnalyticsRow> {
        universe
            .iter()
            .flat_map(|series| self.compute_symbol(series))
            .collect()
    }

    /// Computes one output row per input bar for a single symbol.
    ///
    /// Callers are expected to have run the sufficiency gate first. A series
    /// shorter than the rolling windows is not an error; it simply yields
    /// rows whose windowed metrics are all `None`.
    pub fn compute_symbol(&self, series: &SymbolSeries) -> Vec<AnalyticsRow> {
        let bars = series.bars();
        let closes: Vec<Decimal> = bars.iter().map(|b| b.close).collect();
        let returns = daily_returns(&closes);

        let mut rows = Vec::with_capacity(bars.len());
        for (i, bar) in bars.iter().enumerate() {
            let window = return_window(&returns, i, self.params.volatility_window);
            let volatility = window.as_deref().and_then(sample_std);
            let rolling_yield = window.as_deref().map(mean);
            let sharpe = self.annualized_sharpe(rolling_yield, volatility);
            let max_drawdown = window_drawdown(&closes, i, self.params.drawdown_window);
            let risk_score = volatility.map(|vol| {
                vol * self.params.risk_weight_volatility
                    + max_drawdown * self.params.risk_weight_drawdown
            });

            rows.push(AnalyticsRow {
                symbol: series.symbol().to_string(),
                date: bar.date,
                close: bar.close,
                daily_return: returns[i],
                volatility,
                rolling_yield,
                sharpe,
                max_drawdown,
                risk_score,
            });
        }

        tracing::debug!(
            symbol = %series.symbol(),
            rows = rows.len(),
            "computed rolling analytics"
        );

        rows
    }

    /// `rolling_yield / volatility * sqrt(trading_days_per_year)`, undefined
    /// when either operand is undefined or volatility is zero.
    fn annualized_sharpe(
        &self,
        rolling_yield: Option<Decimal>,
        volatility: Option<Decimal>,
    ) -> Option<Decimal> {
        match (rolling_yield, volatility) {
            (Some(avg), Some(vol)) if !vol.is_zero() => Some(avg / vol * self.annualization),
            _ => None,
        }
    }
}

/// Simple percent change of close versus the previous trading day. The first
/// element is always `None`; a zero predecessor close also yields `None`
/// rather than a division panic.
fn daily_returns(closes: &[Decimal]) -> Vec<Option<Decimal>> {
    let mut returns = Vec::with_capacity(closes.len());
    for i in 0..closes.len() {
        if i == 0 || closes[i - 1].is_zero() {
            returns.push(None);
        } else {
            returns.push(Some(closes[i] / closes[i - 1] - Decimal::ONE));
        }
    }
    returns
}

/// The trailing `len`-element return window ending at `i`, or `None` unless
/// the window is full and every return in it is defined. An undefined return
/// inside the window (the series' first row) poisons the whole window, so
/// the first defined result lands at index `len`, not `len - 1`.
fn return_window(returns: &[Option<Decimal>], i: usize, len: usize) -> Option<Vec<Decimal>> {
    if i + 1 < len {
        return None;
    }
    returns[i + 1 - len..=i].iter().copied().collect()
}

/// Arithmetic mean of a non-empty slice.
fn mean(values: &[Decimal]) -> Decimal {
    values.iter().copied().sum::<Decimal>() / Decimal::from(values.len())
}

/// Sample standard deviation (n − 1 denominator); `None` for fewer than two
/// observations.
fn sample_std(values: &[Decimal]) -> Option<Decimal> {
    if values.len() < 2 {
        return None;
    }
    let avg = mean(values);
    let variance = values
        .iter()
        .map(|v| (*v - avg) * (*v - avg))
        .sum::<Decimal>()
        / Decimal::from(values.len() - 1);
    variance.sqrt()
}

/// `(max − min) / max` over the trailing `len` closes, truncated at the
/// series start. Order-independent: the minimum is not required to occur
/// after the maximum. Returns zero when the window max is zero.
fn window_drawdown(closes: &[Decimal], i: usize, len: usize) -> Decimal {
    let start = (i + 1).saturating_sub(len);
    let window = &closes[start..=i];

    let mut max = window[0];
    let mut min = window[0];
    for &close in window {
        if close > max {
            max = close;
        }
        if close < min {
            min = close;
        }
    }

    if max.is_zero() {
        Decimal::ZERO
    } else {
        (max - min) / max
    }
}
