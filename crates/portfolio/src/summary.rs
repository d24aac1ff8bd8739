use crate::alignment::align_and_fill;
use crate::error::PortfolioError;
use chrono::NaiveDate;
use configuration::AnalyticsParams;
use rust_decimal::{Decimal, MathematicalOps};
use serde::Serialize;
use std::collections::BTreeMap;

/// The equal-weighted reduction over the aligned close matrix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioSummary {
    pub symbols: Vec<String>,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub aligned_days: usize,
    /// Mean of the final aligned closes over mean of the first, minus one.
    pub total_return: Decimal,
    /// Mean daily portfolio return scaled by trading days per year.
    pub annualized_return: Decimal,
    /// Sample std of the daily portfolio return, annualized. Undefined with
    /// a single return observation (two aligned dates).
    pub annualized_volatility: Option<Decimal>,
    pub sharpe: Option<Decimal>,
    /// Largest peak-to-current gap on the additive cumulative-return curve.
    pub max_drawdown: Decimal,
}

/// Either a computed summary or the explicit, non-error signal that the
/// selected symbols share too little trading history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PortfolioOutcome {
    Report(PortfolioSummary),
    InsufficientOverlap { aligned_days: usize },
}

/// Reduces two or more symbols' close series to one equal-weighted summary.
///
/// Series are outer-aligned and forward-filled first; fewer than two
/// surviving dates yields `InsufficientOverlap`. The volatility estimator
/// and the annualization convention are shared with the rolling engine via
/// `AnalyticsParams`.
pub fn summarize_portfolio(
    closes: &BTreeMap<String, Vec<(NaiveDate, Decimal)>>,
    params: &AnalyticsParams,
) -> Result<PortfolioOutcome, PortfolioError> {
    if closes.len() < 2 {
        return Err(PortfolioError::NotEnoughSymbols(closes.len()));
    }
    for (symbol, series) in closes {
        if series.iter().any(|(_, close)| *close <= Decimal::ZERO) {
            return Err(PortfolioError::Data(format!(
                "non-positive close for '{symbol}'"
            )));
        }
    }

    let aligned = align_and_fill(closes);
    if aligned.rows.len() < 2 {
        tracing::info!(
            aligned_days = aligned.rows.len(),
            "selected symbols share too little history for a portfolio view"
        );
        return Ok(PortfolioOutcome::InsufficientOverlap {
            aligned_days: aligned.rows.len(),
        });
    }

    // Equal-weighted daily return: row-wise mean of each column's simple
    // percent change. Closes are validated positive, so division is safe.
    let mut daily: Vec<Decimal> = Vec::with_capacity(aligned.rows.len() - 1);
    for pair in aligned.rows.windows(2) {
        let summed: Decimal = pair[0]
            .iter()
            .zip(&pair[1])
            .map(|(prev, cur)| *cur / *prev - Decimal::ONE)
            .sum();
        daily.push(summed / Decimal::from(pair[0].len()));
    }

    let first_level = mean(&aligned.rows[0]);
    let last_level = mean(&aligned.rows[aligned.rows.len() - 1]);
    let total_return = last_level / first_level - Decimal::ONE;

    let trading_days = Decimal::from(params.trading_days_per_year);
    let annualization = trading_days.sqrt().ok_or_else(|| {
        PortfolioError::Calculation(
            "failed to take square root of trading_days_per_year".to_string(),
        )
    })?;
    let annualized_return = mean(&daily) * trading_days;
    let annualized_volatility = sample_std(&daily).map(|std| std * annualization);
    let sharpe = match annualized_volatility {
        Some(vol) if !vol.is_zero() => Some(annualized_return / vol),
        _ => None,
    };

    Ok(PortfolioOutcome::Report(PortfolioSummary {
        symbols: aligned.symbols,
        period_start: aligned.dates[0],
        period_end: aligned.dates[aligned.dates.len() - 1],
        aligned_days: aligned.rows.len(),
        total_return,
        annualized_return,
        annualized_volatility,
        sharpe,
        max_drawdown: curve_drawdown(&daily),
    }))
}

/// Maximum peak-to-current gap on the equity curve built by compounding the
/// daily returns additively (cumulative sum, matching the simple-return
/// convention used throughout).
fn curve_drawdown(daily: &[Decimal]) -> Decimal {
    let mut level = Decimal::ONE;
    let mut peak = Decimal::ONE;
    let mut max_gap = Decimal::ZERO;

    for ret in daily {
        level += *ret;
        if level > peak {
            peak = level;
        }
        let gap = peak - level;
        if gap > max_gap {
            max_gap = gap;
        }
    }

    max_gap
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
