use crate::error::CoreError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single trading-day observation for one ticker, as delivered by the
/// market-data fetch collaborator. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBar {
    pub symbol: String,
    pub date: NaiveDate,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: u64,
}

/// One symbol's chronologically ordered daily bars.
///
/// Constructed only through [`SymbolSeries::new`], which enforces the
/// invariants every downstream calculation relies on: strictly increasing
/// dates (no duplicates), positive prices, and a uniform symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolSeries {
    symbol: String,
    bars: Vec<RawBar>,
}

impl SymbolSeries {
    pub fn new(symbol: String, bars: Vec<RawBar>) -> Result<Self, CoreError> {
        if bars.is_empty() {
            return Err(CoreError::InvalidInput(
                symbol,
                "series must contain at least one bar".to_string(),
            ));
        }

        for bar in &bars {
            if bar.symbol != symbol {
                return Err(CoreError::InvalidInput(
                    symbol,
                    format!("bar for '{}' mixed into series", bar.symbol),
                ));
            }
            if bar.close <= Decimal::ZERO || bar.open <= Decimal::ZERO {
                return Err(CoreError::InvalidInput(
                    symbol,
                    format!("non-positive price on {}", bar.date),
                ));
            }
        }

        for pair in bars.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(CoreError::InvalidInput(
                    symbol,
                    format!(
                        "bars out of order or duplicated: {} then {}",
                        pair[0].date, pair[1].date
                    ),
                ));
            }
        }

        Ok(Self { symbol, bars })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[RawBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// The series' close prices paired with their dates, in order.
    pub fn closes(&self) -> Vec<(NaiveDate, Decimal)> {
        self.bars.iter().map(|b| (b.date, b.close)).collect()
    }
}

/// One (symbol, date) pair's derived metrics.
///
/// A `None` means the metric is undefined at that row, typically because
/// the trailing window is not yet fully populated. `max_drawdown` is never
/// undefined: its window truncates at the series start, so it always sees
/// at least the current close.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsRow {
    pub symbol: String,
    pub date: NaiveDate,
    pub close: Decimal,
    pub daily_return: Option<Decimal>,
    pub volatility: Option<Decimal>,
    pub rolling_yield: Option<Decimal>,
    pub sharpe: Option<Decimal>,
    pub max_drawdown: Decimal,
    pub risk_score: Option<Decimal>,
}

/// Folds a flat bar table into one validated series per symbol, ordered by
/// symbol. Bars within a symbol must already be date-sorted; a violation
/// surfaces as `CoreError::InvalidInput` rather than being silently fixed.
pub fn group_by_symbol(bars: Vec<RawBar>) -> Result<Vec<SymbolSeries>, CoreError> {
    let mut grouped: BTreeMap<String, Vec<RawBar>> = BTreeMap::new();
    for bar in bars {
        grouped.entry(bar.symbol.clone()).or_default().push(bar);
    }

    grouped
        .into_iter()
        .map(|(symbol, bars)| SymbolSeries::new(symbol, bars))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn bar(symbol: &str, date: &str, close: Decimal) -> RawBar {
        RawBar {
            symbol: symbol.to_string(),
            date: date.parse().unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1_000,
        }
    }

    #[test]
    fn series_rejects_unsorted_dates() {
        let bars = vec![
            bar("AAPL", "2024-01-03", dec!(101)),
            bar("AAPL", "2024-01-02", dec!(100)),
        ];
        assert!(SymbolSeries::new("AAPL".to_string(), bars).is_err());
    }

    #[test]
    fn series_rejects_duplicate_dates() {
        let bars = vec![
            bar("AAPL", "2024-01-02", dec!(100)),
            bar("AAPL", "2024-01-02", dec!(101)),
        ];
        assert!(SymbolSeries::new("AAPL".to_string(), bars).is_err());
    }

    #[test]
    fn series_rejects_foreign_symbol() {
        let bars = vec![
            bar("AAPL", "2024-01-02", dec!(100)),
            bar("MSFT", "2024-01-03", dec!(101)),
        ];
        assert!(SymbolSeries::new("AAPL".to_string(), bars).is_err());
    }

    #[test]
    fn group_by_symbol_splits_and_orders() {
        let bars = vec![
            bar("MSFT", "2024-01-02", dec!(370)),
            bar("AAPL", "2024-01-02", dec!(185)),
            bar("AAPL", "2024-01-03", dec!(186)),
        ];
        let series = group_by_symbol(bars).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].symbol(), "AAPL");
        assert_eq!(series[0].len(), 2);
        assert_eq!(series[1].symbol(), "MSFT");
    }
}
