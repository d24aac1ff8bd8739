use crate::error::AnalyzerError;
use chrono::NaiveDate;
use core_types::AnalyticsRow;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

pub mod error;

/// The analysis window the presentation layer selects: a subset of symbols
/// and an inclusive calendar range.
#[derive(Debug, Clone)]
pub struct AnalysisWindow {
    pub symbols: Vec<String>,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl AnalysisWindow {
    fn contains(&self, row: &AnalyticsRow) -> bool {
        row.date >= self.start
            && row.date <= self.end
            && self.symbols.iter().any(|s| s == &row.symbol)
    }
}

/// One symbol's reduction over the analysis window.
///
/// Aggregates of optional row metrics average only the rows where the metric
/// is defined; a window with no defined values yields `None`, which is a
/// different signal from zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymbolPeriodSummary {
    pub symbol: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub period_days: usize,
    pub avg_close: Decimal,
    pub avg_daily_return: Option<Decimal>,
    /// `last close / first close − 1`; undefined with fewer than two rows
    /// or a zero first close.
    pub total_return: Option<Decimal>,
    pub avg_volatility: Option<Decimal>,
    pub avg_rolling_yield: Option<Decimal>,
    pub avg_sharpe: Option<Decimal>,
    pub avg_max_drawdown: Decimal,
    pub avg_risk_score: Option<Decimal>,
}

/// Reduces one symbol's date-ordered, windowed rows to a period summary.
///
/// The batch entry point [`summarize_window`] never calls this with an empty
/// group; direct callers that pass no rows get `AnalyzerError::EmptyWindow`.
pub fn summarize(rows: &[&AnalyticsRow]) -> Result<SymbolPeriodSummary, AnalyzerError> {
    let (first, last) = match (rows.first(), rows.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(AnalyzerError::EmptyWindow("<none>".to_string())),
    };

    let close_sum: Decimal = rows.iter().map(|r| r.close).sum();
    let total_return = if rows.len() >= 2 && !first.close.is_zero() {
        Some(last.close / first.close - Decimal::ONE)
    } else {
        None
    };

    Ok(SymbolPeriodSummary {
        symbol: first.symbol.clone(),
        period_start: first.date,
        period_end: last.date,
        period_days: rows.len(),
        avg_close: close_sum / Decimal::from(rows.len()),
        avg_daily_return: mean_defined(rows.iter().map(|r| r.daily_return)),
        total_return,
        avg_volatility: mean_defined(rows.iter().map(|r| r.volatility)),
        avg_rolling_yield: mean_defined(rows.iter().map(|r| r.rolling_yield)),
        avg_sharpe: mean_defined(rows.iter().map(|r| r.sharpe)),
        avg_max_drawdown: mean_defined(rows.iter().map(|r| Some(r.max_drawdown)))
            .unwrap_or(Decimal::ZERO),
        avg_risk_score: mean_defined(rows.iter().map(|r| r.risk_score)),
    })
}

/// Applies the analysis window to the full analytics table and summarizes
/// every selected symbol that has at least one matching row. Symbols with no
/// rows in the window are silently skipped.
pub fn summarize_window(
    rows: &[AnalyticsRow],
    window: &AnalysisWindow,
) -> Vec<SymbolPeriodSummary> {
    let mut grouped: BTreeMap<&str, Vec<&AnalyticsRow>> = BTreeMap::new();
    for row in rows.iter().filter(|r| window.contains(r)) {
        grouped.entry(row.symbol.as_str()).or_default().push(row);
    }

    let summaries: Vec<SymbolPeriodSummary> = grouped
        .values()
        .filter_map(|group| summarize(group).ok())
        .collect();

    tracing::debug!(
        symbols = summaries.len(),
        start = %window.start,
        end = %window.end,
        "summarized analysis window"
    );

    summaries
}

/// Each symbol's most recent analytics row, ordered by descending risk score
/// with undefined scores last: the dashboard's headline table.
pub fn latest_snapshot(rows: &[AnalyticsRow]) -> Vec<AnalyticsRow> {
    let mut latest: BTreeMap<&str, &AnalyticsRow> = BTreeMap::new();
    for row in rows {
        match latest.get(row.symbol.as_str()) {
            Some(current) if current.date >= row.date => {}
            _ => {
                latest.insert(row.symbol.as_str(), row);
            }
        }
    }

    let mut snapshot: Vec<AnalyticsRow> = latest.into_values().cloned().collect();
    snapshot.sort_by(|a, b| b.risk_score.cmp(&a.risk_score));
    snapshot
}

/// The top `n` snapshot rows by composite risk score.
pub fn top_by_risk(snapshot: &[AnalyticsRow], n: usize) -> Vec<&AnalyticsRow> {
    let mut ranked: Vec<&AnalyticsRow> = snapshot.iter().collect();
    ranked.sort_by(|a, b| b.risk_score.cmp(&a.risk_score));
    ranked.truncate(n);
    ranked
}

/// The top `n` snapshot rows by rolling yield.
pub fn top_by_yield(snapshot: &[AnalyticsRow], n: usize) -> Vec<&AnalyticsRow> {
    let mut ranked: Vec<&AnalyticsRow> = snapshot.iter().collect();
    ranked.sort_by(|a, b| b.rolling_yield.cmp(&a.rolling_yield));
    ranked.truncate(n);
    ranked
}

/// Mean over the defined values only; `None` when nothing is defined.
fn mean_defined<I>(values: I) -> Option<Decimal>
where
    I: Iterator<Item = Option<Decimal>>,
{
    let defined: Vec<Decimal> = values.flatten().collect();
    if defined.is_empty() {
        None
    } else {
        Some(defined.iter().copied().sum::<Decimal>() / Decimal::from(defined.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn row(symbol: &str, date: &str, close: Decimal) -> AnalyticsRow {
        AnalyticsRow {
            symbol: symbol.to_string(),
            date: date.parse().unwrap(),
            close,
            daily_return: None,
            volatility: None,
            rolling_yield: None,
            sharpe: None,
            max_drawdown: Decimal::ZERO,
            risk_score: None,
        }
    }

    #[test]
    fn total_return_for_two_rows() {
        let rows = vec![
            row("AAPL", "2024-03-01", dec!(100)),
            row("AAPL", "2024-03-04", dec!(110)),
        ];
        let refs: Vec<&AnalyticsRow> = rows.iter().collect();
        let summary = summarize(&refs).unwrap();
        assert_eq!(summary.total_return, Some(dec!(0.10)));
        assert_eq!(summary.period_days, 2);
        assert_eq!(summary.avg_close, dec!(105));
    }

    #[test]
    fn total_return_undefined_for_single_row() {
        let rows = vec![row("AAPL", "2024-03-01", dec!(100))];
        let refs: Vec<&AnalyticsRow> = rows.iter().collect();
        let summary = summarize(&refs).unwrap();
        assert_eq!(summary.total_return, None);
        assert_eq!(summary.period_days, 1);
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(
            summarize(&[]),
            Err(AnalyzerError::EmptyWindow(_))
        ));
    }

    #[test]
    fn undefined_metrics_are_excluded_from_means_not_zeroed() {
        let mut a = row("AAPL", "2024-03-01", dec!(100));
        a.volatility = Some(dec!(0.02));
        let b = row("AAPL", "2024-03-04", dec!(101));
        let mut c = row("AAPL", "2024-03-05", dec!(102));
        c.volatility = Some(dec!(0.04));

        let rows = vec![a, b, c];
        let refs: Vec<&AnalyticsRow> = rows.iter().collect();
        let summary = summarize(&refs).unwrap();
        // Mean of the two defined values, not of three with a zero filled in.
        assert_eq!(summary.avg_volatility, Some(dec!(0.03)));
        // Nothing defined at all stays undefined.
        assert_eq!(summary.avg_sharpe, None);
    }

    #[test]
    fn window_filters_by_symbol_and_date() {
        let rows = vec![
            row("AAPL", "2024-03-01", dec!(100)),
            row("AAPL", "2024-03-04", dec!(110)),
            row("AAPL", "2024-04-01", dec!(120)),
            row("MSFT", "2024-03-01", dec!(400)),
        ];
        let window = AnalysisWindow {
            symbols: vec!["AAPL".to_string()],
            start: "2024-03-01".parse().unwrap(),
            end: "2024-03-31".parse().unwrap(),
        };
        let summaries = summarize_window(&rows, &window);
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].symbol, "AAPL");
        assert_eq!(summaries[0].period_days, 2);
        assert_eq!(summaries[0].period_end, "2024-03-04".parse().unwrap());
    }

    #[test]
    fn snapshot_takes_last_row_per_symbol_ranked_by_risk() {
        let mut aapl_old = row("AAPL", "2024-03-01", dec!(100));
        aapl_old.risk_score = Some(dec!(0.9));
        let mut aapl_new = row("AAPL", "2024-03-04", dec!(101));
        aapl_new.risk_score = Some(dec!(0.02));
        let mut msft = row("MSFT", "2024-03-04", dec!(400));
        msft.risk_score = Some(dec!(0.05));
        let unscored = row("PFE", "2024-03-04", dec!(28));

        let snapshot = latest_snapshot(&[aapl_old, aapl_new, msft, unscored]);
        let symbols: Vec<&str> = snapshot.iter().map(|r| r.symbol.as_str()).collect();
        // MSFT outranks AAPL's latest (not its stale) score; no score sorts last.
        assert_eq!(symbols, vec!["MSFT", "AAPL", "PFE"]);
    }

    #[test]
    fn top_n_rankings() {
        let mut a = row("AAPL", "2024-03-04", dec!(100));
        a.risk_score = Some(dec!(0.08));
        a.rolling_yield = Some(dec!(0.001));
        let mut b = row("MSFT", "2024-03-04", dec!(400));
        b.risk_score = Some(dec!(0.03));
        b.rolling_yield = Some(dec!(0.02));
        let snapshot = vec![a, b];

        let by_risk = top_by_risk(&snapshot, 1);
        assert_eq!(by_risk[0].symbol, "AAPL");
        let by_yield = top_by_yield(&snapshot, 1);
        assert_eq!(by_yield[0].symbol, "MSFT");
    }
}
