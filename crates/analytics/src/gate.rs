use core_types::SymbolSeries;

/// The outcome of the pre-engine sufficiency check: the series that carry
/// enough history for rolling analysis, and the tickers that were excluded.
#[derive(Debug, Clone, Default)]
pub struct SufficiencyReport {
    pub kept: Vec<SymbolSeries>,
    pub dropped: Vec<String>,
}

/// Excludes every symbol with fewer than `min_days` bars before any rolling
/// computation runs.
///
/// A series shorter than the largest rolling window would produce rows that
/// are mostly or entirely undefined; dropping the symbol up front makes the
/// absence of data explicit instead of burying it in the output table.
pub fn filter_sufficient(universe: Vec<SymbolSeries>, min_days: usize) -> SufficiencyReport {
    let mut report = SufficiencyReport::default();

    for series in universe {
        if series.len() < min_days {
            tracing::warn!(
                symbol = %series.symbol(),
                days = series.len(),
                min_days,
                "excluding symbol: not enough history for rolling analysis"
            );
            report.dropped.push(series.symbol().to_string());
        } else {
            report.kept.push(series);
        }
    }

    report
}
