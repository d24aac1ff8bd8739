use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};

/// A date-indexed close matrix with one column per symbol, restricted to the
/// dates where every symbol has a (possibly forward-filled) price.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedCloses {
    pub symbols: Vec<String>,
    pub dates: Vec<NaiveDate>,
    /// `rows[i][j]` is the close of `symbols[j]` on `dates[i]`.
    pub rows: Vec<Vec<Decimal>>,
}

/// Outer-aligns the per-symbol close series on the union of their dates.
///
/// Each column carries its last known price forward across gaps; a date row
/// survives only once every symbol has observed at least one price, i.e.
/// rows are restricted to dates on or after every symbol's first
/// observation.
pub fn align_and_fill(closes: &BTreeMap<String, Vec<(NaiveDate, Decimal)>>) -> AlignedCloses {
    let symbols: Vec<String> = closes.keys().cloned().collect();
    let columns: Vec<BTreeMap<NaiveDate, Decimal>> = symbols
        .iter()
        .map(|symbol| closes[symbol].iter().copied().collect())
        .collect();
    let union: BTreeSet<NaiveDate> = closes
        .values()
        .flat_map(|series| series.iter().map(|(date, _)| *date))
        .collect();

    let mut carried: Vec<Option<Decimal>> = vec![None; symbols.len()];
    let mut dates = Vec::new();
    let mut rows = Vec::new();

    for date in union {
        for (j, column) in columns.iter().enumerate() {
            if let Some(&close) = column.get(&date) {
                carried[j] = Some(close);
            }
        }
        if let Some(row) = carried.iter().copied().collect::<Option<Vec<Decimal>>>() {
            dates.push(date);
            rows.push(row);
        }
    }

    AlignedCloses {
        symbols,
        dates,
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn forward_fills_gaps_and_trims_leading_rows() {
        let mut closes = BTreeMap::new();
        closes.insert(
            "AAPL".to_string(),
            vec![
                (day(1), dec!(100)),
                (day(4), dec!(101)),
                (day(5), dec!(102)),
                (day(6), dec!(103)),
            ],
        );
        closes.insert(
            "MSFT".to_string(),
            // Starts later and skips March 5th.
            vec![(day(4), dec!(400)), (day(6), dec!(404))],
        );

        let aligned = align_and_fill(&closes);
        assert_eq!(aligned.symbols, vec!["AAPL".to_string(), "MSFT".to_string()]);
        // March 1st is dropped: MSFT has not traded yet.
        assert_eq!(aligned.dates, vec![day(4), day(5), day(6)]);
        assert_eq!(
            aligned.rows,
            vec![
                vec![dec!(101), dec!(400)],
                // MSFT's gap is filled with its March 4th close.
                vec![dec!(102), dec!(400)],
                vec![dec!(103), dec!(404)],
            ]
        );
    }

    #[test]
    fn only_dates_after_every_first_observation_survive() {
        let mut closes = BTreeMap::new();
        closes.insert("AAPL".to_string(), vec![(day(1), dec!(100))]);
        closes.insert("MSFT".to_string(), vec![(day(8), dec!(400))]);

        let aligned = align_and_fill(&closes);
        // Only the later symbol's first date survives, AAPL forward-filled.
        assert_eq!(aligned.dates, vec![day(8)]);
        assert_eq!(aligned.rows.len(), 1);
    }
}
