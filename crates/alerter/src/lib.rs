use crate::error::AlerterError;
use analyzer::SymbolPeriodSummary;
use configuration::AlertThresholds;
use core_types::AnalyticsRow;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub mod error;

/// Turns analytics output into human-readable alert and insight lines.
///
/// This is deliberately a pure formatter: it returns strings for the caller
/// to render or route, and knows nothing about how they are delivered.
#[derive(Debug, Clone)]
pub struct AlertEngine {
    thresholds: AlertThresholds,
}

impl AlertEngine {
    /// Creates a new `AlertEngine` with the given thresholds.
    pub fn new(thresholds: AlertThresholds) -> Result<Self, AlerterError> {
        if thresholds.yield_threshold <= Decimal::ZERO {
            return Err(AlerterError::InvalidThresholds(
                "yield_threshold must be greater than 0".to_string(),
            ));
        }
        if thresholds.risk_threshold <= Decimal::ZERO {
            return Err(AlerterError::InvalidThresholds(
                "risk_threshold must be greater than 0".to_string(),
            ));
        }
        Ok(Self { thresholds })
    }

    /// Scans each symbol's latest analytics row and produces one alert line
    /// per symbol whose risk score or rolling yield exceeds its threshold.
    /// Undefined metrics never fire an alert.
    pub fn scan(&self, snapshot: &[AnalyticsRow]) -> Vec<String> {
        let mut alerts = Vec::new();

        for row in snapshot {
            let risky = row
                .risk_score
                .is_some_and(|score| score > self.thresholds.risk_threshold);
            let yieldy = row
                .rolling_yield
                .is_some_and(|avg| avg > self.thresholds.yield_threshold);
            if !(risky || yieldy) {
                continue;
            }

            alerts.push(format!(
                "ALERT: {} | Risk: {} | Yield: {}% | Date: {}",
                row.symbol,
                row.risk_score.unwrap_or(Decimal::ZERO).round_dp(3).normalize(),
                (row.rolling_yield.unwrap_or(Decimal::ZERO) * dec!(100)).round_dp(2).normalize(),
                row.date
            ));
        }

        if !alerts.is_empty() {
            tracing::info!(count = alerts.len(), "alert thresholds crossed");
        }

        alerts
    }

    /// Rule-based narrative lines for one symbol's period summary. A pure
    /// function of the summary; wording is deterministic for a given input.
    pub fn insights(&self, summary: &SymbolPeriodSummary) -> Vec<String> {
        let mut lines = Vec::new();

        match summary.total_return {
            Some(ret) if ret > Decimal::ZERO => lines.push(format!(
                "{} gained {}% over the {}-day window.",
                summary.symbol,
                (ret * dec!(100)).round_dp(2).normalize(),
                summary.period_days
            )),
            Some(ret) if ret < Decimal::ZERO => lines.push(format!(
                "{} lost {}% over the {}-day window.",
                summary.symbol,
                (ret.abs() * dec!(100)).round_dp(2).normalize(),
                summary.period_days
            )),
            Some(_) => lines.push(format!(
                "{} ended the {}-day window flat.",
                summary.symbol, summary.period_days
            )),
            None => lines.push(format!(
                "{}: too little data in the window to compute a period return.",
                summary.symbol
            )),
        }

        if let Some(sharpe) = summary.avg_sharpe {
            if sharpe >= Decimal::ONE {
                lines.push(format!(
                    "Strong risk-adjusted performance (avg Sharpe {}).",
                    sharpe.round_dp(2).normalize()
                ));
            } else if sharpe > Decimal::ZERO {
                lines.push(format!(
                    "Positive but modest risk-adjusted performance (avg Sharpe {}).",
                    sharpe.round_dp(2).normalize()
                ));
            } else {
                lines.push(format!(
                    "Returns did not compensate for volatility (avg Sharpe {}).",
                    sharpe.round_dp(2).normalize()
                ));
            }
        }

        if summary.avg_max_drawdown > dec!(0.2) {
            lines.push(format!(
                "Severe drawdowns: {}% average peak-to-trough range.",
                (summary.avg_max_drawdown * dec!(100)).round_dp(1).normalize()
            ));
        } else if summary.avg_max_drawdown > dec!(0.1) {
            lines.push(format!(
                "Notable drawdowns: {}% average peak-to-trough range.",
                (summary.avg_max_drawdown * dec!(100)).round_dp(1).normalize()
            ));
        }

        if summary
            .avg_risk_score
            .is_some_and(|score| score > self.thresholds.risk_threshold)
        {
            lines.push("Composite risk score above the configured threshold.".to_string());
        }

        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn engine() -> AlertEngine {
        AlertEngine::new(AlertThresholds::default()).unwrap()
    }

    fn row(symbol: &str, risk: Option<Decimal>, yield_: Option<Decimal>) -> AnalyticsRow {
        AnalyticsRow {
            symbol: symbol.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            close: dec!(100),
            daily_return: None,
            volatility: None,
            rolling_yield: yield_,
            sharpe: None,
            max_drawdown: dec!(0.05),
            risk_score: risk,
        }
    }

    #[test]
    fn rejects_non_positive_thresholds() {
        let result = AlertEngine::new(AlertThresholds {
            yield_threshold: dec!(0),
            ..AlertThresholds::default()
        });
        assert!(matches!(result, Err(AlerterError::InvalidThresholds(_))));
    }

    #[test]
    fn fires_on_either_threshold() {
        // Defaults: risk > 0.06, yield > 0.01.
        let snapshot = vec![
            row("AAPL", Some(dec!(0.07)), Some(dec!(0.001))),
            row("MSFT", Some(dec!(0.01)), Some(dec!(0.02))),
            row("KO", Some(dec!(0.01)), Some(dec!(0.001))),
            row("PFE", None, None),
        ];
        let alerts = engine().scan(&snapshot);
        assert_eq!(alerts.len(), 2);
        assert!(alerts[0].contains("AAPL"));
        assert!(alerts[1].contains("MSFT"));
    }

    #[test]
    fn insight_text_is_deterministic() {
        let summary = SymbolPeriodSummary {
            symbol: "NVDA".to_string(),
            period_start: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            period_end: NaiveDate::from_ymd_opt(2024, 5, 31).unwrap(),
            period_days: 63,
            avg_close: dec!(880),
            avg_daily_return: Some(dec!(0.004)),
            total_return: Some(dec!(0.25)),
            avg_volatility: Some(dec!(0.03)),
            avg_rolling_yield: Some(dec!(0.004)),
            avg_sharpe: Some(dec!(2.1)),
            avg_max_drawdown: dec!(0.15),
            avg_risk_score: Some(dec!(0.066)),
        };

        let lines = engine().insights(&summary);
        assert_eq!(
            lines,
            vec![
                "NVDA gained 25% over the 63-day window.".to_string(),
                "Strong risk-adjusted performance (avg Sharpe 2.1).".to_string(),
                "Notable drawdowns: 15% average peak-to-trough range.".to_string(),
                "Composite risk score above the configured threshold.".to_string(),
            ]
        );
        assert_eq!(engine().insights(&summary), lines);
    }
}
