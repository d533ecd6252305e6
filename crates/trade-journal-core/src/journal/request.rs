use serde::Deserialize;
use serde_json::Value;

use crate::journal::portfolio::Portfolio;
use crate::journal::record::{normalize_with_catalog, RawTrade, TradeRecord};
use crate::settings::JournalSettings;
use crate::JournalResult;

/// One trade plus the settings it is validated against.
///
/// Accepts either `{ "trade": {...}, "settings": {...} }` or a bare trade
/// object, in which case default settings apply.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeRequest {
    pub trade: RawTrade,
    pub settings: JournalSettings,
}

#[derive(Deserialize)]
struct WrappedTrade {
    trade: RawTrade,
    #[serde(default)]
    settings: JournalSettings,
}

impl TradeRequest {
    pub fn from_json(input: &str) -> JournalResult<Self> {
        let value: Value = serde_json::from_str(input)?;
        if value.get("trade").is_some() {
            let wrapped: WrappedTrade = serde_json::from_value(value)?;
            Ok(TradeRequest {
                trade: wrapped.trade,
                settings: wrapped.settings,
            })
        } else {
            Ok(TradeRequest {
                trade: serde_json::from_value(value)?,
                settings: JournalSettings::default(),
            })
        }
    }

    pub fn normalize(&self) -> JournalResult<TradeRecord> {
        normalize_with_catalog(&self.trade, &self.settings.catalog())
    }
}

/// A batch of trades plus settings: `{ "trades": [...], "settings": {...} }`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BatchRequest {
    pub trades: Vec<RawTrade>,
    #[serde(default)]
    pub settings: JournalSettings,
}

impl BatchRequest {
    pub fn from_json(input: &str) -> JournalResult<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Fresh portfolio holding every trade in order. Fails on the first
    /// rejected trade.
    pub fn portfolio(&self) -> JournalResult<Portfolio> {
        let mut portfolio = Portfolio::new();
        portfolio.submit_all(&self.trades, &self.settings.catalog())?;
        Ok(portfolio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::strategy::Strategy;
    use crate::ErrorKind;

    const TRADE: &str = r#"{"date": "2025-03-03", "pair": "btc/usdt", "direction": "LONG",
        "strategy": "News Fade", "entry_price": 100, "stop_loss": 90, "take_profit": 120,
        "exit_price": 110, "size": 2, "fees": 1, "rating": 4}"#;

    #[test]
    fn test_wrapped_trade_uses_its_settings() {
        let input = format!(
            r#"{{"trade": {}, "settings": {{"extra_strategies": ["News Fade"]}}}}"#,
            TRADE
        );
        let record = TradeRequest::from_json(&input)
            .unwrap()
            .normalize()
            .unwrap();
        assert_eq!(record.strategy(), &Strategy::Other("News Fade".into()));
    }

    #[test]
    fn test_bare_trade_uses_default_catalog() {
        let request = TradeRequest::from_json(TRADE).unwrap();
        assert_eq!(request.settings, JournalSettings::default());
        let err = request.normalize().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Domain);
        assert_eq!(err.field(), Some("strategy"));
    }

    #[test]
    fn test_batch_settings_apply_to_every_trade() {
        let input = format!(
            r#"{{"trades": [{}, {}], "settings": {{"extra_strategies": ["news fade"]}}}}"#,
            TRADE, TRADE
        );
        let portfolio = BatchRequest::from_json(&input)
            .unwrap()
            .portfolio()
            .unwrap();
        assert_eq!(portfolio.len(), 2);
    }

    #[test]
    fn test_malformed_json_is_serialization_error() {
        let err = TradeRequest::from_json("{not json").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Serialization);
    }
}
