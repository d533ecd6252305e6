use serde::{Deserialize, Serialize};

use crate::journal::strategy::StrategyCatalog;
use crate::types::Currency;

/// Session-level configuration. Every field has a default, so an empty
/// JSON object (or no file at all) is a valid configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JournalSettings {
    pub currency: Currency,
    /// Strategy labels accepted in addition to the built-in catalog
    pub extra_strategies: Vec<String>,
}

impl JournalSettings {
    pub fn catalog(&self) -> StrategyCatalog {
        StrategyCatalog::with_extras(self.extra_strategies.iter().map(String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::strategy::Strategy;

    #[test]
    fn test_empty_object_uses_defaults() {
        let settings: JournalSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, JournalSettings::default());
        assert_eq!(settings.currency, Currency::USD);
    }

    #[test]
    fn test_extra_strategies_reach_catalog() {
        let settings: JournalSettings = serde_json::from_str(
            r#"{"currency": "EUR", "extra_strategies": ["Mean Reversion"]}"#,
        )
        .unwrap();
        let catalog = settings.catalog();
        assert_eq!(
            catalog.parse("mean_reversion").unwrap(),
            Strategy::Other("Mean Reversion".into())
        );
        assert_eq!(settings.currency.symbol(), "€");
    }
}
