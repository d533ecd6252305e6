use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::{JournalError, JournalResult};

/// Setup tag attached to every trade.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Strategy {
    Breakout,
    Reversal,
    TrendFollow,
    Scalp,
    /// A configured label outside the built-in catalog
    Other(String),
}

impl Strategy {
    pub const BUILT_IN: [Strategy; 4] = [
        Strategy::Breakout,
        Strategy::Reversal,
        Strategy::TrendFollow,
        Strategy::Scalp,
    ];

    pub fn label(&self) -> &str {
        match self {
            Strategy::Breakout => "Breakout",
            Strategy::Reversal => "Reversal",
            Strategy::TrendFollow => "Trend Follow",
            Strategy::Scalp => "Scalp",
            Strategy::Other(label) => label,
        }
    }

    /// Maps a label to a built-in variant if one matches, otherwise keeps it
    /// verbatim as `Other`. Does not consult a catalog.
    fn from_label_lenient(label: &str) -> Strategy {
        let key = label_key(label);
        Strategy::BUILT_IN
            .into_iter()
            .find(|s| label_key(s.label()) == key)
            .unwrap_or_else(|| Strategy::Other(label.trim().to_string()))
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Strategy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Strategy {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(Strategy::from_label_lenient(&label))
    }
}

/// Case- and separator-insensitive comparison key: "Trend Follow",
/// "TrendFollow" and "trend_follow" all map to "trendfollow".
fn label_key(label: &str) -> String {
    label
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// The set of strategy labels a submission may use.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StrategyCatalog {
    extras: Vec<String>,
}

impl StrategyCatalog {
    /// Built-ins plus `extras`. Blank labels and labels that collide with an
    /// existing entry are skipped.
    pub fn with_extras<'a>(extras: impl IntoIterator<Item = &'a str>) -> Self {
        let mut catalog = StrategyCatalog::default();
        for extra in extras {
            let trimmed = extra.trim();
            let key = label_key(trimmed);
            if key.is_empty() || catalog.keys().any(|k| k == key) {
                continue;
            }
            catalog.extras.push(trimmed.to_string());
        }
        catalog
    }

    fn keys(&self) -> impl Iterator<Item = String> + '_ {
        Strategy::BUILT_IN
            .into_iter()
            .map(|s| label_key(s.label()))
            .chain(self.extras.iter().map(|e| label_key(e)))
    }

    pub fn labels(&self) -> Vec<String> {
        Strategy::BUILT_IN
            .into_iter()
            .map(|s| s.label().to_string())
            .chain(self.extras.iter().cloned())
            .collect()
    }

    pub fn parse(&self, label: &str) -> JournalResult<Strategy> {
        let key = label_key(label);
        if !key.is_empty() {
            if let Some(s) = Strategy::BUILT_IN
                .into_iter()
                .find(|s| label_key(s.label()) == key)
            {
                return Ok(s);
            }
            if let Some(extra) = self.extras.iter().find(|e| label_key(e) == key) {
                return Ok(Strategy::Other(extra.clone()));
            }
        }
        Err(JournalError::Domain {
            field: "strategy".into(),
            value: label.to_string(),
            allowed: self.labels().join(", "),
        })
    }
}
