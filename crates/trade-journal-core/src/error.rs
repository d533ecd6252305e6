use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse classification a UI layer can switch on when rendering a rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Numeric field outside its domain (negative price, rating out of 1..=5)
    Range,
    /// Enumerated or identifier field outside its value set
    Domain,
    InvalidInput,
    Serialization,
}

#[derive(Debug, Error)]
pub enum JournalError {
    #[error("Out of range: {field} = {value} ({reason})")]
    Range {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid {field}: '{value}' is not one of [{allowed}]")]
    Domain {
        field: String,
        value: String,
        allowed: String,
    },

    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Row {row}: stored {field} {stored} does not match recomputed value {derived}")]
    RowMismatch {
        row: usize,
        field: String,
        stored: Decimal,
        derived: Decimal,
    },

    #[error("Trade #{index} rejected: {source}")]
    Rejected {
        index: usize,
        #[source]
        source: Box<JournalError>,
    },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl JournalError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            JournalError::Range { .. } => ErrorKind::Range,
            JournalError::Domain { .. } => ErrorKind::Domain,
            JournalError::InvalidInput { .. } | JournalError::RowMismatch { .. } => {
                ErrorKind::InvalidInput
            }
            JournalError::Rejected { source, .. } => source.kind(),
            JournalError::Serialization(_) => ErrorKind::Serialization,
        }
    }

    /// Name of the offending field, when the error is tied to one.
    pub fn field(&self) -> Option<&str> {
        match self {
            JournalError::Range { field, .. }
            | JournalError::Domain { field, .. }
            | JournalError::InvalidInput { field, .. }
            | JournalError::RowMismatch { field, .. } => Some(field),
            JournalError::Rejected { source, .. } => source.field(),
            JournalError::Serialization(_) => None,
        }
    }

    /// The rejected value as the caller supplied it.
    pub fn value(&self) -> Option<&str> {
        match self {
            JournalError::Range { value, .. } | JournalError::Domain { value, .. } => Some(value),
            JournalError::Rejected { source, .. } => source.value(),
            _ => None,
        }
    }

    pub(crate) fn negative(field: &str, value: Decimal) -> Self {
        JournalError::Range {
            field: field.into(),
            value: value.to_string(),
            reason: "must be zero or greater".into(),
        }
    }

    /// A derived field whose computation left the decimal range. `value` is
    /// the input that drove it out of range.
    pub(crate) fn overflow(field: &str, value: Decimal) -> Self {
        JournalError::Range {
            field: field.into(),
            value: value.to_string(),
            reason: "result exceeds decimal range".into(),
        }
    }
}

impl From<serde_json::Error> for JournalError {
    fn from(e: serde_json::Error) -> Self {
        JournalError::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_negative_carries_field_value_and_kind() {
        let err = JournalError::negative("fees", dec!(-1.5));
        assert_eq!(err.kind(), ErrorKind::Range);
        assert_eq!(err.field(), Some("fees"));
        assert_eq!(err.value(), Some("-1.5"));
        assert_eq!(
            err.to_string(),
            "Out of range: fees = -1.5 (must be zero or greater)"
        );
    }

    #[test]
    fn test_overflow_is_range_error() {
        let err = JournalError::overflow("r_multiple", dec!(0.0001));
        assert_eq!(err.kind(), ErrorKind::Range);
        assert_eq!(err.field(), Some("r_multiple"));
        assert!(err.to_string().ends_with("(result exceeds decimal range)"));
    }

    #[test]
    fn test_rejected_delegates_to_source() {
        let err = JournalError::Rejected {
            index: 3,
            source: Box::new(JournalError::Domain {
                field: "direction".into(),
                value: "SIDEWAYS".into(),
                allowed: "LONG, SHORT".into(),
            }),
        };
        assert_eq!(err.kind(), ErrorKind::Domain);
        assert_eq!(err.field(), Some("direction"));
        assert_eq!(err.value(), Some("SIDEWAYS"));
        assert!(err.to_string().starts_with("Trade #3 rejected"));
    }

    #[test]
    fn test_row_mismatch_is_invalid_input() {
        let err = JournalError::RowMismatch {
            row: 0,
            field: "PnL ($)".into(),
            stored: dec!(20),
            derived: dec!(19),
        };
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert_eq!(err.value(), None);
    }
}
