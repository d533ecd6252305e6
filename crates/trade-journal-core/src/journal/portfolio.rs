use serde::Serialize;
use tracing::{debug, warn};

use crate::journal::record::{normalize_with_catalog, RawTrade, TradeRecord};
use crate::journal::strategy::StrategyCatalog;
use crate::{JournalError, JournalResult};

/// Append-only, insertion-ordered collection of trades for one session.
///
/// Records are only ever added whole: `submit` derives the record before
/// touching the sequence, so a rejected trade leaves the portfolio exactly as
/// it was. Mutation needs `&mut self`, which keeps readers from observing a
/// half-applied append; a multi-threaded host should wrap the portfolio in
/// its own lock.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Portfolio {
    records: Vec<TradeRecord>,
}

impl Portfolio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an already-normalized record and return a reference to it.
    pub fn append(&mut self, record: TradeRecord) -> &TradeRecord {
        let index = self.records.len();
        debug!(
            index,
            pair = record.pair(),
            pnl = %record.pnl_currency(),
            "appending trade"
        );
        self.records.push(record);
        &self.records[index]
    }

    /// Normalize against the built-in catalog, then append.
    pub fn submit(&mut self, raw: &RawTrade) -> JournalResult<&TradeRecord> {
        self.submit_with_catalog(raw, &StrategyCatalog::default())
    }

    pub fn submit_with_catalog(
        &mut self,
        raw: &RawTrade,
        catalog: &StrategyCatalog,
    ) -> JournalResult<&TradeRecord> {
        match normalize_with_catalog(raw, catalog) {
            Ok(record) => Ok(self.append(record)),
            Err(e) => {
                warn!(error = %e, "trade submission rejected");
                Err(e)
            }
        }
    }

    /// Submit trades in order, stopping at the first rejection.
    ///
    /// Trades before the rejected one stay appended. The error carries the
    /// zero-based position of the rejected trade within `trades`.
    pub fn submit_all<'a>(
        &mut self,
        trades: impl IntoIterator<Item = &'a RawTrade>,
        catalog: &StrategyCatalog,
    ) -> JournalResult<usize> {
        let mut accepted = 0;
        for (index, raw) in trades.into_iter().enumerate() {
            self.submit_with_catalog(raw, catalog)
                .map_err(|e| JournalError::Rejected {
                    index,
                    source: Box::new(e),
                })?;
            accepted += 1;
        }
        Ok(accepted)
    }

    pub fn records(&self) -> &[TradeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TradeRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a Portfolio {
    type Item = &'a TradeRecord;
    type IntoIter = std::slice::Iter<'a, TradeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
