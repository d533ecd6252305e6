pub mod error;
pub mod journal;
pub mod settings;
pub mod types;

pub use error::{ErrorKind, JournalError};
pub use journal::metrics::{
    average_r_multiple, cumulative_equity, record_count, summarize, total_pnl, win_rate,
};
pub use journal::portfolio::Portfolio;
pub use journal::projection::{project, restore, TradeRow};
pub use journal::record::{normalize, normalize_with_catalog, Direction, RawTrade, TradeRecord};
pub use journal::request::{BatchRequest, TradeRequest};
pub use journal::strategy::{Strategy, StrategyCatalog};
pub use settings::JournalSettings;
pub use types::*;

/// Standard result type for all trade-journal operations
pub type JournalResult<T> = Result<T, JournalError>;
