pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod export;

pub use config::Config;
pub use domain::{Action, HistoryEntry, Money, Quantity, Timestamp};
pub use engine::{DayAdvance, Ledger, LedgerSettings, LedgerState, Snapshot};
pub use error::{ExportError, InvalidInput, LedgerError};
pub use export::HistoryRow;
