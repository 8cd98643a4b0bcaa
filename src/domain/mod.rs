//! Domain types for the gold trading ledger.
//!
//! This module provides:
//! - Fixed-scale `Money` (2 dp) and `Quantity` (3 dp) over rust_decimal
//! - Primitives: `Timestamp`, `Action`
//! - The immutable `HistoryEntry` record

pub mod decimal;
pub mod entry;
pub mod primitives;

pub use decimal::{parse_literal, LiteralError, Money, Quantity, MONEY_SCALE, QUANTITY_SCALE};
pub use entry::HistoryEntry;
pub use primitives::{Action, Timestamp, TIMESTAMP_FORMAT};
