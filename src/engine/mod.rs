//! Ledger engine: account state, trading operations and the daily price step.

use crate::domain::{Money, Quantity};
use rust_decimal::Decimal as RustDecimal;
use serde::{Deserialize, Serialize};

pub mod clock;
pub mod ledger;
pub mod market;

pub use clock::{Clock, FixedClock, SystemClock};
pub use ledger::{parse_quantity, Ledger, LedgerSettings, LedgerState};
pub use market::{PriceMove, RandomWalk, ScriptedMoves};

/// Read-only view of the account returned after every operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub day: u32,
    pub price_per_unit: Money,
    pub cash: Money,
    pub holdings: Quantity,
}

impl Snapshot {
    /// Cash plus holdings marked at the current price. `None` on decimal overflow.
    pub fn net_worth(&self) -> Option<Money> {
        self.holdings
            .checked_value_at(self.price_per_unit)
            .and_then(|value| self.cash.checked_add(value))
    }
}

/// Outcome of advancing the simulated day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayAdvance {
    pub from_day: u32,
    pub to_day: u32,
    /// Drawn fractional change, e.g. `-0.0125`.
    pub change: RustDecimal,
    /// `change * 100`, rounded half-up to 2 digits, for display.
    pub percent_change: RustDecimal,
    /// True when the minimum price replaced the computed one.
    pub floored: bool,
    pub snapshot: Snapshot,
}
