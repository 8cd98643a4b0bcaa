//! History entry: one immutable record per applied ledger operation.

use crate::domain::{Action, Money, Quantity, Timestamp};
use serde::{Deserialize, Serialize};

/// Snapshot of a single state transition.
///
/// Entries are only created by the ledger and never modified afterwards, so all
/// fields are read through accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    timestamp: Timestamp,
    action: Action,
    /// Grams moved by this operation (zero for START and MARKET_UPDATE).
    quantity: Quantity,
    price_per_unit: Money,
    /// Cash that changed hands (zero for START and MARKET_UPDATE).
    total: Money,
    cash_after: Money,
    holdings_after: Quantity,
}

impl HistoryEntry {
    pub(crate) fn new(
        timestamp: Timestamp,
        action: Action,
        quantity: Quantity,
        price_per_unit: Money,
        total: Money,
        cash_after: Money,
        holdings_after: Quantity,
    ) -> Self {
        Self {
            timestamp,
            action,
            quantity,
            price_per_unit,
            total,
            cash_after,
            holdings_after,
        }
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    pub fn price_per_unit(&self) -> Money {
        self.price_per_unit
    }

    pub fn total(&self) -> Money {
        self.total
    }

    pub fn cash_after(&self) -> Money {
        self.cash_after
    }

    pub fn holdings_after(&self) -> Quantity {
        self.holdings_after
    }
}
