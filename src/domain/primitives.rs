//! Domain primitives: Timestamp, Action.

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Wall-clock format used for history timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Local wall-clock time of a history entry, at second resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(pub NaiveDateTime);

impl Timestamp {
    pub fn new(at: NaiveDateTime) -> Self {
        Timestamp(at)
    }

    /// Current local time.
    pub fn now() -> Self {
        Timestamp(Local::now().naive_local())
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(TIMESTAMP_FORMAT))
    }
}

/// Kind of state transition recorded in the history log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    /// Session opened.
    Start,
    Buy,
    Sell,
    /// Entire holding sold in one go.
    SellAll,
    /// Day advanced and the price moved.
    MarketUpdate,
}

impl Action {
    /// Stable token used in exports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Start => "START",
            Action::Buy => "BUY",
            Action::Sell => "SELL",
            Action::SellAll => "SELL_ALL",
            Action::MarketUpdate => "MARKET_UPDATE",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}
