use crate::domain::{parse_literal, Action, HistoryEntry, LiteralError, Money, Quantity};
use crate::error::{InvalidInput, LedgerError};
use crate::export::HistoryRow;
use rust_decimal::{Decimal as RustDecimal, RoundingStrategy};

use super::{Clock, DayAdvance, PriceMove, RandomWalk, Snapshot, SystemClock};

/// Starting conditions and market bounds for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerSettings {
    pub initial_cash: Money,
    pub initial_price: Money,
    /// Lowest price the daily step may produce.
    pub min_price: Money,
    /// Largest fractional daily move drawn by the random walk.
    pub max_daily_move: RustDecimal,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            initial_cash: Money::from_major(100_000_000),
            initial_price: Money::from_major(1_000_000),
            min_price: Money::from_major(1_000),
            max_daily_move: RustDecimal::new(5, 2),
        }
    }
}

/// Mutable account state of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerState {
    pub cash: Money,
    pub holdings: Quantity,
    pub price_per_unit: Money,
    pub day: u32,
}

impl LedgerState {
    fn opening(settings: &LedgerSettings) -> Self {
        Self {
            cash: settings.initial_cash,
            holdings: Quantity::zero(),
            price_per_unit: settings.initial_price,
            day: 1,
        }
    }
}

/// Parse a user-typed gram amount.
///
/// Surrounding whitespace is ignored. The literal is read exactly, rounded
/// half-up to 3 digits once, and must still be strictly positive afterwards.
pub fn parse_quantity(input: &str) -> Result<Quantity, InvalidInput> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(InvalidInput::Empty);
    }
    let raw = parse_literal(trimmed).map_err(|e| match e {
        LiteralError::Malformed => InvalidInput::Malformed(trimmed.to_string()),
        LiteralError::TooLarge | LiteralError::TooPrecise => {
            InvalidInput::OutOfRange(trimmed.to_string())
        }
        LiteralError::Underflow => InvalidInput::NonPositive(trimmed.to_string()),
    })?;
    let grams = Quantity::new(raw);
    if !grams.is_positive() {
        return Err(InvalidInput::NonPositive(trimmed.to_string()));
    }
    Ok(grams)
}

/// Single-session gold ledger.
///
/// Owns the account state and the append-only history. Every successful
/// operation mutates the state and appends exactly one entry; every failed one
/// returns an error and leaves both untouched.
pub struct Ledger {
    state: LedgerState,
    history: Vec<HistoryEntry>,
    min_price: Money,
    market: Box<dyn PriceMove>,
    clock: Box<dyn Clock>,
}

impl Ledger {
    /// New session with an OS-seeded random walk and the local clock.
    pub fn new(settings: LedgerSettings) -> Self {
        let market = RandomWalk::new(settings.max_daily_move);
        Self::with_sources(settings, Box::new(market), Box::new(SystemClock))
    }

    /// New session whose price path is reproducible from `seed`.
    pub fn seeded(settings: LedgerSettings, seed: u64) -> Self {
        let market = RandomWalk::with_seed(settings.max_daily_move, seed);
        Self::with_sources(settings, Box::new(market), Box::new(SystemClock))
    }

    /// New session with explicit price and time sources.
    pub fn with_sources(
        settings: LedgerSettings,
        market: Box<dyn PriceMove>,
        clock: Box<dyn Clock>,
    ) -> Self {
        let mut ledger = Self {
            state: LedgerState::opening(&settings),
            history: Vec::new(),
            min_price: settings.min_price,
            market,
            clock,
        };
        ledger.record(Action::Start, Quantity::zero(), Money::zero());
        tracing::info!(
            cash = %ledger.state.cash,
            price = %ledger.state.price_per_unit,
            "session started"
        );
        ledger
    }

    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    /// All entries in the order they were recorded.
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            day: self.state.day,
            price_per_unit: self.state.price_per_unit,
            cash: self.state.cash,
            holdings: self.state.holdings,
        }
    }

    /// Buy `input` grams at the current price.
    pub fn buy(&mut self, input: &str) -> Result<Snapshot, LedgerError> {
        let grams = parse_quantity(input).map_err(|e| rejected(Action::Buy, e.into()))?;
        let cost = grams
            .checked_value_at(self.state.price_per_unit)
            .ok_or_else(|| rejected(Action::Buy, out_of_range(grams)))?;

        if cost > self.state.cash {
            return Err(rejected(
                Action::Buy,
                LedgerError::InsufficientFunds {
                    required: cost,
                    available: self.state.cash,
                },
            ));
        }

        self.state.cash -= cost;
        self.state.holdings += grams;
        self.record(Action::Buy, grams, cost);
        tracing::info!(grams = %grams, price = %self.state.price_per_unit, cost = %cost, "bought");
        Ok(self.snapshot())
    }

    /// Sell `input` grams at the current price.
    pub fn sell(&mut self, input: &str) -> Result<Snapshot, LedgerError> {
        let grams = parse_quantity(input).map_err(|e| rejected(Action::Sell, e.into()))?;

        if grams > self.state.holdings {
            return Err(rejected(
                Action::Sell,
                LedgerError::InsufficientHoldings {
                    requested: grams,
                    held: self.state.holdings,
                },
            ));
        }

        let (revenue, cash_after) = self
            .proceeds(grams)
            .ok_or_else(|| rejected(Action::Sell, out_of_range(grams)))?;

        self.state.holdings -= grams;
        self.state.cash = cash_after;
        self.record(Action::Sell, grams, revenue);
        tracing::info!(grams = %grams, price = %self.state.price_per_unit, revenue = %revenue, "sold");
        Ok(self.snapshot())
    }

    /// Sell the whole holding. Holdings end at exactly zero.
    pub fn sell_all(&mut self) -> Result<Snapshot, LedgerError> {
        let grams = self.state.holdings;
        if !grams.is_positive() {
            return Err(rejected(Action::SellAll, LedgerError::NothingToSell));
        }

        let (revenue, cash_after) = self
            .proceeds(grams)
            .ok_or_else(|| rejected(Action::SellAll, out_of_range(grams)))?;

        self.state.holdings = Quantity::zero();
        self.state.cash = cash_after;
        self.record(Action::SellAll, grams, revenue);
        tracing::info!(grams = %grams, price = %self.state.price_per_unit, revenue = %revenue, "sold all");
        Ok(self.snapshot())
    }

    /// Move to the next day and apply one random price change.
    ///
    /// The new price is `price * (1 + change)` rounded to cents, raised to the
    /// minimum price when it would fall below it.
    pub fn advance_day(&mut self) -> DayAdvance {
        let change = self.market.next_move();
        let old_price = self.state.price_per_unit;

        let computed = old_price
            .checked_scale(RustDecimal::ONE + change)
            .unwrap_or_else(|| {
                tracing::warn!(price = %old_price, change = %change, "price step overflowed, keeping price");
                old_price
            });
        let floored = computed < self.min_price;
        let new_price = if floored { self.min_price } else { computed };

        let from_day = self.state.day;
        self.state.price_per_unit = new_price;
        self.state.day = next_day(from_day);
        self.record(Action::MarketUpdate, Quantity::zero(), Money::zero());

        let percent_change = (change * RustDecimal::ONE_HUNDRED)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        tracing::debug!(change = %change, floored, "price move drawn");
        tracing::info!(
            from_day,
            to_day = self.state.day,
            old_price = %old_price,
            new_price = %new_price,
            "market updated"
        );

        DayAdvance {
            from_day,
            to_day: self.state.day,
            change,
            percent_change,
            floored,
            snapshot: self.snapshot(),
        }
    }

    /// Flat rows for every history entry, oldest first.
    pub fn export_history(&self) -> Vec<HistoryRow> {
        self.history.iter().map(HistoryRow::from).collect()
    }

    /// Revenue for selling `grams` now and the resulting cash balance.
    fn proceeds(&self, grams: Quantity) -> Option<(Money, Money)> {
        let revenue = grams.checked_value_at(self.state.price_per_unit)?;
        let cash_after = self.state.cash.checked_add(revenue)?;
        Some((revenue, cash_after))
    }

    fn record(&mut self, action: Action, quantity: Quantity, total: Money) {
        self.history.push(HistoryEntry::new(
            self.clock.now(),
            action,
            quantity,
            self.state.price_per_unit,
            total,
            self.state.cash,
            self.state.holdings,
        ));
    }
}

/// Day after `day`; stays on the last representable day instead of wrapping.
fn next_day(day: u32) -> u32 {
    day.checked_add(1).unwrap_or_else(|| {
        tracing::warn!(day, "day counter exhausted, keeping day");
        day
    })
}

fn out_of_range(grams: Quantity) -> LedgerError {
    InvalidInput::OutOfRange(grams.to_plain_string()).into()
}

fn rejected(action: Action, err: LedgerError) -> LedgerError {
    tracing::warn!(action = %action, error = %err, "transaction rejected");
    err
}
