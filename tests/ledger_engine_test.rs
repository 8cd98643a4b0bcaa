use emas_ledger::engine::{FixedClock, ScriptedMoves};
use emas_ledger::{
    Action, InvalidInput, Ledger, LedgerError, LedgerSettings, LedgerState, Money, Quantity,
    Timestamp,
};
use rust_decimal::Decimal as RustDecimal;
use std::str::FromStr;

fn m(s: &str) -> Money {
    s.parse().unwrap()
}

fn q(s: &str) -> Quantity {
    s.parse().unwrap()
}

fn d(s: &str) -> RustDecimal {
    RustDecimal::from_str(s).unwrap()
}

fn at() -> Timestamp {
    Timestamp::new(
        chrono::NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(7, 5, 0)
            .unwrap(),
    )
}

fn ledger_with_moves(settings: LedgerSettings, moves: &[&str]) -> Ledger {
    let moves = ScriptedMoves::new(moves.iter().map(|s| d(s)));
    Ledger::with_sources(settings, Box::new(moves), Box::new(FixedClock(at())))
}

fn default_ledger() -> Ledger {
    ledger_with_moves(LedgerSettings::default(), &[])
}

fn assert_invariants(state: &LedgerState) {
    assert!(!state.cash.is_negative(), "cash went negative: {}", state.cash);
    assert!(
        state.holdings >= Quantity::zero(),
        "holdings went negative: {}",
        state.holdings
    );
    assert!(state.price_per_unit.is_positive(), "price not positive");
}

#[test]
fn test_trading_scenario() {
    let mut ledger = default_ledger();

    let snap = ledger.buy("2").unwrap();
    assert_eq!(snap.cash, m("98000000.00"));
    assert_eq!(snap.holdings, q("2.000"));
    assert_eq!(ledger.history()[1].total(), m("2000000.00"));

    let snap = ledger.sell("1").unwrap();
    assert_eq!(snap.cash, m("99000000.00"));
    assert_eq!(snap.holdings, q("1.000"));
    assert_eq!(ledger.history()[2].total(), m("1000000.00"));

    let before = ledger.state().clone();
    let err = ledger.buy("-1").unwrap_err();
    assert_eq!(
        err,
        LedgerError::InvalidInput(InvalidInput::NonPositive("-1".to_string()))
    );
    assert_eq!(ledger.state(), &before);

    let err = ledger.sell("5").unwrap_err();
    assert_eq!(
        err,
        LedgerError::InsufficientHoldings {
            requested: q("5"),
            held: q("1"),
        }
    );
    assert_eq!(ledger.state(), &before);
    assert_eq!(ledger.history().len(), 3);
}

#[test]
fn test_buy_entry_records_transition() {
    let mut ledger = default_ledger();
    ledger.buy("0.5").unwrap();

    let entry = &ledger.history()[1];
    assert_eq!(entry.action(), Action::Buy);
    assert_eq!(entry.timestamp(), at());
    assert_eq!(entry.quantity(), q("0.5"));
    assert_eq!(entry.price_per_unit(), m("1000000"));
    assert_eq!(entry.total(), m("500000"));
    assert_eq!(entry.cash_after(), m("99500000"));
    assert_eq!(entry.holdings_after(), q("0.5"));
}

#[test]
fn test_buy_insufficient_funds_is_noop() {
    let settings = LedgerSettings {
        initial_cash: m("1500000"),
        ..LedgerSettings::default()
    };
    let mut ledger = ledger_with_moves(settings, &[]);

    let err = ledger.buy("2").unwrap_err();
    assert_eq!(
        err,
        LedgerError::InsufficientFunds {
            required: m("2000000"),
            available: m("1500000"),
        }
    );
    assert_eq!(ledger.state().cash, m("1500000"));
    assert_eq!(ledger.state().holdings, Quantity::zero());
    assert_eq!(ledger.history().len(), 1);
}

#[test]
fn test_buy_spending_exact_balance() {
    let settings = LedgerSettings {
        initial_cash: m("2000000"),
        ..LedgerSettings::default()
    };
    let mut ledger = ledger_with_moves(settings, &[]);

    let snap = ledger.buy("2").unwrap();
    assert_eq!(snap.cash, Money::zero());
    assert_eq!(snap.holdings, q("2"));
}

#[test]
fn test_cost_rounds_half_up_once() {
    let settings = LedgerSettings {
        initial_price: m("33.33"),
        ..LedgerSettings::default()
    };
    let mut ledger = ledger_with_moves(settings, &[]);

    // 0.015 g * 33.33 = 0.49995 -> 0.50
    ledger.buy("0.015").unwrap();
    assert_eq!(ledger.history()[1].total(), m("0.50"));
    assert_eq!(ledger.state().cash, m("99999999.50"));
}

#[test]
fn test_input_failures_are_distinct() {
    let mut ledger = default_ledger();
    assert_eq!(
        ledger.buy("").unwrap_err(),
        LedgerError::InvalidInput(InvalidInput::Empty)
    );
    assert_eq!(
        ledger.sell("  ").unwrap_err(),
        LedgerError::InvalidInput(InvalidInput::Empty)
    );
    assert_eq!(
        ledger.buy("abc").unwrap_err(),
        LedgerError::InvalidInput(InvalidInput::Malformed("abc".to_string()))
    );
    assert_eq!(
        ledger.sell("0").unwrap_err(),
        LedgerError::InvalidInput(InvalidInput::NonPositive("0".to_string()))
    );
    assert_eq!(ledger.history().len(), 1);
}

#[test]
fn test_sell_all_leaves_exact_zero() {
    let settings = LedgerSettings {
        initial_price: m("123.45"),
        min_price: m("1"),
        ..LedgerSettings::default()
    };
    let mut ledger = ledger_with_moves(settings, &["0.0123", "-0.0311"]);

    ledger.buy("1.111").unwrap();
    ledger.advance_day();
    ledger.buy("2.222").unwrap();
    ledger.advance_day();
    ledger.sell("0.333").unwrap();

    assert_eq!(ledger.state().price_per_unit, m("121.08"));
    let held = ledger.state().holdings;
    assert_eq!(held, q("3.000"));
    let price = ledger.state().price_per_unit;
    let cash_before = ledger.state().cash;

    let snap = ledger.sell_all().unwrap();
    assert!(snap.holdings.is_zero());
    assert_eq!(snap.holdings, Quantity::zero());
    assert_eq!(snap.cash, cash_before + held.checked_value_at(price).unwrap());

    let entry = ledger.history().last().unwrap();
    assert_eq!(entry.action(), Action::SellAll);
    assert_eq!(entry.quantity(), held);
    assert_eq!(entry.holdings_after(), Quantity::zero());
}

#[test]
fn test_sell_all_with_nothing_held() {
    let mut ledger = default_ledger();
    assert_eq!(ledger.sell_all().unwrap_err(), LedgerError::NothingToSell);
    assert_eq!(ledger.history().len(), 1);

    ledger.buy("1").unwrap();
    ledger.sell("1").unwrap();
    assert_eq!(ledger.sell_all().unwrap_err(), LedgerError::NothingToSell);
    assert_eq!(ledger.history().len(), 3);
}

#[test]
fn test_buy_then_sell_round_trip() {
    let mut ledger = default_ledger();
    let before = ledger.state().clone();

    ledger.buy("0.777").unwrap();
    ledger.sell("0.777").unwrap();

    assert_eq!(ledger.state().cash, before.cash);
    assert_eq!(ledger.state().holdings, before.holdings);
}

#[test]
fn test_advance_day_applies_move() {
    let mut ledger = ledger_with_moves(LedgerSettings::default(), &["0.025"]);
    ledger.buy("1").unwrap();

    let advance = ledger.advance_day();
    assert_eq!(advance.from_day, 1);
    assert_eq!(advance.to_day, 2);
    assert_eq!(advance.change, d("0.025"));
    assert_eq!(advance.percent_change, d("2.50"));
    assert!(!advance.floored);
    assert_eq!(advance.snapshot.price_per_unit, m("1025000"));
    assert_eq!(advance.snapshot.day, 2);

    let entry = ledger.history().last().unwrap();
    assert_eq!(entry.action(), Action::MarketUpdate);
    assert_eq!(entry.quantity(), Quantity::zero());
    assert_eq!(entry.total(), Money::zero());
    assert_eq!(entry.price_per_unit(), m("1025000"));
    assert_eq!(entry.cash_after(), m("99000000"));
    assert_eq!(entry.holdings_after(), q("1"));
}

#[test]
fn test_price_floor_on_crash() {
    let settings = LedgerSettings {
        initial_price: m("100.00"),
        ..LedgerSettings::default()
    };
    let mut ledger = ledger_with_moves(settings, &["-0.5", "-1", "-2"]);

    let advance = ledger.advance_day();
    assert!(advance.floored);
    assert_eq!(advance.snapshot.price_per_unit, m("1000.00"));
    assert_eq!(advance.percent_change, d("-50.00"));

    // 1000 * 0 = 0 and 1000 * -1 = -1000 are both floored.
    assert_eq!(ledger.advance_day().snapshot.price_per_unit, m("1000.00"));
    assert_eq!(ledger.advance_day().snapshot.price_per_unit, m("1000.00"));
    assert_eq!(ledger.state().day, 4);
}

#[test]
fn test_invariants_hold_over_random_session() {
    let mut ledger = Ledger::seeded(LedgerSettings::default(), 2024);
    let orders = ["3", "0.5", "abc", "200", "-2", "1.25", "0.001", ""];

    for round in 0..400 {
        let order = orders[round % orders.len()];
        let before = ledger.history().len();
        let ok = match round % 5 {
            0 => ledger.buy(order).is_ok(),
            1 => ledger.sell(order).is_ok(),
            2 => {
                ledger.advance_day();
                true
            }
            3 => ledger.sell_all().is_ok(),
            _ => ledger.buy("0.1").is_ok(),
        };
        let expected = if ok { before + 1 } else { before };
        assert_eq!(ledger.history().len(), expected, "round {}", round);
        assert_invariants(ledger.state());
    }
}

#[test]
fn test_history_length_counts_successes() {
    let mut ledger = default_ledger();
    let mut successes = 0;

    successes += ledger.buy("1").is_ok() as usize;
    successes += ledger.buy("1000").is_ok() as usize;
    successes += ledger.sell("2").is_ok() as usize;
    successes += ledger.sell("0.5").is_ok() as usize;
    ledger.advance_day();
    successes += 1;
    successes += ledger.sell_all().is_ok() as usize;
    successes += ledger.sell_all().is_ok() as usize;

    assert_eq!(successes, 4);
    assert_eq!(ledger.history().len(), successes + 1);
    assert_eq!(ledger.history()[0].action(), Action::Start);
}

#[test]
fn test_snapshot_net_worth() {
    let mut ledger = ledger_with_moves(LedgerSettings::default(), &["0.01"]);
    ledger.buy("10").unwrap();
    let advance = ledger.advance_day();

    // 90,000,000 cash + 10 g at 1,010,000
    assert_eq!(advance.snapshot.net_worth(), Some(m("100100000")));
}
