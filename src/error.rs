use crate::domain::{Money, Quantity};
use thiserror::Error;

/// Why a quantity typed by the user was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidInput {
    #[error("quantity is empty")]
    Empty,
    #[error("not a decimal number: {0:?}")]
    Malformed(String),
    #[error("quantity must be greater than zero: {0}")]
    NonPositive(String),
    #[error("quantity is out of range: {0}")]
    OutOfRange(String),
}

/// A rejected transaction. The ledger is left untouched whenever one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),
    #[error("insufficient funds: need {required}, balance is {available}")]
    InsufficientFunds { required: Money, available: Money },
    #[error("insufficient holdings: requested {requested}, holding {held}")]
    InsufficientHoldings { requested: Quantity, held: Quantity },
    #[error("nothing to sell")]
    NothingToSell,
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}
