use crate::domain::Money;
use crate::engine::LedgerSettings;
pub use crate::error::ConfigError;
use rust_decimal::Decimal as RustDecimal;
use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Config {
    pub ledger: LedgerSettings,
    /// Seed for the price walk; `None` seeds from the OS.
    pub seed: Option<u64>,
    pub export_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let defaults = LedgerSettings::default();

        let initial_cash = parse_money(&env_map, "LEDGER_INITIAL_CASH", defaults.initial_cash)?;
        if initial_cash.is_negative() {
            return Err(ConfigError::InvalidValue(
                "LEDGER_INITIAL_CASH".to_string(),
                "must not be negative".to_string(),
            ));
        }

        let initial_price = parse_money(&env_map, "LEDGER_INITIAL_PRICE", defaults.initial_price)?;
        require_positive("LEDGER_INITIAL_PRICE", initial_price)?;

        let min_price = parse_money(&env_map, "LEDGER_MIN_PRICE", defaults.min_price)?;
        require_positive("LEDGER_MIN_PRICE", min_price)?;

        let max_daily_move = match env_map.get("LEDGER_MAX_DAILY_MOVE") {
            Some(raw) => RustDecimal::from_str(raw.trim()).map_err(|_| {
                ConfigError::InvalidValue(
                    "LEDGER_MAX_DAILY_MOVE".to_string(),
                    "must be a decimal number".to_string(),
                )
            })?,
            None => defaults.max_daily_move,
        };
        if max_daily_move <= RustDecimal::ZERO || max_daily_move >= RustDecimal::ONE {
            return Err(ConfigError::InvalidValue(
                "LEDGER_MAX_DAILY_MOVE".to_string(),
                format!("must be between 0 and 1 exclusive, got {}", max_daily_move),
            ));
        }

        let seed = env_map
            .get("LEDGER_SEED")
            .map(|s| s.trim().parse::<u64>())
            .transpose()
            .map_err(|_| {
                ConfigError::InvalidValue("LEDGER_SEED".to_string(), "must be a valid u64".to_string())
            })?;

        let export_dir = env_map
            .get("LEDGER_EXPORT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Config {
            ledger: LedgerSettings {
                initial_cash,
                initial_price,
                min_price,
                max_daily_move,
            },
            seed,
            export_dir,
        })
    }
}

fn parse_money(
    env_map: &HashMap<String, String>,
    key: &str,
    default: Money,
) -> Result<Money, ConfigError> {
    match env_map.get(key) {
        Some(raw) => raw.trim().parse::<Money>().map_err(|_| {
            ConfigError::InvalidValue(key.to_string(), "must be a decimal amount".to_string())
        }),
        None => Ok(default),
    }
}

fn require_positive(key: &str, value: Money) -> Result<(), ConfigError> {
    if value.is_positive() {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue(
            key.to_string(),
            format!("must be greater than zero, got {}", value.to_plain_string()),
        ))
    }
}
