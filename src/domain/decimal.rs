//! Fixed-scale decimal types backed by rust_decimal.
//!
//! `Money` carries 2 fractional digits and `Quantity` carries 3. Every value is
//! rounded half-up (away from zero) when it is constructed, so arithmetic between
//! two already-scaled values stays exact and only products need an explicit
//! rounding step.

use rust_decimal::{Decimal as RustDecimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::str::FromStr;
use thiserror::Error;

/// Fractional digits kept by [`Money`].
pub const MONEY_SCALE: u32 = 2;
/// Fractional digits kept by [`Quantity`].
pub const QUANTITY_SCALE: u32 = 3;

/// Currency prefix used when rendering money for people.
pub const CURRENCY_PREFIX: &str = "Rp";
/// Unit suffix used when rendering quantities for people.
pub const UNIT_SUFFIX: &str = "g";

/// Round half-up to `scale` digits and pin the scale so plain formatting is stable.
fn quantize(value: RustDecimal, scale: u32) -> RustDecimal {
    let mut rounded = value.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(scale);
    rounded
}

/// Largest number of fractional digits rust_decimal can hold.
const MAX_SCALE: u32 = 28;

/// Why a decimal literal has no exact rust_decimal value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LiteralError {
    #[error("not a decimal number")]
    Malformed,
    #[error("magnitude too large")]
    TooLarge,
    #[error("more significant digits than can be held exactly")]
    TooPrecise,
    /// Nonzero, but smaller in magnitude than `1e-28`.
    #[error("magnitude too small")]
    Underflow,
}

/// Parse a decimal literal exactly, accepting plain (`12.5`) and scientific
/// (`1.25e1`) forms. Literals that would need rounding are refused.
pub fn parse_literal(s: &str) -> Result<RustDecimal, LiteralError> {
    match s.find(['e', 'E']) {
        Some(at) => parse_scientific(&s[..at], &s[at + 1..]),
        None => parse_plain(s),
    }
}

fn parse_plain(s: &str) -> Result<RustDecimal, LiteralError> {
    match RustDecimal::from_str_exact(s) {
        Ok(value) => Ok(value),
        Err(rust_decimal::Error::Underflow) => {
            // Trailing fractional zeros carry no precision.
            let trimmed = if s.contains('.') {
                s.trim_end_matches('0')
            } else {
                s
            };
            if trimmed != s {
                if let Ok(value) = RustDecimal::from_str_exact(trimmed) {
                    return Ok(value);
                }
            }
            if below_min_magnitude(s) {
                Err(LiteralError::Underflow)
            } else {
                Err(LiteralError::TooPrecise)
            }
        }
        Err(_) if is_plain_number(s) => Err(LiteralError::TooLarge),
        Err(_) => Err(LiteralError::Malformed),
    }
}

fn parse_scientific(mantissa: &str, exponent: &str) -> Result<RustDecimal, LiteralError> {
    let mantissa = match parse_plain(mantissa)? {
        m if m.is_zero() => {
            return match exponent.parse::<i64>() {
                Ok(_) => Ok(RustDecimal::ZERO),
                Err(_) => Err(LiteralError::Malformed),
            }
        }
        m => m.normalize(),
    };
    let exponent = match exponent.parse::<i64>() {
        Ok(e) => e,
        Err(_) if is_plain_number(exponent) && !exponent.contains('.') => {
            return Err(if exponent.starts_with('-') {
                LiteralError::Underflow
            } else {
                LiteralError::TooLarge
            });
        }
        Err(_) => return Err(LiteralError::Malformed),
    };

    if exponent >= 0 {
        // Any nonzero mantissa is at least 1e-28, so 10^57 overflows it.
        if exponent > 2 * i64::from(MAX_SCALE) + 1 {
            return Err(LiteralError::TooLarge);
        }
        let mut value = mantissa;
        for _ in 0..exponent {
            value = value
                .checked_mul(RustDecimal::TEN)
                .ok_or(LiteralError::TooLarge)?;
        }
        return Ok(value);
    }

    let scale = i64::from(mantissa.scale()).saturating_sub(exponent);
    if scale <= i64::from(MAX_SCALE) {
        let mut value = mantissa;
        value
            .set_scale(scale as u32)
            .map_err(|_| LiteralError::TooPrecise)?;
        return Ok(value);
    }
    let digits = mantissa.mantissa().unsigned_abs().to_string().len() as i64;
    if scale - digits >= i64::from(MAX_SCALE) {
        Err(LiteralError::Underflow)
    } else {
        Err(LiteralError::TooPrecise)
    }
}

/// Optional sign, digits, at most one `.`, at least one digit.
fn is_plain_number(s: &str) -> bool {
    let unsigned = s.strip_prefix(['-', '+']).unwrap_or(s);
    let mut dots = 0;
    let mut digits = 0;
    for ch in unsigned.chars() {
        match ch {
            '0'..='9' => digits += 1,
            '.' => dots += 1,
            _ => return false,
        }
    }
    digits > 0 && dots <= 1
}

/// True for a plain literal whose first nonzero digit sits past the 28th
/// fractional place.
fn below_min_magnitude(s: &str) -> bool {
    let unsigned = s.strip_prefix(['-', '+']).unwrap_or(s);
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    int_part.chars().all(|c| c == '0')
        && frac_part.chars().take_while(|&c| c == '0').count() >= MAX_SCALE as usize
}

/// Insert `,` between groups of three digits in the integer part of a plain decimal string.
fn group_thousands(plain: &str) -> String {
    let (sign, unsigned) = match plain.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", plain),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}

/// An amount of currency with exactly two fractional digits.
///
/// The type itself allows any sign; keeping balances non-negative is the
/// ledger's job.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(from = "RustDecimal", into = "RustDecimal")]
pub struct Money(RustDecimal);

impl Money {
    /// Create Money from an arbitrary decimal, rounding half-up to 2 digits.
    pub fn new(value: RustDecimal) -> Self {
        Money(quantize(value, MONEY_SCALE))
    }

    /// Whole currency units, e.g. `Money::from_major(1_000)` is `1000.00`.
    pub fn from_major(units: i64) -> Self {
        Money::new(RustDecimal::from(units))
    }

    pub fn zero() -> Self {
        Money::new(RustDecimal::ZERO)
    }

    /// Get the underlying RustDecimal.
    pub fn inner(&self) -> RustDecimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the value is > 0.
    pub fn is_positive(&self) -> bool {
        !self.is_zero() && self.0.is_sign_positive()
    }

    /// Returns true if the value is < 0.
    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.0.is_sign_negative()
    }

    /// Multiply by a scalar and round once. `None` on decimal overflow.
    pub fn checked_scale(&self, factor: RustDecimal) -> Option<Money> {
        self.0.checked_mul(factor).map(Money::new)
    }

    pub fn checked_add(&self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money::new)
    }

    /// Machine-readable form without prefix or separators, e.g. `2000000.00`.
    pub fn to_plain_string(&self) -> String {
        format!("{:.2}", self.0)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", CURRENCY_PREFIX, group_thousands(&self.to_plain_string()))
    }
}

impl FromStr for Money {
    type Err = LiteralError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_literal(s).map(Money::new)
    }
}

impl From<RustDecimal> for Money {
    fn from(value: RustDecimal) -> Self {
        Money::new(value)
    }
}

impl From<Money> for RustDecimal {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        *self = *self + rhs;
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        *self = *self - rhs;
    }
}

/// An amount of the commodity in grams, with exactly three fractional digits.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(from = "RustDecimal", into = "RustDecimal")]
pub struct Quantity(RustDecimal);

impl Quantity {
    /// Create a Quantity from an arbitrary decimal, rounding half-up to 3 digits.
    pub fn new(value: RustDecimal) -> Self {
        Quantity(quantize(value, QUANTITY_SCALE))
    }

    pub fn zero() -> Self {
        Quantity::new(RustDecimal::ZERO)
    }

    /// Get the underlying RustDecimal.
    pub fn inner(&self) -> RustDecimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the value is > 0.
    pub fn is_positive(&self) -> bool {
        !self.is_zero() && self.0.is_sign_positive()
    }

    /// Value of this quantity at `price`, rounded once to money scale.
    /// `None` on decimal overflow.
    pub fn checked_value_at(&self, price: Money) -> Option<Money> {
        self.0.checked_mul(price.inner()).map(Money::new)
    }

    /// Machine-readable form without unit, e.g. `2.000`.
    pub fn to_plain_string(&self) -> String {
        format!("{:.3}", self.0)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.to_plain_string(), UNIT_SUFFIX)
    }
}

impl FromStr for Quantity {
    type Err = LiteralError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_literal(s).map(Quantity::new)
    }
}

impl From<RustDecimal> for Quantity {
    fn from(value: RustDecimal) -> Self {
        Quantity::new(value)
    }
}

impl From<Quantity> for RustDecimal {
    fn from(value: Quantity) -> Self {
        value.0
    }
}

impl Add for Quantity {
    type Output = Quantity;

    fn add(self, rhs: Quantity) -> Quantity {
        Quantity(self.0 + rhs.0)
    }
}

impl Sub for Quantity {
    type Output = Quantity;

    fn sub(self, rhs: Quantity) -> Quantity {
        Quantity(self.0 - rhs.0)
    }
}

impl AddAssign for Quantity {
    fn add_assign(&mut self, rhs: Quantity) {
        *self = *self + rhs;
    }
}

impl SubAssign for Quantity {
    fn sub_assign(&mut self, rhs: Quantity) {
        *self = *self - rhs;
    }
}
