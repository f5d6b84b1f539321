//! Smallest-unit amount normalization for the quoting service.
//!
//! The quoting service only accepts `sellAmount` as a plain run of decimal digits. Callers hand
//! us amounts that are already scaled by the token's decimals, but the literal may still carry a
//! fractional part or an exponent (`"10000.000"`, `"1e22"`, an `f64`). Normalization renders the
//! exact integer those literals denote and refuses anything that would need rounding.

use std::fmt;
use std::str::FromStr;

use num_bigint::BigUint;
use num_traits::Zero;

use super::TradeError;

/// Decimal digits of `2^256 - 1`.
const MAX_UINT256_DIGITS: u64 = 78;

/// An unsigned decimal value `mantissa * 10^exponent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecimalAmount {
    mantissa: BigUint,
    exponent: i64,
}

impl DecimalAmount {
    pub fn new(mantissa: BigUint, exponent: i64) -> Self {
        Self { mantissa, exponent }
    }

    /// Builds an amount from a float through its shortest round-trip scientific rendering, so
    /// `1e22` stays `10^22` instead of picking up binary noise.
    pub fn from_f64(value: f64) -> Result<Self, TradeError> {
        if !value.is_finite() {
            return Err(TradeError::invalid(format!(
                "Amount must be finite: {value}"
            )));
        }
        if value == 0.0 {
            return Ok(Self::new(BigUint::zero(), 0));
        }
        if value < 0.0 {
            return Err(TradeError::invalid(format!(
                "Amount must not be negative: {value}"
            )));
        }
        format!("{value:e}").parse()
    }

    pub fn mantissa(&self) -> &BigUint {
        &self.mantissa
    }

    pub fn exponent(&self) -> i64 {
        self.exponent
    }

    /// The exact integer this amount denotes.
    pub fn to_integer(&self) -> Result<BigUint, TradeError> {
        if self.mantissa.is_zero() {
            return Ok(BigUint::zero());
        }

        if self.exponent >= 0 {
            let digits = decimal_digits(&self.mantissa);
            if digits.saturating_add(self.exponent.unsigned_abs()) > MAX_UINT256_DIGITS + 1 {
                return Err(TradeError::invalid(format!(
                    "Amount {self} must fit uint256"
                )));
            }
            let value = &self.mantissa * pow10(self.exponent.unsigned_abs());
            if value.bits() > 256 {
                return Err(TradeError::invalid(format!(
                    "Amount {self} must fit uint256"
                )));
            }
            return Ok(value);
        }

        let shift = self.exponent.unsigned_abs();
        if shift > decimal_digits(&self.mantissa) {
            return Err(TradeError::precision_loss(format!(
                "Amount {self} has a fractional part in smallest units"
            )));
        }
        let scale = pow10(shift);
        if !(&self.mantissa % &scale).is_zero() {
            return Err(TradeError::precision_loss(format!(
                "Amount {self} has a fractional part in smallest units"
            )));
        }
        Ok(&self.mantissa / &scale)
    }
}

impl From<BigUint> for DecimalAmount {
    fn from(value: BigUint) -> Self {
        Self::new(value, 0)
    }
}

impl From<u128> for DecimalAmount {
    fn from(value: u128) -> Self {
        Self::new(BigUint::from(value), 0)
    }
}

impl FromStr for DecimalAmount {
    type Err = TradeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.starts_with('-') {
            return Err(TradeError::invalid(format!(
                "Amount must not be negative: {value}"
            )));
        }
        let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);

        let (coefficient, exponent) = match unsigned.find(['e', 'E']) {
            Some(index) => {
                let exponent = unsigned[index + 1..]
                    .parse::<i64>()
                    .map_err(|_| TradeError::invalid(format!("Invalid amount: {value}")))?;
                (&unsigned[..index], exponent)
            }
            None => (unsigned, 0),
        };

        let (integer_part, fraction_part) = coefficient.split_once('.').unwrap_or((coefficient, ""));
        let is_digits = |part: &str| part.bytes().all(|byte| byte.is_ascii_digit());
        if (integer_part.is_empty() && fraction_part.is_empty())
            || !is_digits(integer_part)
            || !is_digits(fraction_part)
        {
            return Err(TradeError::invalid(format!("Invalid amount: {value}")));
        }

        let mut digits = String::with_capacity(integer_part.len() + fraction_part.len());
        digits.push_str(integer_part);
        digits.push_str(fraction_part);
        let mantissa = BigUint::from_str(&digits)
            .map_err(|_| TradeError::invalid(format!("Invalid amount: {value}")))?;

        let fraction_len = i64::try_from(fraction_part.len())
            .map_err(|_| TradeError::invalid(format!("Invalid amount: {value}")))?;
        let exponent = exponent
            .checked_sub(fraction_len)
            .ok_or_else(|| TradeError::invalid(format!("Amount exponent out of range: {value}")))?;

        Ok(Self { mantissa, exponent })
    }
}

impl fmt::Display for DecimalAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}e{}", self.mantissa, self.exponent)
    }
}

/// Renders `amount` as the digit-only string the quoting service expects.
pub fn normalize_amount(amount: &DecimalAmount) -> Result<String, TradeError> {
    Ok(amount.to_integer()?.to_str_radix(10))
}

/// Like [`normalize_amount`], but also checks the rendered digits parse back to `intended`.
pub fn normalize_exact(amount: &DecimalAmount, intended: &BigUint) -> Result<String, TradeError> {
    let normalized = normalize_amount(amount)?;
    let round_trip = denormalize(&normalized)?;
    if &round_trip != intended {
        return Err(TradeError::precision_loss(format!(
            "Normalized amount {normalized} does not match intended amount {intended}"
        )));
    }
    Ok(normalized)
}

/// Parses a digit-only amount string.
pub fn denormalize(value: &str) -> Result<BigUint, TradeError> {
    if value.is_empty() || !value.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(TradeError::invalid(format!(
            "Normalized amount must be digits only: {value}"
        )));
    }
    BigUint::from_str(value).map_err(|_| TradeError::invalid(format!("Invalid amount: {value}")))
}

fn decimal_digits(value: &BigUint) -> u64 {
    value.to_str_radix(10).len() as u64
}

fn pow10(exponent: u64) -> BigUint {
    // Callers bound the exponent by MAX_UINT256_DIGITS or the mantissa length.
    let exponent = u32::try_from(exponent).unwrap_or(u32::MAX);
    BigUint::from(10u32).pow(exponent)
}
