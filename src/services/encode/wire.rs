use std::str::FromStr;

use alloy_primitives::{hex, Address, U256};
use num_bigint::BigUint;

use crate::models::messages::AmountInput;

use super::amount::{denormalize, normalize_amount, normalize_exact, DecimalAmount};
use super::TradeError;

/// Largest float that still denotes every integer below it (2^53).
const MAX_EXACT_FLOAT_AMOUNT: f64 = 9_007_199_254_740_992.0;

/// Parses a smallest-unit amount literal; decimal and exponent forms are accepted when they
/// denote an integer.
pub(crate) fn parse_amount(value: &str) -> Result<BigUint, TradeError> {
    DecimalAmount::from_str(value)?.to_integer()
}

/// Renders a request amount as the digit-only string sent downstream, checked against the
/// integer the caller wrote.
pub(crate) fn normalize_input(input: &AmountInput) -> Result<String, TradeError> {
    match input {
        AmountInput::Text(value) => normalize_amount(&DecimalAmount::from_str(value)?),
        AmountInput::Integer(value) => {
            normalize_exact(&DecimalAmount::from(u128::from(*value)), &BigUint::from(*value))
        }
        AmountInput::Number(value) => {
            let amount = DecimalAmount::from_f64(*value)?;
            if *value > MAX_EXACT_FLOAT_AMOUNT {
                return Err(TradeError::precision_loss(format!(
                    "Numeric amount {value} is beyond exact float range; send it as a string"
                )));
            }
            // Fractional values fail inside normalize_exact before the comparison.
            normalize_exact(&amount, &BigUint::from(*value as u64))
        }
    }
}

/// Same as [`normalize_input`], parsed back to the integer it denotes.
pub(crate) fn integer_from_input(input: &AmountInput) -> Result<BigUint, TradeError> {
    denormalize(&normalize_input(input)?)
}

pub(crate) fn parse_address(value: &str) -> Result<Address, TradeError> {
    let trimmed = value.trim();
    let stripped = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    if stripped.len() != 40 {
        return Err(TradeError::invalid(format!(
            "Invalid address length for {}",
            value
        )));
    }
    Address::from_str(stripped)
        .map_err(|err| TradeError::invalid(format!("Invalid address {}: {}", value, err)))
}

pub(crate) fn format_address(address: &Address) -> String {
    hex::encode_prefixed(address)
}

pub(crate) fn format_calldata(data: &[u8]) -> String {
    hex::encode_prefixed(data)
}

pub(crate) fn biguint_to_u256_checked(value: &BigUint, label: &str) -> Result<U256, TradeError> {
    let bytes = value.to_bytes_be();
    if bytes.len() > 32 {
        return Err(TradeError::invalid(format!("{} must fit uint256", label)));
    }

    Ok(U256::from_be_slice(&bytes))
}

pub(crate) fn u256_to_biguint(value: U256) -> BigUint {
    BigUint::from_bytes_be(&value.to_be_bytes::<32>())
}
