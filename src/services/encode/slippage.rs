use num_bigint::BigUint;
use num_traits::Zero;

use super::TradeError;

pub(super) const BPS_DENOMINATOR: u32 = 10_000;

fn mul_bps(amount: &BigUint, bps: u32) -> BigUint {
    if bps == 0 {
        return BigUint::zero();
    }
    (amount * BigUint::from(bps)) / BigUint::from(BPS_DENOMINATOR)
}

pub(super) fn ensure_slippage_bps(slippage_bps: u32) -> Result<(), TradeError> {
    if slippage_bps > BPS_DENOMINATOR {
        return Err(TradeError::invalid(format!(
            "slippageBps must be <= {}",
            BPS_DENOMINATOR
        )));
    }
    Ok(())
}

/// Floor of `expected * (10000 - slippage_bps) / 10000`, kept at 1 or above so a router swap
/// never runs without an output bound.
pub(super) fn apply_slippage(expected: &BigUint, slippage_bps: u32) -> Result<BigUint, TradeError> {
    ensure_slippage_bps(slippage_bps)?;
    if expected.is_zero() {
        return Err(TradeError::invalid("expected amount out must be > 0"));
    }
    let min_out = mul_bps(expected, BPS_DENOMINATOR - slippage_bps);
    if min_out.is_zero() {
        return Ok(BigUint::from(1u8));
    }
    Ok(min_out)
}
