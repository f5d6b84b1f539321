use alloy_primitives::{Address, Bytes, Keccak256, U256};
use alloy_sol_types::SolValue;
use num_bigint::BigUint;

use crate::models::trade::{CallStep, EncodedStep};

use super::wire::biguint_to_u256_checked;
use super::TradeError;

pub(crate) const ERC20_APPROVE_SIGNATURE: &str = "approve(address,uint256)";
pub(crate) const SWAP_EXACT_TOKENS_SIGNATURE: &str =
    "swapExactTokensForTokens(uint256,uint256,address[],address,uint256)";
pub(crate) const TRADE_FACTORY_EXECUTE_SIGNATURE: &str =
    "execute((address,address,address,uint256,uint256),address,bytes)";

/// Canonical transport form of one call. The declared length is taken from `data`, so the
/// result always satisfies the length invariant.
pub fn encode_step(target: Address, data: &Bytes) -> EncodedStep {
    EncodedStep::from_parts(target, data.len(), data.clone())
}

pub(crate) fn erc20_approve_step(
    token: Address,
    spender: Address,
    amount: &BigUint,
) -> Result<CallStep, TradeError> {
    let amount = biguint_to_u256_checked(amount, "approve amount")?;
    let calldata_args = (spender, amount).abi_encode_params();
    let data = encode_function_call(ERC20_APPROVE_SIGNATURE, calldata_args)?;
    Ok(CallStep::new(token, data))
}

pub(crate) struct SwapExactTokensArgs<'a> {
    pub(crate) router: Address,
    pub(crate) amount_in: &'a BigUint,
    pub(crate) min_amount_out: &'a BigUint,
    pub(crate) path: &'a [Address],
    pub(crate) receiver: Address,
    pub(crate) deadline: u64,
}

pub(crate) fn swap_exact_tokens_step(args: &SwapExactTokensArgs<'_>) -> Result<CallStep, TradeError> {
    let amount_in = biguint_to_u256_checked(args.amount_in, "amountIn")?;
    let min_amount_out = biguint_to_u256_checked(args.min_amount_out, "minAmountOut")?;
    let calldata_args = (
        amount_in,
        min_amount_out,
        args.path.to_vec(),
        args.receiver,
        U256::from(args.deadline),
    )
        .abi_encode_params();
    let data = encode_function_call(SWAP_EXACT_TOKENS_SIGNATURE, calldata_args)?;
    Ok(CallStep::new(args.router, data))
}

pub(crate) fn encode_function_call(
    signature: &str,
    encoded_args: Vec<u8>,
) -> Result<Vec<u8>, TradeError> {
    let selector = function_selector(signature)?;
    let mut call_data = Vec::with_capacity(4 + encoded_args.len());
    call_data.extend_from_slice(&selector);
    call_data.extend(encoded_args);
    Ok(call_data)
}

pub(crate) fn function_selector(signature: &str) -> Result<[u8; 4], TradeError> {
    let normalized = signature.trim();
    if !normalized.contains('(') {
        return Err(TradeError::internal(format!(
            "Invalid function signature: {}",
            signature
        )));
    }
    let mut hasher = Keccak256::new();
    hasher.update(normalized.as_bytes());
    let hash = hasher.finalize();
    Ok([hash[0], hash[1], hash[2], hash[3]])
}
