use alloy_primitives::{Address, Bytes};
use alloy_sol_types::SolValue;
use num_bigint::BigUint;
use num_traits::Zero;

use crate::config::TradeConfig;
use crate::models::trade::{SubmissionArgs, TradeDescriptor};

use super::calldata::{encode_function_call, TRADE_FACTORY_EXECUTE_SIGNATURE};
use super::wire::biguint_to_u256_checked;
use super::TradeError;

pub const TRADE_FACTORY_UNSET: &str = "Trade factory must be set.";

/// Final assembly point before a trade crosses into the trade factory.
#[derive(Debug, Clone, Copy)]
pub struct TradeRequestBuilder {
    executor: Address,
}

impl TradeRequestBuilder {
    pub fn new(executor: Address) -> Self {
        Self { executor }
    }

    /// Refuses to produce a builder when no trade factory is configured, so no payload is ever
    /// built for a holder that cannot execute it.
    pub fn from_config(config: &TradeConfig) -> Result<Self, TradeError> {
        config
            .trade_factory
            .map(Self::new)
            .ok_or_else(|| TradeError::unconfigured(TRADE_FACTORY_UNSET))
    }

    pub fn executor(&self) -> Address {
        self.executor
    }

    /// Pairs the trade descriptor with the swapper and its data, in the order
    /// `execute(descriptor, swapper, data)` takes them.
    #[allow(clippy::too_many_arguments)]
    pub fn build(
        &self,
        holder: Address,
        input_asset: Address,
        output_asset: Address,
        amount_in: BigUint,
        min_amount_out: BigUint,
        swapper: Address,
        data: Bytes,
    ) -> Result<SubmissionArgs, TradeError> {
        ensure_positive_amount(&amount_in)?;
        biguint_to_u256_checked(&amount_in, "amountIn")?;
        biguint_to_u256_checked(&min_amount_out, "minAmountOut")?;

        Ok(SubmissionArgs {
            executor: self.executor,
            descriptor: TradeDescriptor::new(
                holder,
                input_asset,
                output_asset,
                amount_in,
                min_amount_out,
            ),
            swapper,
            data,
        })
    }
}

pub fn ensure_positive_amount(amount_in: &BigUint) -> Result<(), TradeError> {
    if amount_in.is_zero() {
        return Err(TradeError::invalid_amount("amountIn must be > 0"));
    }
    Ok(())
}

/// ABI-encodes `execute((holder,tokenIn,tokenOut,amountIn,minAmountOut),swapper,data)`.
pub fn encode_execute_calldata(args: &SubmissionArgs) -> Result<Bytes, TradeError> {
    let descriptor = &args.descriptor;
    let details = (
        descriptor.holder(),
        descriptor.input_asset(),
        descriptor.output_asset(),
        biguint_to_u256_checked(descriptor.amount_in(), "amountIn")?,
        biguint_to_u256_checked(descriptor.min_amount_out(), "minAmountOut")?,
    );
    let calldata_args = (details, args.swapper, args.data.clone()).abi_encode_params();
    encode_function_call(TRADE_FACTORY_EXECUTE_SIGNATURE, calldata_args).map(Bytes::from)
}
