use alloy_primitives::Bytes;
use tracing::info;

use crate::models::messages::{
    EncodedStepView, QuoteResponse, RouteKind, TradeDescriptorView, TradeResponse,
};
use crate::models::trade::{EncodedStep, QuoteResult, SubmissionArgs};

use super::route::PreparedRoute;
use super::wire::{format_address, format_calldata};

pub(super) const SCHEMA_VERSION: &str = "2026-10-01";

pub(super) fn log_prepared_steps(request_id: Option<&str>, steps: &[EncodedStep]) {
    for (step_index, step) in steps.iter().enumerate() {
        info!(
            request_id,
            step_index,
            target = %format_address(&step.target()),
            length = step.length(),
            "Encoded payload step"
        );
    }
}

pub(super) fn build_trade_response(
    request_id: Option<String>,
    route_kind: RouteKind,
    args: &SubmissionArgs,
    prepared: &PreparedRoute,
    calldata: &Bytes,
) -> TradeResponse {
    let descriptor = &args.descriptor;
    TradeResponse {
        schema_version: SCHEMA_VERSION.to_string(),
        request_id,
        route_kind,
        executor: format_address(&args.executor),
        descriptor: TradeDescriptorView {
            holder: format_address(&descriptor.holder()),
            input_asset: format_address(&descriptor.input_asset()),
            output_asset: format_address(&descriptor.output_asset()),
            amount_in: descriptor.amount_in().to_string(),
            min_amount_out: descriptor.min_amount_out().to_string(),
        },
        swapper: format_address(&args.swapper),
        data: format_calldata(&args.data),
        steps: prepared.steps.iter().map(step_view).collect(),
        expected_amount_out: prepared
            .quote
            .expected_out
            .as_ref()
            .map(ToString::to_string),
        calldata: format_calldata(calldata),
    }
}

pub(crate) fn build_quote_response(
    request_id: Option<String>,
    buy_token: String,
    sell_token: String,
    sell_amount: String,
    quote: &QuoteResult,
) -> QuoteResponse {
    let metadata = &quote.metadata;
    QuoteResponse {
        request_id,
        buy_token,
        sell_token,
        sell_amount,
        data: format_calldata(&quote.route),
        to: metadata.to.as_ref().map(format_address),
        allowance_target: metadata.allowance_target.as_ref().map(format_address),
        buy_amount: metadata.buy_amount.as_ref().map(ToString::to_string),
        price: metadata.price.clone(),
    }
}

fn step_view(step: &EncodedStep) -> EncodedStepView {
    EncodedStepView {
        target: format_address(&step.target()),
        length: step.length(),
        calldata: format_calldata(step.data()),
    }
}
