use std::time::{SystemTime, UNIX_EPOCH};

use num_bigint::BigUint;
use tracing::info;

use crate::models::messages::{QuoteRequest, QuoteResponse, TradeRequest, TradeResponse};
use crate::models::state::AppState;

pub mod amount;
mod calldata;
mod error;
mod payload;
mod preview;
mod request;
mod response;
mod route;
mod slippage;
#[cfg(test)]
mod test_support;
mod wire;

pub use calldata::encode_step;
pub use error::{TradeError, TradeErrorKind};
pub use payload::{assemble, pack_step, split_payload};
pub use preview::{RoutePreview, RpcRoutePreview};
pub use request::{
    encode_execute_calldata, ensure_positive_amount, TradeRequestBuilder, TRADE_FACTORY_UNSET,
};
pub use route::{
    prepare_path_route, prepare_remote_route, PathRoute, PreparedRoute, RouteSource, TradeContext,
};

use amount::DecimalAmount;
use response::{build_quote_response, build_trade_response, log_prepared_steps};
use wire::{format_address, integer_from_input, parse_address, parse_amount};

/// Output bound used when neither the caller nor a route preview supplies one.
const DEFAULT_MIN_AMOUNT_OUT: u32 = 1;

/// Runs one trade end to end: validate, produce the route, build the executor submission.
///
/// Checks that need no network run first, so a misconfigured executor or a zero amount never
/// costs a quote request.
pub async fn encode_trade(
    state: AppState,
    request: TradeRequest,
) -> Result<TradeResponse, TradeError> {
    let builder = TradeRequestBuilder::from_config(state.trade())?;

    let amount_in = integer_from_input(&request.amount_in)?;
    ensure_positive_amount(&amount_in)?;

    let holder = parse_address(&request.holder)?;
    let token_in = parse_address(&request.token_in)?;
    let token_out = parse_address(&request.token_out)?;
    if token_in == token_out {
        return Err(TradeError::invalid("tokenIn and tokenOut must differ"));
    }
    let explicit_min_out = request
        .min_amount_out
        .as_deref()
        .map(parse_amount)
        .transpose()?;

    let source = RouteSource::from_draft(&request.route, state.trade(), unix_now_secs())?;
    let swapper = source.swapper(state.trade())?;
    let ctx = TradeContext {
        holder,
        token_in,
        token_out,
        amount_in: &amount_in,
    };

    let prepared = match &source {
        RouteSource::Remote => prepare_remote_route(state.quote_client(), swapper, ctx).await?,
        RouteSource::Path(route) => {
            let preview = state.route_preview().ok_or_else(|| {
                TradeError::unconfigured("Route preview requires RPC_URL to be set.")
            })?;
            prepare_path_route(preview, swapper, route, ctx).await?
        }
    };

    let min_amount_out = explicit_min_out
        .or_else(|| prepared.min_amount_out.clone())
        .unwrap_or_else(|| BigUint::from(DEFAULT_MIN_AMOUNT_OUT));

    let args = builder.build(
        holder,
        token_in,
        token_out,
        amount_in,
        min_amount_out,
        prepared.swapper,
        prepared.quote.route.clone(),
    )?;
    let calldata = encode_execute_calldata(&args)?;

    let request_id = request.request_id.as_deref();
    log_prepared_steps(request_id, &prepared.steps);
    info!(
        request_id,
        route_kind = ?source.kind(),
        swapper = %format_address(&args.swapper),
        data_len = args.data.len(),
        min_amount_out = %args.descriptor.min_amount_out(),
        "Trade payload built"
    );

    Ok(build_trade_response(
        request.request_id.clone(),
        source.kind(),
        &args,
        &prepared,
        &calldata,
    ))
}

/// Proxies one quote: validates the tokens, normalizes the amount and forwards to the quoting
/// service.
pub async fn quote_route(
    state: AppState,
    request: QuoteRequest,
) -> Result<QuoteResponse, TradeError> {
    let buy_token = format_address(&parse_address(&request.buy_token)?);
    let sell_token = format_address(&parse_address(&request.sell_token)?);
    let sell_amount = integer_from_input(&request.sell_amount)?;
    let normalized = sell_amount.to_str_radix(10);

    let quote = state
        .quote_client()
        .get_quote(&buy_token, &sell_token, &DecimalAmount::from(sell_amount))
        .await?;

    Ok(build_quote_response(
        request.request_id.clone(),
        buy_token,
        sell_token,
        normalized,
        &quote,
    ))
}

fn unix_now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
}
