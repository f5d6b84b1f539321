use std::collections::HashSet;

use alloy_primitives::Address;
use num_bigint::BigUint;
use num_traits::Zero;
use tracing::debug;

use crate::config::TradeConfig;
use crate::models::messages::{RouteDraft, RouteKind};
use crate::models::trade::{EncodedStep, QuoteMetadata, QuoteResult};
use crate::services::quotes::QuoteClient;

use super::amount::DecimalAmount;
use super::calldata::{encode_step, erc20_approve_step, swap_exact_tokens_step, SwapExactTokensArgs};
use super::payload::assemble;
use super::preview::RoutePreview;
use super::slippage::{apply_slippage, ensure_slippage_bps};
use super::wire::{biguint_to_u256_checked, format_address, parse_address, u256_to_biguint};
use super::TradeError;

/// Where a trade's executable route comes from. A trade uses exactly one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteSource {
    /// Opaque route bytes from the quoting service, forwarded to the remote-quote swapper.
    Remote,
    /// Locally assembled approve + swap calls against a V2-style router.
    Path(PathRoute),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRoute {
    pub router: Address,
    pub path: Vec<Address>,
    pub slippage_bps: u32,
    pub deadline: u64,
    pub reset_allowance: bool,
}

impl RouteSource {
    /// Resolves a caller draft against configured defaults. Router, slippage and deadline fall
    /// back to the config; the allowance reset is forced for tokens listed in the config.
    pub fn from_draft(
        draft: &RouteDraft,
        config: &TradeConfig,
        now_secs: u64,
    ) -> Result<Self, TradeError> {
        match draft {
            RouteDraft::Remote => Ok(Self::Remote),
            RouteDraft::Path {
                path,
                router,
                slippage_bps,
                deadline,
                reset_allowance,
            } => {
                let path = path
                    .iter()
                    .map(|hop| parse_address(hop))
                    .collect::<Result<Vec<_>, _>>()?;
                let router = match router {
                    Some(router) => parse_address(router)?,
                    None => config
                        .router
                        .ok_or_else(|| TradeError::unconfigured("Router address must be set."))?,
                };
                let slippage_bps = slippage_bps.unwrap_or(config.default_slippage_bps);
                ensure_slippage_bps(slippage_bps)?;
                let deadline = match deadline {
                    Some(deadline) => *deadline,
                    None => now_secs.saturating_add(config.swap_deadline_secs),
                };
                let reset_allowance = *reset_allowance
                    || path
                        .first()
                        .is_some_and(|token| config.reset_allowance_tokens.contains(token));

                Ok(Self::Path(PathRoute {
                    router,
                    path,
                    slippage_bps,
                    deadline,
                    reset_allowance,
                }))
            }
        }
    }

    pub fn kind(&self) -> RouteKind {
        match self {
            Self::Remote => RouteKind::Remote,
            Self::Path(_) => RouteKind::Path,
        }
    }

    /// Swapper contract that consumes this route's data.
    pub fn swapper(&self, config: &TradeConfig) -> Result<Address, TradeError> {
        match self {
            Self::Remote => config
                .zrx_swapper
                .ok_or_else(|| TradeError::unconfigured("Remote-quote swapper must be set.")),
            Self::Path(_) => config
                .multicall_swapper
                .ok_or_else(|| TradeError::unconfigured("Multicall swapper must be set.")),
        }
    }
}

/// The trade a route is being produced for.
#[derive(Debug, Clone, Copy)]
pub struct TradeContext<'a> {
    pub holder: Address,
    pub token_in: Address,
    pub token_out: Address,
    pub amount_in: &'a BigUint,
}

#[derive(Debug, Clone)]
pub struct PreparedRoute {
    pub swapper: Address,
    pub quote: QuoteResult,
    /// Packed records behind `quote.route`; empty for remote routes.
    pub steps: Vec<EncodedStep>,
    /// Output bound derived from the route preview, when one was taken.
    pub min_amount_out: Option<BigUint>,
}

pub async fn prepare_remote_route(
    client: &QuoteClient,
    swapper: Address,
    ctx: TradeContext<'_>,
) -> Result<PreparedRoute, TradeError> {
    let quote = client
        .get_quote(
            &format_address(&ctx.token_out),
            &format_address(&ctx.token_in),
            &DecimalAmount::from(ctx.amount_in.clone()),
        )
        .await?;

    Ok(PreparedRoute {
        swapper,
        quote,
        steps: Vec::new(),
        min_amount_out: None,
    })
}

/// Previews the path, then emits the calls in replay order: optional allowance reset, approve,
/// swap. The swap's output bound depends on the preview, so this stays sequential.
pub async fn prepare_path_route(
    preview: &dyn RoutePreview,
    swapper: Address,
    route: &PathRoute,
    ctx: TradeContext<'_>,
) -> Result<PreparedRoute, TradeError> {
    validate_path(&route.path, ctx.token_in, ctx.token_out)?;

    let amount_in = biguint_to_u256_checked(ctx.amount_in, "amountIn")?;
    let amounts = preview
        .amounts_out(route.router, amount_in, &route.path)
        .await?;
    if amounts.len() != route.path.len() {
        return Err(TradeError::quote_unavailable(format!(
            "Route preview returned {} amounts for a {}-token path",
            amounts.len(),
            route.path.len()
        )));
    }
    let expected_out = amounts
        .last()
        .copied()
        .map(u256_to_biguint)
        .unwrap_or_default();
    if expected_out.is_zero() {
        return Err(TradeError::quote_unavailable(
            "Route preview returned zero output",
        ));
    }
    let min_amount_out = apply_slippage(&expected_out, route.slippage_bps)?;

    debug!(
        router = %route.router,
        hops = route.path.len() - 1,
        expected_out = %expected_out,
        min_amount_out = %min_amount_out,
        slippage_bps = route.slippage_bps,
        "Previewed path route"
    );

    let mut calls = Vec::with_capacity(3);
    if route.reset_allowance {
        calls.push(erc20_approve_step(
            ctx.token_in,
            route.router,
            &BigUint::zero(),
        )?);
    }
    calls.push(erc20_approve_step(
        ctx.token_in,
        route.router,
        ctx.amount_in,
    )?);
    calls.push(swap_exact_tokens_step(&SwapExactTokensArgs {
        router: route.router,
        amount_in: ctx.amount_in,
        min_amount_out: &min_amount_out,
        path: &route.path,
        receiver: ctx.holder,
        deadline: route.deadline,
    })?);

    let steps: Vec<EncodedStep> = calls
        .iter()
        .map(|call| encode_step(call.target, &call.data))
        .collect();
    let payload = assemble(&steps);

    Ok(PreparedRoute {
        swapper,
        quote: QuoteResult {
            route: payload.into_bytes(),
            expected_out: Some(expected_out),
            metadata: QuoteMetadata::default(),
        },
        steps,
        min_amount_out: Some(min_amount_out),
    })
}

fn validate_path(path: &[Address], token_in: Address, token_out: Address) -> Result<(), TradeError> {
    if path.len() < 2 {
        return Err(TradeError::invalid("path must contain at least 2 tokens"));
    }
    if path[0] != token_in {
        return Err(TradeError::invalid("path must start with tokenIn"));
    }
    if path[path.len() - 1] != token_out {
        return Err(TradeError::invalid("path must end with tokenOut"));
    }
    let mut seen = HashSet::with_capacity(path.len());
    if !path.iter().all(|token| seen.insert(*token)) {
        return Err(TradeError::invalid("path must not revisit a token"));
    }
    Ok(())
}
