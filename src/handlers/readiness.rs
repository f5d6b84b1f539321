use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::models::state::AppState;
use crate::services::encode::TRADE_FACTORY_UNSET;

#[derive(Debug, Serialize)]
pub struct StatusPayload {
    status: &'static str,
    trade_factory: bool,
    remote_route: bool,
    path_route: bool,
    quote_api: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'static str>,
}

/// Liveness plus which executor pieces are configured. Without a trade factory no trade can be
/// built, so the service reports itself unavailable.
pub async fn status(State(state): State<AppState>) -> (StatusCode, Json<StatusPayload>) {
    let trade = state.trade();
    let trade_factory = trade.trade_factory.is_some();
    let remote_route = trade.zrx_swapper.is_some();
    let path_route = trade.multicall_swapper.is_some() && state.route_preview().is_some();

    let (status, status_code, reason) = if trade_factory {
        ("ready", StatusCode::OK, None)
    } else {
        (
            "unconfigured",
            StatusCode::SERVICE_UNAVAILABLE,
            Some(TRADE_FACTORY_UNSET),
        )
    };

    (
        status_code,
        Json(StatusPayload {
            status,
            trade_factory,
            remote_route,
            path_route,
            quote_api: state.quote_client().url().to_string(),
            reason,
        }),
    )
}
