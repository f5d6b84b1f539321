use std::time::Instant;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{info, warn};

use crate::metrics::{emit_request_timeout, emit_trade_completion, TimeoutKind};
use crate::models::messages::{RouteKind, TradeErrorResponse, TradeRequest, TradeResponse};
use crate::models::state::AppState;
use crate::services::encode::{encode_trade, TradeErrorKind};

pub async fn post_trade(
    State(state): State<AppState>,
    Json(request): Json<TradeRequest>,
) -> Response {
    let started_at = Instant::now();
    let request_id = request.request_id.as_deref();
    let route_kind = request.route.kind();

    info!(request_id, route_kind = ?route_kind, "Received trade request");

    let request_timeout = state.request_timeout();
    let computation_future = encode_trade(state.clone(), request.clone());

    let computation = match tokio::time::timeout(request_timeout, computation_future).await {
        Ok(result) => result,
        Err(_) => {
            let timeout_ms = request_timeout.as_millis() as u64;
            warn!(
                scope = "handler_timeout",
                request_id,
                timeout_ms,
                latency_ms = started_at.elapsed().as_millis() as u64,
                "Trade request timed out at request-level guard"
            );
            emit_request_timeout(TimeoutKind::Trade);

            let body = Json(TradeErrorResponse {
                error: format!("Trade request timed out after {}ms", timeout_ms),
                kind: "timeout".to_string(),
                request_id: request.request_id.clone(),
            });
            return (StatusCode::REQUEST_TIMEOUT, body).into_response();
        }
    };

    let latency_ms = started_at.elapsed().as_millis() as u64;
    let route_label = route_label(&route_kind);
    match computation {
        Ok(response) => {
            info!(
                request_id,
                latency_ms,
                steps = response.steps.len(),
                "Trade request completed"
            );
            emit_trade_completion(route_label, "ok");
            Json::<TradeResponse>(response).into_response()
        }
        Err(err) => {
            let status = err.status_code();
            let body = Json(TradeErrorResponse {
                error: err.message().to_string(),
                kind: err.kind().label().to_string(),
                request_id: request.request_id.clone(),
            });
            match err.kind() {
                TradeErrorKind::InvalidRequest
                | TradeErrorKind::InvalidTradeAmount
                | TradeErrorKind::PrecisionLoss => {
                    warn!(
                        request_id,
                        latency_ms,
                        error = err.message(),
                        "Invalid trade request"
                    );
                }
                TradeErrorKind::QuoteUnavailable => {
                    warn!(
                        request_id,
                        latency_ms,
                        error = err.message(),
                        "Trade route unavailable"
                    );
                }
                TradeErrorKind::Unconfigured | TradeErrorKind::Internal => {
                    warn!(
                        request_id,
                        latency_ms,
                        error = err.message(),
                        "Trade failed with internal error"
                    );
                }
            }
            emit_trade_completion(route_label, err.kind().label());
            (status, body).into_response()
        }
    }
}

fn route_label(kind: &RouteKind) -> &'static str {
    match kind {
        RouteKind::Remote => "remote",
        RouteKind::Path => "path",
    }
}
