use std::time::Instant;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, info, warn};

use crate::{
    metrics::{emit_quote_completion, emit_request_timeout, TimeoutKind},
    models::{
        messages::{QuoteRequest, QuoteResponse, TradeErrorResponse},
        state::AppState,
    },
    services::encode::quote_route,
};

pub async fn post_quote(
    State(state): State<AppState>,
    Json(request): Json<QuoteRequest>,
) -> Response {
    let started_at = Instant::now();
    let request_id = request.request_id.as_deref();

    debug!(
        request_id,
        buy_token = request.buy_token.as_str(),
        sell_token = request.sell_token.as_str(),
        "Received quote request"
    );

    let quote_timeout = state.quote_timeout();
    let computation_future = quote_route(state.clone(), request.clone());

    let computation = match tokio::time::timeout(quote_timeout, computation_future).await {
        Ok(result) => result,
        Err(_) => {
            let timeout_ms = quote_timeout.as_millis() as u64;
            warn!(
                scope = "handler_timeout",
                request_id,
                latency_ms = started_at.elapsed().as_millis() as u64,
                timeout_ms,
                "Quote request timed out at request-level guard"
            );
            emit_request_timeout(TimeoutKind::Quote);

            let body = Json(TradeErrorResponse {
                error: format!("Quote request timed out after {}ms", timeout_ms),
                kind: "timeout".to_string(),
                request_id: request.request_id.clone(),
            });
            return (StatusCode::GATEWAY_TIMEOUT, body).into_response();
        }
    };

    let latency_ms = started_at.elapsed().as_millis() as u64;
    match computation {
        Ok(response) => {
            info!(
                request_id,
                latency_ms,
                sell_amount = response.sell_amount.as_str(),
                route_bytes = (response.data.len().saturating_sub(2)) / 2,
                "Quote request completed"
            );
            emit_quote_completion("ok");
            Json::<QuoteResponse>(response).into_response()
        }
        Err(err) => {
            warn!(
                request_id,
                latency_ms,
                kind = err.kind().label(),
                error = err.message(),
                "Quote request failed"
            );
            emit_quote_completion(err.kind().label());
            let body = Json(TradeErrorResponse {
                error: err.message().to_string(),
                kind: err.kind().label().to_string(),
                request_id: request.request_id.clone(),
            });
            (err.status_code(), body).into_response()
        }
    }
}
