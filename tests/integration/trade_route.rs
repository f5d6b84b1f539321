use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy_primitives::{hex, Address, U256};
use axum::body::{to_bytes, Body};
use axum::extract::Query;
use axum::http::{Request, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use async_trait::async_trait;
use serde_json::{json, Value};
use tower::ServiceExt;
use trade_payload_server::api::create_router;
use trade_payload_server::config::{QuoteApiConfig, TradeConfig};
use trade_payload_server::models::messages::{
    AmountInput, RouteDraft, RouteKind, TradeErrorResponse, TradeRequest, TradeResponse,
};
use trade_payload_server::models::state::AppState;
use trade_payload_server::services::encode::{split_payload, RoutePreview, TradeError};
use trade_payload_server::services::quotes::QuoteClient;

const TOKEN_IN: &str = "0x0000000000000000000000000000000000000001";
const TOKEN_OUT: &str = "0x0000000000000000000000000000000000000002";
const ROUTER: &str = "0x0000000000000000000000000000000000000004";
const HOLDER: &str = "0x0000000000000000000000000000000000000010";
const TRADE_FACTORY: &str = "0x00000000000000000000000000000000000000fa";
const ZRX_SWAPPER: &str = "0x0000000000000000000000000000000000000021";
const MULTICALL_SWAPPER: &str = "0x0000000000000000000000000000000000000022";

type SeenQueries = Arc<Mutex<Vec<HashMap<String, String>>>>;

struct FixedPreview {
    amounts: Vec<U256>,
}

#[async_trait]
impl RoutePreview for FixedPreview {
    async fn amounts_out(
        &self,
        _router: Address,
        _amount_in: U256,
        _path: &[Address],
    ) -> Result<Vec<U256>, TradeError> {
        Ok(self.amounts.clone())
    }
}

fn addr(value: &str) -> Address {
    value.parse().unwrap()
}

fn hex_to_bytes(value: &str) -> Vec<u8> {
    hex::decode(value).unwrap()
}

async fn spawn_quote_server(status: StatusCode, body: Value) -> (String, SeenQueries) {
    let seen: SeenQueries = Arc::new(Mutex::new(Vec::new()));
    let recorder = Arc::clone(&seen);
    let app = Router::new().route(
        "/swap/v1/quote",
        get(move |Query(query): Query<HashMap<String, String>>| {
            let recorder = Arc::clone(&recorder);
            let body = body.clone();
            async move {
                recorder.lock().unwrap().push(query);
                (status, Json(body))
            }
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/swap/v1/quote"), seen)
}

fn trade_config() -> TradeConfig {
    TradeConfig {
        trade_factory: Some(addr(TRADE_FACTORY)),
        zrx_swapper: Some(addr(ZRX_SWAPPER)),
        multicall_swapper: Some(addr(MULTICALL_SWAPPER)),
        router: Some(addr(ROUTER)),
        swap_deadline_secs: 1_800,
        default_slippage_bps: 50,
        reset_allowance_tokens: [addr(TOKEN_IN)].into_iter().collect(),
    }
}

fn build_app(quote_url: String, trade: TradeConfig, preview: Option<Arc<dyn RoutePreview>>) -> Router {
    let state = AppState {
        trade: Arc::new(trade),
        quote_client: Arc::new(QuoteClient::new(&QuoteApiConfig {
            url: quote_url,
            api_key: None,
        })),
        route_preview: preview,
        quote_timeout: Duration::from_secs(2),
        request_timeout: Duration::from_secs(2),
    };
    create_router(state)
}

fn trade_request(amount_in: &str, route: RouteDraft) -> TradeRequest {
    TradeRequest {
        request_id: Some("req-1".to_string()),
        holder: HOLDER.to_string(),
        token_in: TOKEN_IN.to_string(),
        token_out: TOKEN_OUT.to_string(),
        amount_in: AmountInput::Text(amount_in.to_string()),
        min_amount_out: None,
        route,
    }
}

async fn post_trade(app: Router, request: &TradeRequest) -> (StatusCode, Vec<u8>) {
    post_trade_body(app, serde_json::to_string(request).unwrap()).await
}

async fn post_trade_body(app: Router, body: String) -> (StatusCode, Vec<u8>) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/trade")
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

#[tokio::test]
async fn remote_trade_forwards_quote_route_to_swapper() {
    let (url, seen) = spawn_quote_server(
        StatusCode::OK,
        json!({ "data": "0xdeadbeef", "buyAmount": "42" }),
    )
    .await;
    let app = build_app(url, trade_config(), None);

    let (status, body) = post_trade(app, &trade_request("1e21", RouteDraft::Remote)).await;

    assert_eq!(status, StatusCode::OK);
    let response: TradeResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(response.route_kind, RouteKind::Remote);
    assert_eq!(response.executor, TRADE_FACTORY);
    assert_eq!(response.swapper, ZRX_SWAPPER);
    assert_eq!(response.data, "0xdeadbeef");
    assert!(response.steps.is_empty());
    assert_eq!(response.descriptor.amount_in, format!("1{}", "0".repeat(21)));
    assert_eq!(response.descriptor.min_amount_out, "1");
    assert!(response.expected_amount_out.is_none());

    // execute((address,address,address,uint256,uint256),address,bytes)
    let calldata = hex_to_bytes(&response.calldata);
    assert!(calldata.len() > 4 + 7 * 32);

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].get("buyToken").map(String::as_str), Some(TOKEN_OUT));
    assert_eq!(seen[0].get("sellToken").map(String::as_str), Some(TOKEN_IN));
    assert_eq!(
        seen[0].get("sellAmount").cloned(),
        Some(format!("1{}", "0".repeat(21)))
    );
}

#[tokio::test]
async fn numeric_amount_above_float_precision_is_kept_exact() {
    let (url, seen) = spawn_quote_server(StatusCode::OK, json!({ "data": "0xdeadbeef" })).await;
    let app = build_app(url, trade_config(), None);
    let body = format!(
        r#"{{"holder":"{HOLDER}","token_in":"{TOKEN_IN}","token_out":"{TOKEN_OUT}","amount_in":12345678901234567891,"route":{{"kind":"remote"}}}}"#
    );

    let (status, body) = post_trade_body(app, body).await;

    assert_eq!(status, StatusCode::OK);
    let response: TradeResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(response.descriptor.amount_in, "12345678901234567891");
    let seen = seen.lock().unwrap();
    assert_eq!(
        seen[0].get("sellAmount").map(String::as_str),
        Some("12345678901234567891")
    );
}

#[tokio::test]
async fn numeric_amount_past_u64_is_rejected_as_precision_loss() {
    let (url, seen) = spawn_quote_server(StatusCode::OK, json!({ "data": "0x00" })).await;
    let app = build_app(url, trade_config(), None);
    let body = format!(
        r#"{{"holder":"{HOLDER}","token_in":"{TOKEN_IN}","token_out":"{TOKEN_OUT}","amount_in":123456789012345678901234,"route":{{"kind":"remote"}}}}"#
    );

    let (status, body) = post_trade_body(app, body).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let response: TradeErrorResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(response.kind, "precision_loss");
    assert!(seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn zero_amount_is_rejected_before_quoting() {
    let (url, seen) = spawn_quote_server(StatusCode::OK, json!({ "data": "0x00" })).await;
    let app = build_app(url, trade_config(), None);

    let (status, body) = post_trade(app, &trade_request("0", RouteDraft::Remote)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let response: TradeErrorResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(response.kind, "invalid_trade_amount");
    assert_eq!(response.request_id.as_deref(), Some("req-1"));
    assert!(seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn missing_trade_factory_refuses_to_build() {
    let (url, seen) = spawn_quote_server(StatusCode::OK, json!({ "data": "0x00" })).await;
    let trade = TradeConfig {
        trade_factory: None,
        ..trade_config()
    };
    let app = build_app(url, trade, None);

    let (status, body) = post_trade(app, &trade_request("1000", RouteDraft::Remote)).await;

    assert_eq!(status, StatusCode::PRECONDITION_FAILED);
    let response: TradeErrorResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(response.error, "Trade factory must be set.");
    assert_eq!(response.kind, "unconfigured");
    assert!(seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn quote_service_failure_surfaces_verbatim() {
    let (url, _) = spawn_quote_server(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "reason": "upstream exploded" }),
    )
    .await;
    let app = build_app(url, trade_config(), None);

    let (status, body) = post_trade(app, &trade_request("1000", RouteDraft::Remote)).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    let response: TradeErrorResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(response.kind, "quote_unavailable");
    assert!(
        response.error.contains("upstream exploded"),
        "unexpected error: {}",
        response.error
    );
}

#[tokio::test]
async fn path_trade_packs_reset_approve_and_swap() {
    let (url, seen) = spawn_quote_server(StatusCode::OK, json!({ "data": "0x00" })).await;
    let preview: Arc<dyn RoutePreview> = Arc::new(FixedPreview {
        amounts: vec![U256::from(10u8), U256::from(20_000u32)],
    });
    let app = build_app(url, trade_config(), Some(preview));
    let route = RouteDraft::Path {
        path: vec![TOKEN_IN.to_string(), TOKEN_OUT.to_string()],
        router: None,
        slippage_bps: None,
        deadline: Some(1_700_000_000),
        reset_allowance: false,
    };

    let (status, body) = post_trade(app, &trade_request("10", route)).await;

    assert_eq!(status, StatusCode::OK);
    let response: TradeResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(response.route_kind, RouteKind::Path);
    assert_eq!(response.swapper, MULTICALL_SWAPPER);
    assert_eq!(response.expected_amount_out.as_deref(), Some("20000"));
    // 20000 * 9950 / 10000
    assert_eq!(response.descriptor.min_amount_out, "19900");
    assert_eq!(response.steps.len(), 3, "reset-then-approve path");

    // ERC20 approve selector for `approve(address,uint256)`.
    let approve_prefix = "0x095ea7b3";
    assert_eq!(response.steps[0].target, TOKEN_IN);
    assert_eq!(response.steps[1].target, TOKEN_IN);
    assert_eq!(response.steps[2].target, ROUTER);
    assert!(response.steps[0].calldata.starts_with(approve_prefix));
    assert!(response.steps[1].calldata.starts_with(approve_prefix));
    // swapExactTokensForTokens(uint256,uint256,address[],address,uint256)
    assert!(response.steps[2].calldata.starts_with("0x38ed1739"));

    let reset_calldata = hex_to_bytes(&response.steps[0].calldata);
    let approve_calldata = hex_to_bytes(&response.steps[1].calldata);
    assert_eq!(reset_calldata.len(), 4 + 32 + 32);
    assert!(reset_calldata[4 + 32..].iter().all(|byte| *byte == 0));
    assert_eq!(approve_calldata[4 + 32 + 31], 10);
    assert_eq!(&approve_calldata[4 + 12..4 + 32], addr(ROUTER).as_slice());

    let payload = hex_to_bytes(&response.data);
    let decoded = split_payload(&payload).unwrap();
    assert_eq!(decoded.len(), 3);
    for (record, view) in decoded.iter().zip(&response.steps) {
        assert_eq!(record.length(), view.length);
        assert_eq!(hex::encode_prefixed(record.data()), view.calldata);
    }
    let expected_len: usize = response.steps.iter().map(|step| 20 + 32 + step.length).sum();
    assert_eq!(payload.len(), expected_len);

    assert!(seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn status_reports_missing_trade_factory() {
    let (url, _) = spawn_quote_server(StatusCode::OK, json!({ "data": "0x00" })).await;
    let trade = TradeConfig {
        trade_factory: None,
        ..trade_config()
    };
    let app = build_app(url, trade, None);

    let response = app
        .oneshot(Request::builder().uri("/status").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let payload: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(payload["status"], "unconfigured");
    assert_eq!(payload["trade_factory"], false);
    assert_eq!(payload["remote_route"], true);
    assert_eq!(payload["path_route"], false);
}
