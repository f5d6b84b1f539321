use std::str::FromStr;

use alloy_primitives::{Address, Bytes};
use num_bigint::BigUint;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::QuoteApiConfig;
use crate::models::trade::{QuoteMetadata, QuoteResult};
use crate::services::encode::amount::{normalize_amount, DecimalAmount};
use crate::services::encode::TradeError;

const API_KEY_HEADER: &str = "0x-api-key";
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Read-only client for the remote swap-quote service.
///
/// One GET per quote, no retry and no fallback: every failure surfaces as
/// `QuoteUnavailable` and the caller decides whether to try again.
#[derive(Clone)]
pub struct QuoteClient {
    http: Client,
    url: String,
    api_key: Option<String>,
}

impl QuoteClient {
    pub fn new(config: &QuoteApiConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(http: Client, config: &QuoteApiConfig) -> Self {
        Self {
            http,
            url: config.url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn get_quote(
        &self,
        buy_token: &str,
        sell_token: &str,
        sell_amount: &DecimalAmount,
    ) -> Result<QuoteResult, TradeError> {
        let sell_amount = normalize_amount(sell_amount)?;
        debug!(
            buy_token,
            sell_token,
            sell_amount = sell_amount.as_str(),
            "Requesting remote quote"
        );

        let mut request = self.http.get(&self.url).query(&[
            ("buyToken", buy_token),
            ("sellToken", sell_token),
            ("sellAmount", sell_amount.as_str()),
        ]);
        if let Some(api_key) = &self.api_key {
            request = request.header(API_KEY_HEADER, api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|err| TradeError::quote_unavailable(format!("Quote request failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                status = status.as_u16(),
                body = %truncate(&body),
                "Quote service rejected request"
            );
            return Err(TradeError::quote_unavailable(format!(
                "Quote service returned status {}: {}",
                status,
                truncate(&body)
            )));
        }

        let body: Value = response.json().await.map_err(|err| {
            TradeError::quote_unavailable(format!("Quote response decode failed: {err}"))
        })?;

        parse_quote_body(&body)
    }
}

/// Extracts the route bytes and metadata from a quote body.
///
/// `data` must be a hex string. Object-shaped `data` is rejected rather than passed through,
/// since the executor needs raw bytes.
pub(crate) fn parse_quote_body(body: &Value) -> Result<QuoteResult, TradeError> {
    let data = body
        .get("data")
        .ok_or_else(|| TradeError::quote_unavailable("Quote response is missing the data field"))?;
    let hex = data
        .as_str()
        .ok_or_else(|| TradeError::quote_unavailable("Quote response data field is not a string"))?;
    let route = Bytes::from_str(hex.trim()).map_err(|err| {
        TradeError::quote_unavailable(format!("Quote response data is not hex: {err}"))
    })?;

    let metadata = QuoteMetadata {
        to: body.get("to").and_then(address_field),
        allowance_target: body.get("allowanceTarget").and_then(address_field),
        buy_amount: body.get("buyAmount").and_then(amount_field),
        price: body.get("price").and_then(string_or_number),
    };

    Ok(QuoteResult {
        route,
        expected_out: None,
        metadata,
    })
}

fn address_field(value: &Value) -> Option<Address> {
    value
        .as_str()
        .and_then(|raw| Address::from_str(raw.trim()).ok())
}

fn amount_field(value: &Value) -> Option<BigUint> {
    string_or_number(value).and_then(|raw| BigUint::from_str(&raw).ok())
}

fn string_or_number(value: &Value) -> Option<String> {
    if let Some(raw) = value.as_str() {
        Some(raw.to_string())
    } else if value.is_number() {
        Some(value.to_string())
    } else {
        None
    }
}

fn truncate(body: &str) -> String {
    body.chars().take(MAX_ERROR_BODY_CHARS).collect()
}
