use serde::{Deserialize, Serialize};

/// Amount literal as it arrives over HTTP: a decimal/scientific string (`"1e22"`) or a JSON
/// number. Both are already denominated in the asset's smallest unit.
///
/// Integer literals up to `u64::MAX` keep every digit. Anything else JSON hands over as a
/// float, which is only trusted up to 2^53; larger amounts must be sent as strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum AmountInput {
    Text(String),
    Integer(u64),
    Number(f64),
}

/// `buy_token` and `sell_token` are 20-byte hex addresses; symbols such as `"WFTM"` are
/// rejected as invalid requests before the quoting service is called.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub buy_token: String,
    pub sell_token: String,
    pub sell_amount: AmountInput,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub buy_token: String,
    pub sell_token: String,
    /// Sell amount exactly as it was sent to the quoting service.
    pub sell_amount: String,
    /// Opaque route bytes, 0x-prefixed hex.
    pub data: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowance_target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buy_amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RouteKind {
    Remote,
    Path,
}

/// Caller's description of where the route comes from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RouteDraft {
    /// Ask the quoting service for an opaque route.
    Remote,
    /// Build approve + `swapExactTokensForTokens` against a V2-style router.
    Path {
        path: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        router: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        slippage_bps: Option<u32>,
        /// Absolute unix timestamp; defaults to now + the configured deadline window.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        deadline: Option<u64>,
        #[serde(default)]
        reset_allowance: bool,
    },
}

impl RouteDraft {
    pub fn kind(&self) -> RouteKind {
        match self {
            Self::Remote => RouteKind::Remote,
            Self::Path { .. } => RouteKind::Path,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub holder: String,
    pub token_in: String,
    pub token_out: String,
    pub amount_in: AmountInput,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_amount_out: Option<String>,
    pub route: RouteDraft,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TradeDescriptorView {
    pub holder: String,
    pub input_asset: String,
    pub output_asset: String,
    pub amount_in: String,
    pub min_amount_out: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EncodedStepView {
    pub target: String,
    pub length: usize,
    pub calldata: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeResponse {
    pub schema_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub route_kind: RouteKind,
    pub executor: String,
    pub descriptor: TradeDescriptorView,
    pub swapper: String,
    /// Bytes handed to the swapper: the remote route, or the packed step payload.
    pub data: String,
    /// Decoded records of a packed payload; empty for remote routes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<EncodedStepView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_amount_out: Option<String>,
    /// ABI-encoded `execute(...)` call for the trade factory.
    pub calldata: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeErrorResponse {
    pub error: String,
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}
