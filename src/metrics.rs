use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::{json, Map, Value};
use tracing::warn;

const METRIC_NAMESPACE: &str = "TradePayload/Encoder";
const METRIC_TRADE_COMPLETION: &str = "TradeCompletion";
const METRIC_QUOTE_COMPLETION: &str = "QuoteCompletion";
const METRIC_REQUEST_TIMEOUT: &str = "RequestTimeout";
const DIM_ROUTE: &str = "Route";
const DIM_OUTCOME: &str = "Outcome";
const DIM_TIMEOUT_KIND: &str = "TimeoutKind";

#[derive(Debug, Clone, Copy)]
pub enum TimeoutKind {
    Quote,
    Trade,
}

impl TimeoutKind {
    fn as_str(self) -> &'static str {
        match self {
            Self::Quote => "quote",
            Self::Trade => "trade",
        }
    }
}

pub fn emit_trade_completion(route: &str, outcome: &str) {
    emit_count_metric(
        METRIC_TRADE_COMPLETION,
        &[(DIM_ROUTE, json!(route)), (DIM_OUTCOME, json!(outcome))],
    );
}

pub fn emit_quote_completion(outcome: &str) {
    emit_count_metric(METRIC_QUOTE_COMPLETION, &[(DIM_OUTCOME, json!(outcome))]);
}

pub fn emit_request_timeout(kind: TimeoutKind) {
    emit_count_metric(
        METRIC_REQUEST_TIMEOUT,
        &[(DIM_TIMEOUT_KIND, json!(kind.as_str()))],
    );
}

fn emit_count_metric(metric_name: &str, dimensions: &[(&str, Value)]) {
    // CloudWatch Embedded Metric Format goes straight to stdout; a tracing JSON wrapper would
    // hide it from EMF extraction.
    let event = count_metric_event(metric_name, dimensions, unix_millis());
    match serde_json::to_string(&event) {
        Ok(line) => println!("{line}"),
        Err(err) => warn!(error = %err, metric = metric_name, "Failed to serialize EMF metric"),
    }
}

fn count_metric_event(metric_name: &str, dimensions: &[(&str, Value)], timestamp_ms: i64) -> Value {
    let dimension_names: Vec<&str> = dimensions.iter().map(|(name, _)| *name).collect();
    let aws = json!({
        "Timestamp": timestamp_ms,
        "CloudWatchMetrics": [{
            "Namespace": METRIC_NAMESPACE,
            "Dimensions": [dimension_names],
            "Metrics": [{
                "Name": metric_name,
                "Unit": "Count",
            }],
        }],
    });

    let mut event = Map::new();
    event.insert("_aws".to_string(), aws);
    event.insert(metric_name.to_string(), json!(1));
    for (name, value) in dimensions {
        event.insert((*name).to_string(), value.clone());
    }
    Value::Object(event)
}

fn unix_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_millis() as i64)
        .unwrap_or(0)
}
