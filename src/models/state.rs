use std::sync::Arc;
use std::time::Duration;

use crate::config::TradeConfig;
use crate::services::encode::RoutePreview;
use crate::services::quotes::QuoteClient;

/// Shared, read-only handles for request handlers. Nothing here is mutated after startup, so
/// concurrent trades never contend on it.
#[derive(Clone)]
pub struct AppState {
    pub trade: Arc<TradeConfig>,
    pub quote_client: Arc<QuoteClient>,
    pub route_preview: Option<Arc<dyn RoutePreview>>,
    pub quote_timeout: Duration,
    pub request_timeout: Duration,
}

impl AppState {
    pub fn trade(&self) -> &TradeConfig {
        &self.trade
    }

    pub fn quote_client(&self) -> &QuoteClient {
        &self.quote_client
    }

    pub fn route_preview(&self) -> Option<&dyn RoutePreview> {
        self.route_preview.as_deref()
    }

    pub fn quote_timeout(&self) -> Duration {
        self.quote_timeout
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}
