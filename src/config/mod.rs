mod logging;
mod trade;

pub use logging::init_logging;
pub use trade::TradeConfig;

const DEFAULT_QUOTE_API_URL: &str = "https://fantom.api.0x.org/swap/v1/quote";

pub fn load_config() -> AppConfig {
    dotenv::dotenv().ok();

    let quote_api_url =
        std::env::var("QUOTE_API_URL").unwrap_or_else(|_| DEFAULT_QUOTE_API_URL.to_string());
    let quote_api_key = std::env::var("QUOTE_API_KEY")
        .ok()
        .filter(|key| !key.trim().is_empty());
    let rpc_url = std::env::var("RPC_URL")
        .ok()
        .filter(|url| !url.trim().is_empty());

    let port = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse()
        .expect("Invalid PORT");
    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let _ = host.parse::<std::net::IpAddr>().expect("Invalid HOST");

    let quote_timeout_ms: u64 = std::env::var("QUOTE_TIMEOUT_MS")
        .unwrap_or_else(|_| "5000".to_string())
        .parse()
        .expect("Invalid QUOTE_TIMEOUT_MS");
    let request_timeout_ms: u64 = std::env::var("REQUEST_TIMEOUT_MS")
        .unwrap_or_else(|_| "10000".to_string())
        .parse()
        .expect("Invalid REQUEST_TIMEOUT_MS");

    assert!(quote_timeout_ms > 0, "QUOTE_TIMEOUT_MS must be > 0");
    assert!(request_timeout_ms > 0, "REQUEST_TIMEOUT_MS must be > 0");
    assert!(
        quote_api_url.starts_with("http://") || quote_api_url.starts_with("https://"),
        "QUOTE_API_URL must be an http(s) URL"
    );

    AppConfig {
        host,
        port,
        quote_api: QuoteApiConfig {
            url: quote_api_url,
            api_key: quote_api_key,
        },
        rpc_url,
        trade: TradeConfig::from_env(),
        quote_timeout_ms,
        request_timeout_ms,
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub quote_api: QuoteApiConfig,
    pub rpc_url: Option<String>,
    pub trade: TradeConfig,
    pub quote_timeout_ms: u64,
    pub request_timeout_ms: u64,
}

#[derive(Debug, Clone)]
pub struct QuoteApiConfig {
    pub url: String,
    pub api_key: Option<String>,
}
