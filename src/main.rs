use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use trade_payload_server::api::create_router;
use trade_payload_server::config::{init_logging, load_config};
use trade_payload_server::models::state::AppState;
use trade_payload_server::services::encode::{RoutePreview, RpcRoutePreview};
use trade_payload_server::services::quotes::QuoteClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    init_logging();

    // Load configuration
    let config = load_config();
    info!("Initializing trade payload service...");

    info!(
        event = "trade_config",
        trade_factory = ?config.trade.trade_factory,
        zrx_swapper = ?config.trade.zrx_swapper,
        multicall_swapper = ?config.trade.multicall_swapper,
        router = ?config.trade.router,
        default_slippage_bps = config.trade.default_slippage_bps,
        swap_deadline_secs = config.trade.swap_deadline_secs,
        reset_allowance_tokens = config.trade.reset_allowance_tokens.len(),
        "Trade config loaded"
    );
    if config.trade.trade_factory.is_none() {
        warn!("TRADE_FACTORY_ADDRESS is not set; /trade will refuse every request");
    }

    let quote_client = Arc::new(QuoteClient::new(&config.quote_api));
    debug!(url = quote_client.url(), "Created quote client");

    let route_preview: Option<Arc<dyn RoutePreview>> = match config.rpc_url.as_deref() {
        Some(rpc_url) => {
            let preview = RpcRoutePreview::connect(rpc_url)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to connect route preview: {}", e))?;
            info!("Route preview provider connected");
            Some(Arc::new(preview))
        }
        None => {
            info!("RPC_URL not set; path routes disabled");
            None
        }
    };

    // Create app state
    let app_state = AppState {
        trade: Arc::new(config.trade.clone()),
        quote_client,
        route_preview,
        quote_timeout: Duration::from_millis(config.quote_timeout_ms),
        request_timeout: Duration::from_millis(config.request_timeout_ms),
    };

    // Create router and start server
    let app = create_router(app_state);

    let ip_addr: IpAddr = config
        .host
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid host address {}: {}", config.host, e))?;
    let addr = SocketAddr::from((ip_addr, config.port));

    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
        error!("Failed to bind to address: {}", e);
        e
    })?;

    info!("Server listening on {}", addr);

    axum::serve(listener, app.into_make_service())
        .await
        .map_err(|e| {
            error!("Server error: {}", e);
            anyhow::anyhow!("Failed to start server: {}", e)
        })?;

    Ok(())
}
