use alloy::{
    primitives::{Address, U256},
    providers::{DynProvider, Provider, ProviderBuilder},
    sol,
};
use async_trait::async_trait;
use tracing::debug;

use super::TradeError;

sol! {
    #[sol(rpc)]
    interface IUniswapV2Router02 {
        function getAmountsOut(uint256 amountIn, address[] calldata path)
            external
            view
            returns (uint256[] memory amounts);
    }
}

/// On-chain read used to price a router-path swap before its calldata is built.
///
/// Reads observe whatever block the node serves, so two previews of the same path may
/// legitimately disagree.
#[async_trait]
pub trait RoutePreview: Send + Sync {
    /// Returns `getAmountsOut(amount_in, path)`: one amount per path element, the input first.
    async fn amounts_out(
        &self,
        router: Address,
        amount_in: U256,
        path: &[Address],
    ) -> Result<Vec<U256>, TradeError>;
}

/// [`RoutePreview`] backed by an `eth_call` against a JSON-RPC node.
#[derive(Clone)]
pub struct RpcRoutePreview {
    provider: DynProvider,
}

impl RpcRoutePreview {
    pub async fn connect(rpc_url: &str) -> Result<Self, TradeError> {
        let provider = ProviderBuilder::new()
            .connect(rpc_url)
            .await
            .map_err(|err| {
                TradeError::internal(format!("Failed to connect RPC provider: {err}"))
            })?;
        Ok(Self {
            provider: provider.erased(),
        })
    }
}

#[async_trait]
impl RoutePreview for RpcRoutePreview {
    async fn amounts_out(
        &self,
        router: Address,
        amount_in: U256,
        path: &[Address],
    ) -> Result<Vec<U256>, TradeError> {
        debug!(
            router = %router,
            amount_in = %amount_in,
            hops = path.len().saturating_sub(1),
            "Previewing router path"
        );
        let contract = IUniswapV2Router02::new(router, self.provider.clone());
        contract
            .getAmountsOut(amount_in, path.to_vec())
            .call()
            .await
            .map_err(|err| TradeError::quote_unavailable(format!("Route preview call failed: {err}")))
    }
}
