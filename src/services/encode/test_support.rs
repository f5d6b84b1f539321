use std::sync::Mutex;

use alloy_primitives::{Address, U256};
use async_trait::async_trait;

use super::preview::RoutePreview;
use super::TradeError;

pub(crate) fn address(byte: u8) -> Address {
    Address::repeat_byte(byte)
}

/// Route preview that answers every call with the same amounts (or the same failure) and
/// records what it was asked.
pub(crate) struct MockRoutePreview {
    amounts: Result<Vec<U256>, String>,
    calls: Mutex<Vec<(Address, U256, Vec<Address>)>>,
}

impl MockRoutePreview {
    pub(crate) fn fixed(amounts: Vec<U256>) -> Self {
        Self {
            amounts: Ok(amounts),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing(message: &str) -> Self {
        Self {
            amounts: Err(message.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn calls(&self) -> Vec<(Address, U256, Vec<Address>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RoutePreview for MockRoutePreview {
    async fn amounts_out(
        &self,
        router: Address,
        amount_in: U256,
        path: &[Address],
    ) -> Result<Vec<U256>, TradeError> {
        self.calls
            .lock()
            .unwrap()
            .push((router, amount_in, path.to_vec()));
        self.amounts
            .clone()
            .map_err(|message| TradeError::quote_unavailable(format!("Route preview failed: {message}")))
    }
}
