use std::collections::HashSet;
use std::env;
use std::str::FromStr;

use alloy_primitives::Address;

const DEFAULT_SWAP_DEADLINE_SECS: u64 = 1_800;
const MAX_SLIPPAGE_BPS: u32 = 10_000;

/// Addresses and knobs for the executor side of a trade.
///
/// Every address is optional so the service can boot with only the quote proxy enabled; the
/// trade pipeline refuses to build a payload for a route whose executor pieces are missing.
#[derive(Debug, Clone, Default)]
pub struct TradeConfig {
    /// Access-controlled trade factory that replays the payload.
    pub trade_factory: Option<Address>,
    /// Swapper that forwards an opaque remote-quote route.
    pub zrx_swapper: Option<Address>,
    /// Swapper that replays a packed multi-call payload.
    pub multicall_swapper: Option<Address>,
    /// Default Uniswap-V2-style router for path routes.
    pub router: Option<Address>,
    pub swap_deadline_secs: u64,
    pub default_slippage_bps: u32,
    /// Tokens that revert on a non-zero to non-zero allowance change (USDT-style).
    pub reset_allowance_tokens: HashSet<Address>,
}

impl TradeConfig {
    pub fn from_env() -> Self {
        let swap_deadline_secs = parse_env_u64("SWAP_DEADLINE_SECS", DEFAULT_SWAP_DEADLINE_SECS);
        assert!(swap_deadline_secs > 0, "SWAP_DEADLINE_SECS must be > 0");

        let default_slippage_bps = parse_env_u32("DEFAULT_SLIPPAGE_BPS", 50);
        assert!(
            default_slippage_bps <= MAX_SLIPPAGE_BPS,
            "DEFAULT_SLIPPAGE_BPS must be <= 10000"
        );

        Self {
            trade_factory: parse_env_address("TRADE_FACTORY_ADDRESS"),
            zrx_swapper: parse_env_address("ZRX_SWAPPER_ADDRESS"),
            multicall_swapper: parse_env_address("MULTICALL_SWAPPER_ADDRESS"),
            router: parse_env_address("ROUTER_ADDRESS"),
            swap_deadline_secs,
            default_slippage_bps,
            reset_allowance_tokens: parse_env_address_set("RESET_ALLOWANCE_TOKENS"),
        }
    }
}

fn parse_env_u64(key: &str, default: u64) -> u64 {
    match env::var(key) {
        Ok(value) => value.parse().unwrap_or_else(|_| panic!("Invalid {key}")),
        Err(env::VarError::NotPresent) => default,
        Err(err) => panic!("Failed reading {key}: {err}"),
    }
}

fn parse_env_u32(key: &str, default: u32) -> u32 {
    match env::var(key) {
        Ok(value) => value.parse().unwrap_or_else(|_| panic!("Invalid {key}")),
        Err(env::VarError::NotPresent) => default,
        Err(err) => panic!("Failed reading {key}: {err}"),
    }
}

fn parse_env_address(key: &str) -> Option<Address> {
    match env::var(key) {
        Ok(value) if value.trim().is_empty() => None,
        Ok(value) => Some(parse_address_strict(key, &value)),
        Err(env::VarError::NotPresent) => None,
        Err(err) => panic!("Failed reading {key}: {err}"),
    }
}

fn parse_env_address_set(key: &str) -> HashSet<Address> {
    match env::var(key) {
        Ok(value) => parse_address_list(key, &value),
        Err(env::VarError::NotPresent) => HashSet::new(),
        Err(err) => panic!("Failed reading {key}: {err}"),
    }
}

fn parse_address_list(key: &str, value: &str) -> HashSet<Address> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| parse_address_strict(key, entry))
        .collect()
}

fn parse_address_strict(key: &str, value: &str) -> Address {
    Address::from_str(value.trim()).unwrap_or_else(|err| panic!("Invalid {key}: {err}"))
}
