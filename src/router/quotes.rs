// Quote, token info and receipt types returned by the router
//
// Numan Thabit 2025 Nov

use crate::venues::{RegistryTokenInfo, TokenManagerRef};
use alloy_primitives::{Address, U256};
use serde::Serialize;

/// Dry-run buy estimate. Gross of the router fee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuyQuote {
    pub token: Address,
    pub token_manager: Address,
    pub manager_version: u32,
    /// Currency the token is paired against.
    pub quote: Address,
    pub estimated_amount: U256,
    /// Native currency the manager takes for `estimated_amount`, its fee included.
    pub manager_funds: U256,
    pub manager_cost: U256,
    pub manager_fee: U256,
    /// Native currency to send. For exact-token quotes this covers
    /// `manager_funds` after the router fee.
    pub payment: U256,
    /// Fee the router would charge at the current rate on `payment`.
    pub router_fee: U256,
}

/// Dry-run sell estimate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SellQuote {
    pub token: Address,
    pub token_manager: Address,
    pub manager_version: u32,
    pub token_amount: U256,
    /// Native proceeds from the manager, before the router fee.
    pub funds: U256,
    pub manager_fee: U256,
    pub router_fee: U256,
    pub net_funds: U256,
}

/// Best-effort view of a token and why it can or cannot be traded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenInfo {
    pub token: Address,
    pub registry: Option<RegistryTokenInfo>,
    pub manager: Option<TokenManagerRef>,
    pub native_pair: Option<bool>,
    pub listed: Option<bool>,
    pub version_supported: Option<bool>,
    pub eligible: bool,
    /// Reason strings for every check that failed or could not run.
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuyReceipt {
    pub token: Address,
    pub token_manager: Address,
    pub payment: U256,
    pub fee: U256,
    pub net: U256,
    pub amount_bought: U256,
    pub funds_used: U256,
    pub refund: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SellReceipt {
    pub token: Address,
    pub token_manager: Address,
    pub token_amount: U256,
    pub funds: U256,
    pub fee: U256,
    pub amount_received: U256,
}
