// Venue adapter module
// Interfaces for the external collaborators the router trades through: the
// token manager that prices and fills trades, the registry that maps a token
// to its manager, and the listing oracle.
//
// Numan Thabit 2025 Nov

use crate::errors::VenueError;
use crate::ledger::Ledger;
use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Manager address and interface version, as reported by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenManagerRef {
    pub address: Address,
    pub version: u32,
}

/// Registry record for a launched token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryTokenInfo {
    pub manager: TokenManagerRef,
    /// Currency the token is paired against; the zero address is native.
    pub quote: Address,
    pub last_price: U256,
    pub trading_fee_bps: u32,
    pub launch_time: u64,
    pub offers: U256,
    pub max_offers: U256,
    pub funds: U256,
    pub max_funds: U256,
    pub liquidity_added: bool,
}

/// How a buy quote is sized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuyAmount {
    /// Quote the funds needed for exactly this many tokens.
    ExactTokens(U256),
    /// Quote the tokens this much native currency buys.
    Funds(U256),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ManagerBuyQuote {
    pub token_amount: U256,
    /// Total native currency the manager takes, fee included.
    pub funds: U256,
    /// Portion of `funds` that pays for tokens.
    pub cost: U256,
    pub manager_fee: U256,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ManagerSellQuote {
    pub token_amount: U256,
    /// Native currency paid out, manager fee already deducted.
    pub funds: U256,
    pub manager_fee: U256,
}

/// Outcome of a manager buy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fill {
    pub amount: U256,
    pub funds_used: U256,
}

/// Token manager interface. Mutating calls settle through the ledger they
/// are handed and must leave it untouched when they fail.
pub trait TokenManager: fmt::Debug + Send + Sync {
    fn address(&self) -> Address;

    fn version(&self) -> u32;

    fn quote_buy(
        &self,
        ledger: &dyn Ledger,
        token: Address,
        amount: BuyAmount,
    ) -> Result<ManagerBuyQuote, VenueError>;

    fn quote_sell(
        &self,
        ledger: &dyn Ledger,
        token: Address,
        token_amount: U256,
    ) -> Result<ManagerSellQuote, VenueError>;

    /// Spend up to `funds` of `payer`'s native currency and deliver the
    /// tokens to `recipient`.
    fn buy(
        &self,
        ledger: &mut dyn Ledger,
        payer: Address,
        recipient: Address,
        token: Address,
        funds: U256,
    ) -> Result<Fill, VenueError>;

    /// Pull `token_amount` from `seller` (manager allowance required) and pay
    /// the proceeds to `payout`. Returns the funds paid.
    fn sell(
        &self,
        ledger: &mut dyn Ledger,
        seller: Address,
        payout: Address,
        token: Address,
        token_amount: U256,
    ) -> Result<U256, VenueError>;
}

/// Maps a token to the manager that launched it.
pub trait TokenManagerRegistry: Send + Sync {
    fn address(&self) -> Address;

    fn token_info(&self, token: Address) -> Result<RegistryTokenInfo, VenueError>;
}

/// Yes/no answer to "is this token already listed on the external exchange".
pub trait ListingOracle: Send + Sync {
    fn is_listed(&self, token: Address) -> Result<bool, VenueError>;
}
