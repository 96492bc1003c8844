// Venues module
// External collaborators of the router and the sandbox implementations of
// them.
//
// Numan Thabit 2025 Nov

pub mod adapter;
pub mod directory;
pub mod fixed_rate;
pub mod registry;

pub use adapter::{
    BuyAmount, Fill, ListingOracle, ManagerBuyQuote, ManagerSellQuote, RegistryTokenInfo,
    TokenManager, TokenManagerRef, TokenManagerRegistry,
};
pub use directory::ManagerDirectory;
pub use fixed_rate::{FixedRateManager, PRICE_SCALE};
pub use registry::StaticRegistry;

use crate::errors::RouterError;
use alloy_primitives::Address;
use std::fmt;
use std::sync::Arc;

/// Everything the router consults when it resolves a token.
#[derive(Clone)]
pub struct Venues {
    pub registry: Arc<dyn TokenManagerRegistry>,
    pub oracle: Arc<dyn ListingOracle>,
    pub managers: ManagerDirectory,
}

impl Venues {
    pub fn new(
        registry: Arc<dyn TokenManagerRegistry>,
        oracle: Arc<dyn ListingOracle>,
        managers: ManagerDirectory,
    ) -> Self {
        Self {
            registry,
            oracle,
            managers,
        }
    }

    /// Registry record for `token` plus the manager implementation serving it.
    pub fn resolve(
        &self,
        token: Address,
    ) -> Result<(RegistryTokenInfo, Arc<dyn TokenManager>), RouterError> {
        let info = self.registry.token_info(token)?;
        let manager = self.managers.resolve(&info.manager)?;
        Ok((info, manager))
    }
}

impl fmt::Debug for Venues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Venues")
            .field("registry", &self.registry.address())
            .field("managers", &self.managers)
            .finish()
    }
}
