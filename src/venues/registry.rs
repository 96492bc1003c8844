// Static token registry and listing oracle
// In-memory answers for "which manager launched this token" and "is this token
// already listed elsewhere", populated once at start-up.
//
// Numan Thabit 2025 Nov

use super::adapter::{ListingOracle, RegistryTokenInfo, TokenManagerRegistry};
use crate::errors::VenueError;
use alloy_primitives::Address;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Default)]
pub struct StaticRegistry {
    address: Address,
    tokens: HashMap<Address, RegistryTokenInfo>,
    listed: HashSet<Address>,
}

impl StaticRegistry {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            ..Self::default()
        }
    }

    pub fn insert(&mut self, token: Address, info: RegistryTokenInfo) {
        self.tokens.insert(token, info);
    }

    pub fn set_listed(&mut self, token: Address, listed: bool) {
        if listed {
            self.listed.insert(token);
        } else {
            self.listed.remove(&token);
        }
    }
}

impl TokenManagerRegistry for StaticRegistry {
    fn address(&self) -> Address {
        self.address
    }

    fn token_info(&self, token: Address) -> Result<RegistryTokenInfo, VenueError> {
        self.tokens
            .get(&token)
            .cloned()
            .ok_or(VenueError::UnknownToken(token))
    }
}

impl ListingOracle for StaticRegistry {
    fn is_listed(&self, token: Address) -> Result<bool, VenueError> {
        Ok(self.listed.contains(&token))
    }
}
