// Pre-trade validation module
// Decides whether a token may be traded through the router: paired against
// the native currency, not yet listed on the external exchange, and launched
// by the supported manager version.
//
// Numan Thabit 2025 Nov

use super::quotes::TokenInfo;
use crate::errors::RouterError;
use crate::venues::{RegistryTokenInfo, TokenManager, Venues};
use alloy_primitives::Address;
use std::sync::Arc;
use tracing::{debug, warn};

/// Manager version the router executes against.
pub const SUPPORTED_MANAGER_VERSION: u32 = 2;

/// Outcome of running every eligibility rule, failed rules collected in order.
#[derive(Debug)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<RouterError>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    pub fn add_error(&mut self, error: RouterError) {
        self.is_valid = false;
        self.errors.push(error);
    }

    /// First failed rule, which is the one a trade would be rejected with.
    pub fn into_result(self) -> Result<(), RouterError> {
        match self.errors.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    pub fn reasons(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

/// Token the router may trade, with the manager that will fill it.
#[derive(Debug, Clone)]
pub struct Eligible {
    pub info: RegistryTokenInfo,
    pub manager: Arc<dyn TokenManager>,
}

#[derive(Debug, Clone)]
pub struct EligibilityChecker {
    venues: Venues,
    base_currency: Address,
    supported_version: u32,
}

impl EligibilityChecker {
    pub fn new(venues: Venues, base_currency: Address, supported_version: u32) -> Self {
        Self {
            venues,
            base_currency,
            supported_version,
        }
    }

    pub fn venues(&self) -> &Venues {
        &self.venues
    }

    pub fn base_currency(&self) -> Address {
        self.base_currency
    }

    pub fn supported_version(&self) -> u32 {
        self.supported_version
    }

    /// Apply the rules in order and stop at the first rejection.
    pub fn check(&self, token: Address) -> Result<Eligible, RouterError> {
        let info = self.venues.registry.token_info(token)?;
        if info.quote != self.base_currency {
            return Err(RouterError::UnsupportedPair);
        }
        if self.venues.oracle.is_listed(token)? {
            return Err(RouterError::AlreadyListed);
        }
        if info.manager.version != self.supported_version {
            return Err(RouterError::UnsupportedManagerVersion);
        }
        let manager = self.venues.managers.resolve(&info.manager)?;
        debug!(%token, manager = %manager.address(), "token eligible");
        Ok(Eligible { info, manager })
    }

    /// Run every rule that can run and report all of them. Never fails;
    /// collaborator errors become reasons.
    pub fn evaluate(&self, token: Address) -> (TokenInfo, ValidationResult) {
        let mut result = ValidationResult::new();

        let registry = match self.venues.registry.token_info(token) {
            Ok(info) => Some(info),
            Err(err) => {
                warn!(%token, error = %err, "registry lookup failed");
                result.add_error(err.into());
                None
            }
        };

        let native_pair = registry.as_ref().map(|info| info.quote == self.base_currency);
        if native_pair == Some(false) {
            result.add_error(RouterError::UnsupportedPair);
        }

        let listed = match self.venues.oracle.is_listed(token) {
            Ok(listed) => Some(listed),
            Err(err) => {
                warn!(%token, error = %err, "listing oracle failed");
                result.add_error(err.into());
                None
            }
        };
        if listed == Some(true) {
            result.add_error(RouterError::AlreadyListed);
        }

        let manager = registry.as_ref().map(|info| info.manager);
        let version_supported = manager.map(|m| m.version == self.supported_version);
        if version_supported == Some(false) {
            result.add_error(RouterError::UnsupportedManagerVersion);
        }
        if let (Some(manager), Some(true)) = (manager.as_ref(), version_supported) {
            if let Err(err) = self.venues.managers.resolve(manager) {
                result.add_error(err);
            }
        }

        let info = TokenInfo {
            token,
            registry,
            manager,
            native_pair,
            listed,
            version_supported,
            eligible: result.is_valid,
            reasons: result.reasons(),
        };
        (info, result)
    }

    pub fn token_info(&self, token: Address) -> TokenInfo {
        self.evaluate(token).0
    }
}
