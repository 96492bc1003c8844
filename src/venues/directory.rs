// Token manager directory: selects a manager implementation by version
//
// Numan Thabit 2025 Nov

use super::adapter::{TokenManager, TokenManagerRef};
use crate::errors::{RouterError, VenueError};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct ManagerDirectory {
    by_version: BTreeMap<u32, Arc<dyn TokenManager>>,
}

impl ManagerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an implementation under its own version. Returns the
    /// implementation it replaced, if any.
    pub fn register(&mut self, manager: Arc<dyn TokenManager>) -> Option<Arc<dyn TokenManager>> {
        self.by_version.insert(manager.version(), manager)
    }

    /// Resolve the implementation behind a registry reference. Unknown
    /// versions fail closed.
    pub fn resolve(&self, manager: &TokenManagerRef) -> Result<Arc<dyn TokenManager>, RouterError> {
        let implementation = self
            .by_version
            .get(&manager.version)
            .ok_or(RouterError::UnsupportedManagerVersion)?;
        if implementation.address() != manager.address {
            return Err(VenueError::ManagerMismatch {
                resolved: manager.address,
                implementation: implementation.address(),
            }
            .into());
        }
        Ok(Arc::clone(implementation))
    }
}
