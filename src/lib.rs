// Library root module for fee-router
// This file defines the public API and module structure: a fee-charging
// trading router in front of an external token manager, the ledger it
// settles through, and the sandbox service that hosts it
//
// Numan Thabit 2025 Nov

pub mod config;
pub mod control;
pub mod errors;
pub mod ledger;
pub mod metrics;
pub mod router;
pub mod sandbox;
pub mod state;
pub mod venues;
