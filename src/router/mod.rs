// Router module - validation, estimation and fee-charging execution
// This file wires the router components and the HTTP surface in front of them
//
// Numan Thabit 2025 Nov

pub mod api;
pub mod estimator;
pub mod execution;
pub mod quotes;
pub mod validation;

#[allow(clippy::module_inception)]
pub mod router;

#[cfg(test)]
pub(crate) mod fixtures;

pub use estimator::Estimator;
pub use execution::{ExecutionStats, TradeExecutor};
pub use quotes::{BuyQuote, BuyReceipt, SellQuote, SellReceipt, TokenInfo};
pub use router::{Router, RouterSettings};
pub use validation::{EligibilityChecker, Eligible, ValidationResult, SUPPORTED_MANAGER_VERSION};
