// Error types and error handling module
// This file defines the router's failure taxonomy plus the errors raised by
// the external collaborators it calls (token managers, registry, ledger)
//
// Numan Thabit 2025 Nov

use alloy_primitives::{Address, U256};
use thiserror::Error;

/// Failure of a router operation. `Display` yields the reason string surfaced
/// to callers verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    #[error("Only the owner can perform this action")]
    Unauthorized,
    #[error("FR - FeeRate exceeds 5%")]
    FeeTooHigh,
    #[error("ZA - Zero Address")]
    ZeroAddress,
    #[error("Only BNB trading pairs are supported")]
    UnsupportedPair,
    #[error("Token must NOT be listed on PancakeSwap")]
    AlreadyListed,
    #[error("Invalid TokenManager version")]
    UnsupportedManagerVersion,
    #[error("Slippage exceeded: received {actual}, minimum {minimum}")]
    SlippageExceeded { minimum: U256, actual: U256 },
    #[error("Arithmetic error: {0}")]
    Arithmetic(&'static str),
    #[error("Insufficient allowance: {spender} may spend {available}, {required} required")]
    InsufficientAllowance {
        spender: Address,
        required: U256,
        available: U256,
    },
    #[error("Amount must be greater than zero")]
    ZeroAmount,
    #[error("External call failed: {0}")]
    ExternalCallFailed(String),
}

impl RouterError {
    /// Stable machine-readable code, used by the HTTP layer and metric labels.
    pub fn code(&self) -> &'static str {
        match self {
            RouterError::Unauthorized => "UNAUTHORIZED",
            RouterError::FeeTooHigh => "FEE_TOO_HIGH",
            RouterError::ZeroAddress => "ZERO_ADDRESS",
            RouterError::UnsupportedPair => "UNSUPPORTED_PAIR",
            RouterError::AlreadyListed => "ALREADY_LISTED",
            RouterError::UnsupportedManagerVersion => "UNSUPPORTED_MANAGER_VERSION",
            RouterError::SlippageExceeded { .. } => "SLIPPAGE_EXCEEDED",
            RouterError::Arithmetic(_) => "ARITHMETIC_ERROR",
            RouterError::InsufficientAllowance { .. } => "INSUFFICIENT_ALLOWANCE",
            RouterError::ZeroAmount => "ZERO_AMOUNT",
            RouterError::ExternalCallFailed(_) => "EXTERNAL_CALL_FAILED",
        }
    }
}

/// Failure reported by a token manager, the manager registry or the listing oracle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VenueError {
    #[error("unknown token {0}")]
    UnknownToken(Address),
    #[error("token {token} is not traded by manager {manager}")]
    NotManaged { manager: Address, token: Address },
    #[error("insufficient liquidity: {0}")]
    InsufficientLiquidity(String),
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    #[error("manager resolved at {resolved} but implementation lives at {implementation}")]
    ManagerMismatch {
        resolved: Address,
        implementation: Address,
    },
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
    #[error("provider error: {0}")]
    Provider(String),
}

/// Failure of the base-currency or token transfer channel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("insufficient balance: {account} holds {available}, {required} required")]
    InsufficientBalance {
        account: Address,
        required: U256,
        available: U256,
    },
    #[error("insufficient allowance: {spender} may spend {available}, {required} required")]
    InsufficientAllowance {
        spender: Address,
        required: U256,
        available: U256,
    },
    #[error("transfer rejected by recipient {0}")]
    TransferRejected(Address),
    #[error("balance overflow for {0}")]
    Overflow(Address),
}

impl From<VenueError> for RouterError {
    fn from(err: VenueError) -> Self {
        RouterError::ExternalCallFailed(err.to_string())
    }
}

impl From<LedgerError> for RouterError {
    fn from(err: LedgerError) -> Self {
        RouterError::ExternalCallFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reason_strings_are_verbatim() {
        assert_eq!(
            RouterError::Unauthorized.to_string(),
            "Only the owner can perform this action"
        );
        assert_eq!(RouterError::FeeTooHigh.to_string(), "FR - FeeRate exceeds 5%");
        assert_eq!(RouterError::ZeroAddress.to_string(), "ZA - Zero Address");
        assert_eq!(
            RouterError::UnsupportedPair.to_string(),
            "Only BNB trading pairs are supported"
        );
        assert_eq!(
            RouterError::AlreadyListed.to_string(),
            "Token must NOT be listed on PancakeSwap"
        );
        assert_eq!(
            RouterError::UnsupportedManagerVersion.to_string(),
            "Invalid TokenManager version"
        );
    }

    #[test]
    fn ledger_failures_become_external_call_failures() {
        let err: RouterError = LedgerError::TransferRejected(Address::repeat_byte(9)).into();
        assert_eq!(err.code(), "EXTERNAL_CALL_FAILED");
        assert!(err.to_string().contains("transfer rejected"));
    }
}
