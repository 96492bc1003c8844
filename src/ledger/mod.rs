// Host ledger module
// The base-currency and fungible-token transfer channel the router and the
// token managers settle through, with checkpoint/revert journaling so that
// every mutating operation is all-or-nothing.
//
// Numan Thabit 2025 Nov

pub mod memory;

pub use memory::InMemoryLedger;

use crate::errors::LedgerError;
use alloy_primitives::{Address, U256};

/// Handle returned by [`Ledger::checkpoint`]. Checkpoints nest; a handle is
/// only valid until it, or an enclosing checkpoint, is reverted or committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    pub(crate) depth: usize,
    pub(crate) mark: usize,
}

/// Balances, allowances and transfers for the native currency and tokens.
///
/// Every method that returns `Err` leaves state untouched. Callers that chain
/// several transfers wrap them in `checkpoint` / `revert_to` / `commit`.
pub trait Ledger: Send {
    fn native_balance(&self, account: Address) -> U256;

    /// Move native currency. Fails if `from` is short or `to` rejects it.
    fn transfer_native(&mut self, from: Address, to: Address, amount: U256)
        -> Result<(), LedgerError>;

    fn token_balance(&self, token: Address, account: Address) -> U256;

    fn token_allowance(&self, token: Address, owner: Address, spender: Address) -> U256;

    fn approve(
        &mut self,
        token: Address,
        owner: Address,
        spender: Address,
        amount: U256,
    ) -> Result<(), LedgerError>;

    fn transfer_token(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), LedgerError>;

    /// Move tokens on behalf of `from`, spending `spender`'s allowance.
    fn transfer_token_from(
        &mut self,
        token: Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), LedgerError>;

    fn checkpoint(&mut self) -> Checkpoint;

    /// Undo every change made since `checkpoint`, closing it and any
    /// checkpoints opened after it.
    fn revert_to(&mut self, checkpoint: Checkpoint);

    /// Keep the changes made since `checkpoint` and close it.
    fn commit(&mut self, checkpoint: Checkpoint);
}
