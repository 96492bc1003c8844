// In-memory ledger with an undo journal
//
// Numan Thabit 2025 Nov

use super::{Checkpoint, Ledger};
use crate::errors::LedgerError;
use alloy_primitives::{Address, U256};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Prior value of a slot, recorded before the first write inside a checkpoint.
#[derive(Debug, Clone)]
enum JournalEntry {
    Native {
        account: Address,
        previous: U256,
    },
    Token {
        token: Address,
        account: Address,
        previous: U256,
    },
    Allowance {
        token: Address,
        owner: Address,
        spender: Address,
        previous: U256,
    },
}

/// Hash-map backed [`Ledger`]. Writes are journaled only while a checkpoint
/// is open, so genesis funding does not accumulate undo entries.
#[derive(Debug, Default, Clone)]
pub struct InMemoryLedger {
    native: HashMap<Address, U256>,
    tokens: HashMap<(Address, Address), U256>,
    allowances: HashMap<(Address, Address, Address), U256>,
    rejects_native: HashSet<Address>,
    journal: Vec<JournalEntry>,
    open: Vec<usize>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint native currency to `account` (genesis funding).
    pub fn credit_native(&mut self, account: Address, amount: U256) -> Result<(), LedgerError> {
        let balance = self.native_balance(account);
        let updated = balance
            .checked_add(amount)
            .ok_or(LedgerError::Overflow(account))?;
        self.set_native(account, updated);
        Ok(())
    }

    /// Mint `amount` of `token` to `account` (genesis inventory).
    pub fn mint_token(
        &mut self,
        token: Address,
        account: Address,
        amount: U256,
    ) -> Result<(), LedgerError> {
        let balance = self.token_balance(token, account);
        let updated = balance
            .checked_add(amount)
            .ok_or(LedgerError::Overflow(account))?;
        self.set_token(token, account, updated);
        Ok(())
    }

    /// Make every native transfer to `account` fail, like a contract without
    /// a payable fallback.
    pub fn reject_native_transfers_to(&mut self, account: Address) {
        self.rejects_native.insert(account);
    }

    /// Number of checkpoints currently open.
    pub fn open_checkpoints(&self) -> usize {
        self.open.len()
    }

    fn record(&mut self, entry: JournalEntry) {
        if !self.open.is_empty() {
            self.journal.push(entry);
        }
    }

    fn set_native(&mut self, account: Address, value: U256) {
        let previous = self.native_balance(account);
        self.record(JournalEntry::Native { account, previous });
        self.native.insert(account, value);
    }

    fn set_token(&mut self, token: Address, account: Address, value: U256) {
        let previous = self.token_balance(token, account);
        self.record(JournalEntry::Token {
            token,
            account,
            previous,
        });
        self.tokens.insert((token, account), value);
    }

    fn set_allowance(&mut self, token: Address, owner: Address, spender: Address, value: U256) {
        let previous = self.token_allowance(token, owner, spender);
        self.record(JournalEntry::Allowance {
            token,
            owner,
            spender,
            previous,
        });
        self.allowances.insert((token, owner, spender), value);
    }

    fn undo(&mut self, entry: JournalEntry) {
        match entry {
            JournalEntry::Native { account, previous } => {
                self.native.insert(account, previous);
            }
            JournalEntry::Token {
                token,
                account,
                previous,
            } => {
                self.tokens.insert((token, account), previous);
            }
            JournalEntry::Allowance {
                token,
                owner,
                spender,
                previous,
            } => {
                self.allowances.insert((token, owner, spender), previous);
            }
        }
    }

    /// Debit `from` and credit `to` for `token`, validating both sides before
    /// touching either.
    fn move_tokens(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), LedgerError> {
        let available = self.token_balance(token, from);
        let debited = available
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientBalance {
                account: from,
                required: amount,
                available,
            })?;
        if from == to {
            return Ok(());
        }
        let credited = self
            .token_balance(token, to)
            .checked_add(amount)
            .ok_or(LedgerError::Overflow(to))?;
        self.set_token(token, from, debited);
        self.set_token(token, to, credited);
        Ok(())
    }
}

impl Ledger for InMemoryLedger {
    fn native_balance(&self, account: Address) -> U256 {
        self.native.get(&account).copied().unwrap_or_default()
    }

    fn transfer_native(
        &mut self,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), LedgerError> {
        if self.rejects_native.contains(&to) {
            return Err(LedgerError::TransferRejected(to));
        }
        let available = self.native_balance(from);
        let debited = available
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientBalance {
                account: from,
                required: amount,
                available,
            })?;
        if from == to {
            return Ok(());
        }
        let credited = self
            .native_balance(to)
            .checked_add(amount)
            .ok_or(LedgerError::Overflow(to))?;
        self.set_native(from, debited);
        self.set_native(to, credited);
        Ok(())
    }

    fn token_balance(&self, token: Address, account: Address) -> U256 {
        self.tokens.get(&(token, account)).copied().unwrap_or_default()
    }

    fn token_allowance(&self, token: Address, owner: Address, spender: Address) -> U256 {
        self.allowances
            .get(&(token, owner, spender))
            .copied()
            .unwrap_or_default()
    }

    fn approve(
        &mut self,
        token: Address,
        owner: Address,
        spender: Address,
        amount: U256,
    ) -> Result<(), LedgerError> {
        self.set_allowance(token, owner, spender, amount);
        debug!(%token, %owner, %spender, %amount, "allowance set");
        Ok(())
    }

    fn transfer_token(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), LedgerError> {
        self.move_tokens(token, from, to, amount)
    }

    fn transfer_token_from(
        &mut self,
        token: Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), LedgerError> {
        let available = self.token_allowance(token, from, spender);
        let remaining = available
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientAllowance {
                spender,
                required: amount,
                available,
            })?;
        self.move_tokens(token, from, to, amount)?;
        // Unlimited approvals are never drawn down.
        if available != U256::MAX {
            self.set_allowance(token, from, spender, remaining);
        }
        Ok(())
    }

    fn checkpoint(&mut self) -> Checkpoint {
        let checkpoint = Checkpoint {
            depth: self.open.len(),
            mark: self.journal.len(),
        };
        self.open.push(checkpoint.mark);
        checkpoint
    }

    fn revert_to(&mut self, checkpoint: Checkpoint) {
        while self.journal.len() > checkpoint.mark {
            if let Some(entry) = self.journal.pop() {
                self.undo(entry);
            }
        }
        self.open.truncate(checkpoint.depth);
        if self.open.is_empty() {
            self.journal.clear();
        }
    }

    fn commit(&mut self, checkpoint: Checkpoint) {
        self.open.truncate(checkpoint.depth);
        // Entries stay around while an enclosing checkpoint may still revert.
        if self.open.is_empty() {
            self.journal.clear();
        }
    }
}
