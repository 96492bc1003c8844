// Execution engine - fee-charging buys and sells through the token manager
// Every trade runs inside a ledger checkpoint: eligibility, fee routing, the
// manager call and the slippage guard either all take effect or none do.
//
// Numan Thabit 2025 Nov

use super::quotes::{BuyReceipt, SellReceipt};
use super::validation::EligibilityChecker;
use crate::errors::RouterError;
use crate::ledger::Ledger;
use crate::metrics::{amount_as_f64, FEES_COLLECTED, REJECTIONS, TRADES};
use crate::state::FeeConfig;
use alloy_primitives::{Address, U256};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{info, warn};

/// Execution statistics for monitoring
#[derive(Debug, Clone, serde::Serialize)]
pub struct ExecutionStats {
    pub total_executions: u64,
    pub successful_executions: u64,
    pub failed_executions: u64,
    pub buys: u64,
    pub sells: u64,
    pub success_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Buy,
    Sell,
}

impl Side {
    fn label(self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }
}

/// Runs trades on behalf of callers, holding funds in transit on `account`.
#[derive(Debug)]
pub struct TradeExecutor {
    checker: EligibilityChecker,
    account: Address,
    total_executions: AtomicU64,
    successful_executions: AtomicU64,
    failed_executions: AtomicU64,
    buys: AtomicU64,
    sells: AtomicU64,
}

impl TradeExecutor {
    pub fn new(checker: EligibilityChecker, account: Address) -> Self {
        Self {
            checker,
            account,
            total_executions: AtomicU64::new(0),
            successful_executions: AtomicU64::new(0),
            failed_executions: AtomicU64::new(0),
            buys: AtomicU64::new(0),
            sells: AtomicU64::new(0),
        }
    }

    pub fn account(&self) -> Address {
        self.account
    }

    pub fn get_stats(&self) -> ExecutionStats {
        let total = self.total_executions.load(Ordering::Relaxed);
        let successful = self.successful_executions.load(Ordering::Relaxed);
        ExecutionStats {
            total_executions: total,
            successful_executions: successful,
            failed_executions: self.failed_executions.load(Ordering::Relaxed),
            buys: self.buys.load(Ordering::Relaxed),
            sells: self.sells.load(Ordering::Relaxed),
            success_rate: if total > 0 {
                successful as f64 / total as f64
            } else {
                0.0
            },
        }
    }

    /// Pay `payment` from `caller`, skim the fee, spend the rest on `token`
    /// and refund whatever the manager did not use. Reverts unless at least
    /// `min_amount` tokens arrive.
    #[tracing::instrument(skip_all, fields(caller = %caller, token = %token))]
    pub fn buy(
        &self,
        ledger: &mut dyn Ledger,
        fee: FeeConfig,
        caller: Address,
        token: Address,
        min_amount: U256,
        payment: U256,
    ) -> Result<BuyReceipt, RouterError> {
        let checkpoint = ledger.checkpoint();
        match self.buy_inner(ledger, fee, caller, token, min_amount, payment) {
            Ok(receipt) => {
                ledger.commit(checkpoint);
                self.record_success(Side::Buy, receipt.fee);
                info!(
                    payment = %receipt.payment,
                    fee = %receipt.fee,
                    amount_bought = %receipt.amount_bought,
                    refund = %receipt.refund,
                    "buy executed"
                );
                Ok(receipt)
            }
            Err(err) => {
                ledger.revert_to(checkpoint);
                self.record_failure(Side::Buy, &err);
                Err(err)
            }
        }
    }

    fn buy_inner(
        &self,
        ledger: &mut dyn Ledger,
        fee: FeeConfig,
        caller: Address,
        token: Address,
        min_amount: U256,
        payment: U256,
    ) -> Result<BuyReceipt, RouterError> {
        let eligible = self.checker.check(token)?;
        if payment.is_zero() {
            return Err(RouterError::ZeroAmount);
        }
        ledger.transfer_native(caller, self.account, payment)?;

        let split = fee.split(payment)?;
        if !split.fee.is_zero() {
            ledger.transfer_native(self.account, fee.recipient(), split.fee)?;
        }

        let fill = eligible
            .manager
            .buy(ledger, self.account, caller, token, split.net)?;
        let refund = split
            .net
            .checked_sub(fill.funds_used)
            .ok_or(RouterError::Arithmetic("manager spent more than forwarded"))?;
        if !refund.is_zero() {
            ledger.transfer_native(self.account, caller, refund)?;
        }

        if fill.amount < min_amount {
            return Err(RouterError::SlippageExceeded {
                minimum: min_amount,
                actual: fill.amount,
            });
        }

        Ok(BuyReceipt {
            token,
            token_manager: eligible.manager.address(),
            payment,
            fee: split.fee,
            net: split.net,
            amount_bought: fill.amount,
            funds_used: fill.funds_used,
            refund,
        })
    }

    /// Sell `token_amount` through the manager, skim the fee from the
    /// proceeds and pay the rest to `caller`. Reverts unless the caller
    /// receives at least `min_funds`.
    #[tracing::instrument(skip_all, fields(caller = %caller, token = %token))]
    pub fn sell(
        &self,
        ledger: &mut dyn Ledger,
        fee: FeeConfig,
        caller: Address,
        token: Address,
        token_amount: U256,
        min_funds: U256,
    ) -> Result<SellReceipt, RouterError> {
        let checkpoint = ledger.checkpoint();
        match self.sell_inner(ledger, fee, caller, token, token_amount, min_funds) {
            Ok(receipt) => {
                ledger.commit(checkpoint);
                self.record_success(Side::Sell, receipt.fee);
                info!(
                    token_amount = %receipt.token_amount,
                    funds = %receipt.funds,
                    fee = %receipt.fee,
                    amount_received = %receipt.amount_received,
                    "sell executed"
                );
                Ok(receipt)
            }
            Err(err) => {
                ledger.revert_to(checkpoint);
                self.record_failure(Side::Sell, &err);
                Err(err)
            }
        }
    }

    fn sell_inner(
        &self,
        ledger: &mut dyn Ledger,
        fee: FeeConfig,
        caller: Address,
        token: Address,
        token_amount: U256,
        min_funds: U256,
    ) -> Result<SellReceipt, RouterError> {
        let eligible = self.checker.check(token)?;
        if token_amount.is_zero() {
            return Err(RouterError::ZeroAmount);
        }
        let spender = eligible.manager.address();
        let available = ledger.token_allowance(token, caller, spender);
        if available < token_amount {
            return Err(RouterError::InsufficientAllowance {
                spender,
                required: token_amount,
                available,
            });
        }

        let funds = eligible
            .manager
            .sell(ledger, caller, self.account, token, token_amount)?;
        let split = fee.split(funds)?;
        if split.net < min_funds {
            return Err(RouterError::SlippageExceeded {
                minimum: min_funds,
                actual: split.net,
            });
        }

        if !split.fee.is_zero() {
            ledger.transfer_native(self.account, fee.recipient(), split.fee)?;
        }
        ledger.transfer_native(self.account, caller, split.net)?;

        Ok(SellReceipt {
            token,
            token_manager: spender,
            token_amount,
            funds,
            fee: split.fee,
            amount_received: split.net,
        })
    }

    fn record_success(&self, side: Side, fee: U256) {
        self.total_executions.fetch_add(1, Ordering::Relaxed);
        self.successful_executions.fetch_add(1, Ordering::Relaxed);
        match side {
            Side::Buy => self.buys.fetch_add(1, Ordering::Relaxed),
            Side::Sell => self.sells.fetch_add(1, Ordering::Relaxed),
        };
        TRADES.with_label_values(&[side.label(), "ok"]).inc();
        FEES_COLLECTED
            .with_label_values(&[side.label()])
            .inc_by(amount_as_f64(fee));
    }

    fn record_failure(&self, side: Side, err: &RouterError) {
        self.total_executions.fetch_add(1, Ordering::Relaxed);
        self.failed_executions.fetch_add(1, Ordering::Relaxed);
        TRADES.with_label_values(&[side.label(), "rejected"]).inc();
        REJECTIONS
            .with_label_values(&[side.label(), err.code()])
            .inc();
        warn!(side = side.label(), code = err.code(), error = %err, "trade rejected");
    }
}
