// Router facade
// Ties fee configuration, eligibility, estimation and execution together
// behind the operations callers use.
//
// Numan Thabit 2025 Nov

use super::estimator::Estimator;
use super::execution::{ExecutionStats, TradeExecutor};
use super::quotes::{BuyQuote, BuyReceipt, SellQuote, SellReceipt, TokenInfo};
use super::validation::{EligibilityChecker, SUPPORTED_MANAGER_VERSION};
use crate::errors::RouterError;
use crate::ledger::Ledger;
use crate::metrics::{FEE_UPDATES, REJECTIONS};
use crate::state::{FeeConfig, FeeRate, RouterState};
use crate::venues::Venues;
use alloy_primitives::{Address, U256};
use tracing::{info, warn};

/// Construction parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterSettings {
    /// Ledger account the router holds funds in transit on.
    pub account: Address,
    pub owner: Address,
    pub fee_rate: FeeRate,
    pub fee_recipient: Address,
    /// Currency tokens must be paired against; zero is native.
    pub base_currency: Address,
    pub supported_manager_version: u32,
}

impl RouterSettings {
    /// Settings with a 1% fee, native pairing and manager version 2.
    pub fn new(account: Address, owner: Address, fee_recipient: Address) -> Self {
        Self {
            account,
            owner,
            fee_rate: FeeRate::new(1),
            fee_recipient,
            base_currency: Address::ZERO,
            supported_manager_version: SUPPORTED_MANAGER_VERSION,
        }
    }
}

/// High-level Router that ties validation, estimation and execution together
#[derive(Debug)]
pub struct Router {
    state: RouterState,
    checker: EligibilityChecker,
    estimator: Estimator,
    executor: TradeExecutor,
}

impl Router {
    pub fn new(settings: RouterSettings, venues: Venues) -> Result<Self, RouterError> {
        if settings.account == Address::ZERO {
            return Err(RouterError::ZeroAddress);
        }
        let fee = FeeConfig::new(settings.fee_rate, settings.fee_recipient)?;
        let state = RouterState::new(settings.owner, fee)?;
        let checker = EligibilityChecker::new(
            venues.clone(),
            settings.base_currency,
            settings.supported_manager_version,
        );
        let estimator = Estimator::new(venues);
        let executor = TradeExecutor::new(checker.clone(), settings.account);
        info!(
            account = %settings.account,
            owner = %settings.owner,
            fee_rate = %settings.fee_rate,
            registry = %checker.venues().registry.address(),
            "router initialized"
        );
        Ok(Self {
            state,
            checker,
            estimator,
            executor,
        })
    }

    pub fn owner(&self) -> Address {
        self.state.owner()
    }

    pub fn fee_config(&self) -> FeeConfig {
        self.state.fee()
    }

    pub fn fee_rate(&self) -> FeeRate {
        self.state.fee().rate()
    }

    pub fn fee_recipient(&self) -> Address {
        self.state.fee().recipient()
    }

    pub fn registry_address(&self) -> Address {
        self.checker.venues().registry.address()
    }

    pub fn account(&self) -> Address {
        self.executor.account()
    }

    pub fn base_currency(&self) -> Address {
        self.checker.base_currency()
    }

    pub fn supported_manager_version(&self) -> u32 {
        self.checker.supported_version()
    }

    pub fn stats(&self) -> ExecutionStats {
        self.executor.get_stats()
    }

    pub fn set_fee(
        &mut self,
        caller: Address,
        rate: FeeRate,
        recipient: Address,
    ) -> Result<(), RouterError> {
        match self.state.set_fee(caller, rate, recipient) {
            Ok(()) => {
                FEE_UPDATES.inc();
                Ok(())
            }
            Err(err) => Err(rejected("set_fee", caller, err)),
        }
    }

    pub fn transfer_ownership(
        &mut self,
        caller: Address,
        new_owner: Address,
    ) -> Result<(), RouterError> {
        self.state
            .transfer_ownership(caller, new_owner)
            .map_err(|err| rejected("transfer_ownership", caller, err))
    }

    pub fn get_token_info(&self, token: Address) -> TokenInfo {
        self.checker.token_info(token)
    }

    pub fn try_buy(
        &self,
        ledger: &dyn Ledger,
        token: Address,
        token_amount: U256,
        bnb_amount: U256,
    ) -> Result<BuyQuote, RouterError> {
        let fee = self.state.fee();
        self.estimator
            .try_buy(ledger, &fee, token, token_amount, bnb_amount)
    }

    pub fn try_sell(
        &self,
        ledger: &dyn Ledger,
        token: Address,
        token_amount: U256,
    ) -> Result<SellQuote, RouterError> {
        let fee = self.state.fee();
        self.estimator.try_sell(ledger, &fee, token, token_amount)
    }

    /// Buy `token` with `payment` of native currency, fee deducted up front.
    pub fn buy_token_with_fee(
        &self,
        ledger: &mut dyn Ledger,
        caller: Address,
        token: Address,
        min_amount: U256,
        payment: U256,
    ) -> Result<BuyReceipt, RouterError> {
        self.executor
            .buy(ledger, self.state.fee(), caller, token, min_amount, payment)
    }

    /// Sell `token_amount` of `token`, fee deducted from the proceeds.
    pub fn sell_token_with_fee(
        &self,
        ledger: &mut dyn Ledger,
        caller: Address,
        token: Address,
        token_amount: U256,
        min_funds: U256,
    ) -> Result<SellReceipt, RouterError> {
        self.executor
            .sell(ledger, self.state.fee(), caller, token, token_amount, min_funds)
    }
}

fn rejected(operation: &'static str, caller: Address, err: RouterError) -> RouterError {
    REJECTIONS.with_label_values(&[operation, err.code()]).inc();
    warn!(operation, caller = %caller, error = %err, "admin call rejected");
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::fixtures::*;

    fn router() -> Router {
        Router::new(RouterSettings::new(ROUTER, OWNER, RECIPIENT), venues()).unwrap()
    }

    #[test]
    fn constructor_validates_parameters() {
        let mut settings = RouterSettings::new(ROUTER, OWNER, RECIPIENT);
        settings.fee_rate = FeeRate::new(6);
        assert_eq!(
            Router::new(settings.clone(), venues()).unwrap_err(),
            RouterError::FeeTooHigh
        );
        settings.fee_rate = FeeRate::new(5);
        settings.owner = Address::ZERO;
        assert_eq!(
            Router::new(settings.clone(), venues()).unwrap_err(),
            RouterError::ZeroAddress
        );
        settings.owner = OWNER;
        settings.account = Address::ZERO;
        assert_eq!(
            Router::new(settings, venues()).unwrap_err(),
            RouterError::ZeroAddress
        );
    }

    #[test]
    fn getters_reflect_settings() {
        let router = router();
        assert_eq!(router.owner(), OWNER);
        assert_eq!(router.fee_rate(), FeeRate::new(1));
        assert_eq!(router.fee_recipient(), RECIPIENT);
        assert_eq!(router.registry_address(), REGISTRY);
        assert_eq!(router.account(), ROUTER);
        assert_eq!(router.supported_manager_version(), 2);
    }

    #[test]
    fn trades_use_fee_config_at_execution_time() {
        let mut router = router();
        let mut ledger = ledger();
        let quote = router.try_buy(&ledger, GOOD, U256::ZERO, ether(1)).unwrap();
        assert_eq!(quote.router_fee, ether(1) / U256::from(100u64));

        router.set_fee(OWNER, FeeRate::new(5), RECIPIENT).unwrap();
        let receipt = router
            .buy_token_with_fee(&mut ledger, TRADER, GOOD, U256::ZERO, ether(1))
            .unwrap();
        assert_eq!(receipt.fee, ether(1) / U256::from(20u64));
    }

    #[test]
    fn zero_rate_sends_nothing_to_recipient() {
        let mut router = router();
        let mut ledger = ledger();
        router.set_fee(OWNER, FeeRate::ZERO, RECIPIENT).unwrap();
        let receipt = router
            .buy_token_with_fee(&mut ledger, TRADER, GOOD, U256::ZERO, ether(1))
            .unwrap();
        assert_eq!(receipt.fee, U256::ZERO);
        assert_eq!(ledger.native_balance(RECIPIENT), U256::ZERO);
    }
}
