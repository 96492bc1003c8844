// Fixed-rate token manager
// Sandbox venue that fills every trade at a configured per-token price,
// charges a flat trading fee and sells from a finite inventory held in the
// manager's own ledger account.
//
// Numan Thabit 2025 Nov

use super::adapter::{BuyAmount, Fill, ManagerBuyQuote, ManagerSellQuote, TokenManager};
use crate::errors::VenueError;
use crate::ledger::Ledger;
use crate::state::BPS_DENOMINATOR;
use alloy_primitives::{Address, U256};
use std::collections::HashMap;
use tracing::debug;

/// Prices are native base units per `PRICE_SCALE` token base units (one
/// whole 18-decimal token).
pub const PRICE_SCALE: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

#[derive(Debug, Clone)]
pub struct FixedRateManager {
    address: Address,
    version: u32,
    trading_fee_bps: u32,
    prices: HashMap<Address, U256>,
}

impl FixedRateManager {
    pub fn new(address: Address, version: u32, trading_fee_bps: u32) -> Result<Self, VenueError> {
        if trading_fee_bps >= BPS_DENOMINATOR {
            return Err(VenueError::InvalidAmount(format!(
                "trading fee {trading_fee_bps} bp leaves nothing to trade"
            )));
        }
        Ok(Self {
            address,
            version,
            trading_fee_bps,
            prices: HashMap::new(),
        })
    }

    /// List `token` at `price`.
    pub fn with_token(mut self, token: Address, price: U256) -> Result<Self, VenueError> {
        if price.is_zero() {
            return Err(VenueError::InvalidAmount(format!("zero price for {token}")));
        }
        self.prices.insert(token, price);
        Ok(self)
    }

    pub fn trading_fee_bps(&self) -> u32 {
        self.trading_fee_bps
    }

    pub fn price(&self, token: Address) -> Result<U256, VenueError> {
        self.prices
            .get(&token)
            .copied()
            .ok_or(VenueError::NotManaged {
                manager: self.address,
                token,
            })
    }

    fn inventory(&self, ledger: &dyn Ledger, token: Address) -> U256 {
        ledger.token_balance(token, self.address)
    }

    fn fee_on(&self, cost: U256) -> Result<U256, VenueError> {
        mul_div(cost, U256::from(self.trading_fee_bps), U256::from(BPS_DENOMINATOR))
    }

    /// Largest fill `funds` pays for, fee on top of cost, capped by inventory.
    fn fill_for_funds(
        &self,
        ledger: &dyn Ledger,
        token: Address,
        funds: U256,
    ) -> Result<ManagerBuyQuote, VenueError> {
        let price = self.price(token)?;
        if funds.is_zero() {
            return Err(VenueError::InvalidAmount("zero funds".into()));
        }
        let mut budget = mul_div(
            funds,
            U256::from(BPS_DENOMINATOR),
            U256::from(BPS_DENOMINATOR + self.trading_fee_bps),
        )?;
        // The fee rounds down, so a slightly larger cost can still fit.
        while let Some(next) = budget.checked_add(U256::from(1u64)) {
            if self.funds_for(next)? > funds {
                break;
            }
            budget = next;
        }
        let inventory = self.inventory(ledger, token);
        if inventory.is_zero() {
            return Err(VenueError::InsufficientLiquidity(format!(
                "no inventory left for {token}"
            )));
        }
        let token_amount = mul_div(budget, PRICE_SCALE, price)?.min(inventory);
        if token_amount.is_zero() {
            return Err(VenueError::InvalidAmount(format!(
                "{funds} does not buy a single unit of {token}"
            )));
        }
        self.cost_of(price, token_amount)
    }

    /// Funds needed to cover `cost` plus the fee charged on it.
    fn funds_for(&self, cost: U256) -> Result<U256, VenueError> {
        cost.checked_add(self.fee_on(cost)?)
            .ok_or_else(|| VenueError::InvalidAmount("funds overflow".into()))
    }

    fn cost_of(&self, price: U256, token_amount: U256) -> Result<ManagerBuyQuote, VenueError> {
        let cost = mul_div_up(token_amount, price, PRICE_SCALE)?;
        let manager_fee = self.fee_on(cost)?;
        let funds = self.funds_for(cost)?;
        Ok(ManagerBuyQuote {
            token_amount,
            funds,
            cost,
            manager_fee,
        })
    }

    fn proceeds(
        &self,
        ledger: &dyn Ledger,
        token: Address,
        token_amount: U256,
    ) -> Result<ManagerSellQuote, VenueError> {
        let price = self.price(token)?;
        if token_amount.is_zero() {
            return Err(VenueError::InvalidAmount("zero token amount".into()));
        }
        let gross = mul_div(token_amount, price, PRICE_SCALE)?;
        let manager_fee = self.fee_on(gross)?;
        let funds = gross - manager_fee;
        if funds.is_zero() {
            return Err(VenueError::InvalidAmount(format!(
                "{token_amount} units of {token} are worth nothing"
            )));
        }
        let reserve = ledger.native_balance(self.address);
        if reserve < funds {
            return Err(VenueError::InsufficientLiquidity(format!(
                "manager reserve {reserve} cannot pay {funds}"
            )));
        }
        Ok(ManagerSellQuote {
            token_amount,
            funds,
            manager_fee,
        })
    }
}

impl TokenManager for FixedRateManager {
    fn address(&self) -> Address {
        self.address
    }

    fn version(&self) -> u32 {
        self.version
    }

    fn quote_buy(
        &self,
        ledger: &dyn Ledger,
        token: Address,
        amount: BuyAmount,
    ) -> Result<ManagerBuyQuote, VenueError> {
        match amount {
            BuyAmount::Funds(funds) => self.fill_for_funds(ledger, token, funds),
            BuyAmount::ExactTokens(token_amount) => {
                let price = self.price(token)?;
                if token_amount.is_zero() {
                    return Err(VenueError::InvalidAmount("zero token amount".into()));
                }
                let inventory = self.inventory(ledger, token);
                if token_amount > inventory {
                    return Err(VenueError::InsufficientLiquidity(format!(
                        "{token_amount} requested, {inventory} left"
                    )));
                }
                self.cost_of(price, token_amount)
            }
        }
    }

    fn quote_sell(
        &self,
        ledger: &dyn Ledger,
        token: Address,
        token_amount: U256,
    ) -> Result<ManagerSellQuote, VenueError> {
        self.proceeds(ledger, token, token_amount)
    }

    fn buy(
        &self,
        ledger: &mut dyn Ledger,
        payer: Address,
        recipient: Address,
        token: Address,
        funds: U256,
    ) -> Result<Fill, VenueError> {
        let quote = self.fill_for_funds(&*ledger, token, funds)?;
        let checkpoint = ledger.checkpoint();
        let settled = ledger
            .transfer_native(payer, self.address, quote.funds)
            .and_then(|()| ledger.transfer_token(token, self.address, recipient, quote.token_amount));
        match settled {
            Ok(()) => {
                ledger.commit(checkpoint);
                debug!(
                    manager = %self.address,
                    %token,
                    amount = %quote.token_amount,
                    funds_used = %quote.funds,
                    "manager buy filled"
                );
                Ok(Fill {
                    amount: quote.token_amount,
                    funds_used: quote.funds,
                })
            }
            Err(err) => {
                ledger.revert_to(checkpoint);
                Err(err.into())
            }
        }
    }

    fn sell(
        &self,
        ledger: &mut dyn Ledger,
        seller: Address,
        payout: Address,
        token: Address,
        token_amount: U256,
    ) -> Result<U256, VenueError> {
        let quote = self.proceeds(&*ledger, token, token_amount)?;
        let checkpoint = ledger.checkpoint();
        let settled = ledger
            .transfer_token_from(token, self.address, seller, self.address, token_amount)
            .and_then(|()| ledger.transfer_native(self.address, payout, quote.funds));
        match settled {
            Ok(()) => {
                ledger.commit(checkpoint);
                debug!(
                    manager = %self.address,
                    %token,
                    %token_amount,
                    funds = %quote.funds,
                    "manager sell filled"
                );
                Ok(quote.funds)
            }
            Err(err) => {
                ledger.revert_to(checkpoint);
                Err(err.into())
            }
        }
    }
}

fn mul_div(a: U256, b: U256, denominator: U256) -> Result<U256, VenueError> {
    a.checked_mul(b)
        .and_then(|product| product.checked_div(denominator))
        .ok_or_else(|| VenueError::InvalidAmount("amount overflows pricing".into()))
}

fn mul_div_up(a: U256, b: U256, denominator: U256) -> Result<U256, VenueError> {
    let product = a
        .checked_mul(b)
        .ok_or_else(|| VenueError::InvalidAmount("amount overflows pricing".into()))?;
    let quotient = product
        .checked_div(denominator)
        .ok_or_else(|| VenueError::InvalidAmount("zero denominator".into()))?;
    if (product % denominator).is_zero() {
        Ok(quotient)
    } else {
        Ok(quotient + U256::from(1u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::InMemoryLedger;

    fn manager_addr() -> Address {
        Address::repeat_byte(0x22)
    }

    fn token() -> Address {
        Address::repeat_byte(0x70)
    }

    fn trader() -> Address {
        Address::repeat_byte(0xa1)
    }

    fn ether(n: u64) -> U256 {
        U256::from(n) * PRICE_SCALE
    }

    /// 0.001 native per token, 1% manager fee, 1 000 000 tokens in stock.
    fn setup() -> (FixedRateManager, InMemoryLedger) {
        let manager = FixedRateManager::new(manager_addr(), 2, 100)
            .unwrap()
            .with_token(token(), PRICE_SCALE / U256::from(1_000u64))
            .unwrap();
        let mut ledger = InMemoryLedger::new();
        ledger.mint_token(token(), manager_addr(), ether(1_000_000)).unwrap();
        ledger.credit_native(trader(), ether(10)).unwrap();
        (manager, ledger)
    }

    #[test]
    fn exact_tokens_quote_adds_fee_on_top() {
        let (manager, ledger) = setup();
        let quote = manager
            .quote_buy(&ledger, token(), BuyAmount::ExactTokens(ether(1_000)))
            .unwrap();
        assert_eq!(quote.cost, ether(1));
        assert_eq!(quote.manager_fee, ether(1) / U256::from(100u64));
        assert_eq!(quote.funds, quote.cost + quote.manager_fee);
    }

    #[test]
    fn funds_quote_never_exceeds_budget() {
        let (manager, ledger) = setup();
        let funds = U256::from(123_456_789_012_345u64);
        let quote = manager
            .quote_buy(&ledger, token(), BuyAmount::Funds(funds))
            .unwrap();
        assert!(quote.funds <= funds);
        assert!(!quote.token_amount.is_zero());
    }

    #[test]
    fn exact_tokens_funds_buy_at_least_those_tokens() {
        let (manager, ledger) = setup();
        for amount in [ether(1_000), U256::from(1_234_567_891_234_567_891u64)] {
            let exact = manager
                .quote_buy(&ledger, token(), BuyAmount::ExactTokens(amount))
                .unwrap();
            let fill = manager
                .quote_buy(&ledger, token(), BuyAmount::Funds(exact.funds))
                .unwrap();
            assert!(fill.token_amount >= amount);
            assert!(fill.funds <= exact.funds);
        }
    }

    #[test]
    fn buy_is_capped_by_inventory() {
        let (manager, mut ledger) = setup();
        ledger
            .transfer_token(token(), manager_addr(), trader(), ether(999_999))
            .unwrap();
        let fill = manager
            .buy(&mut ledger, trader(), trader(), token(), ether(1))
            .unwrap();
        assert_eq!(fill.amount, ether(1));
        assert!(fill.funds_used < ether(1));
        assert_eq!(ledger.token_balance(token(), manager_addr()), U256::ZERO);
    }

    #[test]
    fn sell_requires_allowance_and_leaves_no_trace_on_failure() {
        let (manager, mut ledger) = setup();
        manager
            .buy(&mut ledger, trader(), trader(), token(), ether(1))
            .unwrap();
        let held = ledger.token_balance(token(), trader());
        let native = ledger.native_balance(trader());

        let err = manager
            .sell(&mut ledger, trader(), trader(), token(), held)
            .unwrap_err();
        assert!(matches!(err, VenueError::Ledger(_)));
        assert_eq!(ledger.token_balance(token(), trader()), held);

        ledger.approve(token(), trader(), manager_addr(), held).unwrap();
        let funds = manager
            .sell(&mut ledger, trader(), trader(), token(), held)
            .unwrap();
        assert_eq!(ledger.native_balance(trader()), native + funds);
        assert_eq!(ledger.token_balance(token(), trader()), U256::ZERO);
    }

    #[test]
    fn unknown_token_is_not_managed() {
        let (manager, ledger) = setup();
        let other = Address::repeat_byte(0x71);
        let err = manager
            .quote_sell(&ledger, other, U256::from(1u64))
            .unwrap_err();
        assert_eq!(
            err,
            VenueError::NotManaged {
                manager: manager_addr(),
                token: other
            }
        );
    }

    #[test]
    fn rejects_fee_that_swallows_trade() {
        assert!(FixedRateManager::new(manager_addr(), 2, 10_000).is_err());
    }
}
