// Quote estimator
// Dry-run buy and sell quotes. Pricing is delegated to the manager that
// launched the token; the router only adds the fee it would charge. Nothing
// here writes to the ledger, so repeated calls with the same inputs agree.
//
// Numan Thabit 2025 Nov

use super::quotes::{BuyQuote, SellQuote};
use crate::errors::RouterError;
use crate::ledger::Ledger;
use crate::metrics::{QUOTE_LATENCY, REJECTIONS};
use crate::state::FeeConfig;
use crate::venues::{BuyAmount, Venues};
use alloy_primitives::{Address, U256};
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct Estimator {
    venues: Venues,
}

impl Estimator {
    pub fn new(venues: Venues) -> Self {
        Self { venues }
    }

    /// Quote a buy. A nonzero `token_amount` asks for the payment that buys
    /// at least that many tokens once the router fee is taken; otherwise
    /// `bnb_amount` is quoted as the gross payment, router fee not deducted.
    #[tracing::instrument(skip_all, fields(token = %token))]
    pub fn try_buy(
        &self,
        ledger: &dyn Ledger,
        fee: &FeeConfig,
        token: Address,
        token_amount: U256,
        bnb_amount: U256,
    ) -> Result<BuyQuote, RouterError> {
        let _timer = QUOTE_LATENCY.with_label_values(&["buy"]).start_timer();
        let result = self.quote_buy(ledger, fee, token, token_amount, bnb_amount);
        if let Err(err) = &result {
            REJECTIONS.with_label_values(&["try_buy", err.code()]).inc();
            warn!(error = %err, "buy quote failed");
        }
        result
    }

    fn quote_buy(
        &self,
        ledger: &dyn Ledger,
        fee: &FeeConfig,
        token: Address,
        token_amount: U256,
        bnb_amount: U256,
    ) -> Result<BuyQuote, RouterError> {
        let amount = if !token_amount.is_zero() {
            BuyAmount::ExactTokens(token_amount)
        } else if !bnb_amount.is_zero() {
            BuyAmount::Funds(bnb_amount)
        } else {
            return Err(RouterError::ZeroAmount);
        };

        let (info, manager) = self.venues.resolve(token)?;
        let quote = manager.quote_buy(ledger, token, amount)?;
        // Exact-token quotes gross the manager funds up so that the payment
        // still covers them after the router fee.
        let payment = match amount {
            BuyAmount::ExactTokens(_) => fee.gross_for_net(quote.funds)?,
            BuyAmount::Funds(funds) => funds,
        };
        let router_fee = fee.split(payment)?.fee;

        debug!(
            manager = %manager.address(),
            estimated_amount = %quote.token_amount,
            manager_funds = %quote.funds,
            %payment,
            %router_fee,
            "buy quoted"
        );
        Ok(BuyQuote {
            token,
            token_manager: manager.address(),
            manager_version: info.manager.version,
            quote: info.quote,
            estimated_amount: quote.token_amount,
            manager_funds: quote.funds,
            manager_cost: quote.cost,
            manager_fee: quote.manager_fee,
            payment,
            router_fee,
        })
    }

    /// Quote the native proceeds of selling `token_amount`, before and after
    /// the router fee.
    #[tracing::instrument(skip_all, fields(token = %token))]
    pub fn try_sell(
        &self,
        ledger: &dyn Ledger,
        fee: &FeeConfig,
        token: Address,
        token_amount: U256,
    ) -> Result<SellQuote, RouterError> {
        let _timer = QUOTE_LATENCY.with_label_values(&["sell"]).start_timer();
        let result = self.quote_sell(ledger, fee, token, token_amount);
        if let Err(err) = &result {
            REJECTIONS.with_label_values(&["try_sell", err.code()]).inc();
            warn!(error = %err, "sell quote failed");
        }
        result
    }

    fn quote_sell(
        &self,
        ledger: &dyn Ledger,
        fee: &FeeConfig,
        token: Address,
        token_amount: U256,
    ) -> Result<SellQuote, RouterError> {
        if token_amount.is_zero() {
            return Err(RouterError::ZeroAmount);
        }
        let (info, manager) = self.venues.resolve(token)?;
        let quote = manager.quote_sell(ledger, token, token_amount)?;
        let split = fee.split(quote.funds)?;

        debug!(
            manager = %manager.address(),
            funds = %quote.funds,
            router_fee = %split.fee,
            "sell quoted"
        );
        Ok(SellQuote {
            token,
            token_manager: manager.address(),
            manager_version: info.manager.version,
            token_amount,
            funds: quote.funds,
            manager_fee: quote.manager_fee,
            router_fee: split.fee,
            net_funds: split.net,
        })
    }
}
