// Sandbox host
// A router and the in-memory ledger it settles against, assembled from a
// genesis document. The HTTP service shares one sandbox behind an async
// mutex so operations run one at a time.
//
// Numan Thabit 2025 Nov

use crate::config::Genesis;
use crate::errors::{LedgerError, RouterError};
use crate::ledger::{InMemoryLedger, Ledger};
use crate::router::{BuyQuote, BuyReceipt, Router, RouterSettings, SellQuote, SellReceipt};
use crate::venues::{
    FixedRateManager, ManagerDirectory, RegistryTokenInfo, StaticRegistry, TokenManagerRef,
    Venues,
};
use alloy_primitives::{Address, U256};
use anyhow::{anyhow, bail, Context, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

pub type SharedSandbox = Arc<Mutex<Sandbox>>;

#[derive(Debug)]
pub struct Sandbox {
    pub router: Router,
    pub ledger: InMemoryLedger,
}

impl Sandbox {
    pub fn new(router: Router, ledger: InMemoryLedger) -> Self {
        Self { router, ledger }
    }

    pub fn from_genesis(
        settings: RouterSettings,
        registry_address: Address,
        genesis: &Genesis,
    ) -> Result<Self> {
        if registry_address == Address::ZERO {
            bail!("registry address must not be the zero address");
        }

        let mut managers: HashMap<Address, (FixedRateManager, TokenManagerRef)> = HashMap::new();
        for m in &genesis.managers {
            let manager = FixedRateManager::new(m.address, m.version, m.trading_fee_bps)
                .with_context(|| format!("manager {}", m.address))?;
            let reference = TokenManagerRef {
                address: m.address,
                version: m.version,
            };
            if managers.insert(m.address, (manager, reference)).is_some() {
                bail!("manager {} declared twice", m.address);
            }
        }

        let mut registry = StaticRegistry::new(registry_address);
        let mut ledger = InMemoryLedger::new();
        for t in &genesis.tokens {
            let (manager, reference) = managers
                .remove(&t.manager)
                .ok_or_else(|| anyhow!("token {} names unknown manager {}", t.address, t.manager))?;
            let manager = manager
                .with_token(t.address, t.price)
                .with_context(|| format!("token {}", t.address))?;
            registry.insert(
                t.address,
                RegistryTokenInfo {
                    manager: reference,
                    quote: t.quote,
                    last_price: t.price,
                    trading_fee_bps: manager.trading_fee_bps(),
                    launch_time: t.launch_time,
                    offers: t.inventory,
                    max_offers: t.inventory,
                    funds: U256::ZERO,
                    max_funds: t.max_funds,
                    liquidity_added: t.listed,
                },
            );
            registry.set_listed(t.address, t.listed);
            ledger.mint_token(t.address, t.manager, t.inventory)?;
            managers.insert(t.manager, (manager, reference));
        }

        for account in &genesis.accounts {
            ledger.credit_native(account.address, account.native)?;
            if account.rejects_native {
                ledger.reject_native_transfers_to(account.address);
            }
        }

        let mut directory = ManagerDirectory::new();
        for (manager, reference) in managers.into_values() {
            if directory.register(Arc::new(manager)).is_some() {
                bail!("two managers declared for version {}", reference.version);
            }
        }

        let registry = Arc::new(registry);
        let venues = Venues::new(registry.clone(), registry, directory);
        let router = Router::new(settings, venues).context("construct router")?;
        info!(
            accounts = genesis.accounts.len(),
            managers = genesis.managers.len(),
            tokens = genesis.tokens.len(),
            "sandbox genesis applied"
        );
        Ok(Self::new(router, ledger))
    }

    pub fn into_shared(self) -> SharedSandbox {
        Arc::new(Mutex::new(self))
    }

    pub fn try_buy(
        &self,
        token: Address,
        token_amount: U256,
        bnb_amount: U256,
    ) -> Result<BuyQuote, RouterError> {
        self.router
            .try_buy(&self.ledger, token, token_amount, bnb_amount)
    }

    pub fn try_sell(&self, token: Address, token_amount: U256) -> Result<SellQuote, RouterError> {
        self.router.try_sell(&self.ledger, token, token_amount)
    }

    pub fn buy(
        &mut self,
        caller: Address,
        token: Address,
        min_amount: U256,
        payment: U256,
    ) -> Result<BuyReceipt, RouterError> {
        self.router
            .buy_token_with_fee(&mut self.ledger, caller, token, min_amount, payment)
    }

    pub fn sell(
        &mut self,
        caller: Address,
        token: Address,
        token_amount: U256,
        min_funds: U256,
    ) -> Result<SellReceipt, RouterError> {
        self.router
            .sell_token_with_fee(&mut self.ledger, caller, token, token_amount, min_funds)
    }

    /// Grant `spender` an allowance over `owner`'s tokens.
    pub fn approve(
        &mut self,
        owner: Address,
        token: Address,
        spender: Address,
        amount: U256,
    ) -> Result<(), LedgerError> {
        self.ledger.approve(token, owner, spender, amount)
    }

    pub fn native_balance(&self, account: Address) -> U256 {
        self.ledger.native_balance(account)
    }

    pub fn token_balance(&self, token: Address, account: Address) -> U256 {
        self.ledger.token_balance(token, account)
    }
}
