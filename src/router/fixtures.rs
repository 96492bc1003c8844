// Shared unit-test fixtures for the router components

use crate::ledger::{InMemoryLedger, Ledger};
use crate::venues::{
    FixedRateManager, ManagerDirectory, RegistryTokenInfo, StaticRegistry, TokenManagerRef,
    Venues, PRICE_SCALE,
};
use alloy_primitives::{Address, U256};
use std::sync::Arc;

pub const V2_MANAGER: Address = Address::repeat_byte(0x22);
pub const V1_MANAGER: Address = Address::repeat_byte(0x11);
pub const REGISTRY: Address = Address::repeat_byte(0x33);
pub const ROUTER: Address = Address::repeat_byte(0x44);
pub const OWNER: Address = Address::repeat_byte(0x01);
pub const RECIPIENT: Address = Address::repeat_byte(0x02);
pub const TRADER: Address = Address::repeat_byte(0xa1);

/// Native pair, v2 manager, not listed.
pub const GOOD: Address = Address::repeat_byte(0x70);
/// Paired against another token.
pub const FOREIGN: Address = Address::repeat_byte(0x71);
/// Already listed on the external exchange.
pub const LISTED: Address = Address::repeat_byte(0x72);
/// Launched by the v1 manager.
pub const LEGACY: Address = Address::repeat_byte(0x73);

pub fn ether(n: u64) -> U256 {
    U256::from(n) * PRICE_SCALE
}

fn info(manager: TokenManagerRef, quote: Address) -> RegistryTokenInfo {
    RegistryTokenInfo {
        manager,
        quote,
        last_price: PRICE_SCALE / U256::from(1_000u64),
        trading_fee_bps: 100,
        launch_time: 1_700_000_000,
        offers: ether(1_000_000),
        max_offers: ether(1_000_000),
        funds: U256::ZERO,
        max_funds: ether(24),
        liquidity_added: false,
    }
}

pub fn venues() -> Venues {
    let price = PRICE_SCALE / U256::from(1_000u64);
    let v2_ref = TokenManagerRef {
        address: V2_MANAGER,
        version: 2,
    };
    let v1_ref = TokenManagerRef {
        address: V1_MANAGER,
        version: 1,
    };

    let mut registry = StaticRegistry::new(REGISTRY);
    registry.insert(GOOD, info(v2_ref, Address::ZERO));
    registry.insert(FOREIGN, info(v2_ref, Address::repeat_byte(0x55)));
    registry.insert(LISTED, info(v2_ref, Address::ZERO));
    registry.insert(LEGACY, info(v1_ref, Address::ZERO));
    registry.set_listed(LISTED, true);
    let registry = Arc::new(registry);

    let mut managers = ManagerDirectory::new();
    let mut v2 = FixedRateManager::new(V2_MANAGER, 2, 100).unwrap();
    for token in [GOOD, FOREIGN, LISTED] {
        v2 = v2.with_token(token, price).unwrap();
    }
    managers.register(Arc::new(v2));
    let v1 = FixedRateManager::new(V1_MANAGER, 1, 100)
        .unwrap()
        .with_token(LEGACY, price)
        .unwrap();
    managers.register(Arc::new(v1));

    Venues::new(registry.clone(), registry, managers)
}

pub fn ledger() -> InMemoryLedger {
    let mut ledger = InMemoryLedger::new();
    for token in [GOOD, FOREIGN, LISTED] {
        ledger.mint_token(token, V2_MANAGER, ether(1_000_000)).unwrap();
    }
    ledger.mint_token(LEGACY, V1_MANAGER, ether(1_000_000)).unwrap();
    ledger.credit_native(TRADER, ether(100)).unwrap();
    ledger
}

/// Every native and token balance the router flows can touch.
pub fn snapshot(ledger: &InMemoryLedger, token: Address) -> Vec<U256> {
    let accounts = [TRADER, ROUTER, RECIPIENT, V2_MANAGER];
    let mut balances: Vec<U256> = accounts.iter().map(|a| ledger.native_balance(*a)).collect();
    balances.extend(accounts.iter().map(|a| ledger.token_balance(token, *a)));
    balances.push(ledger.token_allowance(token, TRADER, V2_MANAGER));
    balances
}
