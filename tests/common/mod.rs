#![allow(dead_code)]

use alloy_primitives::{Address, U256};
use fee_router::config::{Genesis, GenesisAccount, GenesisManager, GenesisToken};
use fee_router::ledger::Ledger;
use fee_router::router::RouterSettings;
use fee_router::sandbox::Sandbox;
use fee_router::venues::PRICE_SCALE;

pub const OWNER: Address = Address::repeat_byte(0x01);
pub const RECIPIENT: Address = Address::repeat_byte(0x02);
pub const ROUTER: Address = Address::repeat_byte(0x44);
pub const REGISTRY: Address = Address::repeat_byte(0x33);
pub const MANAGER: Address = Address::repeat_byte(0x22);
pub const LEGACY_MANAGER: Address = Address::repeat_byte(0x11);
pub const ALICE: Address = Address::repeat_byte(0xa1);
pub const BOB: Address = Address::repeat_byte(0xb0);

/// Native pair, v2 manager, not listed.
pub const MEME: Address = Address::repeat_byte(0x70);
/// Paired against a stablecoin.
pub const USD_PAIRED: Address = Address::repeat_byte(0x71);
pub const LISTED: Address = Address::repeat_byte(0x72);
pub const LEGACY: Address = Address::repeat_byte(0x73);
pub const STABLECOIN: Address = Address::repeat_byte(0x55);

pub fn ether(n: u64) -> U256 {
    U256::from(n) * PRICE_SCALE
}

/// One whole token costs 0.001 native.
pub fn price() -> U256 {
    PRICE_SCALE / U256::from(1_000u64)
}

fn token(address: Address, manager: Address, quote: Address, listed: bool) -> GenesisToken {
    GenesisToken {
        address,
        manager,
        quote,
        price: price(),
        inventory: ether(1_000_000),
        listed,
        launch_time: 1_700_000_000,
        max_funds: ether(24),
    }
}

pub fn genesis() -> Genesis {
    Genesis {
        accounts: vec![
            GenesisAccount {
                address: ALICE,
                native: ether(100),
                rejects_native: false,
            },
            GenesisAccount {
                address: BOB,
                native: ether(100),
                rejects_native: false,
            },
        ],
        managers: vec![
            GenesisManager {
                address: MANAGER,
                version: 2,
                trading_fee_bps: 100,
            },
            GenesisManager {
                address: LEGACY_MANAGER,
                version: 1,
                trading_fee_bps: 100,
            },
        ],
        tokens: vec![
            token(MEME, MANAGER, Address::ZERO, false),
            token(USD_PAIRED, MANAGER, STABLECOIN, false),
            token(LISTED, MANAGER, Address::ZERO, true),
            token(LEGACY, LEGACY_MANAGER, Address::ZERO, false),
        ],
    }
}

pub fn settings() -> RouterSettings {
    RouterSettings::new(ROUTER, OWNER, RECIPIENT)
}

pub fn sandbox() -> Sandbox {
    Sandbox::from_genesis(settings(), REGISTRY, &genesis()).expect("sandbox genesis")
}

/// Balances every trade path can touch.
pub fn snapshot(sandbox: &Sandbox, token: Address) -> Vec<U256> {
    let accounts = [ALICE, BOB, ROUTER, RECIPIENT, MANAGER];
    let mut balances: Vec<U256> = accounts
        .iter()
        .map(|a| sandbox.ledger.native_balance(*a))
        .collect();
    balances.extend(accounts.iter().map(|a| sandbox.ledger.token_balance(token, *a)));
    balances.extend(
        [ALICE, BOB]
            .iter()
            .map(|a| sandbox.ledger.token_allowance(token, *a, MANAGER)),
    );
    balances
}
