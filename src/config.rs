// Configuration management module
// This file handles loading of the service settings from an optional config
// file and APP__* environment variables, and of the sandbox genesis document
//
// Numan Thabit 2025 Nov

use crate::router::{RouterSettings, SUPPORTED_MANAGER_VERSION};
use crate::state::FeeRate;
use alloy_primitives::{Address, U256};
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Address the HTTP API binds to
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,
    /// Ledger account the router holds funds in transit on
    pub router_address: Address,
    /// Owner allowed to change the fee configuration
    pub owner: Address,
    pub fee_recipient: Address,
    /// Fee rate in whole percent, at most 5
    #[serde(default = "default_fee_rate")]
    pub fee_rate: u32,
    /// Token manager registry
    pub registry_address: Address,
    #[serde(default = "default_manager_version")]
    pub supported_manager_version: u32,
    /// Pairing currency; the zero address is native
    #[serde(default)]
    pub base_currency: Address,
    /// Sandbox genesis YAML (optional; empty sandbox when absent)
    pub genesis_path: Option<PathBuf>,
    /// Concurrency control
    #[serde(default = "default_max_inflight")]
    pub max_inflight: usize,
    /// Requests admitted per second (defaults to 200)
    pub rate_per_sec: Option<u32>,
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

fn default_fee_rate() -> u32 {
    1
}

fn default_manager_version() -> u32 {
    SUPPORTED_MANAGER_VERSION
}

fn default_max_inflight() -> usize {
    64
}

impl AppConfig {
    /// Load `fee-router.{yaml,toml,json}` if present, then `APP__*` overrides.
    pub fn load() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::File::with_name("fee-router").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        Ok(cfg.try_deserialize()?)
    }

    pub fn from_yaml(source: &str) -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Yaml))
            .build()?;
        Ok(cfg.try_deserialize()?)
    }

    pub fn router_settings(&self) -> Result<RouterSettings> {
        for (name, address) in [
            ("router_address", self.router_address),
            ("owner", self.owner),
            ("fee_recipient", self.fee_recipient),
            ("registry_address", self.registry_address),
        ] {
            if address == Address::ZERO {
                bail!("{name} must not be the zero address");
            }
        }
        let fee_rate = FeeRate::new(self.fee_rate);
        if !fee_rate.is_allowed() {
            bail!("fee_rate {fee_rate} exceeds {}", FeeRate::MAX);
        }
        Ok(RouterSettings {
            account: self.router_address,
            owner: self.owner,
            fee_rate,
            fee_recipient: self.fee_recipient,
            base_currency: self.base_currency,
            supported_manager_version: self.supported_manager_version,
        })
    }

    pub fn load_genesis(&self) -> Result<Genesis> {
        match &self.genesis_path {
            Some(path) => Genesis::load(path),
            None => Ok(Genesis::default()),
        }
    }
}

/// Initial sandbox state.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Genesis {
    #[serde(default)]
    pub accounts: Vec<GenesisAccount>,
    #[serde(default)]
    pub managers: Vec<GenesisManager>,
    #[serde(default)]
    pub tokens: Vec<GenesisToken>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenesisAccount {
    pub address: Address,
    #[serde(default)]
    pub native: U256,
    /// Refuse incoming native transfers
    #[serde(default)]
    pub rejects_native: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenesisManager {
    pub address: Address,
    pub version: u32,
    #[serde(default)]
    pub trading_fee_bps: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenesisToken {
    pub address: Address,
    pub manager: Address,
    #[serde(default)]
    pub quote: Address,
    /// Native base units per whole token
    pub price: U256,
    /// Tokens minted to the manager
    pub inventory: U256,
    #[serde(default)]
    pub listed: bool,
    #[serde(default)]
    pub launch_time: u64,
    #[serde(default)]
    pub max_funds: U256,
}

impl Genesis {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read genesis file {}", path.display()))?;
        Self::from_yaml(&raw).with_context(|| format!("parse genesis file {}", path.display()))
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(raw)?)
    }
}
