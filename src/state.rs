// Router state: fee configuration and owner access control
//
// FeeConfig is the only mutable state the router owns. Every mutation goes
// through the owner guard and re-validates the fee invariants before
// anything is written.
//
// Numan Thabit 2025 Nov

use crate::errors::RouterError;
use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

/// Denominator for basis-point arithmetic (10 000 bp = 100%).
pub const BPS_DENOMINATOR: u32 = 10_000;

/// Fee rate expressed in whole percent (1 = 1% = 100 bp).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeeRate(u32);

impl FeeRate {
    pub const ZERO: Self = Self(0);
    /// Upper bound accepted by `set_fee`: 5%.
    pub const MAX: Self = Self(5);

    pub const fn new(percent: u32) -> Self {
        Self(percent)
    }

    pub const fn percent(&self) -> u32 {
        self.0
    }

    /// Basis-point equivalent of this rate. Saturates instead of wrapping so
    /// that an out-of-range request still compares as too high.
    pub const fn basis_points(&self) -> u32 {
        self.0.saturating_mul(100)
    }

    pub const fn is_allowed(&self) -> bool {
        self.0 <= Self::MAX.0
    }
}

impl fmt::Display for FeeRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Result of skimming the router fee off an amount. `fee + net == gross`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeeSplit {
    pub gross: U256,
    pub fee: U256,
    pub net: U256,
}

/// Fee rate and recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeeConfig {
    rate: FeeRate,
    recipient: Address,
}

impl FeeConfig {
    /// Build a config, enforcing the rate bound first and then the recipient.
    pub fn new(rate: FeeRate, recipient: Address) -> Result<Self, RouterError> {
        if !rate.is_allowed() {
            return Err(RouterError::FeeTooHigh);
        }
        if recipient == Address::ZERO {
            return Err(RouterError::ZeroAddress);
        }
        Ok(Self { rate, recipient })
    }

    pub fn rate(&self) -> FeeRate {
        self.rate
    }

    pub fn recipient(&self) -> Address {
        self.recipient
    }

    /// `fee = amount * bps / 10_000` (rounded down), `net = amount - fee`.
    pub fn split(&self, amount: U256) -> Result<FeeSplit, RouterError> {
        let fee = amount
            .checked_mul(U256::from(self.rate.basis_points()))
            .ok_or(RouterError::Arithmetic("fee multiplication overflow"))?
            .checked_div(U256::from(BPS_DENOMINATOR))
            .ok_or(RouterError::Arithmetic("fee division by zero"))?;
        let net = amount
            .checked_sub(fee)
            .ok_or(RouterError::Arithmetic("fee exceeds amount"))?;
        Ok(FeeSplit {
            gross: amount,
            fee,
            net,
        })
    }

    /// Gross amount whose split leaves at least `net`:
    /// `ceil(net * 10_000 / (10_000 - bps))`.
    pub fn gross_for_net(&self, net: U256) -> Result<U256, RouterError> {
        let denominator = U256::from(BPS_DENOMINATOR);
        let kept = denominator
            .checked_sub(U256::from(self.rate.basis_points()))
            .filter(|kept| !kept.is_zero())
            .ok_or(RouterError::Arithmetic("fee consumes the whole amount"))?;
        let scaled = net
            .checked_mul(denominator)
            .ok_or(RouterError::Arithmetic("gross-up multiplication overflow"))?;
        let gross = scaled / kept;
        if (scaled % kept).is_zero() {
            Ok(gross)
        } else {
            Ok(gross + U256::from(1u64))
        }
    }
}

/// Single-owner access guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ownership {
    owner: Address,
}

impl Ownership {
    pub fn new(owner: Address) -> Result<Self, RouterError> {
        if owner == Address::ZERO {
            return Err(RouterError::ZeroAddress);
        }
        Ok(Self { owner })
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn require_owner(&self, caller: Address) -> Result<(), RouterError> {
        if caller == self.owner {
            Ok(())
        } else {
            Err(RouterError::Unauthorized)
        }
    }
}

/// Everything the router persists between calls.
#[derive(Debug, Clone)]
pub struct RouterState {
    ownership: Ownership,
    fee: FeeConfig,
}

impl RouterState {
    pub fn new(owner: Address, fee: FeeConfig) -> Result<Self, RouterError> {
        Ok(Self {
            ownership: Ownership::new(owner)?,
            fee,
        })
    }

    pub fn owner(&self) -> Address {
        self.ownership.owner()
    }

    /// Snapshot of the current fee configuration.
    pub fn fee(&self) -> FeeConfig {
        self.fee
    }

    /// Replace rate and recipient. Checks run in a fixed order: owner, rate
    /// bound, recipient. Nothing is written unless all pass.
    pub fn set_fee(
        &mut self,
        caller: Address,
        rate: FeeRate,
        recipient: Address,
    ) -> Result<(), RouterError> {
        self.ownership.require_owner(caller)?;
        let updated = FeeConfig::new(rate, recipient)?;
        let previous = std::mem::replace(&mut self.fee, updated);
        info!(
            caller = %caller,
            old_rate = %previous.rate,
            new_rate = %updated.rate,
            recipient = %updated.recipient,
            "fee configuration updated"
        );
        Ok(())
    }

    pub fn transfer_ownership(
        &mut self,
        caller: Address,
        new_owner: Address,
    ) -> Result<(), RouterError> {
        self.ownership.require_owner(caller)?;
        self.ownership = Ownership::new(new_owner)?;
        info!(previous = %caller, owner = %new_owner, "ownership transferred");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> Address {
        Address::repeat_byte(0x01)
    }

    fn recipient() -> Address {
        Address::repeat_byte(0x02)
    }

    fn state() -> RouterState {
        let fee = FeeConfig::new(FeeRate::new(1), recipient()).unwrap();
        RouterState::new(owner(), fee).unwrap()
    }

    #[test]
    fn fee_rate_bounds() {
        assert!(FeeRate::new(5).is_allowed());
        assert!(!FeeRate::new(6).is_allowed());
        assert_eq!(FeeRate::new(5).basis_points(), 500);
        assert_eq!(FeeRate::new(u32::MAX).basis_points(), u32::MAX);
    }

    #[test]
    fn split_rounds_down_and_conserves() {
        let fee = FeeConfig::new(FeeRate::new(1), recipient()).unwrap();
        let split = fee.split(U256::from(1_010u64)).unwrap();
        assert_eq!(split.fee, U256::from(10u64));
        assert_eq!(split.net, U256::from(1_000u64));

        let tiny = fee.split(U256::from(99u64)).unwrap();
        assert_eq!(tiny.fee, U256::ZERO);
        assert_eq!(tiny.fee + tiny.net, U256::from(99u64));
    }

    #[test]
    fn split_overflow_fails_closed() {
        let fee = FeeConfig::new(FeeRate::new(5), recipient()).unwrap();
        assert_eq!(
            fee.split(U256::MAX),
            Err(RouterError::Arithmetic("fee multiplication overflow"))
        );
    }

    #[test]
    fn gross_up_nets_at_least_the_target() {
        for rate in 0..=5 {
            let fee = FeeConfig::new(FeeRate::new(rate), recipient()).unwrap();
            for net in [1u64, 99, 1_010, 1_246_913_570_146_913] {
                let net = U256::from(net);
                let gross = fee.gross_for_net(net).unwrap();
                assert!(fee.split(gross).unwrap().net >= net);
            }
        }
        let fee = FeeConfig::new(FeeRate::new(1), recipient()).unwrap();
        assert_eq!(
            fee.gross_for_net(U256::MAX),
            Err(RouterError::Arithmetic("gross-up multiplication overflow"))
        );
    }

    #[test]
    fn zero_rate_charges_nothing() {
        let fee = FeeConfig::new(FeeRate::ZERO, recipient()).unwrap();
        let split = fee.split(U256::from(12_345u64)).unwrap();
        assert_eq!(split.fee, U256::ZERO);
        assert_eq!(split.net, U256::from(12_345u64));
    }

    #[test]
    fn set_fee_checks_owner_first() {
        let mut s = state();
        // Every argument is invalid; the owner check must win.
        let err = s
            .set_fee(recipient(), FeeRate::new(50), Address::ZERO)
            .unwrap_err();
        assert_eq!(err, RouterError::Unauthorized);
        assert_eq!(s.fee().rate(), FeeRate::new(1));
    }

    #[test]
    fn set_fee_checks_rate_before_recipient() {
        let mut s = state();
        let err = s.set_fee(owner(), FeeRate::new(6), Address::ZERO).unwrap_err();
        assert_eq!(err, RouterError::FeeTooHigh);
        let err = s.set_fee(owner(), FeeRate::new(1), Address::ZERO).unwrap_err();
        assert_eq!(err, RouterError::ZeroAddress);
        assert_eq!(s.fee().recipient(), recipient());
    }

    #[test]
    fn set_fee_applies_both_fields() {
        let mut s = state();
        let next = Address::repeat_byte(0x03);
        s.set_fee(owner(), FeeRate::new(3), next).unwrap();
        assert_eq!(s.fee().rate(), FeeRate::new(3));
        assert_eq!(s.fee().recipient(), next);
    }

    #[test]
    fn ownership_transfer() {
        let mut s = state();
        let next = Address::repeat_byte(0x04);
        assert_eq!(
            s.transfer_ownership(owner(), Address::ZERO),
            Err(RouterError::ZeroAddress)
        );
        s.transfer_ownership(owner(), next).unwrap();
        assert_eq!(s.owner(), next);
        assert_eq!(
            s.set_fee(owner(), FeeRate::new(2), recipient()),
            Err(RouterError::Unauthorized)
        );
        s.set_fee(next, FeeRate::new(2), recipient()).unwrap();
    }
}
