mod common;

use alloy_primitives::{Address, U256};
use common::*;
use fee_router::errors::RouterError;
use fee_router::state::{FeeConfig, FeeRate, RouterState};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn fee_split_conserves_amount(amount in any::<u128>(), rate in 0u32..=5) {
        let fee = FeeConfig::new(FeeRate::new(rate), RECIPIENT).unwrap();
        let amount = U256::from(amount);
        let split = fee.split(amount).unwrap();
        prop_assert_eq!(split.fee + split.net, amount);
        prop_assert!(split.fee * U256::from(100u64) <= amount * U256::from(rate));
        if !split.fee.is_zero() {
            prop_assert!(split.net < amount);
        }
    }

    #[test]
    fn set_fee_accepts_exactly_the_allowed_range(rate in 0u32..100) {
        let fee = FeeConfig::new(FeeRate::new(1), RECIPIENT).unwrap();
        let mut state = RouterState::new(OWNER, fee).unwrap();
        let result = state.set_fee(OWNER, FeeRate::new(rate), BOB);
        if rate <= 5 {
            prop_assert!(result.is_ok());
            prop_assert_eq!(state.fee().rate(), FeeRate::new(rate));
        } else {
            prop_assert_eq!(result, Err(RouterError::FeeTooHigh));
            prop_assert_eq!(state.fee().rate(), FeeRate::new(1));
        }
    }

    #[test]
    fn non_owner_never_changes_fee(caller in any::<[u8; 20]>(), rate in 0u32..=5) {
        let caller = Address::from(caller);
        prop_assume!(caller != OWNER);
        let fee = FeeConfig::new(FeeRate::new(1), RECIPIENT).unwrap();
        let mut state = RouterState::new(OWNER, fee).unwrap();
        prop_assert_eq!(
            state.set_fee(caller, FeeRate::new(rate), BOB),
            Err(RouterError::Unauthorized)
        );
        prop_assert_eq!(state.fee(), fee);
    }

    #[test]
    fn buy_honours_minimum_or_reverts(
        milli in 1u64..50_000,
        min_tokens in 0u64..2_000_000,
    ) {
        let mut sandbox = sandbox();
        let payment = ether(milli) / U256::from(1_000u64);
        let min_amount = ether(min_tokens) / U256::from(100u64);
        let before = snapshot(&sandbox, MEME);

        match sandbox.buy(ALICE, MEME, min_amount, payment) {
            Ok(receipt) => {
                prop_assert!(receipt.amount_bought >= min_amount);
                prop_assert_eq!(receipt.fee + receipt.net, payment);
                prop_assert_eq!(sandbox.token_balance(MEME, ALICE), receipt.amount_bought);
            }
            Err(RouterError::SlippageExceeded { minimum, actual }) => {
                prop_assert_eq!(minimum, min_amount);
                prop_assert!(actual < minimum);
                prop_assert_eq!(snapshot(&sandbox, MEME), before);
            }
            Err(other) => prop_assert!(false, "unexpected error {other}"),
        }
    }

    #[test]
    fn sell_honours_minimum_or_reverts(
        milli in 10u64..20_000,
        min_milli in 0u64..20_000,
    ) {
        let mut sandbox = sandbox();
        let held = sandbox
            .buy(ALICE, MEME, U256::ZERO, ether(milli) / U256::from(1_000u64))
            .unwrap()
            .amount_bought;
        sandbox.approve(ALICE, MEME, MANAGER, held).unwrap();
        let min_funds = ether(min_milli) / U256::from(1_000u64);
        let before = snapshot(&sandbox, MEME);

        match sandbox.sell(ALICE, MEME, held, min_funds) {
            Ok(receipt) => {
                prop_assert!(receipt.amount_received >= min_funds);
                prop_assert_eq!(receipt.fee + receipt.amount_received, receipt.funds);
            }
            Err(RouterError::SlippageExceeded { .. }) => {
                prop_assert_eq!(snapshot(&sandbox, MEME), before);
            }
            Err(other) => prop_assert!(false, "unexpected error {other}"),
        }
    }
}
