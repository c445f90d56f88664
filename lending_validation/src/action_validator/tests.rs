use alloy::primitives::{Address, U256};

use super::{ActionValidator, ValidatorConfig};
use crate::{
    errors::ValidationError,
    test_utils::{price, reserve, units, MarketFixture, OTHER_USER, USER},
    types::{InterestRateMode, RepayAmount, UserConfiguration},
};

const COLLATERAL: u8 = 1;
const BORROWABLE: u8 = 2;
const SECOND_COLLATERAL: u8 = 3;

fn asset(id: u8) -> Address {
    Address::with_last_byte(id)
}

fn wad_units(n: u64) -> U256 {
    units(n, 18)
}

/// User holds 1000 units of COLLATERAL (LTV 80%, threshold 85%) priced 1:1,
/// BORROWABLE has 10000 units of liquidity and no debt is outstanding
fn base_market() -> (MarketFixture, UserConfiguration) {
    let mut market = MarketFixture::new();
    market
        .add_reserve(reserve(COLLATERAL, 8_000, 8_500, 18), price(1))
        .add_reserve(reserve(BORROWABLE, 7_000, 7_500, 18), price(1))
        .add_reserve(reserve(SECOND_COLLATERAL, 8_000, 8_500, 18), price(1))
        .set_claim_balance(asset(COLLATERAL), USER, wad_units(1_000))
        .set_liquidity(asset(COLLATERAL), wad_units(1_000))
        .set_liquidity(asset(BORROWABLE), wad_units(10_000));

    let mut config = UserConfiguration::default();
    config.set_using_as_collateral(COLLATERAL, true).unwrap();
    (market, config)
}

fn with_variable_debt(
    market: &mut MarketFixture,
    config: &mut UserConfiguration,
    amount: U256,
) {
    market.set_variable_debt(asset(BORROWABLE), USER, amount);
    config.set_borrowing(BORROWABLE, true).unwrap();
}

fn borrow(
    market: &MarketFixture,
    config: &UserConfiguration,
    id: u8,
    amount: U256,
    rate_mode: InterestRateMode,
) -> Result<(), ValidationError> {
    ActionValidator::validate_borrow(
        &asset(id),
        &USER,
        amount,
        rate_mode,
        &market.view(),
        config,
        &ValidatorConfig::default(),
    )
}

#[test]
fn test_inactive_reserve_rejects_every_action() {
    let (mut market, mut config) = base_market();
    with_variable_debt(&mut market, &mut config, wad_units(10));
    for id in [COLLATERAL, BORROWABLE] {
        market.reserve_mut(&asset(id)).configuration.flags.active = false;
    }
    let view = market.view();
    let inactive = Err(ValidationError::ReserveInactive);

    assert_eq!(
        ActionValidator::validate_deposit(&asset(COLLATERAL), U256::ZERO, &view),
        inactive
    );
    assert_eq!(
        ActionValidator::validate_withdraw(&asset(COLLATERAL), &USER, U256::ZERO, &view, &config),
        inactive
    );
    assert_eq!(
        borrow(&market, &config, BORROWABLE, wad_units(1), InterestRateMode::None),
        inactive
    );
    assert_eq!(
        ActionValidator::validate_repay(
            &asset(BORROWABLE),
            RepayAmount::All,
            InterestRateMode::Variable,
            &OTHER_USER,
            &USER,
            &view
        ),
        inactive
    );
    assert_eq!(
        ActionValidator::validate_swap_rate_mode(
            &asset(BORROWABLE),
            &USER,
            InterestRateMode::Variable,
            &view,
            &config
        ),
        inactive
    );
    assert_eq!(
        ActionValidator::validate_set_use_reserve_as_collateral(
            &asset(COLLATERAL),
            &USER,
            false,
            &view,
            &config
        ),
        inactive
    );
}

#[test]
fn test_unknown_reserve() {
    let (market, _) = base_market();
    let unknown = asset(42);
    assert_eq!(
        ActionValidator::validate_deposit(&unknown, U256::from(1), &market.view()),
        Err(ValidationError::UnknownReserve(unknown))
    );
}

#[test]
fn test_deposit_guards() {
    let (mut market, _) = base_market();
    assert_eq!(
        ActionValidator::validate_deposit(&asset(COLLATERAL), U256::ZERO, &market.view()),
        Err(ValidationError::ZeroAmount)
    );
    assert_eq!(
        ActionValidator::validate_deposit(&asset(COLLATERAL), wad_units(5), &market.view()),
        Ok(())
    );

    market.reserve_mut(&asset(COLLATERAL)).configuration.flags.frozen = true;
    assert_eq!(
        ActionValidator::validate_deposit(&asset(COLLATERAL), wad_units(5), &market.view()),
        Err(ValidationError::ReserveFrozen)
    );
}

#[test]
fn test_withdraw_guards() {
    let (mut market, mut config) = base_market();
    let withdraw = |market: &MarketFixture, config: &UserConfiguration, amount: U256| {
        ActionValidator::validate_withdraw(&asset(COLLATERAL), &USER, amount, &market.view(), config)
    };

    assert_eq!(withdraw(&market, &config, U256::ZERO), Err(ValidationError::ZeroAmount));
    assert_eq!(withdraw(&market, &config, wad_units(1_000)), Ok(()));

    market.set_liquidity(asset(COLLATERAL), wad_units(100));
    assert_eq!(
        withdraw(&market, &config, wad_units(101)),
        Err(ValidationError::InsufficientLiquidity)
    );

    market.set_liquidity(asset(COLLATERAL), wad_units(5_000));
    assert_eq!(
        withdraw(&market, &config, wad_units(1_001)),
        Err(ValidationError::InsufficientUserBalance)
    );

    // 800 debt: 950 * 85% / 800 is healthy, 900 * 85% / 800 is not
    with_variable_debt(&mut market, &mut config, wad_units(800));
    assert_eq!(withdraw(&market, &config, wad_units(50)), Ok(()));
    assert_eq!(
        withdraw(&market, &config, wad_units(100)),
        Err(ValidationError::CollateralDecreaseUnsafe)
    );
}

#[test]
fn test_frozen_reserve_still_allows_withdraw() {
    let (mut market, config) = base_market();
    market.reserve_mut(&asset(COLLATERAL)).configuration.flags.frozen = true;
    assert_eq!(
        ActionValidator::validate_withdraw(
            &asset(COLLATERAL),
            &USER,
            wad_units(10),
            &market.view(),
            &config
        ),
        Ok(())
    );
}

#[test]
fn test_borrow_against_single_collateral() {
    let (market, config) = base_market();

    // 799 / 80% = 998.75 <= 1000
    assert_eq!(
        borrow(&market, &config, BORROWABLE, wad_units(799), InterestRateMode::Variable),
        Ok(())
    );
    // 801 / 80% = 1001.25 > 1000
    assert_eq!(
        borrow(&market, &config, BORROWABLE, wad_units(801), InterestRateMode::Variable),
        Err(ValidationError::InsufficientCollateralForBorrow)
    );
}

#[test]
fn test_borrow_accepts_exact_collateral_boundary() {
    let (market, config) = base_market();

    // 800 / 80% = 1000 == collateral
    assert_eq!(
        borrow(&market, &config, BORROWABLE, wad_units(800), InterestRateMode::Variable),
        Ok(())
    );
    // 800 + 1 wei needs 1000.00...125 > collateral
    assert_eq!(
        borrow(
            &market,
            &config,
            BORROWABLE,
            wad_units(800) + U256::from(1),
            InterestRateMode::Variable
        ),
        Err(ValidationError::InsufficientCollateralForBorrow)
    );
}

/// Values in single base units of the reference currency, where a rounded
/// division would hide the sub-unit shortfall
#[test]
fn test_borrow_rejects_sub_unit_collateral_shortfall() {
    let mut market = MarketFixture::new();
    market
        .add_reserve(reserve(COLLATERAL, 8_000, 8_500, 0), U256::from(1))
        .add_reserve(reserve(BORROWABLE, 7_000, 7_500, 0), U256::from(1))
        .set_claim_balance(asset(COLLATERAL), USER, U256::from(1_001))
        .set_liquidity(asset(BORROWABLE), U256::from(10_000));
    let mut config = UserConfiguration::default();
    config.set_using_as_collateral(COLLATERAL, true).unwrap();

    // 801 / 80% = 1001.25 > 1001
    assert_eq!(
        borrow(&market, &config, BORROWABLE, U256::from(801), InterestRateMode::Variable),
        Err(ValidationError::InsufficientCollateralForBorrow)
    );
    // 800 / 80% = 1000 <= 1001
    assert_eq!(
        borrow(&market, &config, BORROWABLE, U256::from(800), InterestRateMode::Variable),
        Ok(())
    );

    // 1000 collateral: 800 is exactly enough
    market.set_claim_balance(asset(COLLATERAL), USER, U256::from(1_000));
    assert_eq!(
        borrow(&market, &config, BORROWABLE, U256::from(800), InterestRateMode::Variable),
        Ok(())
    );
}

#[test]
fn test_borrow_counts_existing_debt() {
    let (mut market, mut config) = base_market();
    with_variable_debt(&mut market, &mut config, wad_units(500));

    assert_eq!(
        borrow(&market, &config, BORROWABLE, wad_units(300), InterestRateMode::Variable),
        Ok(())
    );
    assert_eq!(
        borrow(&market, &config, BORROWABLE, wad_units(301), InterestRateMode::Variable),
        Err(ValidationError::InsufficientCollateralForBorrow)
    );
}

#[test]
fn test_borrow_reserve_guards() {
    let (mut market, config) = base_market();
    let amount = wad_units(10);

    assert_eq!(
        borrow(&market, &config, BORROWABLE, U256::ZERO, InterestRateMode::Variable),
        Err(ValidationError::ZeroAmount)
    );
    assert_eq!(
        borrow(&market, &config, BORROWABLE, amount, InterestRateMode::None),
        Err(ValidationError::InvalidRateMode)
    );
    assert_eq!(
        borrow(&market, &config, BORROWABLE, wad_units(10_001), InterestRateMode::Variable),
        Err(ValidationError::InsufficientLiquidity)
    );

    market
        .reserve_mut(&asset(BORROWABLE))
        .configuration
        .flags
        .borrowing_enabled = false;
    assert_eq!(
        borrow(&market, &config, BORROWABLE, amount, InterestRateMode::Variable),
        Err(ValidationError::BorrowingDisabled)
    );

    market.reserve_mut(&asset(BORROWABLE)).configuration.flags.frozen = true;
    assert_eq!(
        borrow(&market, &config, BORROWABLE, amount, InterestRateMode::Variable),
        Err(ValidationError::ReserveFrozen)
    );
}

#[test]
fn test_borrow_requires_collateral_and_health() {
    let (mut market, mut config) = base_market();

    assert_eq!(
        borrow(
            &market,
            &UserConfiguration::default(),
            BORROWABLE,
            wad_units(1),
            InterestRateMode::Variable
        ),
        Err(ValidationError::NoCollateral)
    );

    // 1000 * 85% / 850 = 1.0, not strictly above the threshold
    with_variable_debt(&mut market, &mut config, wad_units(850));
    assert_eq!(
        borrow(&market, &config, BORROWABLE, wad_units(1), InterestRateMode::Variable),
        Err(ValidationError::HealthFactorTooLow)
    );
}

#[test]
fn test_borrow_against_zero_ltv_collateral() {
    let (mut market, config) = base_market();
    market.reserve_mut(&asset(COLLATERAL)).configuration.ltv = 0;

    assert_eq!(
        borrow(&market, &config, BORROWABLE, wad_units(1), InterestRateMode::Variable),
        Err(ValidationError::InsufficientCollateralForBorrow)
    );
}

/// COLLATERAL holds a 100 unit deposit with 1000 units of liquidity,
/// SECOND_COLLATERAL backs the loans with 10000 units
fn stable_market() -> (MarketFixture, UserConfiguration) {
    let (mut market, mut config) = base_market();
    market
        .set_claim_balance(asset(COLLATERAL), USER, wad_units(100))
        .set_claim_balance(asset(SECOND_COLLATERAL), USER, wad_units(10_000));
    config.set_using_as_collateral(SECOND_COLLATERAL, true).unwrap();
    (market, config)
}

#[test]
fn test_stable_borrow_of_own_collateral_is_rejected() {
    let (market, config) = stable_market();

    assert_eq!(
        borrow(&market, &config, COLLATERAL, wad_units(50), InterestRateMode::Stable),
        Err(ValidationError::StableBorrowSelfCollateralAbuse)
    );
    // more than the deposit
    assert_eq!(
        borrow(&market, &config, COLLATERAL, wad_units(150), InterestRateMode::Stable),
        Ok(())
    );
    // the rule only applies to the requested stable mode
    assert_eq!(
        borrow(&market, &config, COLLATERAL, wad_units(50), InterestRateMode::Variable),
        Ok(())
    );
}

#[test]
fn test_stable_borrow_allowed_when_collateral_unflagged_or_ltv_zero() {
    let (mut market, mut config) = stable_market();

    config.set_using_as_collateral(COLLATERAL, false).unwrap();
    assert_eq!(
        borrow(&market, &config, COLLATERAL, wad_units(50), InterestRateMode::Stable),
        Ok(())
    );

    config.set_using_as_collateral(COLLATERAL, true).unwrap();
    market.reserve_mut(&asset(COLLATERAL)).configuration.ltv = 0;
    assert_eq!(
        borrow(&market, &config, COLLATERAL, wad_units(50), InterestRateMode::Stable),
        Ok(())
    );
}

#[test]
fn test_stable_borrow_size_and_flag() {
    let (mut market, config) = stable_market();

    // 25% of 1000 units of liquidity
    assert_eq!(
        borrow(&market, &config, COLLATERAL, wad_units(250), InterestRateMode::Stable),
        Ok(())
    );
    assert_eq!(
        borrow(&market, &config, COLLATERAL, wad_units(251), InterestRateMode::Stable),
        Err(ValidationError::StableLoanSizeExceeded)
    );

    market
        .reserve_mut(&asset(COLLATERAL))
        .configuration
        .flags
        .stable_rate_borrowing_enabled = false;
    assert_eq!(
        borrow(&market, &config, COLLATERAL, wad_units(150), InterestRateMode::Stable),
        Err(ValidationError::StableBorrowingDisabled)
    );
}

#[test]
fn test_repay_guards() {
    let (mut market, mut config) = base_market();
    with_variable_debt(&mut market, &mut config, wad_units(100));
    let view = market.view();
    let repay = |amount: RepayAmount, rate_mode: InterestRateMode, caller: &Address| {
        ActionValidator::validate_repay(&asset(BORROWABLE), amount, rate_mode, caller, &USER, &view)
    };

    assert_eq!(
        repay(RepayAmount::Exact(U256::ZERO), InterestRateMode::Variable, &USER),
        Err(ValidationError::ZeroAmount)
    );
    assert_eq!(
        repay(RepayAmount::All, InterestRateMode::Variable, &USER),
        Ok(())
    );
    assert_eq!(
        repay(RepayAmount::Exact(wad_units(10)), InterestRateMode::Variable, &OTHER_USER),
        Ok(())
    );
    assert_eq!(
        repay(RepayAmount::Exact(wad_units(10)), InterestRateMode::Stable, &USER),
        Err(ValidationError::NoOutstandingDebtForRateMode)
    );
    assert_eq!(
        repay(RepayAmount::Exact(wad_units(10)), InterestRateMode::None, &USER),
        Err(ValidationError::NoOutstandingDebtForRateMode)
    );
}

#[test]
fn test_repay_all_on_behalf_of_another_user_always_fails() {
    let (market, _) = base_market();
    // no debt at all
    assert_eq!(
        ActionValidator::validate_repay(
            &asset(BORROWABLE),
            RepayAmount::All,
            InterestRateMode::Stable,
            &OTHER_USER,
            &USER,
            &market.view()
        ),
        Err(ValidationError::RepayAllRequiresSelf)
    );

    let (mut market, mut config) = base_market();
    with_variable_debt(&mut market, &mut config, wad_units(100));
    market.set_stable_debt(asset(BORROWABLE), USER, wad_units(100));
    assert_eq!(
        ActionValidator::validate_repay(
            &asset(BORROWABLE),
            RepayAmount::All,
            InterestRateMode::Variable,
            &OTHER_USER,
            &USER,
            &market.view()
        ),
        Err(ValidationError::RepayAllRequiresSelf)
    );
}

#[test]
fn test_swap_rate_mode_requires_debt_of_source_mode() {
    let (mut market, mut config) = base_market();
    let swap = |market: &MarketFixture, config: &UserConfiguration, mode: InterestRateMode| {
        ActionValidator::validate_swap_rate_mode(&asset(BORROWABLE), &USER, mode, &market.view(), config)
    };

    assert_eq!(
        swap(&market, &config, InterestRateMode::Stable),
        Err(ValidationError::NoStableDebt)
    );
    assert_eq!(
        swap(&market, &config, InterestRateMode::Variable),
        Err(ValidationError::NoVariableDebt)
    );
    assert_eq!(
        swap(&market, &config, InterestRateMode::None),
        Err(ValidationError::InvalidRateMode)
    );

    with_variable_debt(&mut market, &mut config, wad_units(100));
    market.set_stable_debt(asset(BORROWABLE), USER, wad_units(100));
    assert_eq!(swap(&market, &config, InterestRateMode::Variable), Ok(()));
    assert_eq!(swap(&market, &config, InterestRateMode::Stable), Ok(()));

    market.reserve_mut(&asset(BORROWABLE)).configuration.flags.frozen = true;
    assert_eq!(
        swap(&market, &config, InterestRateMode::Stable),
        Err(ValidationError::ReserveFrozen)
    );
}

#[test]
fn test_swap_to_stable_fails_when_stable_borrowing_disabled() {
    let (mut market, mut config) = base_market();
    with_variable_debt(&mut market, &mut config, wad_units(100));
    market
        .reserve_mut(&asset(BORROWABLE))
        .configuration
        .flags
        .stable_rate_borrowing_enabled = false;

    assert_eq!(
        ActionValidator::validate_swap_rate_mode(
            &asset(BORROWABLE),
            &USER,
            InterestRateMode::Variable,
            &market.view(),
            &config
        ),
        Err(ValidationError::StableBorrowingDisabled)
    );
}

#[test]
fn test_swap_to_stable_applies_self_collateral_rule() {
    let (mut market, mut config) = stable_market();
    // variable debt in the reserve that also holds a 100 unit deposit
    market.set_variable_debt(asset(COLLATERAL), USER, wad_units(60));
    config.set_borrowing(COLLATERAL, true).unwrap();
    let swap = |market: &MarketFixture, config: &UserConfiguration| {
        ActionValidator::validate_swap_rate_mode(
            &asset(COLLATERAL),
            &USER,
            InterestRateMode::Variable,
            &market.view(),
            config,
        )
    };

    assert_eq!(
        swap(&market, &config),
        Err(ValidationError::StableBorrowSelfCollateralAbuse)
    );

    // stable + variable exceeds the deposit
    market.set_stable_debt(asset(COLLATERAL), USER, wad_units(60));
    assert_eq!(swap(&market, &config), Ok(()));
}

#[test]
fn test_set_use_reserve_as_collateral() {
    let (mut market, mut config) = base_market();
    let toggle = |market: &MarketFixture, config: &UserConfiguration, id: u8, enable: bool| {
        ActionValidator::validate_set_use_reserve_as_collateral(
            &asset(id),
            &USER,
            enable,
            &market.view(),
            config,
        )
    };

    assert_eq!(
        toggle(&market, &config, BORROWABLE, true),
        Err(ValidationError::NoCollateralBalance)
    );
    assert_eq!(toggle(&market, &config, COLLATERAL, true), Ok(()));
    assert_eq!(toggle(&market, &config, COLLATERAL, false), Ok(()));

    with_variable_debt(&mut market, &mut config, wad_units(100));
    assert_eq!(
        toggle(&market, &config, COLLATERAL, false),
        Err(ValidationError::CollateralDecreaseUnsafe)
    );
    // enabling never needs a health check
    assert_eq!(toggle(&market, &config, COLLATERAL, true), Ok(()));
}

#[test]
fn test_transfer_requires_healthy_sender() {
    let (mut market, mut config) = base_market();
    with_variable_debt(&mut market, &mut config, wad_units(850));
    assert_eq!(
        ActionValidator::validate_transfer(&USER, &market.view(), &config),
        Ok(())
    );

    market.set_claim_balance(asset(COLLATERAL), USER, wad_units(999));
    assert_eq!(
        ActionValidator::validate_transfer(&USER, &market.view(), &config),
        Err(ValidationError::TransferNotAllowed)
    );
}

#[test]
fn test_flashloan_parameters() {
    let assets = [asset(COLLATERAL), asset(BORROWABLE)];
    assert_eq!(
        ActionValidator::validate_flashloan(&assets, &[U256::from(1), U256::from(2)]),
        Ok(())
    );
    assert_eq!(
        ActionValidator::validate_flashloan(&assets, &[U256::from(1)]),
        Err(ValidationError::InconsistentFlashloanParams)
    );
    assert_eq!(
        ActionValidator::validate_flashloan(&[], &[]),
        Err(ValidationError::InconsistentFlashloanParams)
    );
}
