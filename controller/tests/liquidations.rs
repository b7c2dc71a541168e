pub mod setup;
use setup::*;

/// A solvent profile cannot be liquidated.
#[test]
#[should_panic]
fn liquidating_healthy_account_is_rejected() {
    let mut state = LendingTestState::new();

    state.deposit(SUPPLIER, USDC_TOKEN, 10_000 * USDC_UNIT);
    state.deposit(BORROWER, WEGLD_TOKEN, 10 * WEGLD_UNIT);
    state.borrow(BORROWER, USDC_TOKEN, 150 * USDC_UNIT);

    state.liquidate(LIQUIDATOR, BORROWER, USDC_TOKEN, 150 * USDC_UNIT, WEGLD_TOKEN);
}

/// Normal regime: the close factor caps a single liquidation at half the
/// profile's total debt value, regardless of the liquidator's payment.
///
/// Position: 10 WEGLD collateral, 170 USDC debt. WEGLD drops 25 -> 20 USD:
/// maintenance margin 10*20*0.75 = 150 < 170, so the profile is open.
/// A 200 USDC payment is capped at 170 * 50% = 85; the 10% bonus seizes
/// 85 * 1.1 / 20 = 4.675 WEGLD.
#[test]
fn large_debt_liquidation_is_capped_by_close_factor() {
    let mut state = LendingTestState::new();

    state.deposit(SUPPLIER, USDC_TOKEN, 10_000 * USDC_UNIT);
    state.deposit(BORROWER, WEGLD_TOKEN, 10 * WEGLD_UNIT);
    state.borrow(BORROWER, USDC_TOKEN, 170 * USDC_UNIT);

    state.set_price(WEGLD_TOKEN, 20 * WAD);

    state.liquidate(LIQUIDATOR, BORROWER, USDC_TOKEN, 200 * USDC_UNIT, WEGLD_TOKEN);

    // 85 repaid, 115 refunded.
    state.check_user_balance(LIQUIDATOR, USDC_TOKEN, 1_000_000 * USDC_UNIT - 85 * USDC_UNIT);
    assert_eq!(state.owed_amount(BORROWER, USDC_TOKEN), (85 * USDC_UNIT) as u64);

    // 4.675 WEGLD seized at the bonus rate.
    let seized = 4_675_000_000_000_000_000u128; // 4.675 * 10^18
    state.check_user_balance(LIQUIDATOR, WEGLD_TOKEN, 1_000 * WEGLD_UNIT + seized);
}

/// Dust regime: debt below the closeout threshold may be closed in full, and
/// when the bonus-adjusted closeout exceeds the collateral, the whole
/// collateral is seized against a proportional repayment.
///
/// Position: 0.06 WEGLD collateral, 1 USDC debt. WEGLD drops to 10 USD:
/// collateral value 0.6 < 1 * 1.1, so the seizure takes everything and the
/// repayment is 0.6 / 1.1 = 0.545454..., ceil-rounded to 545455 raw units.
#[test]
fn small_debt_liquidation_closes_out_against_all_collateral() {
    let mut state = LendingTestState::new();

    state.deposit(SUPPLIER, USDC_TOKEN, 10_000 * USDC_UNIT);
    state.deposit(BORROWER, WEGLD_TOKEN, 60_000_000_000_000_000u128); // 0.06 WEGLD
    state.borrow(BORROWER, USDC_TOKEN, 1 * USDC_UNIT);

    state.set_price(WEGLD_TOKEN, 10 * WAD);

    state.liquidate(LIQUIDATOR, BORROWER, USDC_TOKEN, 2 * USDC_UNIT, WEGLD_TOKEN);

    let repaid = 545_455u128;
    state.check_user_balance(LIQUIDATOR, USDC_TOKEN, 1_000_000 * USDC_UNIT - repaid);
    state.check_user_balance(
        LIQUIDATOR,
        WEGLD_TOKEN,
        1_000 * WEGLD_UNIT + 60_000_000_000_000_000u128,
    );

    // The debt is only partially closed; the remainder stays on the books.
    assert_eq!(
        state.owed_amount(BORROWER, USDC_TOKEN),
        (1 * USDC_UNIT - repaid) as u64
    );

    // All collateral gone.
    state
        .world
        .query()
        .to(CONTROLLER_ADDRESS)
        .whitebox(controller::contract_obj, |sc| {
            use controller::storage::Storage;
            assert!(sc.deposits(&BORROWER.to_managed_address(), 0u8).is_empty());
        });
}

/// The liquidatee's remaining position stays consistent: totals shed exactly
/// what the liquidation repaid and seized.
#[test]
fn liquidation_updates_reserve_totals() {
    let mut state = LendingTestState::new();

    state.deposit(SUPPLIER, USDC_TOKEN, 10_000 * USDC_UNIT);
    state.deposit(BORROWER, WEGLD_TOKEN, 10 * WEGLD_UNIT);
    state.borrow(BORROWER, USDC_TOKEN, 170 * USDC_UNIT);

    state.set_price(WEGLD_TOKEN, 20 * WAD);
    state.liquidate(LIQUIDATOR, BORROWER, USDC_TOKEN, 200 * USDC_UNIT, WEGLD_TOKEN);

    // USDC: cash regained the 85 repaid; 85 still out.
    state.check_market(
        USDC_TOKEN,
        10_000 * USDC_UNIT - 170 * USDC_UNIT + 85 * USDC_UNIT,
        10_000 * USDC_UNIT,
        85 * USDC_UNIT,
    );
    // WEGLD: the seized 4.675 left both cash and LP supply.
    let seized = 4_675_000_000_000_000_000u128;
    state.check_market(
        WEGLD_TOKEN,
        10 * WEGLD_UNIT - seized,
        10 * WEGLD_UNIT - seized,
        0,
    );
}
