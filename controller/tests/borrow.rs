pub mod setup;
use setup::*;

/// 10 WEGLD at 25 USD with 70% LTV gives 175 USD of borrowing power; a 150
/// USDC borrow fits.
#[test]
fn borrow_against_collateral() {
    let mut state = LendingTestState::new();

    state.deposit(SUPPLIER, USDC_TOKEN, 10_000 * USDC_UNIT);
    state.deposit(BORROWER, WEGLD_TOKEN, 10 * WEGLD_UNIT);

    state.borrow(BORROWER, USDC_TOKEN, 150 * USDC_UNIT);

    state.check_user_balance(BORROWER, USDC_TOKEN, 1_000_000 * USDC_UNIT + 150 * USDC_UNIT);
    state.check_market(
        USDC_TOKEN,
        10_000 * USDC_UNIT - 150 * USDC_UNIT,
        10_000 * USDC_UNIT,
        150 * USDC_UNIT,
    );
    assert_eq!(state.owed_amount(BORROWER, USDC_TOKEN), (150 * USDC_UNIT) as u64);
}

/// 200 USDC of risk-adjusted debt exceeds the 175 USD borrowing power: the
/// final solvency check kills the transaction.
#[test]
#[should_panic]
fn borrow_beyond_borrowing_power_is_rejected() {
    let mut state = LendingTestState::new();

    state.deposit(SUPPLIER, USDC_TOKEN, 10_000 * USDC_UNIT);
    state.deposit(BORROWER, WEGLD_TOKEN, 10 * WEGLD_UNIT);

    state.borrow(BORROWER, USDC_TOKEN, 200 * USDC_UNIT);
}

#[test]
#[should_panic]
fn borrow_without_collateral_is_rejected() {
    let mut state = LendingTestState::new();

    state.deposit(SUPPLIER, USDC_TOKEN, 10_000 * USDC_UNIT);
    state.borrow(BORROWER, USDC_TOKEN, 1 * USDC_UNIT);
}

#[test]
#[should_panic]
fn borrow_more_than_reserve_cash_is_rejected() {
    let mut state = LendingTestState::new();

    state.deposit(SUPPLIER, USDC_TOKEN, 100 * USDC_UNIT);
    state.deposit(BORROWER, WEGLD_TOKEN, 10 * WEGLD_UNIT);

    state.borrow(BORROWER, USDC_TOKEN, 150 * USDC_UNIT);
}

/// Interest accrues against the debt over time, and the owed amount keeps
/// growing; the borrowed/share exchange rate never decreases.
#[test]
fn accrued_interest_grows_debt_monotonically() {
    let mut state = LendingTestState::new();

    state.deposit(SUPPLIER, USDC_TOKEN, 10_000 * USDC_UNIT);
    state.deposit(BORROWER, WEGLD_TOKEN, 10 * WEGLD_UNIT);
    state.borrow(BORROWER, USDC_TOKEN, 150 * USDC_UNIT);

    let owed_at_start = state.owed_amount(BORROWER, USDC_TOKEN);
    assert_eq!(owed_at_start, (150 * USDC_UNIT) as u64);

    state.set_timestamp(SECONDS_PER_DAY);
    // Force an accrual through a touch of the reserve.
    state.deposit(SUPPLIER, USDC_TOKEN, 1 * USDC_UNIT);
    let owed_after_one_day = state.owed_amount(BORROWER, USDC_TOKEN);
    assert!(owed_after_one_day > owed_at_start);

    state.set_timestamp(30 * SECONDS_PER_DAY);
    state.deposit(SUPPLIER, USDC_TOKEN, 1 * USDC_UNIT);
    let owed_after_month = state.owed_amount(BORROWER, USDC_TOKEN);
    assert!(owed_after_month > owed_after_one_day);
}

/// The protocol skim collects its configured share of accrued interest.
#[test]
fn reserve_amount_collects_interest_skim() {
    let mut state = LendingTestState::new();

    state.deposit(SUPPLIER, USDC_TOKEN, 10_000 * USDC_UNIT);
    state.deposit(BORROWER, WEGLD_TOKEN, 10 * WEGLD_UNIT);
    state.borrow(BORROWER, USDC_TOKEN, 150 * USDC_UNIT);

    state.set_timestamp(30 * SECONDS_PER_DAY);
    state.deposit(SUPPLIER, USDC_TOKEN, 1 * USDC_UNIT);

    state
        .world
        .query()
        .to(CONTROLLER_ADDRESS)
        .whitebox(controller::contract_obj, |sc| {
            use multiversx_sc::types::BigUint;
            use reserve_layer::storage::ReserveStorage;
            let skim = sc.reserve_amount(&usdc()).get();
            assert!(skim.into_raw_units() > &BigUint::zero());
        });
}
