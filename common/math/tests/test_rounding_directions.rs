// Rounding-direction tests for the shared fixed-point helpers.
// Run with: cargo test --test test_rounding_directions

use multiversx_sc::types::{BigUint, ManagedDecimal};
use multiversx_sc_scenario::api::StaticApi;

use common_math::SharedMathModule;

pub struct MathTester;

impl multiversx_sc::contract_base::ContractBase for MathTester {
    type Api = StaticApi;
}

impl SharedMathModule for MathTester {}

fn dec(raw: u64, scale: usize) -> ManagedDecimal<StaticApi, usize> {
    ManagedDecimal::from_raw_units(BigUint::from(raw), scale)
}

#[test]
fn test_mul_floor_truncates() {
    let tester = MathTester;

    // 1.5 * 1.3 = 1.95 -> floors to 1.9 at 1 decimal
    let result = tester.mul_floor(&dec(15, 1), &dec(13, 1), 1);
    assert_eq!(result.into_raw_units(), &BigUint::<StaticApi>::from(19u64));
}

#[test]
fn test_mul_ceil_rounds_up() {
    let tester = MathTester;

    // 1.5 * 1.3 = 1.95 -> ceils to 2.0 at 1 decimal
    let result = tester.mul_ceil(&dec(15, 1), &dec(13, 1), 1);
    assert_eq!(result.into_raw_units(), &BigUint::<StaticApi>::from(20u64));
}

#[test]
fn test_mul_ceil_exact_product_not_bumped() {
    let tester = MathTester;

    // 1.5 * 2.0 = 3.0 exactly; ceil must not add anything
    let result = tester.mul_ceil(&dec(15, 1), &dec(20, 1), 1);
    assert_eq!(result.into_raw_units(), &BigUint::<StaticApi>::from(30u64));
}

#[test]
fn test_div_floor_truncates() {
    let tester = MathTester;

    // 5.0 / 3.0 = 1.666... -> floors to 1.6
    let result = tester.div_floor(&dec(50, 1), &dec(30, 1), 1);
    assert_eq!(result.into_raw_units(), &BigUint::<StaticApi>::from(16u64));
}

#[test]
fn test_div_ceil_rounds_up() {
    let tester = MathTester;

    // 5.0 / 3.0 = 1.666... -> ceils to 1.7
    let result = tester.div_ceil(&dec(50, 1), &dec(30, 1), 1);
    assert_eq!(result.into_raw_units(), &BigUint::<StaticApi>::from(17u64));
}

#[test]
fn test_div_ceil_exact_quotient_not_bumped() {
    let tester = MathTester;

    // 6.0 / 3.0 = 2.0 exactly
    let result = tester.div_ceil(&dec(60, 1), &dec(30, 1), 1);
    assert_eq!(result.into_raw_units(), &BigUint::<StaticApi>::from(20u64));
}

#[test]
fn test_div_half_up_midpoint() {
    let tester = MathTester;

    // 5.0 / 3.0 = 1.666... -> half-up to 1.7
    let result = tester.div_half_up(&dec(50, 1), &dec(30, 1), 1);
    assert_eq!(result.into_raw_units(), &BigUint::<StaticApi>::from(17u64));
}

#[test]
fn test_rescale_floor_drops_dust() {
    let tester = MathTester;

    let value = dec(1_234_567, 6);
    let result = tester.rescale_floor(&value, 2);
    assert_eq!(result.into_raw_units(), &BigUint::<StaticApi>::from(123u64));
    assert_eq!(result.scale(), 2);
}

#[test]
fn test_rescale_ceil_keeps_dust() {
    let tester = MathTester;

    let value = dec(1_234_001, 6);
    let result = tester.rescale_ceil(&value, 2);
    assert_eq!(result.into_raw_units(), &BigUint::<StaticApi>::from(124u64));
}

#[test]
fn test_rescale_up_is_exact() {
    let tester = MathTester;

    let value = dec(123, 2);
    let result = tester.rescale_floor(&value, 6);
    assert_eq!(
        result.into_raw_units(),
        &BigUint::<StaticApi>::from(1_230_000u64)
    );
}

/// floor∘floor composition never manufactures value: converting an amount
/// down and back up again lands at or below the starting point.
#[test]
fn test_floor_round_trip_never_gains() {
    let tester = MathTester;

    for raw in [1u64, 7, 99, 1_000, 123_457, 999_999_999] {
        let amount = dec(raw, 6);
        let rate = dec(1_234_567, 6); // some uneven exchange rate > 1

        let converted = tester.div_floor(&amount, &rate, 6);
        let back = tester.mul_floor(&converted, &rate, 6);

        assert!(back.into_raw_units() <= amount.into_raw_units());
    }
}
