// Reward-accumulator behavior: lazy accrual, zero-share edge cases,
// checkpoint settlement, clamped share removal, fractional claim retention.

use multiversx_sc::types::{BigUint, EgldOrEsdtTokenIdentifier, ManagedDecimal, TokenIdentifier};
use multiversx_sc_scenario::api::StaticApi;

use common_structs::{ProfileFarm, ReserveFarm};

const RAY_PRECISION: usize = 27;
const SECONDS_PER_DAY: u64 = 86_400;

fn ray_units(units: u64) -> ManagedDecimal<StaticApi, usize> {
    let raw = BigUint::from(units) * BigUint::from(10u64).pow(RAY_PRECISION as u32);
    ManagedDecimal::from_raw_units(raw, RAY_PRECISION)
}

fn ray_zero() -> ManagedDecimal<StaticApi, usize> {
    ManagedDecimal::from_raw_units(BigUint::zero(), RAY_PRECISION)
}

fn reward_token() -> EgldOrEsdtTokenIdentifier<StaticApi> {
    EgldOrEsdtTokenIdentifier::esdt(TokenIdentifier::from("REWARD-123456"))
}

#[test]
fn test_add_reward_with_zero_share_keeps_accumulator_at_zero() {
    let mut farm = ReserveFarm::<StaticApi>::new(0);
    farm.add_reward(0, reward_token(), ray_units(100), ray_units(1_000));

    // A day passes with nobody staked; accrual must not divide by zero and
    // must not move the accumulator or the remaining pool.
    farm.accrue(SECONDS_PER_DAY);

    let reward = farm.rewards.get(0).clone();
    assert_eq!(reward.reward_per_share, ray_zero());
    assert_eq!(reward.remaining_reward, ray_units(1_000));
    assert_eq!(farm.last_update_timestamp, SECONDS_PER_DAY);
}

#[test]
fn test_accrue_distributes_per_day_rate_over_share() {
    let mut farm = ReserveFarm::<StaticApi>::new(0);
    farm.add_reward(0, reward_token(), ray_units(100), ray_units(1_000));
    farm.add_share(0, &ray_units(50));

    // One full day: 100 units emitted over 50 shares -> 2 units per share.
    farm.accrue(SECONDS_PER_DAY);

    let reward = farm.rewards.get(0).clone();
    assert_eq!(reward.reward_per_share, ray_units(2));
    assert_eq!(reward.remaining_reward, ray_units(900));
}

#[test]
fn test_accrue_is_capped_by_remaining_reward() {
    let mut farm = ReserveFarm::<StaticApi>::new(0);
    farm.add_reward(0, reward_token(), ray_units(100), ray_units(150));
    farm.add_share(0, &ray_units(10));

    // Two days of emissions would be 200, but only 150 are funded.
    farm.accrue(2 * SECONDS_PER_DAY);

    let reward = farm.rewards.get(0).clone();
    assert_eq!(reward.remaining_reward, ray_zero());
    assert_eq!(reward.reward_per_share, ray_units(15));

    // Dry pool: further accrual is a no-op on the accumulator.
    farm.accrue(3 * SECONDS_PER_DAY);
    let reward = farm.rewards.get(0).clone();
    assert_eq!(reward.reward_per_share, ray_units(15));
}

#[test]
fn test_reward_per_share_is_monotone_across_share_changes() {
    let mut farm = ReserveFarm::<StaticApi>::new(0);
    farm.add_reward(0, reward_token(), ray_units(100), ray_units(10_000));
    farm.add_share(0, &ray_units(10));

    let mut last = ray_zero();
    let mut now = 0u64;
    for step in 1..=5u64 {
        now += step * 3_600;
        if step % 2 == 0 {
            farm.add_share(now, &ray_units(5));
        } else {
            farm.remove_share(now, &ray_units(2));
        }
        let rps = farm.rewards.get(0).reward_per_share.clone();
        assert!(rps >= last);
        last = rps;
    }
}

#[test]
fn test_settle_uses_zero_baseline_for_late_rewards() {
    let mut farm = ReserveFarm::<StaticApi>::new(0);
    let mut profile = ProfileFarm::<StaticApi>::new();

    // User stakes before any reward exists.
    profile.add_share(&farm, &ray_units(10));
    farm.add_share(0, &ray_units(10));

    // Reward registered afterwards, then a day of emissions.
    farm.add_reward(0, reward_token(), ray_units(100), ray_units(1_000));
    farm.accrue(SECONDS_PER_DAY);

    // The profile has never seen this reward token; settling from a zero
    // baseline must credit exactly the emissions it was present for.
    profile.settle(&farm);
    let entry = profile.rewards.get(0).clone();
    assert_eq!(entry.unclaimed_amount, ray_units(100));
}

#[test]
fn test_try_remove_share_clamps_over_removal() {
    let farm = ReserveFarm::<StaticApi>::new(0);
    let mut profile = ProfileFarm::<StaticApi>::new();
    profile.add_share(&farm, &ray_units(10));

    let removed = profile.try_remove_share(&farm, &ray_units(25));
    assert_eq!(removed, ray_units(10));
    assert_eq!(profile.share, ray_zero());

    // Removing from an empty profile stays a no-op.
    let removed = profile.try_remove_share(&farm, &ray_units(1));
    assert_eq!(removed, ray_zero());
}

#[test]
fn test_claim_floors_and_retains_fraction() {
    let mut farm = ReserveFarm::<StaticApi>::new(0);
    farm.add_reward(0, reward_token(), ray_units(100), ray_units(1_000));
    // 3 shares against 100/day: per-share accrual has a repeating fraction.
    farm.add_share(0, &ray_units(3));

    let mut profile = ProfileFarm::<StaticApi>::new();
    profile.add_share(&farm, &ray_units(3));

    farm.accrue(SECONDS_PER_DAY);

    let token = reward_token();
    let payout = profile.claim(&farm, &token);
    // 100 emitted in total; flooring may shave the fractional tail.
    assert!(payout <= BigUint::from(100u64));
    assert!(payout >= BigUint::from(99u64));

    // The fractional remainder stays on the checkpoint instead of vanishing.
    let entry = profile.rewards.get(0).clone();
    assert!(entry.unclaimed_amount < ray_units(1));

    // An immediate second claim pays nothing new.
    let second = profile.claim(&farm, &token);
    assert_eq!(second, BigUint::zero());
}

#[test]
fn test_two_stakers_split_emissions_by_share() {
    let mut farm = ReserveFarm::<StaticApi>::new(0);
    farm.add_reward(0, reward_token(), ray_units(90), ray_units(10_000));

    let mut alice = ProfileFarm::<StaticApi>::new();
    let mut bob = ProfileFarm::<StaticApi>::new();

    alice.add_share(&farm, &ray_units(10));
    farm.add_share(0, &ray_units(10));
    bob.add_share(&farm, &ray_units(20));
    farm.add_share(0, &ray_units(20));

    farm.accrue(SECONDS_PER_DAY);

    let token = reward_token();
    let alice_payout = alice.claim(&farm, &token);
    let bob_payout = bob.claim(&farm, &token);

    // 90 units split 1:2.
    assert_eq!(alice_payout, BigUint::from(30u64));
    assert_eq!(bob_payout, BigUint::from(60u64));
}

#[test]
fn test_take_reward_clamps_to_remaining() {
    let mut farm = ReserveFarm::<StaticApi>::new(0);
    let token = reward_token();
    farm.add_reward(0, token.clone(), ray_units(100), ray_units(500));

    let removed = farm.take_reward(0, &token, &ray_units(9_999));
    assert_eq!(removed, ray_units(500));
    assert_eq!(farm.rewards.get(0).remaining_reward.clone(), ray_zero());
}
