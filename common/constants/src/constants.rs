#![no_std]

pub const RAY: u128 = 1_000_000_000_000_000_000_000_000_000;
pub const RAY_PRECISION: usize = 27;

/// All oracle prices and USD values are WAD-scaled (1 WAD = 1 USD).
pub const WAD: u128 = 1_000_000_000_000_000_000;
pub const WAD_PRECISION: usize = 18;

pub const BPS: u64 = 10_000; // 100%
pub const BPS_PRECISION: usize = 4;

/// Fee rates are expressed in millionths (1_000_000 = 100%).
pub const MILLIONTH: u64 = 1_000_000;
pub const MILLIONTH_PRECISION: usize = 6;

pub const SECONDS_PER_YEAR: u64 = 31_556_926;
pub const SECONDS_PER_DAY: u64 = 86_400;

/// Fraction of the total debt value a single liquidation may repay, in bps.
pub const LIQUIDATION_CLOSE_FACTOR_BPS: u64 = 5_000; // 50%

/// Debt value (USD, WAD-scaled) under which a liquidation may close the whole position.
pub const LIQUIDATION_CLOSE_AMOUNT_WAD: u128 = 2_000_000_000_000_000_000; // 2 USD

/// Largest number of reward tokens a single farm may carry.
pub const MAX_REWARDS_PER_FARM: usize = 10;

pub const USD_TICKER: &[u8] = b"USD";
