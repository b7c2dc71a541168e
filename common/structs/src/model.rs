#![no_std]

multiversx_sc::imports!();
multiversx_sc::derive_imports!();

use common_constants::{RAY_PRECISION, SECONDS_PER_DAY};

fn ray_scale<M: ManagedTypeApi>() -> BigUint<M> {
    BigUint::from(10u64).pow(RAY_PRECISION as u32)
}

fn ray_zero<M: ManagedTypeApi>() -> ManagedDecimal<M, NumDecimals> {
    ManagedDecimal::from_raw_units(BigUint::zero(), RAY_PRECISION)
}

fn mul_floor_ray<M: ManagedTypeApi>(
    a: &ManagedDecimal<M, NumDecimals>,
    b: &ManagedDecimal<M, NumDecimals>,
) -> ManagedDecimal<M, NumDecimals> {
    let product = a.into_raw_units() * b.into_raw_units();
    ManagedDecimal::from_raw_units(product / ray_scale::<M>(), RAY_PRECISION)
}

fn div_floor_ray<M: ManagedTypeApi>(
    a: &ManagedDecimal<M, NumDecimals>,
    b: &ManagedDecimal<M, NumDecimals>,
) -> ManagedDecimal<M, NumDecimals> {
    let numerator = a.into_raw_units() * &ray_scale::<M>();
    ManagedDecimal::from_raw_units(numerator / b.into_raw_units(), RAY_PRECISION)
}

/// Which side of a reserve a farm rewards.
#[derive(
    NestedEncode, NestedDecode, TopEncode, TopDecode, TypeAbi, Clone, Copy, PartialEq, Eq,
)]
pub enum FarmingType {
    Deposit,
    Borrow,
}

/// Risk and fee parameters of a reserve. Immutable between admin updates.
#[derive(NestedEncode, NestedDecode, TopEncode, TopDecode, TypeAbi, Clone)]
pub struct ReserveConfig<M: ManagedTypeApi> {
    pub loan_to_value: ManagedDecimal<M, NumDecimals>,         // bps
    pub liquidation_threshold: ManagedDecimal<M, NumDecimals>, // bps
    pub liquidation_bonus: ManagedDecimal<M, NumDecimals>,     // bps
    pub borrow_factor: ManagedDecimal<M, NumDecimals>,         // bps, <= 100%
    pub reserve_ratio: ManagedDecimal<M, NumDecimals>,         // bps
    pub borrow_fee: ManagedDecimal<M, NumDecimals>,            // millionth
    pub flash_loan_fee: ManagedDecimal<M, NumDecimals>,        // millionth
    pub deposit_limit: Option<BigUint<M>>,                     // raw underlying units
    pub borrow_limit: Option<BigUint<M>>,                      // raw underlying units
    pub allow_collateral: bool,
    pub allow_redeem: bool,
    pub asset_decimals: usize,
}

/// Knots of the piecewise-linear borrow-rate curve, all RAY-scaled annual rates
/// except the two utilization breakpoints.
#[derive(NestedEncode, NestedDecode, TopEncode, TopDecode, TypeAbi, Clone)]
pub struct InterestRateConfig<M: ManagedTypeApi> {
    pub base_borrow_rate: ManagedDecimal<M, NumDecimals>,
    pub slope1: ManagedDecimal<M, NumDecimals>,
    pub slope2: ManagedDecimal<M, NumDecimals>,
    pub slope3: ManagedDecimal<M, NumDecimals>,
    pub mid_utilization: ManagedDecimal<M, NumDecimals>,
    pub optimal_utilization: ManagedDecimal<M, NumDecimals>,
    pub max_borrow_rate: ManagedDecimal<M, NumDecimals>,
}

/// One reward token inside a reserve farm.
///
/// `remaining_reward` and `reward_per_day` denominate whole base units of the
/// reward token as RAY decimals, so fractional accrual never loses dust.
#[derive(NestedEncode, NestedDecode, TopEncode, TopDecode, TypeAbi, ManagedVecItem, Clone)]
pub struct Reward<M: ManagedTypeApi> {
    pub reward_token: EgldOrEsdtTokenIdentifier<M>,
    pub reward_per_day: ManagedDecimal<M, NumDecimals>,   // RAY, base units/day
    pub remaining_reward: ManagedDecimal<M, NumDecimals>, // RAY, base units
    pub reward_per_share: ManagedDecimal<M, NumDecimals>, // RAY, base units per share
}

/// Per-(asset, farming-type) reward pool: a lazily updated
/// reward-per-share accumulator over the total participating share.
#[derive(NestedEncode, NestedDecode, TopEncode, TopDecode, TypeAbi, Clone)]
pub struct ReserveFarm<M: ManagedTypeApi> {
    pub last_update_timestamp: u64,
    pub total_share: ManagedDecimal<M, NumDecimals>, // RAY
    pub rewards: ManagedVec<M, Reward<M>>,
}

impl<M: ManagedTypeApi> ReserveFarm<M> {
    pub fn new(now: u64) -> Self {
        ReserveFarm {
            last_update_timestamp: now,
            total_share: ray_zero(),
            rewards: ManagedVec::new(),
        }
    }

    pub fn find_reward(&self, token: &EgldOrEsdtTokenIdentifier<M>) -> Option<usize> {
        for (index, reward) in self.rewards.iter().enumerate() {
            if reward.reward_token == *token {
                return Some(index);
            }
        }
        None
    }

    /// Rolls the accumulator forward to `now` against the pre-mutation share
    /// total. Must run before any share or reward-pool change; calling it
    /// after the change would attribute past emissions to the new share base.
    pub fn accrue(&mut self, now: u64) {
        let time_diff = now - self.last_update_timestamp;
        if time_diff == 0 {
            return;
        }
        self.last_update_timestamp = now;

        if self.total_share == ray_zero() {
            // No one to attribute emissions to; the pool keeps its rewards.
            return;
        }

        let seconds_per_day =
            ManagedDecimal::from_raw_units(BigUint::from(SECONDS_PER_DAY), 0usize);
        let elapsed = ManagedDecimal::from_raw_units(BigUint::from(time_diff), 0usize);

        for index in 0..self.rewards.len() {
            let mut reward = self.rewards.get(index).clone();

            let emitted_raw = reward.reward_per_day.into_raw_units()
                * elapsed.into_raw_units()
                / seconds_per_day.into_raw_units();
            let emitted = ManagedDecimal::from_raw_units(emitted_raw, RAY_PRECISION);
            let acquired = if emitted < reward.remaining_reward {
                emitted
            } else {
                reward.remaining_reward.clone()
            };

            reward.reward_per_share += div_floor_ray(&acquired, &self.total_share);
            reward.remaining_reward -= acquired;

            let _ = self.rewards.set(index, reward);
        }
    }

    pub fn add_share(&mut self, now: u64, amount: &ManagedDecimal<M, NumDecimals>) {
        self.accrue(now);
        self.total_share += amount;
    }

    /// Saturating removal; share dust from rounding must never abort a
    /// withdrawal or liquidation.
    pub fn remove_share(&mut self, now: u64, amount: &ManagedDecimal<M, NumDecimals>) {
        self.accrue(now);
        if *amount >= self.total_share {
            self.total_share = ray_zero();
        } else {
            self.total_share -= amount;
        }
    }

    /// Tops up an existing reward or registers a new one. Returns the index of
    /// the touched entry. The caller enforces the farm-wide capacity limit.
    pub fn add_reward(
        &mut self,
        now: u64,
        token: EgldOrEsdtTokenIdentifier<M>,
        reward_per_day: ManagedDecimal<M, NumDecimals>,
        amount: ManagedDecimal<M, NumDecimals>,
    ) -> usize {
        self.accrue(now);
        match self.find_reward(&token) {
            Some(index) => {
                let mut reward = self.rewards.get(index).clone();
                reward.reward_per_day = reward_per_day;
                reward.remaining_reward += amount;
                let _ = self.rewards.set(index, reward);
                index
            },
            None => {
                self.rewards.push(Reward {
                    reward_token: token,
                    reward_per_day,
                    remaining_reward: amount,
                    reward_per_share: ray_zero(),
                });
                self.rewards.len() - 1
            },
        }
    }

    /// Drains undistributed reward back to the caller, clamped to what is
    /// actually left. Returns the amount removed.
    pub fn take_reward(
        &mut self,
        now: u64,
        token: &EgldOrEsdtTokenIdentifier<M>,
        amount: &ManagedDecimal<M, NumDecimals>,
    ) -> ManagedDecimal<M, NumDecimals> {
        self.accrue(now);
        match self.find_reward(token) {
            Some(index) => {
                let mut reward = self.rewards.get(index).clone();
                let removed = if *amount >= reward.remaining_reward {
                    let all = reward.remaining_reward.clone();
                    reward.remaining_reward = ray_zero();
                    all
                } else {
                    reward.remaining_reward -= amount;
                    amount.clone()
                };
                let _ = self.rewards.set(index, reward);
                removed
            },
            None => ray_zero(),
        }
    }
}

/// A user's checkpoint against one reward token of a reserve farm.
#[derive(NestedEncode, NestedDecode, TopEncode, TopDecode, TypeAbi, ManagedVecItem, Clone)]
pub struct ProfileReward<M: ManagedTypeApi> {
    pub reward_token: EgldOrEsdtTokenIdentifier<M>,
    pub unclaimed_amount: ManagedDecimal<M, NumDecimals>, // RAY, base units
    pub last_reward_per_share: ManagedDecimal<M, NumDecimals>, // RAY
}

/// Per-user mirror of a reserve farm: the user's share plus one checkpoint per
/// reward token seen so far.
#[derive(NestedEncode, NestedDecode, TopEncode, TopDecode, TypeAbi, Clone)]
pub struct ProfileFarm<M: ManagedTypeApi> {
    pub share: ManagedDecimal<M, NumDecimals>, // RAY
    pub rewards: ManagedVec<M, ProfileReward<M>>,
}

impl<M: ManagedTypeApi> Default for ProfileFarm<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: ManagedTypeApi> ProfileFarm<M> {
    pub fn new() -> Self {
        ProfileFarm {
            share: ray_zero(),
            rewards: ManagedVec::new(),
        }
    }

    fn find_reward(&self, token: &EgldOrEsdtTokenIdentifier<M>) -> Option<usize> {
        for (index, reward) in self.rewards.iter().enumerate() {
            if reward.reward_token == *token {
                return Some(index);
            }
        }
        None
    }

    /// Pulls the reward-per-share delta accrued since the last checkpoint into
    /// `unclaimed_amount`, for every reward token the reserve farm knows.
    ///
    /// A reward registered after this profile entry was created settles from a
    /// zero baseline: the accumulator is insert-only and monotone, so a fresh
    /// checkpoint of zero can only over-credit by exactly the emissions the
    /// user was present for.
    pub fn settle(&mut self, farm: &ReserveFarm<M>) {
        for farm_reward in farm.rewards.iter() {
            let index = match self.find_reward(&farm_reward.reward_token) {
                Some(index) => index,
                None => {
                    self.rewards.push(ProfileReward {
                        reward_token: farm_reward.reward_token.clone(),
                        unclaimed_amount: ray_zero(),
                        last_reward_per_share: ray_zero(),
                    });
                    self.rewards.len() - 1
                },
            };

            let mut entry = self.rewards.get(index).clone();
            let diff = farm_reward.reward_per_share.clone() - entry.last_reward_per_share.clone();
            entry.unclaimed_amount += mul_floor_ray(&diff, &self.share);
            entry.last_reward_per_share = farm_reward.reward_per_share.clone();
            let _ = self.rewards.set(index, entry);
        }
    }

    /// Settles at the old share, then grows it.
    pub fn add_share(&mut self, farm: &ReserveFarm<M>, amount: &ManagedDecimal<M, NumDecimals>) {
        self.settle(farm);
        self.share += amount;
    }

    /// Settles at the old share, then shrinks it by at most the held share.
    /// Returns the amount actually removed; callers on liquidation and
    /// withdrawal paths do not always know the exact recorded share.
    pub fn try_remove_share(
        &mut self,
        farm: &ReserveFarm<M>,
        amount: &ManagedDecimal<M, NumDecimals>,
    ) -> ManagedDecimal<M, NumDecimals> {
        self.settle(farm);
        if *amount >= self.share {
            let removed = self.share.clone();
            self.share = ray_zero();
            removed
        } else {
            self.share -= amount;
            amount.clone()
        }
    }

    /// Settles, then floors the unclaimed balance of `token` to whole base
    /// units. The fractional remainder stays on the checkpoint so repeated
    /// small claims do not bleed value.
    pub fn claim(
        &mut self,
        farm: &ReserveFarm<M>,
        token: &EgldOrEsdtTokenIdentifier<M>,
    ) -> BigUint<M> {
        self.settle(farm);
        match self.find_reward(token) {
            Some(index) => {
                let mut entry = self.rewards.get(index).clone();
                let payout = entry.unclaimed_amount.into_raw_units() / &ray_scale::<M>();
                let payout_ray =
                    ManagedDecimal::from_raw_units(&payout * &ray_scale::<M>(), RAY_PRECISION);
                entry.unclaimed_amount -= payout_ray;
                let _ = self.rewards.set(index, entry);
                payout
            },
            None => BigUint::zero(),
        }
    }

    pub fn is_empty(&self) -> bool {
        if self.share != ray_zero() {
            return false;
        }
        for reward in self.rewards.iter() {
            if reward.unclaimed_amount != ray_zero() {
                return false;
            }
        }
        true
    }
}

/// LP units held as collateral for one asset. The underlying value is resolved
/// through the reserve's current exchange rate, never stored.
#[derive(NestedEncode, NestedDecode, TopEncode, TopDecode, TypeAbi, Clone)]
pub struct Deposit<M: ManagedTypeApi> {
    pub collateral_lp_amount: ManagedDecimal<M, NumDecimals>, // asset decimals
}

/// Normalized borrow share for one asset. The owed amount is the share valued
/// at the reserve's current borrowed/share exchange rate.
#[derive(NestedEncode, NestedDecode, TopEncode, TopDecode, TypeAbi, Clone)]
pub struct Loan<M: ManagedTypeApi> {
    pub borrowed_share: ManagedDecimal<M, NumDecimals>, // RAY
}

/// An e-mode category tightens the risk parameters of a correlated asset set.
#[derive(NestedEncode, NestedDecode, TopEncode, TopDecode, TypeAbi, Clone)]
pub struct EModeCategory<M: ManagedTypeApi> {
    pub id: u8,
    pub loan_to_value: ManagedDecimal<M, NumDecimals>,         // bps
    pub liquidation_threshold: ManagedDecimal<M, NumDecimals>, // bps
    pub liquidation_bonus: ManagedDecimal<M, NumDecimals>,     // bps
    pub deprecated: bool,
}

impl<M: ManagedTypeApi> EModeCategory<M> {
    pub fn is_deprecated(&self) -> bool {
        self.deprecated
    }
}

/// Per-asset flags inside an e-mode category.
#[derive(NestedEncode, NestedDecode, TopEncode, TopDecode, TypeAbi, Clone)]
pub struct EModeAssetConfig {
    pub is_collateralizable: bool,
    pub is_borrowable: bool,
}

/// Aggregated reserve snapshot returned by views and carried in events.
#[derive(NestedEncode, NestedDecode, TopEncode, TopDecode, TypeAbi, Clone)]
pub struct MarketView<M: ManagedTypeApi> {
    pub asset: EgldOrEsdtTokenIdentifier<M>,
    pub total_cash_available: ManagedDecimal<M, NumDecimals>,
    pub total_lp_supply: ManagedDecimal<M, NumDecimals>,
    pub total_borrowed: ManagedDecimal<M, NumDecimals>,
    pub total_borrowed_share: ManagedDecimal<M, NumDecimals>,
    pub reserve_amount: ManagedDecimal<M, NumDecimals>,
    pub borrow_fee_pool: ManagedDecimal<M, NumDecimals>,
    pub utilization: ManagedDecimal<M, NumDecimals>,
    pub borrow_rate: ManagedDecimal<M, NumDecimals>,
    pub interest_accrue_timestamp: u64,
}
