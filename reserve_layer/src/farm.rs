multiversx_sc::imports!();
multiversx_sc::derive_imports!();

use common_constants::MAX_REWARDS_PER_FARM;
use common_errors::{ERROR_REWARD_NOT_FOUND, ERROR_TOO_MANY_REWARDS};
use common_structs::{FarmingType, ReserveFarm};

use crate::storage;

/// Storage wiring for the per-(asset, farming-type) reward pools.
///
/// The accumulator math lives on `ReserveFarm` itself; this module only loads,
/// accrues and persists. Accrual always runs against the pre-mutation share
/// total because the struct methods encode that ordering.
#[multiversx_sc::module]
pub trait ReserveFarmModule: storage::ReserveStorage {
    /// Loads the farm, creating an empty one on first touch.
    fn get_or_create_farm(
        &self,
        asset: &EgldOrEsdtTokenIdentifier,
        farming_type: FarmingType,
    ) -> ReserveFarm<Self::Api> {
        let mapper = self.reserve_farm(asset, farming_type);
        if mapper.is_empty() {
            ReserveFarm::new(self.blockchain().get_block_timestamp())
        } else {
            mapper.get()
        }
    }

    fn save_farm(
        &self,
        asset: &EgldOrEsdtTokenIdentifier,
        farming_type: FarmingType,
        farm: &ReserveFarm<Self::Api>,
    ) {
        self.reserve_farm(asset, farming_type).set(farm);
    }

    fn farm_add_reward(
        &self,
        asset: &EgldOrEsdtTokenIdentifier,
        farming_type: FarmingType,
        reward_token: EgldOrEsdtTokenIdentifier,
        reward_per_day: ManagedDecimal<Self::Api, NumDecimals>,
        amount: ManagedDecimal<Self::Api, NumDecimals>,
    ) {
        let mut farm = self.get_or_create_farm(asset, farming_type);
        if farm.find_reward(&reward_token).is_none() {
            require!(
                farm.rewards.len() < MAX_REWARDS_PER_FARM,
                ERROR_TOO_MANY_REWARDS
            );
        }
        farm.add_reward(
            self.blockchain().get_block_timestamp(),
            reward_token,
            reward_per_day,
            amount,
        );
        self.save_farm(asset, farming_type, &farm);
    }

    /// Removes undistributed reward, clamped to what is left; returns the
    /// amount actually removed.
    fn farm_take_reward(
        &self,
        asset: &EgldOrEsdtTokenIdentifier,
        farming_type: FarmingType,
        reward_token: &EgldOrEsdtTokenIdentifier,
        amount: &ManagedDecimal<Self::Api, NumDecimals>,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let mut farm = self.get_or_create_farm(asset, farming_type);
        require!(farm.find_reward(reward_token).is_some(), ERROR_REWARD_NOT_FOUND);
        let removed = farm.take_reward(
            self.blockchain().get_block_timestamp(),
            reward_token,
            amount,
        );
        self.save_farm(asset, farming_type, &farm);
        removed
    }
}
