use common_structs::{FarmingType, ProfileFarm};

use crate::storage;

multiversx_sc::imports!();

/// Wiring between profile farms and reserve farms.
///
/// Order is fixed by construction: the reserve accumulator is accrued against
/// the pre-mutation share total, the profile checkpoint settles at the old
/// share, and only then does either share change.
#[multiversx_sc::module]
pub trait RewardsModule:
    storage::Storage
    + reserve_layer::storage::ReserveStorage
    + reserve_layer::farm::ReserveFarmModule
{
    fn load_profile_farm(
        &self,
        owner: &ManagedAddress,
        subaccount: u8,
        asset: &EgldOrEsdtTokenIdentifier,
        farming_type: FarmingType,
    ) -> ProfileFarm<Self::Api> {
        let mapper = match farming_type {
            FarmingType::Deposit => self.deposit_farm(owner, subaccount, asset),
            FarmingType::Borrow => self.borrow_farm(owner, subaccount, asset),
        };
        if mapper.is_empty() {
            ProfileFarm::new()
        } else {
            mapper.get()
        }
    }

    fn store_profile_farm(
        &self,
        owner: &ManagedAddress,
        subaccount: u8,
        asset: &EgldOrEsdtTokenIdentifier,
        farming_type: FarmingType,
        profile_farm: &ProfileFarm<Self::Api>,
    ) {
        let mapper = match farming_type {
            FarmingType::Deposit => self.deposit_farm(owner, subaccount, asset),
            FarmingType::Borrow => self.borrow_farm(owner, subaccount, asset),
        };
        if profile_farm.is_empty() {
            mapper.clear();
        } else {
            mapper.set(profile_farm);
        }
    }

    fn profile_farm_add_share(
        &self,
        owner: &ManagedAddress,
        subaccount: u8,
        asset: &EgldOrEsdtTokenIdentifier,
        farming_type: FarmingType,
        amount: &ManagedDecimal<Self::Api, NumDecimals>,
    ) {
        let now = self.blockchain().get_block_timestamp();
        let mut farm = self.get_or_create_farm(asset, farming_type);
        farm.accrue(now);

        let mut profile_farm = self.load_profile_farm(owner, subaccount, asset, farming_type);
        profile_farm.add_share(&farm, amount);
        farm.add_share(now, amount);

        self.save_farm(asset, farming_type, &farm);
        self.store_profile_farm(owner, subaccount, asset, farming_type, &profile_farm);
    }

    /// Best-effort share removal: settles, then removes at most what the
    /// profile holds, mirroring the removal on the reserve side. Returns the
    /// share actually removed.
    fn profile_farm_try_remove_share(
        &self,
        owner: &ManagedAddress,
        subaccount: u8,
        asset: &EgldOrEsdtTokenIdentifier,
        farming_type: FarmingType,
        amount: &ManagedDecimal<Self::Api, NumDecimals>,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let now = self.blockchain().get_block_timestamp();
        let mut farm = self.get_or_create_farm(asset, farming_type);
        farm.accrue(now);

        let mut profile_farm = self.load_profile_farm(owner, subaccount, asset, farming_type);
        let removed = profile_farm.try_remove_share(&farm, amount);
        farm.remove_share(now, &removed);

        self.save_farm(asset, farming_type, &farm);
        self.store_profile_farm(owner, subaccount, asset, farming_type, &profile_farm);

        removed
    }

    /// Settles and pays out one reward token, flooring to whole base units;
    /// the fractional remainder stays on the profile checkpoint.
    fn claim_profile_reward(
        &self,
        owner: &ManagedAddress,
        subaccount: u8,
        asset: &EgldOrEsdtTokenIdentifier,
        farming_type: FarmingType,
        reward_token: &EgldOrEsdtTokenIdentifier,
    ) -> BigUint {
        let now = self.blockchain().get_block_timestamp();
        let mut farm = self.get_or_create_farm(asset, farming_type);
        farm.accrue(now);

        let mut profile_farm = self.load_profile_farm(owner, subaccount, asset, farming_type);
        let payout = profile_farm.claim(&farm, reward_token);

        self.save_farm(asset, farming_type, &farm);
        self.store_profile_farm(owner, subaccount, asset, farming_type, &profile_farm);

        payout
    }
}
