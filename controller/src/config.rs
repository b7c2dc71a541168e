use common_constants::{RAY, RAY_PRECISION, WAD};
use common_errors::{
    ERROR_ASSET_ALREADY_SUPPORTED, ERROR_ASSET_ALREADY_SUPPORTED_IN_EMODE,
    ERROR_ASSET_NOT_SUPPORTED, ERROR_EMODE_CATEGORY_NOT_FOUND,
    ERROR_INVALID_LIQUIDATION_THRESHOLD,
};
use common_structs::{
    EModeAssetConfig, EModeCategory, FarmingType, InterestRateConfig, ReserveConfig,
};

use crate::storage;

use reserve_layer::ReserveCache;

multiversx_sc::imports!();
multiversx_sc::derive_imports!();

/// Owner-gated configuration: reserve registration, risk parameters, e-mode
/// tables, reward funding and protocol-skim withdrawal.
#[multiversx_sc::module]
pub trait ConfigModule:
    storage::Storage
    + reserve_layer::storage::ReserveStorage
    + reserve_layer::ledger::ReserveLedgerModule
    + reserve_layer::farm::ReserveFarmModule
    + common_math::SharedMathModule
    + common_rates::InterestRates
    + common_events::EventsModule
    + multiversx_sc_modules::only_admin::OnlyAdminModule
{
    /// Registers a new reserve for `asset` with a 1:1 initial LP exchange
    /// rate and zeroed ledgers.
    #[only_owner]
    #[endpoint(registerReserve)]
    fn register_reserve(
        &self,
        asset: EgldOrEsdtTokenIdentifier,
        config: ReserveConfig<Self::Api>,
        rate_config: InterestRateConfig<Self::Api>,
    ) {
        require!(!self.reserves().contains(&asset), ERROR_ASSET_ALREADY_SUPPORTED);
        self.validate_reserve_config(&config);

        let decimals = config.asset_decimals;
        let zero = self.to_decimal(BigUint::zero(), decimals);

        self.reserves().insert(asset.clone());
        self.reserve_config(&asset).set(&config);
        self.interest_rate_config(&asset).set(&rate_config);
        self.total_lp_supply(&asset).set(&zero);
        self.total_cash_available(&asset).set(&zero);
        self.reserve_amount(&asset).set(&zero);
        self.borrow_fee_pool(&asset).set(&zero);
        self.total_borrowed(&asset).set(&zero);
        self.total_borrowed_share(&asset).set(self.ray_zero());
        self.initial_exchange_rate(&asset)
            .set(self.to_decimal_wad(BigUint::from(WAD)));
        self.interest_accrue_timestamp(&asset)
            .set(self.blockchain().get_block_timestamp());

        self.register_reserve_event(&asset, &config, &rate_config);
    }

    #[only_owner]
    #[endpoint(updateReserveConfig)]
    fn update_reserve_config(
        &self,
        asset: EgldOrEsdtTokenIdentifier,
        config: ReserveConfig<Self::Api>,
    ) {
        require!(self.reserves().contains(&asset), ERROR_ASSET_NOT_SUPPORTED);
        self.validate_reserve_config(&config);
        self.reserve_config(&asset).set(&config);
        self.update_reserve_config_event(&asset, &config);
    }

    #[only_owner]
    #[endpoint(updateInterestRateConfig)]
    fn update_interest_rate_config(
        &self,
        asset: EgldOrEsdtTokenIdentifier,
        rate_config: InterestRateConfig<Self::Api>,
    ) {
        require!(self.reserves().contains(&asset), ERROR_ASSET_NOT_SUPPORTED);
        self.update_interest_rate_config_event(&asset, &rate_config);
        self.interest_rate_config(&asset).set(&rate_config);
    }

    fn validate_reserve_config(&self, config: &ReserveConfig<Self::Api>) {
        require!(
            config.liquidation_threshold >= config.loan_to_value,
            ERROR_INVALID_LIQUIDATION_THRESHOLD
        );
    }

    /// Creates a new e-mode category and returns its id.
    #[only_owner]
    #[endpoint(addEModeCategory)]
    fn add_e_mode_category(
        &self,
        loan_to_value: BigUint,
        liquidation_threshold: BigUint,
        liquidation_bonus: BigUint,
    ) -> u8 {
        let id = self.last_e_mode_category_id().get() + 1;
        self.last_e_mode_category_id().set(id);
        self.e_mode_categories().insert(
            id,
            EModeCategory {
                id,
                loan_to_value: self.to_decimal_bps(loan_to_value),
                liquidation_threshold: self.to_decimal_bps(liquidation_threshold),
                liquidation_bonus: self.to_decimal_bps(liquidation_bonus),
                deprecated: false,
            },
        );
        id
    }

    #[only_owner]
    #[endpoint(deprecateEModeCategory)]
    fn deprecate_e_mode_category(&self, id: u8) {
        let categories = self.e_mode_categories();
        require!(categories.contains_key(&id), ERROR_EMODE_CATEGORY_NOT_FOUND);
        let mut category = categories.get(&id).unwrap();
        category.deprecated = true;
        self.e_mode_categories().insert(id, category);
    }

    #[only_owner]
    #[endpoint(addAssetToEMode)]
    fn add_asset_to_e_mode(
        &self,
        asset: EgldOrEsdtTokenIdentifier,
        id: u8,
        is_collateralizable: bool,
        is_borrowable: bool,
    ) {
        require!(self.reserves().contains(&asset), ERROR_ASSET_NOT_SUPPORTED);
        require!(
            self.e_mode_categories().contains_key(&id),
            ERROR_EMODE_CATEGORY_NOT_FOUND
        );
        require!(
            !self.asset_e_modes(&asset).contains(&id),
            ERROR_ASSET_ALREADY_SUPPORTED_IN_EMODE
        );
        self.asset_e_modes(&asset).insert(id);
        self.e_mode_assets(id).insert(
            asset,
            EModeAssetConfig {
                is_collateralizable,
                is_borrowable,
            },
        );
    }

    /// Funds a farm: the attached payment becomes `remaining_reward`,
    /// distributed at `reward_per_day` base units per day.
    #[only_owner]
    #[payable("*")]
    #[endpoint(addReward)]
    fn add_reward(
        &self,
        asset: EgldOrEsdtTokenIdentifier,
        farming_type: FarmingType,
        reward_per_day: BigUint,
    ) {
        require!(self.reserves().contains(&asset), ERROR_ASSET_NOT_SUPPORTED);
        let (reward_token, amount) = self.call_value().egld_or_single_fungible_esdt();

        self.add_reward_event(&asset, &reward_token, &amount, &reward_per_day);

        self.farm_add_reward(
            &asset,
            farming_type,
            reward_token,
            self.to_decimal_ray(reward_per_day * BigUint::from(RAY)),
            self.to_decimal_ray(amount * BigUint::from(RAY)),
        );
    }

    /// Pulls undistributed reward back out of a farm, clamped to what is
    /// left, and returns it to the owner.
    #[only_owner]
    #[endpoint(removeReward)]
    fn remove_reward(
        &self,
        asset: EgldOrEsdtTokenIdentifier,
        farming_type: FarmingType,
        reward_token: EgldOrEsdtTokenIdentifier,
        amount: BigUint,
    ) {
        let removed = self.farm_take_reward(
            &asset,
            farming_type,
            &reward_token,
            &self.to_decimal_ray(amount * BigUint::from(RAY)),
        );

        let payout = removed.into_raw_units() / &BigUint::from(10u64).pow(RAY_PRECISION as u32);
        if payout > 0 {
            self.tx()
                .to(&self.blockchain().get_owner_address())
                .egld_or_single_esdt(&reward_token, 0, &payout)
                .transfer();
        }
    }

    /// Drains the accrued interest skim of `asset` to `receiver`.
    #[only_owner]
    #[endpoint(claimReserveRevenue)]
    fn claim_reserve_revenue(
        &self,
        asset: EgldOrEsdtTokenIdentifier,
        receiver: ManagedAddress,
    ) -> BigUint {
        require!(self.reserves().contains(&asset), ERROR_ASSET_NOT_SUPPORTED);

        let mut cache = ReserveCache::new(self, &asset);
        let requested = cache.reserve_amount.clone();
        let amount = self.withdraw_reserve_amount(&mut cache, &requested);
        drop(cache);

        let raw_amount = amount.into_raw_units().clone();
        self.claim_protocol_revenue_event(&asset, &receiver, &raw_amount);
        if raw_amount > 0 {
            self.tx()
                .to(&receiver)
                .egld_or_single_esdt(&asset, 0, &raw_amount)
                .transfer();
        }
        raw_amount
    }

    /// Drains the collected borrow fees of `asset` to `receiver`.
    #[only_owner]
    #[endpoint(claimBorrowFees)]
    fn claim_borrow_fees(
        &self,
        asset: EgldOrEsdtTokenIdentifier,
        receiver: ManagedAddress,
    ) -> BigUint {
        require!(self.reserves().contains(&asset), ERROR_ASSET_NOT_SUPPORTED);

        let mut cache = ReserveCache::new(self, &asset);
        let requested = cache.borrow_fee_pool.clone();
        let amount = self.withdraw_borrow_fee(&mut cache, &requested);
        drop(cache);

        let raw_amount = amount.into_raw_units().clone();
        self.claim_protocol_revenue_event(&asset, &receiver, &raw_amount);
        if raw_amount > 0 {
            self.tx()
                .to(&receiver)
                .egld_or_single_esdt(&asset, 0, &raw_amount)
                .transfer();
        }
        raw_amount
    }

    /// Millionth share of the borrow fee paid to `referrer` on referred
    /// borrows.
    #[only_owner]
    #[endpoint(setReferralFeeShare)]
    fn set_referral_fee_share(&self, referrer: ManagedAddress, share_millionth: u64) {
        self.referral_fee_share(&referrer)
            .set(self.from_millionth(share_millionth));
    }

    #[only_owner]
    #[endpoint(setPaused)]
    fn set_paused(&self, paused: bool) {
        self.paused().set(paused);
    }
}
