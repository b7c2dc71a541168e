use common_structs::{Deposit, EModeAssetConfig, EModeCategory, Loan, ProfileFarm};

multiversx_sc::imports!();

/// Profile (user-subaccount) state, e-mode tables, oracle feeds and referral
/// configuration. Reserve-side state lives in `reserve_layer::storage`.
#[multiversx_sc::module]
pub trait Storage {
    /// Collateral positions of one profile, keyed by asset. Entries are
    /// removed the moment they reach zero; iteration code relies on that.
    #[storage_mapper("deposits")]
    fn deposits(
        &self,
        owner: &ManagedAddress,
        subaccount: u8,
    ) -> MapMapper<EgldOrEsdtTokenIdentifier, Deposit<Self::Api>>;

    /// Loan positions of one profile, keyed by asset. Same zero-entry rule.
    #[storage_mapper("loans")]
    fn loans(
        &self,
        owner: &ManagedAddress,
        subaccount: u8,
    ) -> MapMapper<EgldOrEsdtTokenIdentifier, Loan<Self::Api>>;

    #[storage_mapper("deposit_farm")]
    fn deposit_farm(
        &self,
        owner: &ManagedAddress,
        subaccount: u8,
        asset: &EgldOrEsdtTokenIdentifier,
    ) -> SingleValueMapper<ProfileFarm<Self::Api>>;

    #[storage_mapper("borrow_farm")]
    fn borrow_farm(
        &self,
        owner: &ManagedAddress,
        subaccount: u8,
        asset: &EgldOrEsdtTokenIdentifier,
    ) -> SingleValueMapper<ProfileFarm<Self::Api>>;

    /// Active e-mode category of a profile; 0 means none.
    #[view(getProfileEMode)]
    #[storage_mapper("profile_e_mode")]
    fn profile_e_mode(&self, owner: &ManagedAddress, subaccount: u8) -> SingleValueMapper<u8>;

    #[view(getEModes)]
    #[storage_mapper("e_mode_categories")]
    fn e_mode_categories(&self) -> MapMapper<u8, EModeCategory<Self::Api>>;

    #[view(lastEModeCategoryId)]
    #[storage_mapper("last_e_mode_category_id")]
    fn last_e_mode_category_id(&self) -> SingleValueMapper<u8>;

    /// E-mode categories a given asset participates in.
    #[view(getAssetEModes)]
    #[storage_mapper("asset_e_modes")]
    fn asset_e_modes(&self, asset: &EgldOrEsdtTokenIdentifier) -> UnorderedSetMapper<u8>;

    /// Per-asset flags inside a category.
    #[view(getEModesAssets)]
    #[storage_mapper("e_mode_assets")]
    fn e_mode_assets(&self, id: u8) -> MapMapper<EgldOrEsdtTokenIdentifier, EModeAssetConfig>;

    /// Trusted USD price per whole token, WAD-scaled.
    #[view(getPriceFeed)]
    #[storage_mapper("price_feed")]
    fn price_feed(
        &self,
        asset: &EgldOrEsdtTokenIdentifier,
    ) -> SingleValueMapper<ManagedDecimal<Self::Api, NumDecimals>>;

    /// Share of the borrow fee redirected to a referrer, millionth-scaled.
    #[view(getReferralFeeShare)]
    #[storage_mapper("referral_fee_share")]
    fn referral_fee_share(
        &self,
        referrer: &ManagedAddress,
    ) -> SingleValueMapper<ManagedDecimal<Self::Api, NumDecimals>>;

    #[view(isPaused)]
    #[storage_mapper("paused")]
    fn paused(&self) -> SingleValueMapper<bool>;
}
