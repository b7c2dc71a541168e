multiversx_sc::imports!();
multiversx_sc::derive_imports!();

use common_structs::{FarmingType, InterestRateConfig, ReserveConfig, ReserveFarm};

/// The reserve registry: every per-asset ledger field, keyed by asset id.
///
/// The controller contract is the only composer of this trait, which makes it
/// the sole owner of the registry state.
#[multiversx_sc::module]
pub trait ReserveStorage {
    /// The set of registered reserve assets.
    #[view(getReserves)]
    #[storage_mapper("reserves")]
    fn reserves(&self) -> UnorderedSetMapper<EgldOrEsdtTokenIdentifier>;

    #[view(getReserveConfig)]
    #[storage_mapper("reserve_config")]
    fn reserve_config(
        &self,
        asset: &EgldOrEsdtTokenIdentifier,
    ) -> SingleValueMapper<ReserveConfig<Self::Api>>;

    #[view(getInterestRateConfig)]
    #[storage_mapper("interest_rate_config")]
    fn interest_rate_config(
        &self,
        asset: &EgldOrEsdtTokenIdentifier,
    ) -> SingleValueMapper<InterestRateConfig<Self::Api>>;

    /// LP units minted against this reserve, in asset decimals.
    #[view(getTotalLpSupply)]
    #[storage_mapper("total_lp_supply")]
    fn total_lp_supply(
        &self,
        asset: &EgldOrEsdtTokenIdentifier,
    ) -> SingleValueMapper<ManagedDecimal<Self::Api, NumDecimals>>;

    /// Underlying units held by the registry and lendable, in asset decimals.
    #[view(getTotalCashAvailable)]
    #[storage_mapper("total_cash_available")]
    fn total_cash_available(
        &self,
        asset: &EgldOrEsdtTokenIdentifier,
    ) -> SingleValueMapper<ManagedDecimal<Self::Api, NumDecimals>>;

    /// Protocol-owned interest skim, claimable by the owner.
    #[view(getReserveAmount)]
    #[storage_mapper("reserve_amount")]
    fn reserve_amount(
        &self,
        asset: &EgldOrEsdtTokenIdentifier,
    ) -> SingleValueMapper<ManagedDecimal<Self::Api, NumDecimals>>;

    /// Collected borrow fees, claimable by the owner.
    #[view(getBorrowFeePool)]
    #[storage_mapper("borrow_fee_pool")]
    fn borrow_fee_pool(
        &self,
        asset: &EgldOrEsdtTokenIdentifier,
    ) -> SingleValueMapper<ManagedDecimal<Self::Api, NumDecimals>>;

    /// Outstanding debt valued in underlying units, in asset decimals.
    #[view(getTotalBorrowed)]
    #[storage_mapper("total_borrowed")]
    fn total_borrowed(
        &self,
        asset: &EgldOrEsdtTokenIdentifier,
    ) -> SingleValueMapper<ManagedDecimal<Self::Api, NumDecimals>>;

    /// Outstanding debt in normalized shares, RAY-scaled. The ratio
    /// `total_borrowed / total_borrowed_share` only ever grows.
    #[view(getTotalBorrowedShare)]
    #[storage_mapper("total_borrowed_share")]
    fn total_borrowed_share(
        &self,
        asset: &EgldOrEsdtTokenIdentifier,
    ) -> SingleValueMapper<ManagedDecimal<Self::Api, NumDecimals>>;

    #[view(getInterestAccrueTimestamp)]
    #[storage_mapper("interest_accrue_timestamp")]
    fn interest_accrue_timestamp(&self, asset: &EgldOrEsdtTokenIdentifier)
        -> SingleValueMapper<u64>;

    /// Underlying per LP unit while `total_lp_supply == 0`, WAD-scaled.
    #[view(getInitialExchangeRate)]
    #[storage_mapper("initial_exchange_rate")]
    fn initial_exchange_rate(
        &self,
        asset: &EgldOrEsdtTokenIdentifier,
    ) -> SingleValueMapper<ManagedDecimal<Self::Api, NumDecimals>>;

    #[view(getReserveFarm)]
    #[storage_mapper("reserve_farm")]
    fn reserve_farm(
        &self,
        asset: &EgldOrEsdtTokenIdentifier,
        farming_type: FarmingType,
    ) -> SingleValueMapper<ReserveFarm<Self::Api>>;
}
