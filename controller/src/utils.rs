use common_constants::WAD_PRECISION;

use crate::storage;

use reserve_layer::ReserveCache;

multiversx_sc::imports!();

/// Profile valuation: the sums behind borrowing power, maintenance margin and
/// risk-adjusted debt.
///
/// Every function here accrues the touched reserve before reading its
/// exchange rate; a stale borrowed amount feeding a solvency decision is the
/// one ordering bug this subsystem cannot tolerate. Caches are created and
/// dropped strictly sequentially, one asset at a time, so no two snapshots of
/// the same reserve ever overlap.
#[multiversx_sc::module]
pub trait LendingUtilsModule:
    storage::Storage
    + crate::oracle::OracleModule
    + crate::positions::emode::EModeModule
    + reserve_layer::storage::ReserveStorage
    + reserve_layer::ledger::ReserveLedgerModule
    + common_math::SharedMathModule
    + common_rates::InterestRates
    + common_events::EventsModule
    + multiversx_sc_modules::only_admin::OnlyAdminModule
{
    /// USD value (WAD) of an amount at a WAD price, floored.
    fn get_asset_value_usd(
        &self,
        amount: &ManagedDecimal<Self::Api, NumDecimals>,
        price: &ManagedDecimal<Self::Api, NumDecimals>,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        self.mul_floor(amount, price, WAD_PRECISION)
    }

    /// Σ collateral value × LTV, with e-mode overrides resolved per asset.
    fn get_total_borrowing_power(
        &self,
        owner: &ManagedAddress,
        subaccount: u8,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let e_mode_id = self.profile_e_mode(owner, subaccount).get();
        let mut power = self.wad_zero();

        for (asset, deposit) in self.deposits(owner, subaccount).iter() {
            let config = self.resolve_reserve_config(&asset, e_mode_id);
            let price = self.get_price(&asset);

            let mut cache = ReserveCache::new(self, &asset);
            self.accrue_interest(&mut cache);
            let underlying = cache.underlying_amount_from_lp(&deposit.collateral_lp_amount);
            drop(cache);

            let value = self.get_asset_value_usd(&underlying, &price);
            power += self.mul_floor(&value, &config.loan_to_value, WAD_PRECISION);
        }

        power
    }

    /// Σ collateral value × liquidation threshold: the maintenance margin.
    fn get_liquidation_borrow_value(
        &self,
        owner: &ManagedAddress,
        subaccount: u8,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let e_mode_id = self.profile_e_mode(owner, subaccount).get();
        let mut threshold_value = self.wad_zero();

        for (asset, deposit) in self.deposits(owner, subaccount).iter() {
            let config = self.resolve_reserve_config(&asset, e_mode_id);
            let price = self.get_price(&asset);

            let mut cache = ReserveCache::new(self, &asset);
            self.accrue_interest(&mut cache);
            let underlying = cache.underlying_amount_from_lp(&deposit.collateral_lp_amount);
            drop(cache);

            let value = self.get_asset_value_usd(&underlying, &price);
            threshold_value +=
                self.mul_floor(&value, &config.liquidation_threshold, WAD_PRECISION);
        }

        threshold_value
    }

    /// Σ debt value / borrow factor, ceil-rounded. Dividing by a factor below
    /// 100% risk-weights volatile borrow assets upward.
    fn get_adjusted_borrowed_value(
        &self,
        owner: &ManagedAddress,
        subaccount: u8,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let mut adjusted = self.wad_zero();

        for (asset, loan) in self.loans(owner, subaccount).iter() {
            let price = self.get_price(&asset);
            let config = self.reserve_config(&asset).get();

            let mut cache = ReserveCache::new(self, &asset);
            self.accrue_interest(&mut cache);
            let owed = cache.borrow_amount_from_share_ceil(&loan.borrowed_share);
            drop(cache);

            let value = self.mul_ceil(&owed, &price, WAD_PRECISION);
            adjusted += self.div_ceil(&value, &config.borrow_factor, WAD_PRECISION);
        }

        adjusted
    }

    /// Σ plain debt value, no risk weighting; the liquidation close factor
    /// caps against this.
    fn get_total_borrowed_value(
        &self,
        owner: &ManagedAddress,
        subaccount: u8,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let mut total = self.wad_zero();

        for (asset, loan) in self.loans(owner, subaccount).iter() {
            let price = self.get_price(&asset);

            let mut cache = ReserveCache::new(self, &asset);
            self.accrue_interest(&mut cache);
            let owed = cache.borrow_amount_from_share_ceil(&loan.borrowed_share);
            drop(cache);

            total += self.mul_ceil(&owed, &price, WAD_PRECISION);
        }

        total
    }

    /// THE solvency invariant: risk-adjusted debt within borrowing power.
    fn has_enough_collateral(&self, owner: &ManagedAddress, subaccount: u8) -> bool {
        let adjusted_borrowed = self.get_adjusted_borrowed_value(owner, subaccount);
        if adjusted_borrowed == self.wad_zero() {
            return true;
        }
        adjusted_borrowed <= self.get_total_borrowing_power(owner, subaccount)
    }

    /// Emits the canonical market snapshot event for `asset`.
    fn emit_market_update(&self, asset: &EgldOrEsdtTokenIdentifier) {
        self.update_market_state_event(
            self.blockchain().get_block_timestamp(),
            asset,
            &self.total_cash_available(asset).get(),
            &self.total_lp_supply(asset).get(),
            &self.total_borrowed(asset).get(),
            &self.total_borrowed_share(asset).get(),
            &self.reserve_amount(asset).get(),
        );
    }
}
