use common_constants::{RAY_PRECISION, WAD_PRECISION};
use common_structs::FarmingType;

use crate::storage;

multiversx_sc::imports!();
multiversx_sc::derive_imports!();

/// Read-only profile metrics for off-chain consumers.
///
/// Queries cannot write storage, so these value positions at the last
/// accrued exchange rates instead of building a reserve cache; figures can
/// trail the accrual-fresh numbers the mutating paths use by the interest of
/// the current block gap.
#[multiversx_sc::module]
pub trait ViewsModule:
    storage::Storage
    + crate::oracle::OracleModule
    + crate::positions::emode::EModeModule
    + crate::rewards::RewardsModule
    + reserve_layer::storage::ReserveStorage
    + reserve_layer::farm::ReserveFarmModule
    + reserve_layer::view::ReserveViewModule
    + common_math::SharedMathModule
    + common_rates::InterestRates
    + common_events::EventsModule
    + multiversx_sc_modules::only_admin::OnlyAdminModule
{
    fn view_underlying_from_lp(
        &self,
        asset: &EgldOrEsdtTokenIdentifier,
        lp_amount: &ManagedDecimal<Self::Api, NumDecimals>,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let config = self.reserve_config(asset).get();
        let lp_supply = self.total_lp_supply(asset).get();
        let zero = self.to_decimal(BigUint::zero(), config.asset_decimals);

        let amount_ray = if lp_supply == zero {
            self.mul_floor(
                lp_amount,
                &self.initial_exchange_rate(asset).get(),
                RAY_PRECISION,
            )
        } else {
            let liquidity = self.total_cash_available(asset).get()
                + self.total_borrowed(asset).get()
                - self.reserve_amount(asset).get();
            let scaled = self.mul_floor(lp_amount, &liquidity, RAY_PRECISION);
            self.div_floor(&scaled, &lp_supply, RAY_PRECISION)
        };
        self.rescale_floor(&amount_ray, config.asset_decimals)
    }

    #[view(getTotalBorrowingPower)]
    fn get_total_borrowing_power_view(
        &self,
        owner: ManagedAddress,
        subaccount: u8,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let e_mode_id = self.profile_e_mode(&owner, subaccount).get();
        let mut power = self.wad_zero();
        for (asset, deposit) in self.deposits(&owner, subaccount).iter() {
            let config = self.resolve_reserve_config(&asset, e_mode_id);
            let underlying = self.view_underlying_from_lp(&asset, &deposit.collateral_lp_amount);
            let value = self.mul_floor(&underlying, &self.get_price(&asset), WAD_PRECISION);
            power += self.mul_floor(&value, &config.loan_to_value, WAD_PRECISION);
        }
        power
    }

    #[view(getAdjustedBorrowedValue)]
    fn get_adjusted_borrowed_value_view(
        &self,
        owner: ManagedAddress,
        subaccount: u8,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let mut adjusted = self.wad_zero();
        for (asset, loan) in self.loans(&owner, subaccount).iter() {
            let config = self.reserve_config(&asset).get();
            let owed = self.get_borrow_amount_for_share(&asset, loan.borrowed_share);
            let value = self.mul_ceil(&owed, &self.get_price(&asset), WAD_PRECISION);
            adjusted += self.div_ceil(&value, &config.borrow_factor, WAD_PRECISION);
        }
        adjusted
    }

    #[view(getLiquidationBorrowValue)]
    fn get_liquidation_borrow_value_view(
        &self,
        owner: ManagedAddress,
        subaccount: u8,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let e_mode_id = self.profile_e_mode(&owner, subaccount).get();
        let mut threshold_value = self.wad_zero();
        for (asset, deposit) in self.deposits(&owner, subaccount).iter() {
            let config = self.resolve_reserve_config(&asset, e_mode_id);
            let underlying = self.view_underlying_from_lp(&asset, &deposit.collateral_lp_amount);
            let value = self.mul_floor(&underlying, &self.get_price(&asset), WAD_PRECISION);
            threshold_value += self.mul_floor(&value, &config.liquidation_threshold, WAD_PRECISION);
        }
        threshold_value
    }

    /// True when the profile is past its maintenance margin and open to
    /// liquidation.
    #[view(isLiquidatable)]
    fn is_liquidatable(&self, owner: ManagedAddress, subaccount: u8) -> bool {
        let adjusted = self.get_adjusted_borrowed_value_view(owner.clone(), subaccount);
        if adjusted == self.wad_zero() {
            return false;
        }
        adjusted >= self.get_liquidation_borrow_value_view(owner, subaccount)
    }

    #[view(getAccountDeposits)]
    fn get_account_deposits(
        &self,
        owner: ManagedAddress,
        subaccount: u8,
    ) -> MultiValueEncoded<MultiValue3<EgldOrEsdtTokenIdentifier, BigUint, BigUint>> {
        let mut result = MultiValueEncoded::new();
        for (asset, deposit) in self.deposits(&owner, subaccount).iter() {
            let underlying = self.view_underlying_from_lp(&asset, &deposit.collateral_lp_amount);
            result.push(
                (
                    asset,
                    deposit.collateral_lp_amount.into_raw_units().clone(),
                    underlying.into_raw_units().clone(),
                )
                    .into(),
            );
        }
        result
    }

    #[view(getAccountLoans)]
    fn get_account_loans(
        &self,
        owner: ManagedAddress,
        subaccount: u8,
    ) -> MultiValueEncoded<MultiValue3<EgldOrEsdtTokenIdentifier, BigUint, BigUint>> {
        let mut result = MultiValueEncoded::new();
        for (asset, loan) in self.loans(&owner, subaccount).iter() {
            let owed = self.get_borrow_amount_for_share(&asset, loan.borrowed_share.clone());
            result.push(
                (
                    asset,
                    loan.borrowed_share.into_raw_units().clone(),
                    owed.into_raw_units().clone(),
                )
                    .into(),
            );
        }
        result
    }

    /// Unclaimed rewards as of the current block, simulated in memory (the
    /// stored accumulator is not touched).
    #[view(getUnclaimedRewards)]
    fn get_unclaimed_rewards(
        &self,
        owner: ManagedAddress,
        subaccount: u8,
        asset: EgldOrEsdtTokenIdentifier,
        farming_type: FarmingType,
    ) -> MultiValueEncoded<MultiValue2<EgldOrEsdtTokenIdentifier, BigUint>> {
        let mut result = MultiValueEncoded::new();

        let mut farm = self.get_or_create_farm(&asset, farming_type);
        farm.accrue(self.blockchain().get_block_timestamp());

        let mut profile_farm = self.load_profile_farm(&owner, subaccount, &asset, farming_type);
        profile_farm.settle(&farm);

        for entry in profile_farm.rewards.iter() {
            let payout = entry.unclaimed_amount.into_raw_units()
                / &BigUint::from(10u64).pow(RAY_PRECISION as u32);
            result.push((entry.reward_token.clone(), payout).into());
        }
        result
    }
}
