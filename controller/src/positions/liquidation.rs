use common_constants::{
    LIQUIDATION_CLOSE_AMOUNT_WAD, LIQUIDATION_CLOSE_FACTOR_BPS, RAY_PRECISION, WAD_PRECISION,
};
use common_errors::{
    ERROR_AMOUNT_MUST_BE_GREATER_THAN_ZERO, ERROR_HEALTHY_ACCOUNT, ERROR_NO_COLLATERAL_TOKEN,
};
use common_structs::FarmingType;

use crate::{rewards, storage, utils};

use reserve_layer::ReserveCache;

use super::account;

multiversx_sc::imports!();
multiversx_sc::derive_imports!();

/// Liquidation of unhealthy profiles: repay one debt asset, seize one
/// collateral asset at a bonus.
///
/// Two regimes. Near-dust debt (below the closeout value threshold) may be
/// closed in full so residue positions cannot linger uneconomically. Larger
/// debt is capped by the close factor at half the profile's total debt value,
/// so no single transaction can wipe a large position. Both legs round
/// against the liquidator: repaid amounts ceil, seized amounts floor.
#[multiversx_sc::module]
pub trait PositionLiquidationModule:
    storage::Storage
    + account::PositionAccountModule
    + rewards::RewardsModule
    + utils::LendingUtilsModule
    + crate::oracle::OracleModule
    + crate::positions::emode::EModeModule
    + reserve_layer::storage::ReserveStorage
    + reserve_layer::ledger::ReserveLedgerModule
    + reserve_layer::farm::ReserveFarmModule
    + common_math::SharedMathModule
    + common_rates::InterestRates
    + common_events::EventsModule
    + multiversx_sc_modules::only_admin::OnlyAdminModule
{
    /// Executes a liquidation and returns
    /// `(repaid, refund, seized_lp, seized_underlying)` in the respective
    /// asset units. The caller refunds the liquidator and transfers the
    /// seized underlying out.
    fn process_liquidation(
        &self,
        owner: &ManagedAddress,
        subaccount: u8,
        repay_asset: &EgldOrEsdtTokenIdentifier,
        collateral_asset: &EgldOrEsdtTokenIdentifier,
        payment: &ManagedDecimal<Self::Api, NumDecimals>,
    ) -> (
        ManagedDecimal<Self::Api, NumDecimals>,
        ManagedDecimal<Self::Api, NumDecimals>,
        ManagedDecimal<Self::Api, NumDecimals>,
        ManagedDecimal<Self::Api, NumDecimals>,
    ) {
        let mut loan = self.get_loan_or_fail(owner, subaccount, repay_asset);
        let mut deposit = match self.get_deposit(owner, subaccount, collateral_asset) {
            Some(deposit) => deposit,
            None => sc_panic!(ERROR_NO_COLLATERAL_TOKEN),
        };

        // Health gate. The valuations accrue every touched reserve, so the
        // comparison never runs on stale interest.
        let liquidation_value = self.get_liquidation_borrow_value(owner, subaccount);
        let adjusted_debt = self.get_adjusted_borrowed_value(owner, subaccount);
        require!(adjusted_debt >= liquidation_value, ERROR_HEALTHY_ACCOUNT);

        let repay_price = self.get_price(repay_asset);
        let collateral_price = self.get_price(collateral_asset);
        let e_mode_id = self.profile_e_mode(owner, subaccount).get();
        let collateral_config = self.resolve_reserve_config(collateral_asset, e_mode_id);
        let repay_decimals = self.reserve_config(repay_asset).get().asset_decimals;

        // Debt leg figures.
        let outstanding;
        {
            let mut cache = ReserveCache::new(self, repay_asset);
            self.accrue_interest(&mut cache);
            outstanding = self.calculate_repay(&cache, &loan.borrowed_share);
        }
        let debt_value = self.mul_ceil(&outstanding, &repay_price, WAD_PRECISION);

        // Close-factor cap, lifted for near-dust debt.
        let close_amount = self.to_decimal_wad(BigUint::from(LIQUIDATION_CLOSE_AMOUNT_WAD));
        let mut target_value = if debt_value < close_amount {
            debt_value.clone()
        } else {
            let total_debt_value = self.get_total_borrowed_value(owner, subaccount);
            let max_value = self.mul_floor(
                &total_debt_value,
                &self.from_bips(LIQUIDATION_CLOSE_FACTOR_BPS),
                WAD_PRECISION,
            );
            self.get_min(debt_value.clone(), max_value)
        };

        // The liquidator's payment is the last cap.
        let payment_value = self.mul_floor(payment, &repay_price, WAD_PRECISION);
        target_value = self.get_min(target_value, payment_value);
        require!(
            target_value != self.wad_zero(),
            ERROR_AMOUNT_MUST_BE_GREATER_THAN_ZERO
        );

        // Collateral constraint at the bonus rate.
        let available_value;
        {
            let mut cache = ReserveCache::new(self, collateral_asset);
            self.accrue_interest(&mut cache);
            let available_underlying =
                cache.underlying_amount_from_lp(&deposit.collateral_lp_amount);
            available_value = self.mul_floor(&available_underlying, &collateral_price, WAD_PRECISION);
        }

        let bonus_factor = self.bps() + collateral_config.liquidation_bonus.clone();
        let required_value = self.mul_ceil(&target_value, &bonus_factor, WAD_PRECISION);
        let (repay_value, seized_value, seize_all) = if required_value > available_value {
            // Collateral-constrained: seize the whole position, repay what it
            // is worth net of the bonus.
            let scaled_repay = self.div_floor(&available_value, &bonus_factor, WAD_PRECISION);
            (scaled_repay, available_value, true)
        } else {
            (target_value, required_value, false)
        };

        // Value -> amount conversions, rounded against the liquidator.
        let repay_amount_ray = self.div_ceil(&repay_value, &repay_price, RAY_PRECISION);
        let mut repay_amount = self.rescale_ceil(&repay_amount_ray, repay_decimals);
        repay_amount = self.get_min(repay_amount, payment.clone());

        // Repay leg.
        let actual_repaid;
        let refund;
        {
            let mut cache = ReserveCache::new(self, repay_asset);
            let (actual, settled_share, _) =
                self.repay_to_reserve(&mut cache, &repay_amount, &loan.borrowed_share);
            loan.borrowed_share -= settled_share.clone();
            self.store_loan(owner, subaccount, repay_asset, loan);
            self.profile_farm_try_remove_share(
                owner,
                subaccount,
                repay_asset,
                FarmingType::Borrow,
                &settled_share,
            );
            refund = payment.clone() - actual.clone();
            actual_repaid = actual;
        }

        // Seize leg. Repaying moved value between cash and debt without
        // touching user liquidity, so the LP exchange rate is unchanged.
        let seized_lp;
        let seized_underlying;
        {
            let mut cache = ReserveCache::new(self, collateral_asset);
            let mut lp_to_seize = if seize_all {
                deposit.collateral_lp_amount.clone()
            } else {
                let seized_underlying_ray =
                    self.div_floor(&seized_value, &collateral_price, RAY_PRECISION);
                let underlying =
                    self.rescale_floor(&seized_underlying_ray, cache.config.asset_decimals);
                cache.lp_amount_from_underlying(&underlying)
            };
            lp_to_seize = self.get_min(lp_to_seize, deposit.collateral_lp_amount.clone());

            seized_underlying = self.redeem(&mut cache, &lp_to_seize, true);

            deposit.collateral_lp_amount -= &lp_to_seize;
            self.store_deposit(owner, subaccount, collateral_asset, deposit);
            self.profile_farm_try_remove_share(
                owner,
                subaccount,
                collateral_asset,
                FarmingType::Deposit,
                &lp_to_seize.rescale(RAY_PRECISION),
            );
            seized_lp = lp_to_seize;
        }

        (actual_repaid, refund, seized_lp, seized_underlying)
    }
}
