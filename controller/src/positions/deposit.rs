use common_constants::RAY_PRECISION;
use common_errors::ERROR_COLLATERAL_DISABLED;
use common_structs::{Deposit, FarmingType};

use crate::{rewards, storage};

use reserve_layer::ReserveCache;

use super::account;

multiversx_sc::imports!();

/// Deposit flow: repay-first, then collateralize the remainder.
#[multiversx_sc::module]
pub trait PositionDepositModule:
    storage::Storage
    + account::PositionAccountModule
    + rewards::RewardsModule
    + reserve_layer::storage::ReserveStorage
    + reserve_layer::ledger::ReserveLedgerModule
    + reserve_layer::farm::ReserveFarmModule
    + common_math::SharedMathModule
    + common_rates::InterestRates
{
    /// Applies `amount` of underlying to this profile: outstanding debt in
    /// the same asset is settled first, and whatever is left (unless
    /// `repay_only`) is converted to LP units and added as collateral.
    ///
    /// Returns `(repaid, deposited_lp, refund)` in asset units; `refund` is
    /// only non-zero for `repay_only` payments exceeding the debt.
    fn process_deposit(
        &self,
        owner: &ManagedAddress,
        subaccount: u8,
        asset: &EgldOrEsdtTokenIdentifier,
        amount: &ManagedDecimal<Self::Api, NumDecimals>,
        repay_only: bool,
    ) -> (
        ManagedDecimal<Self::Api, NumDecimals>,
        ManagedDecimal<Self::Api, NumDecimals>,
        ManagedDecimal<Self::Api, NumDecimals>,
    ) {
        let mut cache = ReserveCache::new(self, asset);

        let mut repaid = cache.zero.clone();
        let mut deposited_lp = cache.zero.clone();
        let mut remainder = amount.clone();

        if let Some(mut loan) = self.get_loan(owner, subaccount, asset) {
            let (actual_repay, settled_share, refund) =
                self.repay_to_reserve(&mut cache, amount, &loan.borrowed_share);

            loan.borrowed_share -= settled_share.clone();
            self.store_loan(owner, subaccount, asset, loan);
            self.profile_farm_try_remove_share(
                owner,
                subaccount,
                asset,
                FarmingType::Borrow,
                &settled_share,
            );

            repaid = actual_repay;
            remainder = refund;
        }

        if !repay_only && remainder != cache.zero {
            require!(cache.config.allow_collateral, ERROR_COLLATERAL_DISABLED);

            let lp_amount = self.mint(&mut cache, &remainder);

            let mut deposit = match self.get_deposit(owner, subaccount, asset) {
                Some(deposit) => deposit,
                None => Deposit {
                    collateral_lp_amount: cache.zero.clone(),
                },
            };
            deposit.collateral_lp_amount += &lp_amount;
            self.store_deposit(owner, subaccount, asset, deposit);

            self.profile_farm_add_share(
                owner,
                subaccount,
                asset,
                FarmingType::Deposit,
                &lp_amount.rescale(RAY_PRECISION),
            );

            deposited_lp = lp_amount;
            remainder = cache.zero.clone();
        }

        (repaid, deposited_lp, remainder)
    }
}
