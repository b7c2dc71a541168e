use common_constants::RAY_PRECISION;
use common_structs::{FarmingType, Loan};

use crate::{rewards, storage};

use reserve_layer::ReserveCache;

use super::{account, CheckEquity};

multiversx_sc::imports!();

/// Borrow flow: fee on top of principal, optional referral split, normalized
/// share recorded against the profile.
#[multiversx_sc::module]
pub trait PositionBorrowModule:
    storage::Storage
    + account::PositionAccountModule
    + rewards::RewardsModule
    + reserve_layer::storage::ReserveStorage
    + reserve_layer::ledger::ReserveLedgerModule
    + reserve_layer::farm::ReserveFarmModule
    + common_math::SharedMathModule
    + common_rates::InterestRates
{
    /// Books a borrow of `amount` for this profile. The borrow fee is added
    /// on top of the principal debt; the borrower receives `amount`.
    ///
    /// Returns `(fee, referral_share, check)`; the caller pays out `amount`
    /// to the borrower, `referral_share` to the referrer, and MUST discharge
    /// `check`.
    fn process_borrow(
        &self,
        owner: &ManagedAddress,
        subaccount: u8,
        asset: &EgldOrEsdtTokenIdentifier,
        amount: &ManagedDecimal<Self::Api, NumDecimals>,
        opt_referrer: Option<ManagedAddress>,
    ) -> (
        ManagedDecimal<Self::Api, NumDecimals>,
        ManagedDecimal<Self::Api, NumDecimals>,
        CheckEquity<Self::Api>,
    ) {
        let mut cache = ReserveCache::new(self, asset);

        let fee = self.calculate_borrow_fee(&cache, amount);
        let debt_amount = amount.clone() + fee.clone();
        let share = self.borrow_from_reserve(&mut cache, &debt_amount);

        let referral_share = self.split_referral_fee(&mut cache, &fee, opt_referrer);

        let mut loan = match self.get_loan(owner, subaccount, asset) {
            Some(loan) => loan,
            None => Loan {
                borrowed_share: self.ray_zero(),
            },
        };
        loan.borrowed_share += &share;
        self.store_loan(owner, subaccount, asset, loan);
        self.profile_farm_add_share(owner, subaccount, asset, FarmingType::Borrow, &share);

        (
            fee,
            referral_share,
            CheckEquity::new(owner.clone(), subaccount),
        )
    }

    /// Splits the borrow fee between the fee pool and a configured referrer.
    /// Returns the referrer's cut, which the caller transfers out.
    fn split_referral_fee(
        &self,
        cache: &mut ReserveCache<Self>,
        fee: &ManagedDecimal<Self::Api, NumDecimals>,
        opt_referrer: Option<ManagedAddress>,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let referral_share = match opt_referrer {
            Some(referrer) => {
                let percentage_mapper = self.referral_fee_share(&referrer);
                if percentage_mapper.is_empty() {
                    cache.zero.clone()
                } else {
                    let share_ray =
                        self.mul_floor(fee, &percentage_mapper.get(), RAY_PRECISION);
                    self.rescale_floor(&share_ray, cache.config.asset_decimals)
                }
            },
            None => cache.zero.clone(),
        };

        cache.borrow_fee_pool += &(fee.clone() - referral_share.clone());

        referral_share
    }
}
