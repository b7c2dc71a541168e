use common_structs::FarmingType;

use crate::{rewards, storage};

use reserve_layer::ReserveCache;

use super::account;

multiversx_sc::imports!();

#[multiversx_sc::module]
pub trait PositionRepayModule:
    storage::Storage
    + account::PositionAccountModule
    + rewards::RewardsModule
    + reserve_layer::storage::ReserveStorage
    + reserve_layer::ledger::ReserveLedgerModule
    + reserve_layer::farm::ReserveFarmModule
    + common_math::SharedMathModule
    + common_rates::InterestRates
{
    /// Settles up to `payment` of this profile's debt in `asset`.
    ///
    /// Returns `(repaid, refund)`: the amount consumed and the excess to hand
    /// back to the payer unconsumed.
    fn process_repayment(
        &self,
        owner: &ManagedAddress,
        subaccount: u8,
        asset: &EgldOrEsdtTokenIdentifier,
        payment: &ManagedDecimal<Self::Api, NumDecimals>,
    ) -> (
        ManagedDecimal<Self::Api, NumDecimals>,
        ManagedDecimal<Self::Api, NumDecimals>,
    ) {
        let mut loan = self.get_loan_or_fail(owner, subaccount, asset);

        let mut cache = ReserveCache::new(self, asset);
        let (actual_repay, settled_share, refund) =
            self.repay_to_reserve(&mut cache, payment, &loan.borrowed_share);

        loan.borrowed_share -= settled_share.clone();
        self.store_loan(owner, subaccount, asset, loan);
        self.profile_farm_try_remove_share(
            owner,
            subaccount,
            asset,
            FarmingType::Borrow,
            &settled_share,
        );

        (actual_repay, refund)
    }
}
