use common_constants::RAY_PRECISION;
use common_errors::ERROR_POSITION_NOT_FOUND;
use common_structs::{FarmingType, Loan};

use crate::{rewards, storage};

use reserve_layer::ReserveCache;

use super::{account, CheckEquity};

multiversx_sc::imports!();

/// Withdraw flow: drain collateral first, borrow the shortfall if allowed.
#[multiversx_sc::module]
pub trait PositionWithdrawModule:
    storage::Storage
    + account::PositionAccountModule
    + rewards::RewardsModule
    + reserve_layer::storage::ReserveStorage
    + reserve_layer::ledger::ReserveLedgerModule
    + reserve_layer::farm::ReserveFarmModule
    + common_math::SharedMathModule
    + common_rates::InterestRates
{
    /// Takes up to `requested` underlying out of this profile's collateral.
    /// Without `allow_borrow` the withdrawal caps at the position; with it,
    /// the shortfall is borrowed on top (fee included in the new debt).
    ///
    /// Returns `(redeemed, borrowed, check)`; the caller transfers
    /// `redeemed + borrowed` out and MUST discharge `check` before the
    /// operation can complete.
    fn process_withdrawal(
        &self,
        owner: &ManagedAddress,
        subaccount: u8,
        asset: &EgldOrEsdtTokenIdentifier,
        requested: &ManagedDecimal<Self::Api, NumDecimals>,
        allow_borrow: bool,
    ) -> (
        ManagedDecimal<Self::Api, NumDecimals>,
        ManagedDecimal<Self::Api, NumDecimals>,
        CheckEquity<Self::Api>,
    ) {
        let mut cache = ReserveCache::new(self, asset);
        self.accrue_interest(&mut cache);

        let mut redeemed = cache.zero.clone();
        let mut borrowed = cache.zero.clone();

        match self.get_deposit(owner, subaccount, asset) {
            Some(mut deposit) => {
                let available = cache.underlying_amount_from_lp(&deposit.collateral_lp_amount);
                // A full withdrawal burns the entire LP position; converting
                // the requested amount back to LP would strand rounding dust
                // forever.
                let lp_to_burn = if *requested >= available {
                    deposit.collateral_lp_amount.clone()
                } else {
                    cache.lp_amount_from_underlying(requested)
                };

                if lp_to_burn != cache.zero {
                    redeemed = self.redeem(&mut cache, &lp_to_burn, false);

                    deposit.collateral_lp_amount -= &lp_to_burn;
                    self.store_deposit(owner, subaccount, asset, deposit);
                    self.profile_farm_try_remove_share(
                        owner,
                        subaccount,
                        asset,
                        FarmingType::Deposit,
                        &lp_to_burn.rescale(RAY_PRECISION),
                    );
                }

                if redeemed < *requested && allow_borrow {
                    let shortfall = requested.clone() - redeemed.clone();
                    borrowed = self.borrow_shortfall(&mut cache, owner, subaccount, asset, &shortfall);
                }
            },
            None => {
                // No collateral to draw down at all: only meaningful as a
                // pure borrow.
                require!(allow_borrow, ERROR_POSITION_NOT_FOUND);
                borrowed = self.borrow_shortfall(&mut cache, owner, subaccount, asset, requested);
            },
        }

        (redeemed, borrowed, CheckEquity::new(owner.clone(), subaccount))
    }

    /// Books a borrow covering a withdrawal shortfall; the borrow fee rides
    /// on top of the debt, not the paid-out amount.
    fn borrow_shortfall(
        &self,
        cache: &mut ReserveCache<Self>,
        owner: &ManagedAddress,
        subaccount: u8,
        asset: &EgldOrEsdtTokenIdentifier,
        shortfall: &ManagedDecimal<Self::Api, NumDecimals>,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let fee = self.calculate_borrow_fee(cache, shortfall);
        let debt_amount = shortfall.clone() + fee.clone();
        let share = self.borrow_from_reserve(cache, &debt_amount);
        cache.borrow_fee_pool += &fee;

        let mut loan = match self.get_loan(owner, subaccount, asset) {
            Some(loan) => loan,
            None => Loan {
                borrowed_share: self.ray_zero(),
            },
        };
        loan.borrowed_share += &share;
        self.store_loan(owner, subaccount, asset, loan);
        self.profile_farm_add_share(owner, subaccount, asset, FarmingType::Borrow, &share);

        shortfall.clone()
    }
}
