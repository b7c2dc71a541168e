use common_errors::{ERROR_INSUFFICIENT_DEPOSIT, ERROR_NO_DEBT_TO_REPAY};
use common_structs::{Deposit, Loan};

use crate::storage;

multiversx_sc::imports!();

/// Profile position bookkeeping. Positions are created lazily on first
/// deposit/borrow and removed the moment they reach zero; no zero entries
/// ever linger, which the valuation loops depend on.
#[multiversx_sc::module]
pub trait PositionAccountModule: storage::Storage + common_math::SharedMathModule {
    fn get_deposit(
        &self,
        owner: &ManagedAddress,
        subaccount: u8,
        asset: &EgldOrEsdtTokenIdentifier,
    ) -> Option<Deposit<Self::Api>> {
        self.deposits(owner, subaccount).get(asset)
    }

    fn get_deposit_or_fail(
        &self,
        owner: &ManagedAddress,
        subaccount: u8,
        asset: &EgldOrEsdtTokenIdentifier,
    ) -> Deposit<Self::Api> {
        match self.get_deposit(owner, subaccount, asset) {
            Some(deposit) => deposit,
            None => sc_panic!(ERROR_INSUFFICIENT_DEPOSIT),
        }
    }

    fn get_loan(
        &self,
        owner: &ManagedAddress,
        subaccount: u8,
        asset: &EgldOrEsdtTokenIdentifier,
    ) -> Option<Loan<Self::Api>> {
        self.loans(owner, subaccount).get(asset)
    }

    fn get_loan_or_fail(
        &self,
        owner: &ManagedAddress,
        subaccount: u8,
        asset: &EgldOrEsdtTokenIdentifier,
    ) -> Loan<Self::Api> {
        match self.get_loan(owner, subaccount, asset) {
            Some(loan) => loan,
            None => sc_panic!(ERROR_NO_DEBT_TO_REPAY),
        }
    }

    /// Writes back a deposit entry, dropping it at zero.
    fn store_deposit(
        &self,
        owner: &ManagedAddress,
        subaccount: u8,
        asset: &EgldOrEsdtTokenIdentifier,
        deposit: Deposit<Self::Api>,
    ) {
        let zero = self.to_decimal(BigUint::zero(), deposit.collateral_lp_amount.scale());
        if deposit.collateral_lp_amount == zero {
            self.deposits(owner, subaccount).remove(asset);
        } else {
            self.deposits(owner, subaccount).insert(asset.clone(), deposit);
        }
    }

    /// Writes back a loan entry, dropping it at zero.
    fn store_loan(
        &self,
        owner: &ManagedAddress,
        subaccount: u8,
        asset: &EgldOrEsdtTokenIdentifier,
        loan: Loan<Self::Api>,
    ) {
        if loan.borrowed_share == self.ray_zero() {
            self.loans(owner, subaccount).remove(asset);
        } else {
            self.loans(owner, subaccount).insert(asset.clone(), loan);
        }
    }
}
