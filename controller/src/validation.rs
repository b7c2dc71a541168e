use common_errors::{
    ERROR_AMOUNT_MUST_BE_GREATER_THAN_ZERO, ERROR_ASSET_NOT_SUPPORTED, ERROR_CONTRACT_PAUSED,
    ERROR_INSUFFICIENT_COLLATERAL, ERROR_INVALID_FLASHLOAN_REPAYMENT,
};

use crate::{positions::CheckEquity, storage, utils};

use reserve_layer::ReserveCache;

multiversx_sc::imports!();

#[multiversx_sc::module]
pub trait ValidationModule:
    storage::Storage
    + utils::LendingUtilsModule
    + crate::oracle::OracleModule
    + crate::positions::emode::EModeModule
    + reserve_layer::storage::ReserveStorage
    + reserve_layer::ledger::ReserveLedgerModule
    + common_math::SharedMathModule
    + common_rates::InterestRates
    + common_events::EventsModule
    + multiversx_sc_modules::only_admin::OnlyAdminModule
{
    fn require_active(&self) {
        require!(!self.paused().get(), ERROR_CONTRACT_PAUSED);
    }

    fn require_asset_supported(&self, asset: &EgldOrEsdtTokenIdentifier) {
        require!(self.reserves().contains(asset), ERROR_ASSET_NOT_SUPPORTED);
    }

    fn require_amount_greater_than_zero(&self, amount: &BigUint) {
        require!(
            amount > &BigUint::zero(),
            ERROR_AMOUNT_MUST_BE_GREATER_THAN_ZERO
        );
    }

    /// Discharges a [`CheckEquity`] obligation: the profile it names must end
    /// the operation solvent. Consuming the token is the only way to finish
    /// an endpoint that reduced collateral or took on debt.
    fn require_solvent(&self, check: CheckEquity<Self::Api>) {
        let (owner, subaccount) = check.account();
        require!(
            self.has_enough_collateral(owner, subaccount),
            ERROR_INSUFFICIENT_COLLATERAL
        );
    }

    /// Checks that a flash-loan target paid the reserve asset back, at least
    /// `required_repayment`. Returns the actual repayment amount.
    fn validate_flash_repayment(
        &self,
        cache: &ReserveCache<Self>,
        back_transfers: &BackTransfersLegacy<Self::Api>,
        required_repayment: &ManagedDecimal<Self::Api, NumDecimals>,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let repayment = if cache.asset.is_egld() {
            cache.get_decimal_value(&back_transfers.total_egld_amount)
        } else {
            require!(
                back_transfers.esdt_payments.len() == 1,
                ERROR_INVALID_FLASHLOAN_REPAYMENT
            );
            let payment = back_transfers.esdt_payments.get(0);
            require!(
                cache.is_same_asset(&EgldOrEsdtTokenIdentifier::esdt(
                    payment.token_identifier.clone()
                )),
                ERROR_INVALID_FLASHLOAN_REPAYMENT
            );

            cache.get_decimal_value(&payment.amount)
        };

        require!(
            repayment >= *required_repayment,
            ERROR_INVALID_FLASHLOAN_REPAYMENT
        );

        repayment
    }
}
