#![no_std]

multiversx_sc::imports!();
multiversx_sc::derive_imports!();

pub mod config;
pub mod oracle;
pub mod positions;
pub mod rewards;
pub mod storage;
pub mod utils;
pub mod validation;
pub mod views;

pub use common_errors::*;
pub use common_structs::*;

use common_errors::ERROR_FLASHLOAN_RESERVE_ASSET;

use reserve_layer::ReserveCache;

/// The lending controller: the single entry-point contract owning the
/// reserve registry and every user profile.
///
/// Endpoints follow one shape: validate the caller's payment, run the profile
/// mutation against the per-asset ledger, transfer assets out, and, for any
/// operation that reduced collateral or took on debt, discharge the
/// [`positions::CheckEquity`] obligation with a final solvency check before
/// emitting events.
#[multiversx_sc::contract]
pub trait Controller:
    positions::account::PositionAccountModule
    + positions::deposit::PositionDepositModule
    + positions::withdraw::PositionWithdrawModule
    + positions::borrow::PositionBorrowModule
    + positions::repay::PositionRepayModule
    + positions::liquidation::PositionLiquidationModule
    + positions::emode::EModeModule
    + rewards::RewardsModule
    + config::ConfigModule
    + storage::Storage
    + oracle::OracleModule
    + validation::ValidationModule
    + utils::LendingUtilsModule
    + views::ViewsModule
    + common_events::EventsModule
    + common_math::SharedMathModule
    + common_rates::InterestRates
    + reserve_layer::storage::ReserveStorage
    + reserve_layer::ledger::ReserveLedgerModule
    + reserve_layer::farm::ReserveFarmModule
    + reserve_layer::view::ReserveViewModule
    + multiversx_sc_modules::only_admin::OnlyAdminModule
{
    /// The deployer starts out as the only price-feed admin.
    #[init]
    fn init(&self) {
        self.admins().insert(self.blockchain().get_caller());
    }

    #[upgrade]
    fn upgrade(&self) {}

    /// Supplies underlying to a profile. Outstanding debt in the same asset
    /// is repaid first; the remainder becomes LP collateral unless
    /// `repay_only` is set, in which case it is returned.
    #[payable("*")]
    #[endpoint(deposit)]
    fn deposit(&self, opt_repay_only: OptionalValue<bool>, opt_subaccount: OptionalValue<u8>) {
        self.require_active();
        let caller = self.blockchain().get_caller();
        let (asset, amount) = self.call_value().egld_or_single_fungible_esdt();
        self.require_asset_supported(&asset);
        self.require_amount_greater_than_zero(&amount);

        let repay_only = opt_repay_only.into_option().unwrap_or(false);
        let subaccount = opt_subaccount.into_option().unwrap_or(0u8);

        let decimals = self.reserve_config(&asset).get().asset_decimals;
        let amount_dec = self.to_decimal(amount, decimals);

        let (repaid, deposited_lp, refund) =
            self.process_deposit(&caller, subaccount, &asset, &amount_dec, repay_only);

        self.send_asset(&caller, &asset, refund.into_raw_units());

        self.deposit_event(
            &caller,
            subaccount,
            &asset,
            repaid.into_raw_units(),
            deposited_lp.into_raw_units(),
        );
        self.emit_market_update(&asset);
    }

    /// Withdraws `amount` of underlying from the caller's collateral; with
    /// `allow_borrow` the shortfall beyond the collateral is borrowed. Ends
    /// with the mandatory solvency check.
    #[endpoint(withdraw)]
    fn withdraw(
        &self,
        asset: EgldOrEsdtTokenIdentifier,
        amount: BigUint,
        opt_allow_borrow: OptionalValue<bool>,
        opt_subaccount: OptionalValue<u8>,
    ) {
        self.require_active();
        let caller = self.blockchain().get_caller();
        self.require_asset_supported(&asset);
        self.require_amount_greater_than_zero(&amount);

        let allow_borrow = opt_allow_borrow.into_option().unwrap_or(false);
        let subaccount = opt_subaccount.into_option().unwrap_or(0u8);

        let decimals = self.reserve_config(&asset).get().asset_decimals;
        let amount_dec = self.to_decimal(amount, decimals);

        let (redeemed, borrowed, check) =
            self.process_withdrawal(&caller, subaccount, &asset, &amount_dec, allow_borrow);

        let total = redeemed.into_raw_units() + borrowed.into_raw_units();
        self.send_asset(&caller, &asset, &total);

        self.require_solvent(check);

        self.withdraw_event(
            &caller,
            subaccount,
            &asset,
            redeemed.into_raw_units(),
            borrowed.into_raw_units(),
        );
        self.emit_market_update(&asset);
    }

    /// Borrows `amount` against the profile's collateral. The borrow fee is
    /// added on top of the debt; a configured referrer receives its share of
    /// the fee. Ends with the mandatory solvency check.
    #[endpoint(borrow)]
    fn borrow(
        &self,
        asset: EgldOrEsdtTokenIdentifier,
        amount: BigUint,
        opt_referrer: OptionalValue<ManagedAddress>,
        opt_subaccount: OptionalValue<u8>,
    ) {
        self.require_active();
        let caller = self.blockchain().get_caller();
        self.require_asset_supported(&asset);
        self.require_amount_greater_than_zero(&amount);

        let opt_referrer = opt_referrer.into_option();
        let subaccount = opt_subaccount.into_option().unwrap_or(0u8);

        let decimals = self.reserve_config(&asset).get().asset_decimals;
        let amount_dec = self.to_decimal(amount.clone(), decimals);

        let (fee, referral_share, check) = self.process_borrow(
            &caller,
            subaccount,
            &asset,
            &amount_dec,
            opt_referrer.clone(),
        );

        self.send_asset(&caller, &asset, &amount);
        if let Some(referrer) = opt_referrer {
            self.send_asset(&referrer, &asset, referral_share.into_raw_units());
        }

        self.require_solvent(check);

        self.borrow_event(&caller, subaccount, &asset, &amount, fee.into_raw_units());
        self.emit_market_update(&asset);
    }

    /// Repays the attached payment against a profile's debt (the caller's
    /// own by default). Excess beyond the outstanding debt comes back
    /// unconsumed.
    #[payable("*")]
    #[endpoint(repay)]
    fn repay(
        &self,
        opt_on_behalf_of: OptionalValue<ManagedAddress>,
        opt_subaccount: OptionalValue<u8>,
    ) {
        self.require_active();
        let caller = self.blockchain().get_caller();
        let (asset, amount) = self.call_value().egld_or_single_fungible_esdt();
        self.require_asset_supported(&asset);
        self.require_amount_greater_than_zero(&amount);

        let owner = opt_on_behalf_of.into_option().unwrap_or_else(|| caller.clone());
        let subaccount = opt_subaccount.into_option().unwrap_or(0u8);

        let decimals = self.reserve_config(&asset).get().asset_decimals;
        let amount_dec = self.to_decimal(amount, decimals);

        let (repaid, refund) = self.process_repayment(&owner, subaccount, &asset, &amount_dec);

        self.send_asset(&caller, &asset, refund.into_raw_units());

        self.repay_event(
            &caller,
            subaccount,
            &asset,
            repaid.into_raw_units(),
            refund.into_raw_units(),
        );
        self.emit_market_update(&asset);
    }

    /// Liquidates an unhealthy profile: the attached payment repays its debt
    /// in the payment asset, and collateral in `collateral_asset` is seized
    /// at the liquidation bonus.
    #[payable("*")]
    #[endpoint(liquidate)]
    fn liquidate(
        &self,
        account_owner: ManagedAddress,
        subaccount: u8,
        collateral_asset: EgldOrEsdtTokenIdentifier,
    ) {
        self.require_active();
        let caller = self.blockchain().get_caller();
        let (repay_asset, payment) = self.call_value().egld_or_single_fungible_esdt();
        self.require_asset_supported(&repay_asset);
        self.require_asset_supported(&collateral_asset);
        self.require_amount_greater_than_zero(&payment);

        let decimals = self.reserve_config(&repay_asset).get().asset_decimals;
        let payment_dec = self.to_decimal(payment, decimals);

        let (repaid, refund, seized_lp, seized_underlying) = self.process_liquidation(
            &account_owner,
            subaccount,
            &repay_asset,
            &collateral_asset,
            &payment_dec,
        );

        self.send_asset(&caller, &repay_asset, refund.into_raw_units());
        self.send_asset(&caller, &collateral_asset, seized_underlying.into_raw_units());

        self.liquidate_event(
            &caller,
            &account_owner,
            subaccount,
            &repay_asset,
            repaid.into_raw_units(),
            &collateral_asset,
            seized_lp.into_raw_units(),
        );
        self.emit_market_update(&repay_asset);
        self.emit_market_update(&collateral_asset);
    }

    /// Claims every reward token of one farm for the caller's profile.
    #[endpoint(claimRewards)]
    fn claim_rewards(
        &self,
        asset: EgldOrEsdtTokenIdentifier,
        farming_type: FarmingType,
        opt_subaccount: OptionalValue<u8>,
    ) {
        self.require_active();
        let caller = self.blockchain().get_caller();
        self.require_asset_supported(&asset);
        let subaccount = opt_subaccount.into_option().unwrap_or(0u8);

        let farm = self.get_or_create_farm(&asset, farming_type);
        for reward in farm.rewards.iter() {
            let reward_token = reward.reward_token.clone();
            let payout =
                self.claim_profile_reward(&caller, subaccount, &asset, farming_type, &reward_token);
            if payout > 0 {
                self.send_asset(&caller, &reward_token, &payout);
                self.claim_rewards_event(&caller, subaccount, &asset, &reward_token, &payout);
            }
        }
    }

    /// Uncollateralized loan for the duration of one call: `amount` is sent
    /// to `contract_address.endpoint(arguments)`, which must pay back at
    /// least `amount + fee` before returning. The fee joins the protocol
    /// skim.
    #[endpoint(flashLoan)]
    fn flash_loan(
        &self,
        asset: EgldOrEsdtTokenIdentifier,
        amount: BigUint,
        contract_address: ManagedAddress,
        endpoint: ManagedBuffer,
        arguments: ManagedArgBuffer<Self::Api>,
    ) {
        self.require_active();
        let caller = self.blockchain().get_caller();
        self.require_asset_supported(&asset);
        self.require_amount_greater_than_zero(&amount);

        let mut cache = ReserveCache::new(self, &asset);
        self.accrue_interest(&mut cache);

        let amount_dec = cache.get_decimal_value(&amount);
        require!(cache.has_cash(&amount_dec), ERROR_FLASHLOAN_RESERVE_ASSET);

        let fee = self.calculate_flash_loan_fee(&cache, &amount_dec);
        let required_repayment = amount_dec.clone() + fee.clone();

        cache.cash -= &amount_dec;

        // Commit the dip before the external call; a re-entrant borrower must
        // see the reduced cash.
        drop(cache);

        let back_transfers = self
            .tx()
            .to(&contract_address)
            .raw_call(endpoint)
            .arguments_raw(arguments)
            .egld_or_single_esdt(&asset, 0, &amount)
            .returns(ReturnsBackTransfersLegacy)
            .sync_call();

        let mut cache = ReserveCache::new(self, &asset);
        let repayment = self.validate_flash_repayment(&cache, &back_transfers, &required_repayment);

        let earned = repayment - amount_dec.clone();
        cache.cash += &(amount_dec + earned.clone());
        cache.reserve_amount += &earned;
        drop(cache);

        self.flash_loan_event(&caller, &asset, &amount, fee.into_raw_units());
        self.emit_market_update(&asset);
    }

    /// Opts the caller's profile into an e-mode category (0 clears it). Only
    /// allowed when every borrowed asset belongs to the category, and only if
    /// the profile stays solvent under the re-derived parameters.
    #[endpoint(setEMode)]
    fn set_e_mode(&self, category_id: u8, opt_subaccount: OptionalValue<u8>) {
        self.require_active();
        let caller = self.blockchain().get_caller();
        let subaccount = opt_subaccount.into_option().unwrap_or(0u8);

        let check = self.process_set_e_mode(&caller, subaccount, category_id);
        self.require_solvent(check);

        self.set_e_mode_event(&caller, subaccount, category_id);
    }

    fn send_asset(
        &self,
        to: &ManagedAddress,
        asset: &EgldOrEsdtTokenIdentifier,
        amount: &BigUint,
    ) {
        let payment = EgldOrEsdtTokenPayment::new(asset.clone(), 0, amount.clone());
        self.tx().to(to).payment(&payment).transfer_if_not_empty();
    }
}
