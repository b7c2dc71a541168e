#![no_std]

multiversx_sc::imports!();
multiversx_sc::derive_imports!();
pub use common_structs::*;

/// Audit events emitted by every state-mutating entry point.
#[multiversx_sc::module]
pub trait EventsModule {
    #[event("register_reserve")]
    fn register_reserve_event(
        &self,
        #[indexed] asset: &EgldOrEsdtTokenIdentifier,
        #[indexed] config: &ReserveConfig<Self::Api>,
        #[indexed] rate_config: &InterestRateConfig<Self::Api>,
    );

    #[event("update_reserve_config")]
    fn update_reserve_config_event(
        &self,
        #[indexed] asset: &EgldOrEsdtTokenIdentifier,
        #[indexed] config: &ReserveConfig<Self::Api>,
    );

    #[event("update_interest_rate_config")]
    fn update_interest_rate_config_event(
        &self,
        #[indexed] asset: &EgldOrEsdtTokenIdentifier,
        #[indexed] rate_config: &InterestRateConfig<Self::Api>,
    );

    /// Emitted after interest accrual or any reserve mutation.
    #[event("update_market_state")]
    fn update_market_state_event(
        &self,
        #[indexed] timestamp: u64,
        #[indexed] asset: &EgldOrEsdtTokenIdentifier,
        #[indexed] cash: &ManagedDecimal<Self::Api, NumDecimals>,
        #[indexed] lp_supply: &ManagedDecimal<Self::Api, NumDecimals>,
        #[indexed] borrowed: &ManagedDecimal<Self::Api, NumDecimals>,
        #[indexed] borrowed_share: &ManagedDecimal<Self::Api, NumDecimals>,
        #[indexed] reserve_amount: &ManagedDecimal<Self::Api, NumDecimals>,
    );

    #[event("deposit")]
    fn deposit_event(
        &self,
        #[indexed] caller: &ManagedAddress,
        #[indexed] subaccount: u8,
        #[indexed] asset: &EgldOrEsdtTokenIdentifier,
        #[indexed] repaid_amount: &BigUint,
        #[indexed] deposited_lp_amount: &BigUint,
    );

    #[event("withdraw")]
    fn withdraw_event(
        &self,
        #[indexed] caller: &ManagedAddress,
        #[indexed] subaccount: u8,
        #[indexed] asset: &EgldOrEsdtTokenIdentifier,
        #[indexed] withdrawn_amount: &BigUint,
        #[indexed] borrowed_amount: &BigUint,
    );

    #[event("borrow")]
    fn borrow_event(
        &self,
        #[indexed] caller: &ManagedAddress,
        #[indexed] subaccount: u8,
        #[indexed] asset: &EgldOrEsdtTokenIdentifier,
        #[indexed] amount: &BigUint,
        #[indexed] fee: &BigUint,
    );

    #[event("repay")]
    fn repay_event(
        &self,
        #[indexed] caller: &ManagedAddress,
        #[indexed] subaccount: u8,
        #[indexed] asset: &EgldOrEsdtTokenIdentifier,
        #[indexed] repaid_amount: &BigUint,
        #[indexed] refunded_amount: &BigUint,
    );

    #[event("liquidate")]
    fn liquidate_event(
        &self,
        #[indexed] liquidator: &ManagedAddress,
        #[indexed] account: &ManagedAddress,
        #[indexed] subaccount: u8,
        #[indexed] repay_asset: &EgldOrEsdtTokenIdentifier,
        #[indexed] repaid_amount: &BigUint,
        #[indexed] collateral_asset: &EgldOrEsdtTokenIdentifier,
        #[indexed] seized_lp_amount: &BigUint,
    );

    #[event("claim_rewards")]
    fn claim_rewards_event(
        &self,
        #[indexed] caller: &ManagedAddress,
        #[indexed] subaccount: u8,
        #[indexed] asset: &EgldOrEsdtTokenIdentifier,
        #[indexed] reward_token: &EgldOrEsdtTokenIdentifier,
        #[indexed] amount: &BigUint,
    );

    #[event("add_reward")]
    fn add_reward_event(
        &self,
        #[indexed] asset: &EgldOrEsdtTokenIdentifier,
        #[indexed] reward_token: &EgldOrEsdtTokenIdentifier,
        #[indexed] amount: &BigUint,
        #[indexed] reward_per_day: &BigUint,
    );

    #[event("flash_loan")]
    fn flash_loan_event(
        &self,
        #[indexed] caller: &ManagedAddress,
        #[indexed] asset: &EgldOrEsdtTokenIdentifier,
        #[indexed] amount: &BigUint,
        #[indexed] fee: &BigUint,
    );

    #[event("set_e_mode")]
    fn set_e_mode_event(
        &self,
        #[indexed] caller: &ManagedAddress,
        #[indexed] subaccount: u8,
        #[indexed] category_id: u8,
    );

    #[event("set_price_feed")]
    fn set_price_feed_event(
        &self,
        #[indexed] asset: &EgldOrEsdtTokenIdentifier,
        #[indexed] price: &BigUint,
    );

    #[event("claim_protocol_revenue")]
    fn claim_protocol_revenue_event(
        &self,
        #[indexed] asset: &EgldOrEsdtTokenIdentifier,
        #[indexed] receiver: &ManagedAddress,
        #[indexed] amount: &BigUint,
    );
}
