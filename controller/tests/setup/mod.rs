// Shared world setup for the controller integration tests.
//
// All calls go through whitebox transactions against the debug executor, so
// endpoint logic runs with real storage, payments and block timestamps.

use multiversx_sc::api::ManagedTypeApi;
use multiversx_sc::types::{
    BigUint, EgldOrEsdtTokenIdentifier, EsdtTokenPayment, ManagedDecimal, TokenIdentifier,
};
pub use multiversx_sc_scenario::imports::*;

use common_structs::{FarmingType, InterestRateConfig, ReserveConfig};
use controller::config::ConfigModule;
use controller::oracle::OracleModule;
use controller::storage::Storage;
use controller::Controller;
use reserve_layer::storage::ReserveStorage;
use reserve_layer::view::ReserveViewModule;

pub const OWNER: TestAddress = TestAddress::new("owner");
pub const SUPPLIER: TestAddress = TestAddress::new("supplier");
pub const BORROWER: TestAddress = TestAddress::new("borrower");
pub const LIQUIDATOR: TestAddress = TestAddress::new("liquidator");

pub const CONTROLLER_ADDRESS: TestSCAddress = TestSCAddress::new("controller");
pub const FLASH_MOCK_ADDRESS: TestSCAddress = TestSCAddress::new("flash-mock");

pub const CONTROLLER_PATH: MxscPath = MxscPath::new("output/controller.mxsc.json");
pub const FLASH_MOCK_PATH: MxscPath = MxscPath::new("../flash_mock/output/flash-mock.mxsc.json");

pub const USDC_TOKEN: TestTokenIdentifier = TestTokenIdentifier::new("USDC-123456");
pub const WEGLD_TOKEN: TestTokenIdentifier = TestTokenIdentifier::new("WEGLD-123456");
pub const REWARD_TOKEN: TestTokenIdentifier = TestTokenIdentifier::new("XRW-123456");

pub const USDC_DECIMALS: usize = 6;
pub const WEGLD_DECIMALS: usize = 18;

pub const WAD: u128 = 1_000_000_000_000_000_000;
pub const RAY: u128 = 1_000_000_000_000_000_000_000_000_000;
pub const SECONDS_PER_DAY: u64 = 86_400;

pub const USDC_UNIT: u128 = 1_000_000; // 10^6
pub const WEGLD_UNIT: u128 = WAD; // 10^18

pub fn usdc<M: ManagedTypeApi>() -> EgldOrEsdtTokenIdentifier<M> {
    EgldOrEsdtTokenIdentifier::esdt(TokenIdentifier::from_esdt_bytes(USDC_TOKEN.as_bytes()))
}

pub fn wegld<M: ManagedTypeApi>() -> EgldOrEsdtTokenIdentifier<M> {
    EgldOrEsdtTokenIdentifier::esdt(TokenIdentifier::from_esdt_bytes(WEGLD_TOKEN.as_bytes()))
}

pub fn reward<M: ManagedTypeApi>() -> EgldOrEsdtTokenIdentifier<M> {
    EgldOrEsdtTokenIdentifier::esdt(TokenIdentifier::from_esdt_bytes(REWARD_TOKEN.as_bytes()))
}

pub fn bps_dec<M: ManagedTypeApi>(value: u64) -> ManagedDecimal<M, usize> {
    ManagedDecimal::from_raw_units(BigUint::from(value), 4)
}

pub fn millionth_dec<M: ManagedTypeApi>(value: u64) -> ManagedDecimal<M, usize> {
    ManagedDecimal::from_raw_units(BigUint::from(value), 6)
}

/// Annual rate given as a percentage, RAY-scaled.
pub fn ray_pct<M: ManagedTypeApi>(percent: u64) -> ManagedDecimal<M, usize> {
    let raw = BigUint::from(RAY) / 100u64 * percent;
    ManagedDecimal::from_raw_units(raw, 27)
}

pub fn usdc_config<M: ManagedTypeApi>() -> ReserveConfig<M> {
    ReserveConfig {
        loan_to_value: bps_dec(7_500),
        liquidation_threshold: bps_dec(8_000),
        liquidation_bonus: bps_dec(500),
        borrow_factor: bps_dec(10_000),
        reserve_ratio: bps_dec(1_000),
        borrow_fee: millionth_dec(0),
        flash_loan_fee: millionth_dec(500),
        deposit_limit: None,
        borrow_limit: None,
        allow_collateral: true,
        allow_redeem: true,
        asset_decimals: USDC_DECIMALS,
    }
}

pub fn wegld_config<M: ManagedTypeApi>() -> ReserveConfig<M> {
    ReserveConfig {
        loan_to_value: bps_dec(7_000),
        liquidation_threshold: bps_dec(7_500),
        liquidation_bonus: bps_dec(1_000),
        borrow_factor: bps_dec(8_000),
        reserve_ratio: bps_dec(1_000),
        borrow_fee: millionth_dec(0),
        flash_loan_fee: millionth_dec(500),
        deposit_limit: None,
        borrow_limit: None,
        allow_collateral: true,
        allow_redeem: true,
        asset_decimals: WEGLD_DECIMALS,
    }
}

pub fn default_rate_config<M: ManagedTypeApi>() -> InterestRateConfig<M> {
    InterestRateConfig {
        base_borrow_rate: ray_pct(2),
        slope1: ray_pct(4),
        slope2: ray_pct(10),
        slope3: ray_pct(100),
        mid_utilization: ray_pct(45),
        optimal_utilization: ray_pct(90),
        max_borrow_rate: ray_pct(200),
    }
}

pub fn world() -> ScenarioWorld {
    let mut blockchain = ScenarioWorld::new();

    blockchain.register_contract(CONTROLLER_PATH, controller::ContractBuilder);
    blockchain.register_contract(FLASH_MOCK_PATH, flash_mock::ContractBuilder);

    blockchain
}

pub struct LendingTestState {
    pub world: ScenarioWorld,
}

impl LendingTestState {
    pub fn new() -> Self {
        let mut world = world();

        world.current_block().block_timestamp(0);
        world.account(OWNER).nonce(1).esdt_balance(
            REWARD_TOKEN,
            BigUint::from(1_000_000u64) * BigUint::from(WAD),
        );

        for user in [SUPPLIER, BORROWER, LIQUIDATOR] {
            world
                .account(user)
                .nonce(1)
                .esdt_balance(
                    USDC_TOKEN,
                    BigUint::from(1_000_000u64) * BigUint::from(USDC_UNIT),
                )
                .esdt_balance(
                    WEGLD_TOKEN,
                    BigUint::from(1_000u64) * BigUint::from(WEGLD_UNIT),
                );
        }

        world
            .tx()
            .from(OWNER)
            .raw_deploy()
            .code(CONTROLLER_PATH)
            .new_address(CONTROLLER_ADDRESS)
            .returns(ReturnsNewAddress)
            .whitebox(controller::contract_obj, |sc| {
                sc.init();
            });

        // The flash-loan counterparty starts pre-funded so it can cover its
        // repayment margin on top of the loaned amount.
        world
            .account(FLASH_MOCK_ADDRESS)
            .nonce(1)
            .code(FLASH_MOCK_PATH)
            .esdt_balance(
                USDC_TOKEN,
                BigUint::from(1_000u64) * BigUint::from(USDC_UNIT),
            );

        let mut state = Self { world };
        state.register_reserve_usdc();
        state.register_reserve_wegld();
        state.set_price(USDC_TOKEN, WAD); // 1 USD
        state.set_price(WEGLD_TOKEN, 25 * WAD); // 25 USD
        state
    }

    pub fn set_timestamp(&mut self, timestamp: u64) {
        self.world.current_block().block_timestamp(timestamp);
    }

    fn register_reserve_usdc(&mut self) {
        self.world
            .tx()
            .from(OWNER)
            .to(CONTROLLER_ADDRESS)
            .whitebox(controller::contract_obj, |sc| {
                sc.register_reserve(usdc(), usdc_config(), default_rate_config());
            });
    }

    fn register_reserve_wegld(&mut self) {
        self.world
            .tx()
            .from(OWNER)
            .to(CONTROLLER_ADDRESS)
            .whitebox(controller::contract_obj, |sc| {
                sc.register_reserve(wegld(), wegld_config(), default_rate_config());
            });
    }

    pub fn set_price(&mut self, token: TestTokenIdentifier, price_wad: u128) {
        let token_bytes = token.as_bytes().to_vec();
        self.world
            .tx()
            .from(OWNER)
            .to(CONTROLLER_ADDRESS)
            .whitebox(controller::contract_obj, |sc| {
                sc.set_price_feed(
                    EgldOrEsdtTokenIdentifier::esdt(TokenIdentifier::from_esdt_bytes(
                        token_bytes.as_slice(),
                    )),
                    BigUint::from(price_wad),
                );
            });
    }

    pub fn deposit(&mut self, from: TestAddress, token: TestTokenIdentifier, amount: u128) {
        self.deposit_with_flags(from, token, amount, false);
    }

    pub fn deposit_with_flags(
        &mut self,
        from: TestAddress,
        token: TestTokenIdentifier,
        amount: u128,
        repay_only: bool,
    ) {
        let transfer =
            EsdtTokenPayment::new(token.to_token_identifier(), 0, BigUint::from(amount));
        self.world
            .tx()
            .from(from)
            .to(CONTROLLER_ADDRESS)
            .esdt(transfer)
            .whitebox(controller::contract_obj, |sc| {
                sc.deposit(OptionalValue::Some(repay_only), OptionalValue::None);
            });
    }

    pub fn withdraw(
        &mut self,
        from: TestAddress,
        token: TestTokenIdentifier,
        amount: u128,
        allow_borrow: bool,
    ) {
        let token_bytes = token.as_bytes().to_vec();
        self.world
            .tx()
            .from(from)
            .to(CONTROLLER_ADDRESS)
            .whitebox(controller::contract_obj, |sc| {
                sc.withdraw(
                    EgldOrEsdtTokenIdentifier::esdt(TokenIdentifier::from_esdt_bytes(
                        token_bytes.as_slice(),
                    )),
                    BigUint::from(amount),
                    OptionalValue::Some(allow_borrow),
                    OptionalValue::None,
                );
            });
    }

    pub fn borrow(&mut self, from: TestAddress, token: TestTokenIdentifier, amount: u128) {
        let token_bytes = token.as_bytes().to_vec();
        self.world
            .tx()
            .from(from)
            .to(CONTROLLER_ADDRESS)
            .whitebox(controller::contract_obj, |sc| {
                sc.borrow(
                    EgldOrEsdtTokenIdentifier::esdt(TokenIdentifier::from_esdt_bytes(
                        token_bytes.as_slice(),
                    )),
                    BigUint::from(amount),
                    OptionalValue::None,
                    OptionalValue::None,
                );
            });
    }

    pub fn repay(&mut self, from: TestAddress, token: TestTokenIdentifier, amount: u128) {
        let transfer =
            EsdtTokenPayment::new(token.to_token_identifier(), 0, BigUint::from(amount));
        self.world
            .tx()
            .from(from)
            .to(CONTROLLER_ADDRESS)
            .esdt(transfer)
            .whitebox(controller::contract_obj, |sc| {
                sc.repay(OptionalValue::None, OptionalValue::None);
            });
    }

    pub fn liquidate(
        &mut self,
        liquidator: TestAddress,
        account_owner: TestAddress,
        repay_token: TestTokenIdentifier,
        repay_amount: u128,
        collateral_token: TestTokenIdentifier,
    ) {
        let collateral_bytes = collateral_token.as_bytes().to_vec();
        let transfer = EsdtTokenPayment::new(
            repay_token.to_token_identifier(),
            0,
            BigUint::from(repay_amount),
        );
        self.world
            .tx()
            .from(liquidator)
            .to(CONTROLLER_ADDRESS)
            .esdt(transfer)
            .whitebox(controller::contract_obj, |sc| {
                sc.liquidate(
                    account_owner.to_managed_address(),
                    0u8,
                    EgldOrEsdtTokenIdentifier::esdt(TokenIdentifier::from_esdt_bytes(
                        collateral_bytes.as_slice(),
                    )),
                );
            });
    }

    pub fn claim_rewards(
        &mut self,
        from: TestAddress,
        token: TestTokenIdentifier,
        farming_type: FarmingType,
    ) {
        let token_bytes = token.as_bytes().to_vec();
        self.world
            .tx()
            .from(from)
            .to(CONTROLLER_ADDRESS)
            .whitebox(controller::contract_obj, |sc| {
                sc.claim_rewards(
                    EgldOrEsdtTokenIdentifier::esdt(TokenIdentifier::from_esdt_bytes(
                        token_bytes.as_slice(),
                    )),
                    farming_type,
                    OptionalValue::None,
                );
            });
    }

    pub fn add_reward(
        &mut self,
        asset: TestTokenIdentifier,
        farming_type: FarmingType,
        amount: u128,
        reward_per_day: u128,
    ) {
        let asset_bytes = asset.as_bytes().to_vec();
        let transfer =
            EsdtTokenPayment::new(REWARD_TOKEN.to_token_identifier(), 0, BigUint::from(amount));
        self.world
            .tx()
            .from(OWNER)
            .to(CONTROLLER_ADDRESS)
            .esdt(transfer)
            .whitebox(controller::contract_obj, |sc| {
                sc.add_reward(
                    EgldOrEsdtTokenIdentifier::esdt(TokenIdentifier::from_esdt_bytes(
                        asset_bytes.as_slice(),
                    )),
                    farming_type,
                    BigUint::from(reward_per_day),
                );
            });
    }

    /// Asserts the reserve ledger state of `token` inside a query.
    pub fn check_market(
        &mut self,
        token: TestTokenIdentifier,
        expected_cash: u128,
        expected_lp_supply: u128,
        expected_borrowed: u128,
    ) {
        let token_bytes = token.as_bytes().to_vec();
        self.world
            .query()
            .to(CONTROLLER_ADDRESS)
            .whitebox(controller::contract_obj, |sc| {
                let asset = EgldOrEsdtTokenIdentifier::esdt(TokenIdentifier::from_esdt_bytes(
                    token_bytes.as_slice(),
                ));
                assert_eq!(
                    sc.total_cash_available(&asset).get().into_raw_units(),
                    &BigUint::from(expected_cash)
                );
                assert_eq!(
                    sc.total_lp_supply(&asset).get().into_raw_units(),
                    &BigUint::from(expected_lp_supply)
                );
                assert_eq!(
                    sc.total_borrowed(&asset).get().into_raw_units(),
                    &BigUint::from(expected_borrowed)
                );
            });
    }

    /// Reads the debt currently owed by a profile in `token`, in raw units.
    /// Returns 0 when the loan entry does not exist.
    pub fn owed_amount(&mut self, owner: TestAddress, token: TestTokenIdentifier) -> u64 {
        let token_bytes = token.as_bytes().to_vec();
        let mut result = 0u64;
        self.world
            .query()
            .to(CONTROLLER_ADDRESS)
            .whitebox(controller::contract_obj, |sc| {
                let asset = EgldOrEsdtTokenIdentifier::esdt(TokenIdentifier::from_esdt_bytes(
                    token_bytes.as_slice(),
                ));
                result = match sc.loans(&owner.to_managed_address(), 0u8).get(&asset) {
                    Some(loan) => sc
                        .get_borrow_amount_for_share(&asset, loan.borrowed_share)
                        .into_raw_units()
                        .to_u64()
                        .unwrap(),
                    None => 0u64,
                };
            });
        result
    }

    pub fn check_user_balance(
        &mut self,
        user: TestAddress,
        token: TestTokenIdentifier,
        expected: u128,
    ) {
        self.world
            .check_account(user)
            .esdt_balance(token, BigUint::from(expected));
    }
}
