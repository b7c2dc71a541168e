use common_constants::RAY_PRECISION;
use common_structs::{InterestRateConfig, ReserveConfig};

multiversx_sc::imports!();
multiversx_sc::derive_imports!();

/// In-memory snapshot of one reserve's ledger, cached from storage for the
/// duration of an operation and committed back when dropped.
///
/// Monetary fields are in asset decimals; `borrowed_share` is RAY-scaled.
/// Holding the snapshot across an operation keeps every intermediate read
/// consistent: re-reads after a mutating sub-step see the mutated values, not
/// stale storage.
pub struct ReserveCache<'a, C>
where
    C: crate::storage::ReserveStorage,
{
    sc_ref: &'a C,
    pub asset: EgldOrEsdtTokenIdentifier<C::Api>,
    pub config: ReserveConfig<C::Api>,
    pub rate_config: InterestRateConfig<C::Api>,
    /// The current block timestamp (seconds).
    pub timestamp: u64,
    pub lp_supply: ManagedDecimal<C::Api, NumDecimals>,
    pub cash: ManagedDecimal<C::Api, NumDecimals>,
    pub reserve_amount: ManagedDecimal<C::Api, NumDecimals>,
    pub borrow_fee_pool: ManagedDecimal<C::Api, NumDecimals>,
    pub borrowed: ManagedDecimal<C::Api, NumDecimals>,
    pub borrowed_share: ManagedDecimal<C::Api, NumDecimals>,
    pub last_accrue_timestamp: u64,
    pub initial_exchange_rate: ManagedDecimal<C::Api, NumDecimals>,
    /// Zero in asset decimals, for comparisons.
    pub zero: ManagedDecimal<C::Api, NumDecimals>,
}

impl<'a, C> ReserveCache<'a, C>
where
    C: crate::storage::ReserveStorage + common_math::SharedMathModule,
{
    pub fn new(sc_ref: &'a C, asset: &EgldOrEsdtTokenIdentifier<C::Api>) -> Self {
        let config = sc_ref.reserve_config(asset).get();
        ReserveCache {
            zero: sc_ref.to_decimal(BigUint::zero(), config.asset_decimals),
            lp_supply: sc_ref.total_lp_supply(asset).get(),
            cash: sc_ref.total_cash_available(asset).get(),
            reserve_amount: sc_ref.reserve_amount(asset).get(),
            borrow_fee_pool: sc_ref.borrow_fee_pool(asset).get(),
            borrowed: sc_ref.total_borrowed(asset).get(),
            borrowed_share: sc_ref.total_borrowed_share(asset).get(),
            last_accrue_timestamp: sc_ref.interest_accrue_timestamp(asset).get(),
            initial_exchange_rate: sc_ref.initial_exchange_rate(asset).get(),
            timestamp: sc_ref.blockchain().get_block_timestamp(),
            rate_config: sc_ref.interest_rate_config(asset).get(),
            config,
            asset: asset.clone(),
            sc_ref,
        }
    }
}

impl<C> Drop for ReserveCache<'_, C>
where
    C: crate::storage::ReserveStorage,
{
    fn drop(&mut self) {
        // commit changes to storage for the mutable fields
        self.sc_ref.total_lp_supply(&self.asset).set(&self.lp_supply);
        self.sc_ref.total_cash_available(&self.asset).set(&self.cash);
        self.sc_ref.reserve_amount(&self.asset).set(&self.reserve_amount);
        self.sc_ref.borrow_fee_pool(&self.asset).set(&self.borrow_fee_pool);
        self.sc_ref.total_borrowed(&self.asset).set(&self.borrowed);
        self.sc_ref
            .total_borrowed_share(&self.asset)
            .set(&self.borrowed_share);
        self.sc_ref
            .interest_accrue_timestamp(&self.asset)
            .set(self.last_accrue_timestamp);
    }
}

impl<C> ReserveCache<'_, C>
where
    C: crate::storage::ReserveStorage + common_math::SharedMathModule,
{
    pub fn get_decimal_value(
        &self,
        value: &BigUint<C::Api>,
    ) -> ManagedDecimal<C::Api, NumDecimals> {
        self.sc_ref
            .to_decimal(value.clone(), self.config.asset_decimals)
    }

    pub fn is_same_asset(&self, asset: &EgldOrEsdtTokenIdentifier<C::Api>) -> bool {
        self.asset == *asset
    }

    /// Liquidity owned by LP holders: `cash + borrowed - reserve_amount`.
    pub fn total_user_liquidity(&self) -> ManagedDecimal<C::Api, NumDecimals> {
        self.cash.clone() + self.borrowed.clone() - self.reserve_amount.clone()
    }

    /// `borrowed / (cash + borrowed - reserve_amount)`, RAY-scaled; zero when
    /// nothing is borrowed or the reserve holds no user liquidity.
    pub fn get_utilization(&self) -> ManagedDecimal<C::Api, NumDecimals> {
        let liquidity = self.total_user_liquidity();
        if self.borrowed == self.zero || liquidity == self.zero {
            self.sc_ref.ray_zero()
        } else {
            self.sc_ref
                .div_half_up(&self.borrowed, &liquidity, RAY_PRECISION)
        }
    }

    pub fn has_cash(&self, amount: &ManagedDecimal<C::Api, NumDecimals>) -> bool {
        self.cash >= *amount
    }

    /// Underlying units -> LP units, floored against the depositor.
    pub fn lp_amount_from_underlying(
        &self,
        amount: &ManagedDecimal<C::Api, NumDecimals>,
    ) -> ManagedDecimal<C::Api, NumDecimals> {
        let lp_ray = if self.lp_supply == self.zero {
            self.sc_ref
                .div_floor(amount, &self.initial_exchange_rate, RAY_PRECISION)
        } else {
            let scaled = self.sc_ref.mul_floor(amount, &self.lp_supply, RAY_PRECISION);
            self.sc_ref
                .div_floor(&scaled, &self.total_user_liquidity(), RAY_PRECISION)
        };
        self.sc_ref
            .rescale_floor(&lp_ray, self.config.asset_decimals)
    }

    /// LP units -> underlying units, floored against the redeemer.
    pub fn underlying_amount_from_lp(
        &self,
        lp_amount: &ManagedDecimal<C::Api, NumDecimals>,
    ) -> ManagedDecimal<C::Api, NumDecimals> {
        let amount_ray = if self.lp_supply == self.zero {
            self.sc_ref
                .mul_floor(lp_amount, &self.initial_exchange_rate, RAY_PRECISION)
        } else {
            let scaled = self
                .sc_ref
                .mul_floor(lp_amount, &self.total_user_liquidity(), RAY_PRECISION);
            self.sc_ref
                .div_floor(&scaled, &self.lp_supply, RAY_PRECISION)
        };
        self.sc_ref
            .rescale_floor(&amount_ray, self.config.asset_decimals)
    }

    /// Underlying amount -> normalized borrow share (RAY), rounded up so a
    /// borrower can never owe fewer shares than the amount is worth.
    pub fn share_from_borrow_amount_ceil(
        &self,
        amount: &ManagedDecimal<C::Api, NumDecimals>,
    ) -> ManagedDecimal<C::Api, NumDecimals> {
        if self.borrowed == self.zero || self.borrowed_share == self.sc_ref.ray_zero() {
            return amount.rescale(RAY_PRECISION);
        }
        let scaled = self
            .sc_ref
            .mul_ceil(amount, &self.borrowed_share, RAY_PRECISION);
        self.sc_ref.div_ceil(&scaled, &self.borrowed, RAY_PRECISION)
    }

    /// Underlying amount -> normalized borrow share (RAY), rounded down so a
    /// partial repayment never settles more share than was paid for.
    pub fn share_from_borrow_amount_floor(
        &self,
        amount: &ManagedDecimal<C::Api, NumDecimals>,
    ) -> ManagedDecimal<C::Api, NumDecimals> {
        if self.borrowed == self.zero || self.borrowed_share == self.sc_ref.ray_zero() {
            return amount.rescale(RAY_PRECISION);
        }
        let scaled = self
            .sc_ref
            .mul_floor(amount, &self.borrowed_share, RAY_PRECISION);
        self.sc_ref
            .div_floor(&scaled, &self.borrowed, RAY_PRECISION)
    }

    /// Borrow share -> underlying amount owed, rounded up in the protocol's
    /// favor.
    pub fn borrow_amount_from_share_ceil(
        &self,
        share: &ManagedDecimal<C::Api, NumDecimals>,
    ) -> ManagedDecimal<C::Api, NumDecimals> {
        if self.borrowed_share == self.sc_ref.ray_zero() {
            return self.zero.clone();
        }
        let scaled = self.sc_ref.mul_ceil(share, &self.borrowed, RAY_PRECISION);
        let amount_ray = self
            .sc_ref
            .div_ceil(&scaled, &self.borrowed_share, RAY_PRECISION);
        self.sc_ref
            .rescale_ceil(&amount_ray, self.config.asset_decimals)
    }

    /// Borrow share -> underlying amount, rounded down; used where the value
    /// feeds a payout to the position holder rather than a debt claim.
    pub fn borrow_amount_from_share_floor(
        &self,
        share: &ManagedDecimal<C::Api, NumDecimals>,
    ) -> ManagedDecimal<C::Api, NumDecimals> {
        if self.borrowed_share == self.sc_ref.ray_zero() {
            return self.zero.clone();
        }
        let scaled = self.sc_ref.mul_floor(share, &self.borrowed, RAY_PRECISION);
        let amount_ray = self
            .sc_ref
            .div_floor(&scaled, &self.borrowed_share, RAY_PRECISION);
        self.sc_ref
            .rescale_floor(&amount_ray, self.config.asset_decimals)
    }
}
