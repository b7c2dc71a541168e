multiversx_sc::imports!();
multiversx_sc::derive_imports!();

use common_constants::RAY_PRECISION;
use common_structs::MarketView;

use crate::storage;

/// Read-only reserve metrics. These read storage directly instead of going
/// through the cache, so they stay usable from queries.
#[multiversx_sc::module]
pub trait ReserveViewModule:
    storage::ReserveStorage + common_math::SharedMathModule + common_rates::InterestRates
{
    /// `borrowed / (cash + borrowed - reserve_amount)`, RAY-scaled.
    #[view(getCapitalUtilisation)]
    fn get_capital_utilisation(
        &self,
        asset: &EgldOrEsdtTokenIdentifier,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let config = self.reserve_config(asset).get();
        let zero = self.to_decimal(BigUint::zero(), config.asset_decimals);
        let borrowed = self.total_borrowed(asset).get();
        if borrowed == zero {
            return self.ray_zero();
        }
        let liquidity =
            self.total_cash_available(asset).get() + borrowed.clone() - self.reserve_amount(asset).get();
        if liquidity == zero {
            return self.ray_zero();
        }
        self.div_half_up(&borrowed, &liquidity, RAY_PRECISION)
    }

    /// Current per-second borrow rate, RAY-scaled.
    #[view(getBorrowRate)]
    fn get_borrow_rate(
        &self,
        asset: &EgldOrEsdtTokenIdentifier,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let rate_config = self.interest_rate_config(asset).get();
        self.calc_borrow_rate(self.get_capital_utilisation(asset), rate_config)
    }

    /// Debt currently owed for a normalized borrow share, ceil-rounded.
    #[view(getBorrowAmountForShare)]
    fn get_borrow_amount_for_share(
        &self,
        asset: &EgldOrEsdtTokenIdentifier,
        share: ManagedDecimal<Self::Api, NumDecimals>,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let config = self.reserve_config(asset).get();
        let borrowed_share = self.total_borrowed_share(asset).get();
        if borrowed_share == self.ray_zero() {
            return self.to_decimal(BigUint::zero(), config.asset_decimals);
        }
        let borrowed = self.total_borrowed(asset).get();
        let scaled = self.mul_ceil(&share, &borrowed, RAY_PRECISION);
        let amount_ray = self.div_ceil(&scaled, &borrowed_share, RAY_PRECISION);
        self.rescale_ceil(&amount_ray, config.asset_decimals)
    }

    #[view(getMarket)]
    fn get_market(&self, asset: &EgldOrEsdtTokenIdentifier) -> MarketView<Self::Api> {
        MarketView {
            asset: asset.clone(),
            total_cash_available: self.total_cash_available(asset).get(),
            total_lp_supply: self.total_lp_supply(asset).get(),
            total_borrowed: self.total_borrowed(asset).get(),
            total_borrowed_share: self.total_borrowed_share(asset).get(),
            reserve_amount: self.reserve_amount(asset).get(),
            borrow_fee_pool: self.borrow_fee_pool(asset).get(),
            utilization: self.get_capital_utilisation(asset),
            borrow_rate: self.get_borrow_rate(asset),
            interest_accrue_timestamp: self.interest_accrue_timestamp(asset).get(),
        }
    }
}
