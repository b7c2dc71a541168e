multiversx_sc::imports!();
multiversx_sc::derive_imports!();

use common_constants::RAY_PRECISION;
use common_errors::{
    ERROR_BOOKKEEPING_DRIFT, ERROR_BORROW_LIMIT, ERROR_CLOCK_WENT_BACKWARD, ERROR_DEPOSIT_LIMIT,
    ERROR_INSUFFICIENT_CASH, ERROR_INSUFFICIENT_LP_SUPPLY, ERROR_REDEEM_DISABLED,
};

use crate::{cache::ReserveCache, storage};

/// The Reserve Detail Ledger: per-asset bookkeeping for cash, LP supply,
/// normalized debt and protocol skims.
///
/// Every mutating operation follows accrue-then-act: interest is rolled
/// forward to the current block before any borrowed amount is read, and all
/// validations run before the first cache mutation, so an abort can never
/// leave a half-applied operation behind.
#[multiversx_sc::module]
pub trait ReserveLedgerModule:
    storage::ReserveStorage + common_math::SharedMathModule + common_rates::InterestRates
{
    /// Rolls `total_borrowed` and the protocol skim forward to
    /// `cache.timestamp`.
    ///
    /// No-op when no time has passed or nothing is borrowed; aborts if the
    /// clock went backward. The full interest compounds into `total_borrowed`
    /// (debt exchange rate only ever grows), while `reserve_amount`
    /// additionally collects `interest * reserve_ratio`; LP holders earn the
    /// remainder through `cash + borrowed - reserve_amount`.
    fn accrue_interest(&self, cache: &mut ReserveCache<Self>) {
        require!(
            cache.timestamp >= cache.last_accrue_timestamp,
            ERROR_CLOCK_WENT_BACKWARD
        );
        let elapsed = cache.timestamp - cache.last_accrue_timestamp;
        if elapsed == 0 {
            return;
        }
        cache.last_accrue_timestamp = cache.timestamp;

        if cache.borrowed == cache.zero {
            return;
        }

        let rate = self.calc_borrow_rate(cache.get_utilization(), cache.rate_config.clone());
        let factor = self.calculate_compounded_interest(rate, elapsed);
        let growth = factor - self.ray();

        let interest_ray = self.mul_floor(&cache.borrowed, &growth, RAY_PRECISION);
        let interest_accumulated = self.rescale_floor(&interest_ray, cache.config.asset_decimals);
        if interest_accumulated == cache.zero {
            return;
        }

        let skim_ray = self.mul_floor(&interest_accumulated, &cache.config.reserve_ratio, RAY_PRECISION);
        let reserve_skim = self.rescale_floor(&skim_ray, cache.config.asset_decimals);

        cache.borrowed += &interest_accumulated;
        cache.reserve_amount += &reserve_skim;
    }

    /// Converts `amount` of underlying into LP units and books the deposit.
    fn mint(
        &self,
        cache: &mut ReserveCache<Self>,
        amount: &ManagedDecimal<Self::Api, NumDecimals>,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        self.accrue_interest(cache);
        self.require_custody_integrity(cache);

        if let Some(limit) = &cache.config.deposit_limit {
            let resulting = cache.total_user_liquidity() + amount.clone();
            require!(
                resulting.into_raw_units() <= limit,
                ERROR_DEPOSIT_LIMIT
            );
        }

        let lp_amount = cache.lp_amount_from_underlying(amount);

        cache.cash += amount;
        cache.lp_supply += &lp_amount;

        lp_amount
    }

    /// Converts LP units back to underlying and books the withdrawal.
    /// Collateral seizure passes `is_liquidation` to bypass the redeem
    /// switch; a frozen reserve must not shield positions from liquidation.
    fn redeem(
        &self,
        cache: &mut ReserveCache<Self>,
        lp_amount: &ManagedDecimal<Self::Api, NumDecimals>,
        is_liquidation: bool,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        self.accrue_interest(cache);
        self.require_custody_integrity(cache);

        require!(
            is_liquidation || cache.config.allow_redeem,
            ERROR_REDEEM_DISABLED
        );
        require!(
            cache.lp_supply >= *lp_amount,
            ERROR_INSUFFICIENT_LP_SUPPLY
        );

        let amount = cache.underlying_amount_from_lp(lp_amount);
        require!(cache.has_cash(&amount), ERROR_INSUFFICIENT_CASH);

        cache.lp_supply -= lp_amount;
        cache.cash -= &amount;

        amount
    }

    /// Books a borrow of `amount` (principal plus any fee already added on
    /// top) and returns the normalized share the borrower now owes.
    fn borrow_from_reserve(
        &self,
        cache: &mut ReserveCache<Self>,
        amount: &ManagedDecimal<Self::Api, NumDecimals>,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        self.accrue_interest(cache);

        require!(cache.has_cash(amount), ERROR_INSUFFICIENT_CASH);
        if let Some(limit) = &cache.config.borrow_limit {
            let resulting = cache.borrowed.clone() + amount.clone();
            require!(resulting.into_raw_units() <= limit, ERROR_BORROW_LIMIT);
        }

        let share = cache.share_from_borrow_amount_ceil(amount);

        cache.cash -= amount;
        cache.borrowed += amount;
        cache.borrowed_share += &share;

        share
    }

    /// Outstanding debt for `share`, ceil-rounded in the protocol's favor.
    fn calculate_repay(
        &self,
        cache: &ReserveCache<Self>,
        share: &ManagedDecimal<Self::Api, NumDecimals>,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        cache.borrow_amount_from_share_ceil(share)
    }

    /// Settles up to `payment` against a loan of `loan_share` shares.
    ///
    /// Returns `(actual_repay, settled_share, refund)`: the amount consumed,
    /// the share it extinguished, and any excess payment to hand back to the
    /// caller untouched.
    fn repay_to_reserve(
        &self,
        cache: &mut ReserveCache<Self>,
        payment: &ManagedDecimal<Self::Api, NumDecimals>,
        loan_share: &ManagedDecimal<Self::Api, NumDecimals>,
    ) -> (
        ManagedDecimal<Self::Api, NumDecimals>,
        ManagedDecimal<Self::Api, NumDecimals>,
        ManagedDecimal<Self::Api, NumDecimals>,
    ) {
        self.accrue_interest(cache);

        let outstanding = self.calculate_repay(cache, loan_share);
        let (actual_repay, settled_share, refund) = if *payment >= outstanding {
            (
                outstanding.clone(),
                loan_share.clone(),
                payment.clone() - outstanding,
            )
        } else {
            (
                payment.clone(),
                cache.share_from_borrow_amount_floor(payment),
                cache.zero.clone(),
            )
        };

        cache.cash += &actual_repay;

        // Aggregate totals shed the same amount and share the loan did; clamp
        // the sub-unit dust that per-loan ceil rounding can introduce.
        if actual_repay >= cache.borrowed {
            cache.borrowed = cache.zero.clone();
        } else {
            cache.borrowed -= &actual_repay;
        }
        if settled_share >= cache.borrowed_share {
            cache.borrowed_share = self.ray_zero();
        } else {
            cache.borrowed_share -= &settled_share;
        }

        (actual_repay, settled_share, refund)
    }

    /// `amount * borrow_fee / 1_000_000`, ceil-rounded toward the protocol.
    fn calculate_borrow_fee(
        &self,
        cache: &ReserveCache<Self>,
        amount: &ManagedDecimal<Self::Api, NumDecimals>,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let fee_ray = self.mul_floor(amount, &cache.config.borrow_fee, RAY_PRECISION);
        self.rescale_ceil(&fee_ray, cache.config.asset_decimals)
    }

    /// `amount * flash_loan_fee / 1_000_000`, ceil-rounded toward the protocol.
    fn calculate_flash_loan_fee(
        &self,
        cache: &ReserveCache<Self>,
        amount: &ManagedDecimal<Self::Api, NumDecimals>,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let fee_ray = self.mul_floor(amount, &cache.config.flash_loan_fee, RAY_PRECISION);
        self.rescale_ceil(&fee_ray, cache.config.asset_decimals)
    }

    /// Drains up to `requested` of the interest skim; bounded by the cash on
    /// hand. Returns the amount actually withdrawn.
    fn withdraw_reserve_amount(
        &self,
        cache: &mut ReserveCache<Self>,
        requested: &ManagedDecimal<Self::Api, NumDecimals>,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        self.accrue_interest(cache);

        let available = self.get_min(cache.reserve_amount.clone(), cache.cash.clone());
        let amount = self.get_min(requested.clone(), available);

        cache.reserve_amount -= &amount;
        cache.cash -= &amount;

        amount
    }

    /// Drains up to `requested` of the collected borrow fees.
    fn withdraw_borrow_fee(
        &self,
        cache: &mut ReserveCache<Self>,
        requested: &ManagedDecimal<Self::Api, NumDecimals>,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let amount = self.get_min(requested.clone(), cache.borrow_fee_pool.clone());
        cache.borrow_fee_pool -= &amount;
        amount
    }

    /// The custody integrity assertion: the units this contract actually
    /// holds must cover the ledger's cash and fee pool. Any shortfall means
    /// the bookkeeping has drifted from reality and the transaction must die
    /// rather than continue on corrupt state.
    fn require_custody_integrity(&self, cache: &ReserveCache<Self>) {
        let held = self
            .blockchain()
            .get_sc_balance(&cache.asset, 0);
        let booked = cache.cash.clone() + cache.borrow_fee_pool.clone();
        require!(held >= *booked.into_raw_units(), ERROR_BOOKKEEPING_DRIFT);
    }
}
