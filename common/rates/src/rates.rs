#![no_std]

use common_constants::{RAY_PRECISION, SECONDS_PER_YEAR};
use common_structs::InterestRateConfig;

multiversx_sc::imports!();

/// Borrow-rate curve and interest compounding.
///
/// Rates are RAY-scaled. The curve is piecewise linear over utilization with
/// three regions split at `mid_utilization` and `optimal_utilization`, capped
/// at `max_borrow_rate`, then converted to a per-second rate.
#[multiversx_sc::module]
pub trait InterestRates: common_math::SharedMathModule {
    /// Annual borrow rate for the given utilization, as a per-second RAY rate.
    ///
    /// - `utilization < mid`: `base + utilization * slope1 / mid`
    /// - `mid <= utilization < optimal`:
    ///   `base + slope1 + (utilization - mid) * slope2 / (optimal - mid)`
    /// - `utilization >= optimal`:
    ///   `base + slope1 + slope2 + (utilization - optimal) * slope3 / (1 - optimal)`
    fn calc_borrow_rate(
        &self,
        utilization: ManagedDecimal<Self::Api, NumDecimals>,
        config: InterestRateConfig<Self::Api>,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let annual_rate = if utilization < config.mid_utilization {
            let utilization_ratio = utilization
                .mul(config.slope1)
                .div(config.mid_utilization);
            config.base_borrow_rate.add(utilization_ratio)
        } else if utilization < config.optimal_utilization {
            let excess_utilization = utilization.sub(config.mid_utilization.clone());
            let slope_contribution = excess_utilization
                .mul(config.slope2)
                .div(config.optimal_utilization.sub(config.mid_utilization));
            config
                .base_borrow_rate
                .add(config.slope1)
                .add(slope_contribution)
        } else {
            let base_rate = config
                .base_borrow_rate
                .add(config.slope1)
                .add(config.slope2);
            let excess_utilization = utilization.sub(config.optimal_utilization.clone());
            let slope_contribution = excess_utilization
                .mul(config.slope3)
                .div(self.ray().sub(config.optimal_utilization));
            base_rate.add(slope_contribution)
        };

        let capped_rate = if annual_rate > config.max_borrow_rate {
            config.max_borrow_rate
        } else {
            annual_rate
        };

        let sec_per_year = ManagedDecimal::from_raw_units(BigUint::from(SECONDS_PER_YEAR), 0usize);
        capped_rate / sec_per_year
    }

    /// Compounded interest factor over `exp` seconds, approximated with a
    /// third-order Taylor expansion of `(1 + r)^t`:
    ///
    /// `factor = 1 + r*t + (r*t)^2/2 + (r*t)^3/6`
    ///
    /// Precise for the short intervals between consecutive accruals.
    fn calculate_compounded_interest(
        &self,
        rate_per_second: ManagedDecimal<Self::Api, NumDecimals>,
        exp: u64,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let ray = self.ray();
        if exp == 0 {
            return ray;
        }

        let exp_dec = ManagedDecimal::from_raw_units(BigUint::from(exp), 0usize);
        let exp_minus_one =
            ManagedDecimal::from_raw_units(BigUint::from(exp - 1), 0usize);
        let exp_minus_two =
            ManagedDecimal::from_raw_units(BigUint::from(if exp > 2 { exp - 2 } else { 0 }), 0usize);

        let base_power_two = self.mul_half_up(&rate_per_second, &rate_per_second, RAY_PRECISION);
        let base_power_three = self.mul_half_up(&base_power_two, &rate_per_second, RAY_PRECISION);

        let main_term = self.mul_half_up(&rate_per_second, &exp_dec, RAY_PRECISION);

        let second_term = self.div_half_up(
            &self.mul_half_up(
                &self.mul_half_up(&exp_dec, &exp_minus_one, RAY_PRECISION),
                &base_power_two,
                RAY_PRECISION,
            ),
            &ManagedDecimal::from_raw_units(BigUint::from(2u64), 0usize),
            RAY_PRECISION,
        );

        let third_term = self.div_half_up(
            &self.mul_half_up(
                &self.mul_half_up(
                    &self.mul_half_up(&exp_dec, &exp_minus_one, RAY_PRECISION),
                    &exp_minus_two,
                    RAY_PRECISION,
                ),
                &base_power_three,
                RAY_PRECISION,
            ),
            &ManagedDecimal::from_raw_units(BigUint::from(6u64), 0usize),
            RAY_PRECISION,
        );

        ray + main_term + second_term + third_term
    }
}
