#![no_std]

use core::cmp::Ordering;

use common_constants::{
    BPS, BPS_PRECISION, MILLIONTH_PRECISION, RAY, RAY_PRECISION, WAD, WAD_PRECISION,
};

multiversx_sc::imports!();

/// Fixed-point helpers shared by every ledger module.
///
/// All quantities in the protocol are non-negative scaled integers
/// (`ManagedDecimal` over `BigUint`), so subtraction below zero aborts in the
/// framework instead of wrapping. Rounding direction is explicit at every
/// conversion boundary: `floor` for amounts the protocol pays out, `ceil` for
/// amounts the protocol is owed, `half_up` for rate and index math where no
/// adversarial direction exists.
#[multiversx_sc::module]
pub trait SharedMathModule {
    fn mul_floor(
        &self,
        a: &ManagedDecimal<Self::Api, NumDecimals>,
        b: &ManagedDecimal<Self::Api, NumDecimals>,
        precision: NumDecimals,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let scaled_a = a.rescale(precision);
        let scaled_b = b.rescale(precision);

        let product = scaled_a.into_raw_units() * scaled_b.into_raw_units();
        let scale = BigUint::from(10u64).pow(precision as u32);

        self.to_decimal(product / scale, precision)
    }

    fn mul_ceil(
        &self,
        a: &ManagedDecimal<Self::Api, NumDecimals>,
        b: &ManagedDecimal<Self::Api, NumDecimals>,
        precision: NumDecimals,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let scaled_a = a.rescale(precision);
        let scaled_b = b.rescale(precision);

        let product = scaled_a.into_raw_units() * scaled_b.into_raw_units();
        let scale = BigUint::from(10u64).pow(precision as u32);
        let one = BigUint::from(1u64);
        let rounded = (product + &scale - &one) / scale;

        self.to_decimal(rounded, precision)
    }

    fn mul_half_up(
        &self,
        a: &ManagedDecimal<Self::Api, NumDecimals>,
        b: &ManagedDecimal<Self::Api, NumDecimals>,
        precision: NumDecimals,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let scaled_a = a.rescale(precision);
        let scaled_b = b.rescale(precision);

        let product = scaled_a.into_raw_units() * scaled_b.into_raw_units();
        let scale = BigUint::from(10u64).pow(precision as u32);
        let half_scale = &scale / &BigUint::from(2u64);
        let rounded = (product + half_scale) / scale;

        self.to_decimal(rounded, precision)
    }

    fn div_floor(
        &self,
        a: &ManagedDecimal<Self::Api, NumDecimals>,
        b: &ManagedDecimal<Self::Api, NumDecimals>,
        precision: NumDecimals,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let scaled_a = a.rescale(precision);
        let scaled_b = b.rescale(precision);

        let scale = BigUint::from(10u64).pow(precision as u32);
        let numerator = scaled_a.into_raw_units() * &scale;
        let denominator = scaled_b.into_raw_units();

        self.to_decimal(numerator / denominator, precision)
    }

    fn div_ceil(
        &self,
        a: &ManagedDecimal<Self::Api, NumDecimals>,
        b: &ManagedDecimal<Self::Api, NumDecimals>,
        precision: NumDecimals,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let scaled_a = a.rescale(precision);
        let scaled_b = b.rescale(precision);

        let scale = BigUint::from(10u64).pow(precision as u32);
        let numerator = scaled_a.into_raw_units() * &scale;
        let denominator = scaled_b.into_raw_units();
        let one = BigUint::from(1u64);
        let rounded = (numerator + denominator - &one) / denominator;

        self.to_decimal(rounded, precision)
    }

    fn div_half_up(
        &self,
        a: &ManagedDecimal<Self::Api, NumDecimals>,
        b: &ManagedDecimal<Self::Api, NumDecimals>,
        precision: NumDecimals,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let scaled_a = a.rescale(precision);
        let scaled_b = b.rescale(precision);

        let scale = BigUint::from(10u64).pow(precision as u32);
        let numerator = scaled_a.into_raw_units() * &scale;
        let denominator = scaled_b.into_raw_units();
        let half_denominator = denominator / &BigUint::from(2u64);
        let rounded = (numerator + half_denominator) / denominator;

        self.to_decimal(rounded, precision)
    }

    /// Downscaling truncates, which is exactly floor on a non-negative domain;
    /// upscaling is always exact.
    fn rescale_floor(
        &self,
        value: &ManagedDecimal<Self::Api, NumDecimals>,
        new_precision: NumDecimals,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let old_precision = value.scale();
        let raw_value = value.into_raw_units();

        match new_precision.cmp(&old_precision) {
            Ordering::Equal => value.clone(),
            Ordering::Less => {
                let precision_diff = old_precision - new_precision;
                let factor = BigUint::from(10u64).pow(precision_diff as u32);
                ManagedDecimal::from_raw_units(raw_value / &factor, new_precision)
            },
            Ordering::Greater => value.rescale(new_precision),
        }
    }

    fn rescale_ceil(
        &self,
        value: &ManagedDecimal<Self::Api, NumDecimals>,
        new_precision: NumDecimals,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let old_precision = value.scale();
        let raw_value = value.into_raw_units();

        match new_precision.cmp(&old_precision) {
            Ordering::Equal => value.clone(),
            Ordering::Less => {
                let precision_diff = old_precision - new_precision;
                let factor = BigUint::from(10u64).pow(precision_diff as u32);
                let one = BigUint::from(1u64);
                let rounded = (raw_value + &factor - &one) / factor;
                ManagedDecimal::from_raw_units(rounded, new_precision)
            },
            Ordering::Greater => value.rescale(new_precision),
        }
    }

    fn rescale_half_up(
        &self,
        value: &ManagedDecimal<Self::Api, NumDecimals>,
        new_precision: NumDecimals,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let old_precision = value.scale();
        let raw_value = value.into_raw_units();

        match new_precision.cmp(&old_precision) {
            Ordering::Equal => value.clone(),
            Ordering::Less => {
                let precision_diff = old_precision - new_precision;
                let factor = BigUint::from(10u64).pow(precision_diff as u32);
                let half_factor = &factor / 2u64;
                let rounded = (raw_value + &half_factor) / factor;
                ManagedDecimal::from_raw_units(rounded, new_precision)
            },
            Ordering::Greater => value.rescale(new_precision),
        }
    }

    fn to_decimal(
        &self,
        value: BigUint,
        precision: NumDecimals,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        ManagedDecimal::from_raw_units(value, precision)
    }

    fn to_decimal_wad(&self, value: BigUint) -> ManagedDecimal<Self::Api, NumDecimals> {
        self.to_decimal(value, WAD_PRECISION)
    }

    fn to_decimal_ray(&self, value: BigUint) -> ManagedDecimal<Self::Api, NumDecimals> {
        self.to_decimal(value, RAY_PRECISION)
    }

    fn to_decimal_bps(&self, value: BigUint) -> ManagedDecimal<Self::Api, NumDecimals> {
        self.to_decimal(value, BPS_PRECISION)
    }

    fn wad(&self) -> ManagedDecimal<Self::Api, NumDecimals> {
        self.to_decimal(BigUint::from(WAD), WAD_PRECISION)
    }

    fn ray(&self) -> ManagedDecimal<Self::Api, NumDecimals> {
        self.to_decimal(BigUint::from(RAY), RAY_PRECISION)
    }

    fn bps(&self) -> ManagedDecimal<Self::Api, NumDecimals> {
        self.to_decimal(BigUint::from(BPS), BPS_PRECISION)
    }

    fn wad_zero(&self) -> ManagedDecimal<Self::Api, NumDecimals> {
        self.to_decimal_wad(BigUint::zero())
    }

    fn ray_zero(&self) -> ManagedDecimal<Self::Api, NumDecimals> {
        self.to_decimal_ray(BigUint::zero())
    }

    fn bps_zero(&self) -> ManagedDecimal<Self::Api, NumDecimals> {
        self.to_decimal_bps(BigUint::zero())
    }

    /// Literal constructor for bps-denominated config values (10_000 = 100%).
    fn from_bips(&self, value: u64) -> ManagedDecimal<Self::Api, NumDecimals> {
        self.to_decimal(BigUint::from(value), BPS_PRECISION)
    }

    /// Literal constructor for millionth-denominated fee rates (1_000_000 = 100%).
    fn from_millionth(&self, value: u64) -> ManagedDecimal<Self::Api, NumDecimals> {
        self.to_decimal(BigUint::from(value), MILLIONTH_PRECISION)
    }

    /// Literal constructor for whole percentages (100 = 100%).
    fn from_percentage(&self, value: u64) -> ManagedDecimal<Self::Api, NumDecimals> {
        self.to_decimal(BigUint::from(value * BPS / 100), BPS_PRECISION)
    }

    fn get_min(
        &self,
        a: ManagedDecimal<Self::Api, NumDecimals>,
        b: ManagedDecimal<Self::Api, NumDecimals>,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        if a < b {
            a
        } else {
            b
        }
    }

    fn get_max(
        &self,
        a: ManagedDecimal<Self::Api, NumDecimals>,
        b: ManagedDecimal<Self::Api, NumDecimals>,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        if a > b {
            a
        } else {
            b
        }
    }
}
