use common_structs::{EModeAssetConfig, EModeCategory, ReserveConfig};

use crate::storage;
use common_errors::{
    ERROR_EMODE_BORROWS_OUTSIDE_CATEGORY, ERROR_EMODE_CATEGORY_DEPRECATED,
    ERROR_EMODE_CATEGORY_NOT_FOUND,
};

use super::CheckEquity;

multiversx_sc::imports!();

/// E-mode: the single choke point for risk-parameter resolution. Wherever
/// base LTV/threshold/bonus would be read, `resolve_reserve_config` is read
/// instead, so category overrides can never be missed by one call site.
#[multiversx_sc::module]
pub trait EModeModule: storage::Storage + reserve_layer::storage::ReserveStorage {
    /// Overlays a category's risk parameters onto an asset's config.
    fn apply_e_mode_to_reserve_config(
        &self,
        config: &mut ReserveConfig<Self::Api>,
        category: &EModeCategory<Self::Api>,
    ) {
        config.loan_to_value = category.loan_to_value.clone();
        config.liquidation_threshold = category.liquidation_threshold.clone();
        config.liquidation_bonus = category.liquidation_bonus.clone();
    }

    /// The asset's reserve config with the profile's e-mode category applied,
    /// if the asset participates in it.
    fn resolve_reserve_config(
        &self,
        asset: &EgldOrEsdtTokenIdentifier,
        e_mode_id: u8,
    ) -> ReserveConfig<Self::Api> {
        let mut config = self.reserve_config(asset).get();
        if e_mode_id == 0 {
            return config;
        }
        if let Some(category) = self.get_e_mode_category(e_mode_id) {
            if let Some(asset_config) = self.get_asset_e_mode_config(e_mode_id, asset) {
                if asset_config.is_collateralizable {
                    self.apply_e_mode_to_reserve_config(&mut config, &category);
                }
            }
        }
        config
    }

    fn get_e_mode_category(&self, e_mode_id: u8) -> Option<EModeCategory<Self::Api>> {
        if e_mode_id == 0 {
            return None;
        }
        let categories = self.e_mode_categories();
        require!(
            categories.contains_key(&e_mode_id),
            ERROR_EMODE_CATEGORY_NOT_FOUND
        );
        Some(categories.get(&e_mode_id).unwrap())
    }

    fn get_asset_e_mode_config(
        &self,
        e_mode_id: u8,
        asset: &EgldOrEsdtTokenIdentifier,
    ) -> Option<EModeAssetConfig> {
        if e_mode_id == 0 {
            return None;
        }
        self.e_mode_assets(e_mode_id).get(asset)
    }

    /// A profile may enter a category only when every open loan's asset is a
    /// borrowable member of it.
    fn is_eligible_for_e_mode(
        &self,
        owner: &ManagedAddress,
        subaccount: u8,
        e_mode_id: u8,
    ) -> bool {
        for (asset, _) in self.loans(owner, subaccount).iter() {
            match self.get_asset_e_mode_config(e_mode_id, &asset) {
                Some(asset_config) => {
                    if !asset_config.is_borrowable {
                        return false;
                    }
                },
                None => return false,
            }
        }
        true
    }

    /// Switches the profile's category. Returns the solvency obligation: the
    /// re-derived parameters can tighten collateral requirements, so the
    /// caller must end with `require_solvent`.
    fn process_set_e_mode(
        &self,
        owner: &ManagedAddress,
        subaccount: u8,
        e_mode_id: u8,
    ) -> CheckEquity<Self::Api> {
        if e_mode_id != 0 {
            let category = self.get_e_mode_category(e_mode_id).unwrap();
            require!(!category.is_deprecated(), ERROR_EMODE_CATEGORY_DEPRECATED);
            require!(
                self.is_eligible_for_e_mode(owner, subaccount, e_mode_id),
                ERROR_EMODE_BORROWS_OUTSIDE_CATEGORY
            );
        }

        self.profile_e_mode(owner, subaccount).set(e_mode_id);

        CheckEquity::new(owner.clone(), subaccount)
    }
}
