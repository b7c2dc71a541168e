use common_errors::ERROR_PRICE_FEED_NOT_FOUND;

use crate::storage;

multiversx_sc::imports!();

/// Trusted price source: a feeder-maintained USD price per asset, WAD-scaled.
/// Staleness and sanity checks are the feeder's concern, not this module's.
#[multiversx_sc::module]
pub trait OracleModule:
    storage::Storage
    + common_events::EventsModule
    + multiversx_sc_modules::only_admin::OnlyAdminModule
{
    fn get_price(
        &self,
        asset: &EgldOrEsdtTokenIdentifier,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let mapper = self.price_feed(asset);
        require!(!mapper.is_empty(), ERROR_PRICE_FEED_NOT_FOUND);
        mapper.get()
    }

    /// Admins double as price feeders.
    #[endpoint(setPriceFeed)]
    fn set_price_feed(&self, asset: EgldOrEsdtTokenIdentifier, price: BigUint) {
        self.require_caller_is_admin();
        self.set_price_feed_event(&asset, &price);
        self.price_feed(&asset)
            .set(ManagedDecimal::from_raw_units(
                price,
                common_constants::WAD_PRECISION,
            ));
    }
}
