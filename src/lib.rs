pub mod config;
pub mod entities;
pub mod error;
pub mod external;
pub mod handlers;
pub mod middleware;
pub mod pricing;
pub mod routes;
pub mod store;
pub mod utils;

use std::sync::Arc;

use external::nominatim::NominatimClient;
use store::{DriverStore, FixtureRideFeed, RideFeed};

pub use config::Config;
pub use error::{AppError, AppResult, FareError};
pub use pricing::{estimate_fare_exact, estimate_fare_rounded, FareQuote, RateTable};
pub use utils::geo::{distance_km, GeoPoint};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub drivers: DriverStore,
    pub rides: Arc<dyn RideFeed>,
    pub geocoder: NominatimClient,
}

impl AppState {
    /// State backed by the fixture ride feed.
    pub fn new(config: Config) -> AppResult<Self> {
        let mut feed = FixtureRideFeed::default();
        if let Some(radius) = config.ride_search_radius_km {
            feed = feed.within_radius(radius);
        }
        Self::with_feed(config, Arc::new(feed))
    }

    pub fn with_feed(config: Config, rides: Arc<dyn RideFeed>) -> AppResult<Self> {
        let geocoder = NominatimClient::new(&config)?;

        Ok(Self {
            config,
            drivers: DriverStore::new(),
            rides,
            geocoder,
        })
    }
}
