use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::FareError;
use crate::pricing::{estimate_fare_rounded, FareQuote, RateTable};
use crate::utils::geo::{distance_km, round_distance, GeoPoint};

/// A pending ride request near a driver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RideRequest {
    pub id: u32,
    pub source: GeoPoint,
    pub destination: GeoPoint,
}

/// A ride request as listed to a specific driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailableRide {
    pub id: u32,
    pub source: GeoPoint,
    pub destination: GeoPoint,
    /// Distance from the driver to the pickup, rounded to two decimals.
    pub distance_km: f64,
    /// Whole-unit fares from the driver rate table.
    pub fares: FareQuote,
    /// Payout credited to the driver on completion.
    pub fare: f64,
}

impl AvailableRide {
    /// Prices a request from the driver's current position.
    ///
    /// Fares use the unrounded distance; only the displayed distance is
    /// rounded.
    pub fn price(
        request: &RideRequest,
        driver_location: GeoPoint,
        rates: &RateTable,
    ) -> Result<Self, FareError> {
        let distance = distance_km(driver_location, request.source)?;
        let fares = estimate_fare_rounded(distance, rates)?;
        let fare = fares
            .cheapest()
            .map(|cheapest| cheapest.fare)
            .ok_or(FareError::EmptyRateTable)?;

        Ok(Self {
            id: request.id,
            source: request.source,
            destination: request.destination,
            distance_km: round_distance(distance),
            fares,
            fare,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedRide {
    pub id: u32,
    pub source: GeoPoint,
    pub destination: GeoPoint,
    pub fare: f64,
    pub completed_at: DateTime<Utc>,
}

impl From<AvailableRide> for CompletedRide {
    fn from(ride: AvailableRide) -> Self {
        Self {
            id: ride.id,
            source: ride.source,
            destination: ride.destination,
            fare: ride.fare,
            completed_at: Utc::now(),
        }
    }
}
