//! Core fare calculation functions.
//!
//! Pure functions for fare math: no state, no I/O. Both estimators are
//! linear in distance; they differ only in whether the result is rounded.

use std::collections::BTreeMap;

use crate::error::FareError;
use crate::pricing::models::{FareQuote, RateTable};
use crate::utils::geo::{distance_km, GeoPoint};

/// Fare per provider at full precision, used for rider-side comparison.
pub fn estimate_fare_exact(distance_km: f64, rates: &RateTable) -> Result<FareQuote, FareError> {
    estimate_with(distance_km, rates, |fare| fare)
}

/// Fare per provider rounded to the nearest whole currency unit, used for
/// driver-side ride listings.
///
/// Fares are never negative, so `f64::round` (half away from zero) agrees
/// with rounding half up.
pub fn estimate_fare_rounded(
    distance_km: f64,
    rates: &RateTable,
) -> Result<FareQuote, FareError> {
    estimate_with(distance_km, rates, f64::round)
}

/// Distance between two points together with the exact fare for it.
pub fn quote_trip(
    source: GeoPoint,
    destination: GeoPoint,
    rates: &RateTable,
) -> Result<(f64, FareQuote), FareError> {
    let distance = distance_km(source, destination)?;
    let fares = estimate_fare_exact(distance, rates)?;
    Ok((distance, fares))
}

fn estimate_with<F>(distance_km: f64, rates: &RateTable, finish: F) -> Result<FareQuote, FareError>
where
    F: Fn(f64) -> f64,
{
    if !distance_km.is_finite() || distance_km < 0.0 {
        return Err(FareError::InvalidDistance(distance_km));
    }
    if rates.is_empty() {
        return Err(FareError::EmptyRateTable);
    }

    let fares: BTreeMap<String, f64> = rates
        .iter()
        .map(|(provider, rate)| (provider.to_string(), finish(distance_km * rate)))
        .collect();

    Ok(FareQuote::from_map(fares))
}
