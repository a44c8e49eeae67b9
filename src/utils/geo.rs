use serde::{Deserialize, Serialize};

use crate::error::FareError;

/// Mean Earth radius used for all great-circle distances.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

pub const MIN_LAT: f64 = -90.0;
pub const MAX_LAT: f64 = 90.0;
pub const MIN_LNG: f64 = -180.0;
pub const MAX_LNG: f64 = 180.0;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Rejects non-finite or out-of-range coordinates.
    pub fn validate(&self) -> Result<(), FareError> {
        let lat_ok = self.lat.is_finite() && (MIN_LAT..=MAX_LAT).contains(&self.lat);
        let lng_ok = self.lng.is_finite() && (MIN_LNG..=MAX_LNG).contains(&self.lng);

        if lat_ok && lng_ok {
            Ok(())
        } else {
            Err(FareError::InvalidCoordinate {
                lat: self.lat,
                lng: self.lng,
            })
        }
    }
}

/// Calculate distance between two coordinates using Haversine formula
/// Returns distance in kilometers
pub fn distance_km(a: GeoPoint, b: GeoPoint) -> Result<f64, FareError> {
    a.validate()?;
    b.validate()?;

    let lat1_rad = a.lat.to_radians();
    let lat2_rad = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lng = (b.lng - a.lng).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    // rounding can push h a hair outside [0, 1] near antipodes
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    Ok(EARTH_RADIUS_KM * c)
}

/// Check if a point is within the given radius of a center
pub fn is_within_radius(
    point: GeoPoint,
    center: GeoPoint,
    max_radius_km: f64,
) -> Result<bool, FareError> {
    Ok(distance_km(point, center)? <= max_radius_km)
}

/// Round a distance to two decimals for display.
pub fn round_distance(km: f64) -> f64 {
    (km * 100.0).round() / 100.0
}
