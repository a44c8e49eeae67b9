use crate::entities::ride::RideRequest;
use crate::utils::geo::{is_within_radius, GeoPoint};

/// Source of ride requests near a driver.
pub trait RideFeed: Send + Sync {
    fn nearby(&self, location: GeoPoint) -> Vec<RideRequest>;
}

/// Serves a fixed set of ride requests.
#[derive(Debug, Clone)]
pub struct FixtureRideFeed {
    requests: Vec<RideRequest>,
    radius_km: Option<f64>,
}

impl Default for FixtureRideFeed {
    fn default() -> Self {
        Self::with_requests(vec![
            RideRequest {
                id: 1,
                source: GeoPoint::new(20.5937, 78.9629),
                destination: GeoPoint::new(20.6000, 78.9700),
            },
            RideRequest {
                id: 2,
                source: GeoPoint::new(20.6050, 78.9750),
                destination: GeoPoint::new(20.6100, 78.9800),
            },
        ])
    }
}

impl FixtureRideFeed {
    pub fn with_requests(requests: Vec<RideRequest>) -> Self {
        Self {
            requests,
            radius_km: None,
        }
    }

    /// Only serve requests whose pickup lies within `radius_km` of the driver.
    pub fn within_radius(mut self, radius_km: f64) -> Self {
        self.radius_km = Some(radius_km);
        self
    }
}

impl RideFeed for FixtureRideFeed {
    fn nearby(&self, location: GeoPoint) -> Vec<RideRequest> {
        self.requests
            .iter()
            .filter(|request| match self.radius_km {
                Some(radius) => {
                    is_within_radius(request.source, location, radius).unwrap_or(false)
                }
                None => true,
            })
            .copied()
            .collect()
    }
}
