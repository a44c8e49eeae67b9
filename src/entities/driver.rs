use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::ride::{AvailableRide, CompletedRide};
use crate::error::FareError;
use crate::pricing::RateTable;
use crate::store::RideFeed;
use crate::utils::geo::GeoPoint;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DashboardError {
    #[error("Driver is offline")]
    Offline,

    #[error("Ride {0} is already accepted")]
    RideAlreadyAccepted(u32),

    #[error("Ride {0} is not available")]
    RideNotAvailable(u32),

    #[error("No ride has been accepted")]
    NoAcceptedRide,

    #[error(transparent)]
    Fare(#[from] FareError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriverStatus {
    Offline,
    Online,
}

impl DriverStatus {
    pub fn name(&self) -> &'static str {
        match self {
            DriverStatus::Offline => "offline",
            DriverStatus::Online => "online",
        }
    }
}

/// One driver's dashboard: availability, the ride list, and takings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverSession {
    pub driver_id: Uuid,
    pub status: DriverStatus,
    pub location: Option<GeoPoint>,
    pub available_rides: Vec<AvailableRide>,
    pub accepted_ride: Option<AvailableRide>,
    pub earnings: f64,
    pub history: Vec<CompletedRide>,
}

impl DriverSession {
    pub fn new(driver_id: Uuid) -> Self {
        Self {
            driver_id,
            status: DriverStatus::Offline,
            location: None,
            available_rides: Vec::new(),
            accepted_ride: None,
            earnings: 0.0,
            history: Vec::new(),
        }
    }

    pub fn is_online(&self) -> bool {
        self.status == DriverStatus::Online
    }

    pub fn update_location(&mut self, location: GeoPoint) -> Result<(), DashboardError> {
        location.validate()?;
        self.location = Some(location);
        Ok(())
    }

    /// Comes online and lists nearby requests. Without a known location the
    /// driver is online with an empty list. While a ride is accepted the list
    /// stays empty.
    #[tracing::instrument(skip(self, feed, rates), fields(driver_id = %self.driver_id))]
    pub fn go_online(
        &mut self,
        feed: &dyn RideFeed,
        rates: &RateTable,
    ) -> Result<&[AvailableRide], DashboardError> {
        if self.accepted_ride.is_none() {
            self.available_rides = self.price_nearby(feed, rates)?;
        }
        self.status = DriverStatus::Online;
        Ok(&self.available_rides)
    }

    /// Goes offline, dropping the ride list and any accepted ride.
    #[tracing::instrument(skip(self), fields(driver_id = %self.driver_id))]
    pub fn go_offline(&mut self) {
        if let Some(ride) = self.accepted_ride.take() {
            tracing::warn!(ride_id = ride.id, "Accepted ride dropped on going offline");
        }
        self.status = DriverStatus::Offline;
        self.available_rides.clear();
    }

    /// Re-lists nearby requests. Leaves the list empty while a ride is accepted.
    pub fn refresh_rides(
        &mut self,
        feed: &dyn RideFeed,
        rates: &RateTable,
    ) -> Result<&[AvailableRide], DashboardError> {
        if !self.is_online() {
            return Err(DashboardError::Offline);
        }
        if self.accepted_ride.is_none() {
            self.available_rides = self.price_nearby(feed, rates)?;
        }
        Ok(&self.available_rides)
    }

    #[tracing::instrument(skip(self), fields(driver_id = %self.driver_id))]
    pub fn accept_ride(&mut self, ride_id: u32) -> Result<&AvailableRide, DashboardError> {
        if !self.is_online() {
            return Err(DashboardError::Offline);
        }
        if let Some(accepted) = &self.accepted_ride {
            return Err(DashboardError::RideAlreadyAccepted(accepted.id));
        }

        let index = self
            .available_rides
            .iter()
            .position(|ride| ride.id == ride_id)
            .ok_or(DashboardError::RideNotAvailable(ride_id))?;

        let ride = self.available_rides.swap_remove(index);
        self.available_rides.clear();

        tracing::info!(ride_id, fare = ride.fare, "Ride accepted");
        Ok(self.accepted_ride.insert(ride))
    }

    #[tracing::instrument(skip(self), fields(driver_id = %self.driver_id))]
    pub fn complete_ride(&mut self) -> Result<&CompletedRide, DashboardError> {
        let ride = self
            .accepted_ride
            .take()
            .ok_or(DashboardError::NoAcceptedRide)?;

        self.earnings += ride.fare;
        tracing::info!(ride_id = ride.id, earnings = self.earnings, "Ride completed");

        self.history.push(CompletedRide::from(ride));
        Ok(&self.history[self.history.len() - 1])
    }

    fn price_nearby(
        &self,
        feed: &dyn RideFeed,
        rates: &RateTable,
    ) -> Result<Vec<AvailableRide>, DashboardError> {
        let Some(location) = self.location else {
            tracing::debug!(driver_id = %self.driver_id, "No location yet, listing no rides");
            return Ok(Vec::new());
        };

        let rides = feed
            .nearby(location)
            .iter()
            .map(|request| AvailableRide::price(request, location, rates))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rides)
    }
}
