use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::driver::{DriverSession, DriverStatus};
use crate::entities::ride::{AvailableRide, CompletedRide};
use crate::error::{AppError, AppResult};
use crate::utils::geo::GeoPoint;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub driver_id: Uuid,
    pub status: DriverStatus,
    pub location: Option<GeoPoint>,
    pub available_rides: Vec<AvailableRide>,
    pub accepted_ride: Option<AvailableRide>,
    pub earnings: f64,
    pub history: Vec<CompletedRide>,
}

impl From<DriverSession> for DashboardResponse {
    fn from(session: DriverSession) -> Self {
        Self {
            driver_id: session.driver_id,
            status: session.status,
            location: session.location,
            available_rides: session.available_rides,
            accepted_ride: session.accepted_ride,
            earnings: session.earnings,
            history: session.history,
        }
    }
}

/// Get the driver's dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    Path(driver_id): Path<Uuid>,
) -> Json<DashboardResponse> {
    Json(state.drivers.snapshot(driver_id).await.into())
}

/// Report the driver's current position
pub async fn update_location(
    State(state): State<AppState>,
    Path(driver_id): Path<Uuid>,
    Json(location): Json<GeoPoint>,
) -> AppResult<Json<DashboardResponse>> {
    let session = state
        .drivers
        .update(driver_id, |session| {
            session.update_location(location)?;
            Ok::<_, AppError>(session.clone())
        })
        .await?;

    Ok(Json(session.into()))
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub online: bool,
}

/// Go online (listing nearby rides) or offline
pub async fn set_status(
    State(state): State<AppState>,
    Path(driver_id): Path<Uuid>,
    Json(payload): Json<StatusRequest>,
) -> AppResult<Json<DashboardResponse>> {
    let rates = &state.config.driver_rates;
    let feed = state.rides.as_ref();

    let session = state
        .drivers
        .update(driver_id, |session| {
            if payload.online {
                session.go_online(feed, rates)?;
            } else {
                session.go_offline();
            }
            Ok::<_, AppError>(session.clone())
        })
        .await?;

    tracing::info!(%driver_id, status = session.status.name(), "Driver status changed");

    Ok(Json(session.into()))
}

/// List rides available to the driver
pub async fn available_rides(
    State(state): State<AppState>,
    Path(driver_id): Path<Uuid>,
) -> AppResult<Json<Vec<AvailableRide>>> {
    let rates = &state.config.driver_rates;
    let feed = state.rides.as_ref();

    let rides = state
        .drivers
        .update(driver_id, |session| {
            session
                .refresh_rides(feed, rates)
                .map(|rides| rides.to_vec())
        })
        .await?;

    Ok(Json(rides))
}

/// Accept one of the listed rides
pub async fn accept_ride(
    State(state): State<AppState>,
    Path((driver_id, ride_id)): Path<(Uuid, u32)>,
) -> AppResult<Json<AvailableRide>> {
    let ride = state
        .drivers
        .update(driver_id, |session| session.accept_ride(ride_id).cloned())
        .await?;

    Ok(Json(ride))
}

#[derive(Debug, Serialize)]
pub struct CompleteRideResponse {
    pub ride: CompletedRide,
    pub earnings: f64,
}

/// Complete the accepted ride and credit its fare
pub async fn complete_ride(
    State(state): State<AppState>,
    Path(driver_id): Path<Uuid>,
) -> AppResult<Json<CompleteRideResponse>> {
    let response = state
        .drivers
        .update(driver_id, |session| {
            let ride = session.complete_ride()?.clone();
            Ok::<_, AppError>(CompleteRideResponse {
                ride,
                earnings: session.earnings,
            })
        })
        .await?;

    Ok(Json(response))
}
