use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::entities::driver::DashboardError;
use crate::external::nominatim::GeocodingError;

/// Validation failures of the distance and fare calculations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FareError {
    #[error("Invalid coordinate: lat {lat}, lng {lng}")]
    InvalidCoordinate { lat: f64, lng: f64 },

    #[error("Invalid distance: {0} km")]
    InvalidDistance(f64),

    #[error("Rate table has no providers")]
    EmptyRateTable,

    #[error("Invalid rate for provider '{provider}': {value}")]
    InvalidRate { provider: String, value: String },
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Fare(#[from] FareError),

    #[error(transparent)]
    Dashboard(#[from] DashboardError),

    #[error(transparent)]
    Geocoding(#[from] GeocodingError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Fare(_) => StatusCode::BAD_REQUEST,
            AppError::Dashboard(e) => match e {
                DashboardError::Fare(_) => StatusCode::BAD_REQUEST,
                DashboardError::RideNotAvailable(_) => StatusCode::NOT_FOUND,
                _ => StatusCode::CONFLICT,
            },
            AppError::Geocoding(e) => match e {
                GeocodingError::EmptyQuery => StatusCode::BAD_REQUEST,
                GeocodingError::NotFound(_) => StatusCode::NOT_FOUND,
                GeocodingError::Request(_) | GeocodingError::Upstream(_) => {
                    StatusCode::BAD_GATEWAY
                }
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // upstream failures are logged, not echoed to the client
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
            "Upstream service unavailable".to_string()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
