use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::external::nominatim::Place;
use crate::pricing::{quote_trip, FareQuote, ProviderFare, RateTable};
use crate::utils::geo::GeoPoint;
use crate::AppState;

/// Either raw coordinates or a free-text address to geocode.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LocationInput {
    Coordinates(GeoPoint),
    Address { address: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct ResolvedLocation {
    pub point: GeoPoint,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl From<Place> for ResolvedLocation {
    fn from(place: Place) -> Self {
        Self {
            point: place.point,
            display_name: Some(place.display_name),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct EstimateRequest {
    pub source: LocationInput,
    pub destination: LocationInput,
}

#[derive(Debug, Serialize)]
pub struct EstimateResponse {
    pub source: ResolvedLocation,
    pub destination: ResolvedLocation,
    pub distance_km: f64,
    pub fares: FareQuote,
    pub cheapest: Option<ProviderFare>,
}

async fn resolve(state: &AppState, input: LocationInput) -> AppResult<ResolvedLocation> {
    match input {
        LocationInput::Coordinates(point) => Ok(ResolvedLocation {
            point,
            display_name: None,
        }),
        LocationInput::Address { address } => {
            let place = state.geocoder.resolve(&address).await?;
            Ok(place.into())
        }
    }
}

/// Compare fares across providers for a trip
pub async fn estimate(
    State(state): State<AppState>,
    Json(payload): Json<EstimateRequest>,
) -> AppResult<Json<EstimateResponse>> {
    let source = resolve(&state, payload.source).await?;
    let destination = resolve(&state, payload.destination).await?;

    let (distance_km, fares) = quote_trip(source.point, destination.point, &state.config.fare_rates)?;
    let cheapest = fares.cheapest();

    tracing::debug!(
        distance_km,
        providers = fares.len(),
        "Fare estimate computed"
    );

    Ok(Json(EstimateResponse {
        source,
        destination,
        distance_km,
        fares,
        cheapest,
    }))
}

#[derive(Debug, Deserialize)]
pub struct GeocodeQuery {
    #[serde(default)]
    pub q: String,
}

/// Address suggestions for the source/destination inputs
pub async fn geocode(
    State(state): State<AppState>,
    Query(query): Query<GeocodeQuery>,
) -> AppResult<Json<Vec<Place>>> {
    let places = state.geocoder.search(&query.q).await?;
    Ok(Json(places))
}

#[derive(Debug, Serialize)]
pub struct RatesResponse {
    pub fare_rates: RateTable,
    pub driver_rates: RateTable,
}

/// Currently configured rate tables
pub async fn rates(State(state): State<AppState>) -> Json<RatesResponse> {
    Json(RatesResponse {
        fare_rates: state.config.fare_rates.clone(),
        driver_rates: state.config.driver_rates.clone(),
    })
}
