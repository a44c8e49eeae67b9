use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::utils::geo::GeoPoint;

#[derive(Debug, thiserror::Error)]
pub enum GeocodingError {
    #[error("Geocoding request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Geocoding service returned {0}")]
    Upstream(StatusCode),

    #[error("No location found for '{0}'")]
    NotFound(String),

    #[error("Address must not be empty")]
    EmptyQuery,
}

/// A geocoded place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub display_name: String,
    pub point: GeoPoint,
}

/// Nominatim returns coordinates as strings.
#[derive(Debug, Deserialize)]
struct SearchResult {
    display_name: String,
    lat: String,
    lon: String,
}

impl SearchResult {
    fn into_place(self) -> Option<Place> {
        let point = GeoPoint::new(self.lat.parse().ok()?, self.lon.parse().ok()?);
        point.validate().ok()?;
        Some(Place {
            display_name: self.display_name,
            point,
        })
    }
}

/// Client for the OpenStreetMap Nominatim search API.
#[derive(Debug, Clone)]
pub struct NominatimClient {
    http: reqwest::Client,
    base_url: String,
    limit: usize,
}

impl NominatimClient {
    pub fn new(config: &Config) -> Result<Self, GeocodingError> {
        let http = reqwest::Client::builder()
            .user_agent(config.nominatim_user_agent.clone())
            .timeout(Duration::from_secs(config.geocoding_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.nominatim_url.trim_end_matches('/').to_string(),
            limit: config.geocoding_result_limit,
        })
    }

    /// Address suggestions for a free-text query. A blank query yields no
    /// suggestions without calling the service.
    #[tracing::instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Result<Vec<Place>, GeocodingError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/search", self.base_url);
        let limit = self.limit.to_string();

        let res = self
            .http
            .get(url)
            .query(&[("format", "json"), ("q", query), ("limit", limit.as_str())])
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            tracing::warn!(%status, "Geocoding service returned an error");
            return Err(GeocodingError::Upstream(status));
        }

        let results: Vec<SearchResult> = res.json().await?;
        let places = parse_results(results);
        tracing::debug!(count = places.len(), "Geocoding results");

        Ok(places)
    }

    /// The best match for an address, as used for a ride's source or
    /// destination.
    pub async fn resolve(&self, address: &str) -> Result<Place, GeocodingError> {
        if address.trim().is_empty() {
            return Err(GeocodingError::EmptyQuery);
        }

        self.search(address)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| GeocodingError::NotFound(address.trim().to_string()))
    }
}

fn parse_results(results: Vec<SearchResult>) -> Vec<Place> {
    results
        .into_iter()
        .filter_map(|result| {
            let name = result.display_name.clone();
            let place = result.into_place();
            if place.is_none() {
                tracing::warn!(display_name = %name, "Skipping result with unusable coordinates");
            }
            place
        })
        .collect()
}

/// Local stand-in for the Nominatim search endpoint.
///
/// `q=nowhere` yields no results, `q=outage` answers 503, and any other
/// query resolves to a single place at (20.6000, 78.9700).
#[cfg(test)]
pub(crate) mod stub {
    use std::collections::HashMap;

    use axum::{extract::Query, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
    use serde_json::json;
    use tokio::net::TcpListener;

    use crate::config::Config;

    async fn search(Query(params): Query<HashMap<String, String>>) -> axum::response::Response {
        if params.get("format").map(String::as_str) != Some("json") || !params.contains_key("limit") {
            return StatusCode::BAD_REQUEST.into_response();
        }

        match params.get("q").map(String::as_str) {
            Some("nowhere") => Json(json!([])).into_response(),
            Some("outage") => StatusCode::SERVICE_UNAVAILABLE.into_response(),
            Some(q) => Json(json!([{
                "place_id": 7,
                "display_name": format!("{}, India", q),
                "lat": "20.6000",
                "lon": "78.9700"
            }]))
            .into_response(),
            None => StatusCode::BAD_REQUEST.into_response(),
        }
    }

    /// Serves the stub on an ephemeral port and returns a config pointing at it.
    pub(crate) async fn config() -> Config {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, Router::new().route("/search", get(search)))
                .await
                .unwrap();
        });

        Config {
            nominatim_url: format!("http://{}", addr),
            ..Config::default()
        }
    }
}
