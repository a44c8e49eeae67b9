use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::handlers::{driver, rides};
use crate::middleware::rate_limit::{create_geocode_governor, create_public_governor, log_request};
use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    let public_governor = create_public_governor();
    let geocode_governor = create_geocode_governor();

    // Rider routes (fare comparison)
    let ride_routes = Router::new()
        .route("/rides/estimate", post(rides::estimate))
        .route("/rates", get(rides::rates))
        .layer(public_governor.clone());

    // Geocoding proxy, limited separately to respect the upstream policy
    let geocode_routes = Router::new()
        .route("/geocode", get(rides::geocode))
        .layer(geocode_governor);

    // Driver dashboard routes
    let driver_routes = Router::new()
        .route("/{driver_id}", get(driver::dashboard))
        .route("/{driver_id}/location", put(driver::update_location))
        .route("/{driver_id}/status", put(driver::set_status))
        .route("/{driver_id}/rides", get(driver::available_rides))
        .route("/{driver_id}/rides/complete", post(driver::complete_ride))
        .route("/{driver_id}/rides/{ride_id}/accept", post(driver::accept_ride))
        .layer(public_governor);

    Router::new()
        .nest("/api", ride_routes.merge(geocode_routes))
        .nest("/api/driver", driver_routes)
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::net::SocketAddr;

    use axum::{
        body::{to_bytes, Body},
        extract::ConnectInfo,
        http::{Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::config::Config;
    use crate::external::nominatim::stub;

    fn app() -> Router {
        create_router(AppState::new(Config::default()).unwrap())
    }

    async fn app_with_geocoder() -> Router {
        create_router(AppState::new(stub::config().await).unwrap())
    }

    fn estimate_to(destination: Value) -> Request<Body> {
        request(
            Method::POST,
            "/api/rides/estimate",
            Some(json!({
                "source": { "lat": 20.5937, "lng": 78.9629 },
                "destination": destination
            })),
        )
    }

    fn request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder().method(method).uri(uri);
        let mut req = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        req.extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 40000))));
        req
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        // extractor rejections come back as plain text
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn test_estimate_with_coordinates() {
        let app = app();
        let (status, body) = send(
            &app,
            request(
                Method::POST,
                "/api/rides/estimate",
                Some(json!({
                    "source": { "lat": 20.5937, "lng": 78.9629 },
                    "destination": { "lat": 20.6000, "lng": 78.9700 }
                })),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let distance = body["distance_km"].as_f64().unwrap();
        assert!((distance - 0.97).abs() < 0.05);

        let uber = body["fares"]["uber"].as_f64().unwrap();
        let ola = body["fares"]["ola"].as_f64().unwrap();
        let rapido = body["fares"]["rapido"].as_f64().unwrap();
        assert!((uber - distance * 10.0).abs() < 1e-9);
        assert!((ola - distance * 12.0).abs() < 1e-9);
        assert!((rapido - distance * 8.0).abs() < 1e-9);
        assert_eq!(body["cheapest"]["provider"], "rapido");
    }

    #[tokio::test]
    async fn test_estimate_rejects_invalid_latitude() {
        let app = app();
        let (status, body) = send(
            &app,
            request(
                Method::POST,
                "/api/rides/estimate",
                Some(json!({
                    "source": { "lat": 91.0, "lng": 0.0 },
                    "destination": { "lat": 0.0, "lng": 0.0 }
                })),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("Invalid coordinate"));
    }

    #[tokio::test]
    async fn test_estimate_rejects_blank_address() {
        let app = app();
        let (status, _) = send(
            &app,
            request(
                Method::POST,
                "/api/rides/estimate",
                Some(json!({
                    "source": { "address": "  " },
                    "destination": { "lat": 0.0, "lng": 0.0 }
                })),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_rates() {
        let app = app();
        let (status, body) = send(&app, request(Method::GET, "/api/rates", None)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["fare_rates"], json!({ "ola": 12.0, "rapido": 8.0, "uber": 10.0 }));
        assert_eq!(body["driver_rates"], json!({ "standard": 20.0 }));
    }

    #[tokio::test]
    async fn test_geocode_blank_query_is_empty() {
        let app = app();
        let (status, body) = send(&app, request(Method::GET, "/api/geocode?q=", None)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_driver_ride_flow() {
        let app = app();
        let driver = Uuid::new_v4();
        let base = format!("/api/driver/{}", driver);

        let (status, body) = send(&app, request(Method::GET, &base, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "offline");

        let (status, _) = send(
            &app,
            request(
                Method::PUT,
                &format!("{}/location", base),
                Some(json!({ "lat": 20.5937, "lng": 78.9629 })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(
            &app,
            request(
                Method::PUT,
                &format!("{}/status", base),
                Some(json!({ "online": true })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "online");
        assert_eq!(body["available_rides"].as_array().unwrap().len(), 2);
        let fare = body["available_rides"][1]["fare"].as_f64().unwrap();
        assert_eq!(fare, fare.round());

        let (status, rides) =
            send(&app, request(Method::GET, &format!("{}/rides", base), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(rides.as_array().unwrap().len(), 2);

        let (status, ride) = send(
            &app,
            request(Method::POST, &format!("{}/rides/2/accept", base), None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ride["id"], 2);

        let (status, _) = send(
            &app,
            request(Method::POST, &format!("{}/rides/1/accept", base), None),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, done) = send(
            &app,
            request(Method::POST, &format!("{}/rides/complete", base), None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(done["ride"]["id"], 2);
        assert_eq!(done["earnings"].as_f64().unwrap(), fare);

        let (_, body) = send(&app, request(Method::GET, &base, None)).await;
        assert_eq!(body["history"].as_array().unwrap().len(), 1);
        assert!(body["accepted_ride"].is_null());
    }

    #[tokio::test]
    async fn test_driver_offline_errors() {
        let app = app();
        let base = format!("/api/driver/{}", Uuid::new_v4());

        let (status, _) = send(&app, request(Method::GET, &format!("{}/rides", base), None)).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = send(
            &app,
            request(Method::POST, &format!("{}/rides/complete", base), None),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = send(
            &app,
            request(
                Method::PUT,
                &format!("{}/location", base),
                Some(json!({ "lat": 0.0, "lng": 181.0 })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_driver_id_format() {
        let app = app();
        let (status, _) = send(&app, request(Method::GET, "/api/driver/not-a-uuid", None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_estimate_with_address() {
        let app = app_with_geocoder().await;
        let (status, body) = send(&app, estimate_to(json!({ "address": "Nagpur" }))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["destination"]["display_name"], "Nagpur, India");
        assert_eq!(body["destination"]["point"], json!({ "lat": 20.6, "lng": 78.97 }));
        assert!(body["source"].get("display_name").is_none());

        let distance = body["distance_km"].as_f64().unwrap();
        assert!((distance - 0.97).abs() < 0.05);
        assert_eq!(body["cheapest"]["provider"], "rapido");
    }

    #[tokio::test]
    async fn test_estimate_unknown_address_is_not_found() {
        let app = app_with_geocoder().await;
        let (status, body) = send(&app, estimate_to(json!({ "address": "nowhere" }))).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("nowhere"));
    }

    #[tokio::test]
    async fn test_estimate_geocoder_outage_is_bad_gateway() {
        let app = app_with_geocoder().await;
        let (status, body) = send(&app, estimate_to(json!({ "address": "outage" }))).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], "Upstream service unavailable");
    }

    #[tokio::test]
    async fn test_geocode_suggestions() {
        let app = app_with_geocoder().await;
        let (status, body) = send(&app, request(Method::GET, "/api/geocode?q=Nagpur", None)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["display_name"], "Nagpur, India");
    }
}
