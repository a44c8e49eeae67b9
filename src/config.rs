use std::env;
use std::str::FromStr;

use crate::pricing::RateTable;

pub const DEFAULT_FARE_RATES: &str = "uber=10,ola=12,rapido=8";
pub const DEFAULT_DRIVER_RATES: &str = "standard=20";
pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    /// Rates quoted to riders comparing providers.
    pub fare_rates: RateTable,
    /// Rates used for fares shown on the driver dashboard.
    pub driver_rates: RateTable,
    /// When set, only ride requests with a pickup inside this radius are listed.
    pub ride_search_radius_km: Option<f64>,
    pub nominatim_url: String,
    pub nominatim_user_agent: String,
    pub geocoding_timeout_secs: u64,
    pub geocoding_result_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_host: "0.0.0.0".to_string(),
            server_port: 3000,
            fare_rates: parse_rates("FARE_RATES", DEFAULT_FARE_RATES),
            driver_rates: parse_rates("DRIVER_RATES", DEFAULT_DRIVER_RATES),
            ride_search_radius_km: None,
            nominatim_url: DEFAULT_NOMINATIM_URL.to_string(),
            nominatim_user_agent: default_user_agent(),
            geocoding_timeout_secs: 10,
            geocoding_result_limit: 5,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        Self {
            server_host: env::var("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: env::var("SERVER_PORT")
                .map(|raw| parse_number("SERVER_PORT", &raw))
                .unwrap_or(defaults.server_port),
            fare_rates: env::var("FARE_RATES")
                .map(|raw| parse_rates("FARE_RATES", &raw))
                .unwrap_or(defaults.fare_rates),
            driver_rates: env::var("DRIVER_RATES")
                .map(|raw| parse_rates("DRIVER_RATES", &raw))
                .unwrap_or(defaults.driver_rates),
            ride_search_radius_km: env::var("RIDE_SEARCH_RADIUS_KM").ok().map(|raw| {
                let radius: f64 = parse_number("RIDE_SEARCH_RADIUS_KM", &raw);
                assert!(
                    radius.is_finite() && radius >= 0.0,
                    "RIDE_SEARCH_RADIUS_KM must be a non-negative number"
                );
                radius
            }),
            nominatim_url: env::var("NOMINATIM_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.nominatim_url),
            nominatim_user_agent: env::var("NOMINATIM_USER_AGENT")
                .unwrap_or(defaults.nominatim_user_agent),
            geocoding_timeout_secs: env::var("GEOCODING_TIMEOUT_SECS")
                .map(|raw| parse_number("GEOCODING_TIMEOUT_SECS", &raw))
                .unwrap_or(defaults.geocoding_timeout_secs),
            geocoding_result_limit: env::var("GEOCODING_RESULT_LIMIT")
                .map(|raw| parse_number("GEOCODING_RESULT_LIMIT", &raw))
                .unwrap_or(defaults.geocoding_result_limit),
        }
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

fn parse_number<T: FromStr>(var: &str, raw: &str) -> T {
    raw.trim()
        .parse()
        .unwrap_or_else(|_| panic!("{} must be a number, got '{}'", var, raw))
}

/// Startup-only: a broken rate table is a fatal configuration error.
fn parse_rates(var: &str, raw: &str) -> RateTable {
    let table: RateTable = raw
        .parse()
        .unwrap_or_else(|e| panic!("{} must be a list of provider=rate pairs: {}", var, e));
    assert!(!table.is_empty(), "{} must name at least one provider", var);
    table
}
