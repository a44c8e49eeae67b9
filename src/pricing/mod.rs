//! Fare estimation.
//!
//! Turns a great-circle distance into per-provider fare quotes using a
//! linear per-kilometre [`RateTable`].

pub mod calculators;
pub mod models;

// Re-export commonly used items
pub use calculators::{estimate_fare_exact, estimate_fare_rounded, quote_trip};
pub use models::{FareQuote, ProviderFare, RateTable};
