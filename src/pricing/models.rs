//! Rate tables and fare quotes.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FareError;

/// Per-kilometre price for each ride provider.
///
/// Rates are validated on construction: every rate must be finite and
/// strictly positive. An empty table is allowed here and rejected at
/// estimation time with [`FareError::EmptyRateTable`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RateTable(BTreeMap<String, f64>);

impl RateTable {
    pub fn new<I, K>(rates: I) -> Result<Self, FareError>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        let mut table = BTreeMap::new();
        for (provider, rate) in rates {
            let provider = provider.into();
            if provider.trim().is_empty() || !rate.is_finite() || rate <= 0.0 {
                return Err(FareError::InvalidRate {
                    provider,
                    value: rate.to_string(),
                });
            }
            table.insert(provider, rate);
        }
        Ok(Self(table))
    }

    pub fn rate(&self, provider: &str) -> Option<f64> {
        self.0.get(provider).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(provider, rate)| (provider.as_str(), *rate))
    }

    pub fn providers(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for RateTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = BTreeMap::<String, f64>::deserialize(deserializer)?;
        RateTable::new(raw).map_err(serde::de::Error::custom)
    }
}

/// Parses `provider=rate` pairs separated by commas, e.g. `uber=10,ola=12`.
impl FromStr for RateTable {
    type Err = FareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut rates = Vec::new();

        for entry in s.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (provider, value) = entry.split_once('=').ok_or_else(|| FareError::InvalidRate {
                provider: entry.to_string(),
                value: String::new(),
            })?;

            let provider = provider.trim();
            let value = value.trim();
            let rate = value.parse::<f64>().map_err(|_| FareError::InvalidRate {
                provider: provider.to_string(),
                value: value.to_string(),
            })?;

            rates.push((provider.to_string(), rate));
        }

        RateTable::new(rates)
    }
}

impl fmt::Display for RateTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pairs: Vec<String> = self
            .iter()
            .map(|(provider, rate)| format!("{}={}", provider, rate))
            .collect();
        write!(f, "{}", pairs.join(","))
    }
}

/// Estimated total fare per provider for one distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FareQuote(BTreeMap<String, f64>);

impl FareQuote {
    pub(crate) fn from_map(fares: BTreeMap<String, f64>) -> Self {
        Self(fares)
    }

    pub fn get(&self, provider: &str) -> Option<f64> {
        self.0.get(provider).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(provider, fare)| (provider.as_str(), *fare))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Lowest fare in the quote. Ties go to the provider that sorts first.
    pub fn cheapest(&self) -> Option<ProviderFare> {
        self.iter()
            .fold(None::<(&str, f64)>, |best, (provider, fare)| match best {
                Some((_, best_fare)) if best_fare <= fare => best,
                _ => Some((provider, fare)),
            })
            .map(|(provider, fare)| ProviderFare {
                provider: provider.to_string(),
                fare,
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderFare {
    pub provider: String,
    pub fare: f64,
}
