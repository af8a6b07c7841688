//! Country facts lookup via the REST Countries API.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Errors from the country facts lookup.
#[derive(Debug, Error)]
pub enum CountryError {
    /// Transport-level failure.
    #[error("network error: {0}")]
    Network(String),

    /// The upstream answered, but the response was unusable.
    #[error("service error: {0}")]
    Service(String),
}

/// Summary facts about the destination country.
#[derive(Debug, Clone, Serialize)]
pub struct CountryFacts {
    pub name: String,
    pub capital: String,
    pub population: u64,
    pub area: f64,
    pub languages: String,
    pub currency: String,
}

const DEFAULT_BASE_URL: &str = "https://restcountries.com";
const COUNTRY_CODE: &str = "irl";
const FIELDS: &str = "name,capital,population,area,languages,currencies";
const TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize)]
struct RawCountry {
    name: RawName,
    #[serde(default)]
    capital: Vec<String>,
    population: u64,
    area: f64,
    #[serde(default)]
    languages: HashMap<String, String>,
    #[serde(default)]
    currencies: HashMap<String, RawCurrency>,
}

#[derive(Debug, Deserialize)]
struct RawName {
    common: String,
}

#[derive(Debug, Deserialize)]
struct RawCurrency {
    name: String,
}

fn reduce(raw: RawCountry) -> Result<CountryFacts, CountryError> {
    let capital = raw
        .capital
        .into_iter()
        .next()
        .ok_or_else(|| CountryError::Service("response carried no capital".to_string()))?;

    // EUR if present, otherwise whatever the record lists
    let currency = raw
        .currencies
        .get("EUR")
        .map(|c| c.name.clone())
        .or_else(|| raw.currencies.values().next().map(|c| c.name.clone()))
        .ok_or_else(|| CountryError::Service("response carried no currency".to_string()))?;

    let mut languages: Vec<String> = raw.languages.into_values().collect();
    languages.sort();

    Ok(CountryFacts {
        name: raw.name.common,
        capital,
        population: raw.population,
        area: raw.area,
        languages: languages.join(", "),
        currency,
    })
}

/// Client for the REST Countries API.
pub struct CountryClient {
    client: Client,
    base_url: String,
}

impl Default for CountryClient {
    fn default() -> Self {
        Self::new()
    }
}

impl CountryClient {
    /// Create a client against the public REST Countries API.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a client against a custom base URL (useful for testing).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Fetch and reduce the country record for Ireland.
    pub async fn fetch(&self) -> Result<CountryFacts, CountryError> {
        let url = format!(
            "{}/v3.1/alpha/{}?fields={}",
            self.base_url.trim_end_matches('/'),
            COUNTRY_CODE,
            FIELDS
        );

        debug!(url = %url, "Fetching country facts");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CountryError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CountryError::Service(format!("HTTP {}", status)));
        }

        let raw: RawCountry = response
            .json()
            .await
            .map_err(|e| CountryError::Service(format!("Failed to parse response: {}", e)))?;

        reduce(raw)
    }
}
