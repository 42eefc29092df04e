//! Free-text location search
//!
//! The editor only consumes the first result's coordinates. Geocoders in the
//! wild return latitude/longitude as JSON strings (Nominatim) or numbers, so
//! both are accepted.

use std::time::Duration;

use futures::future::BoxFuture;
use serde::{Deserialize, Deserializer};

use crate::config::GeocoderConfig;
use crate::error::SearchError;

/// One geocoding hit
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeocodeResult {
    #[serde(alias = "lat", deserialize_with = "coordinate")]
    pub latitude: f64,
    #[serde(alias = "lon", alias = "lng", deserialize_with = "coordinate")]
    pub longitude: f64,
    #[serde(default, alias = "display_name")]
    pub label: Option<String>,
}

fn coordinate<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// External geocoding collaborator
///
/// A single-shot call: zero or more results, or a transport failure.
pub trait Geocoder {
    fn geocode<'a>(
        &'a self,
        query: &'a str,
    ) -> BoxFuture<'a, Result<Vec<GeocodeResult>, SearchError>>;
}

/// Geocoder backed by a Nominatim-compatible HTTP endpoint
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: reqwest::Client,
    endpoint: String,
    limit: u32,
}

impl NominatimGeocoder {
    pub fn new(config: &GeocoderConfig) -> Result<Self, SearchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| SearchError::Transport(format!("http client init failed: {e}")))?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            limit: config.result_limit.max(1),
        })
    }

    async fn fetch(&self, query: &str) -> Result<Vec<GeocodeResult>, SearchError> {
        let limit = self.limit.to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("q", query), ("format", "json"), ("limit", limit.as_str())])
            .send()
            .await
            .map_err(|e| SearchError::Transport(format!("request error: {e}")))?;

        if !response.status().is_success() {
            return Err(SearchError::Transport(format!("HTTP {}", response.status())));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SearchError::Transport(format!("invalid body: {e}")))?;
        parse_results(&body)
    }
}

impl Geocoder for NominatimGeocoder {
    fn geocode<'a>(
        &'a self,
        query: &'a str,
    ) -> BoxFuture<'a, Result<Vec<GeocodeResult>, SearchError>> {
        Box::pin(self.fetch(query))
    }
}

/// Decode a JSON array of geocoding results
pub fn parse_results(body: &str) -> Result<Vec<GeocodeResult>, SearchError> {
    serde_json::from_str(body)
        .map_err(|e| SearchError::Transport(format!("invalid geocoder response: {e}")))
}
