// Copyright 2025 SkyTrack Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Upstream traffic feed access.
//!
//! One fetch corresponds to one refresh cycle: a single GET against a
//! region/radius-parameterized endpoint returning a JSON object with the
//! aircraft list under a known field. Non-success statuses, JSON parse
//! failures, and unexpected top-level shapes are all fetch failures; the
//! poller keeps the previous snapshot when one occurs.

use std::future::Future;
use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

/// Errors from one fetch attempt.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure (connect, timeout, body read, JSON decode).
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Upstream answered with a non-success status.
    #[error("unexpected status: {0}")]
    Status(reqwest::StatusCode),

    /// Top-level payload did not have the expected shape.
    #[error("malformed payload: {0}")]
    Payload(String),
}

/// A source of raw aircraft entries.
///
/// This is the seam between the poller and the outside world; tests and
/// alternate feeds implement it in place of [`HttpTrafficSource`].
pub trait TrafficSource {
    /// Fetch the current raw aircraft list.
    fn fetch(&self) -> impl Future<Output = Result<Vec<Value>, FetchError>> + Send;
}

/// Configuration for the HTTP traffic source.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// Base URL of the point-query endpoint.
    pub base_url: String,
    /// JSON field under which the payload carries the aircraft array.
    pub aircraft_field: String,
    /// Query center latitude in degrees.
    pub latitude: f64,
    /// Query center longitude in degrees.
    pub longitude: f64,
    /// Query radius in nautical miles.
    pub radius_nm: f64,
    /// Per-request timeout, bounding how long a cycle can stay in flight.
    pub request_timeout: Duration,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.adsb.lol/v2/point".to_string(),
            aircraft_field: "ac".to_string(),
            latitude: 0.0,
            longitude: 0.0,
            radius_nm: 250.0,
            request_timeout: Duration::from_secs(10),
        }
    }
}

fn build_url(config: &SourceConfig) -> String {
    format!(
        "{}/{:.4}/{:.4}/{:.0}",
        config.base_url.trim_end_matches('/'),
        config.latitude,
        config.longitude,
        config.radius_nm
    )
}

/// Pull the aircraft array out of a top-level payload.
fn extract_entries(payload: &Value, field: &str) -> Result<Vec<Value>, FetchError> {
    let entries = payload
        .get(field)
        .ok_or_else(|| FetchError::Payload(format!("missing '{field}' field")))?;
    entries
        .as_array()
        .cloned()
        .ok_or_else(|| FetchError::Payload(format!("'{field}' is not an array")))
}

/// HTTP JSON traffic source issuing one GET per fetch.
#[derive(Debug, Clone)]
pub struct HttpTrafficSource {
    client: reqwest::Client,
    url: String,
    aircraft_field: String,
}

impl HttpTrafficSource {
    /// Build a source from configuration.
    ///
    /// Fails only if the underlying HTTP client cannot be constructed.
    pub fn new(config: &SourceConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            url: build_url(config),
            aircraft_field: config.aircraft_field.clone(),
        })
    }

    /// The fully resolved query URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl TrafficSource for HttpTrafficSource {
    async fn fetch(&self) -> Result<Vec<Value>, FetchError> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let payload: Value = response.json().await?;
        extract_entries(&payload, &self.aircraft_field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn url_encodes_region_and_radius() {
        let config = SourceConfig {
            latitude: 41.2481,
            longitude: -8.6814,
            radius_nm: 150.0,
            ..Default::default()
        };

        assert_eq!(
            build_url(&config),
            "https://api.adsb.lol/v2/point/41.2481/-8.6814/150"
        );
    }

    #[test]
    fn url_tolerates_trailing_slash() {
        let config = SourceConfig {
            base_url: "https://example.com/v2/point/".to_string(),
            latitude: 1.0,
            longitude: 2.0,
            radius_nm: 50.0,
            ..Default::default()
        };

        assert_eq!(build_url(&config), "https://example.com/v2/point/1.0000/2.0000/50");
    }

    #[test]
    fn extracts_aircraft_array() {
        let payload = json!({"ac": [{"hex": "aaa111"}], "total": 1});
        let entries = extract_entries(&payload, "ac").unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn missing_field_is_malformed_payload() {
        let payload = json!({"aircraft": []});
        let err = extract_entries(&payload, "ac").unwrap_err();
        assert!(matches!(err, FetchError::Payload(_)));
    }

    #[test]
    fn non_array_field_is_malformed_payload() {
        let payload = json!({"ac": "lots"});
        let err = extract_entries(&payload, "ac").unwrap_err();
        assert!(matches!(err, FetchError::Payload(_)));
    }
}
