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

//! Application configuration management.
//!
//! Persistent TOML configuration via confy: feed endpoint and query region,
//! refresh cadence, projection horizon, and optional airspace sector
//! definitions. Every pipeline tunable lives here so the cadence and the
//! horizon can be changed without touching pipeline logic.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use traffic_client::{PollerConfig, SourceConfig};

/// Application name used for the confy storage path.
const APP_NAME: &str = "skytrack-overlay";

/// Feed endpoint and query region.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FeedConfig {
    /// Base URL of the point-query endpoint.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// JSON field carrying the aircraft array in the response.
    #[serde(default = "default_aircraft_field")]
    pub aircraft_field: String,

    /// Query center latitude in degrees.
    #[serde(default = "default_latitude")]
    pub latitude: f64,

    /// Query center longitude in degrees.
    #[serde(default = "default_longitude")]
    pub longitude: f64,

    /// Query radius in nautical miles.
    #[serde(default = "default_radius_nm")]
    pub radius_nm: f64,

    /// Seconds between refresh cycles.
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            aircraft_field: default_aircraft_field(),
            latitude: default_latitude(),
            longitude: default_longitude(),
            radius_nm: default_radius_nm(),
            refresh_interval_secs: default_refresh_interval_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Projection tuning.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProjectionConfig {
    /// Heading-vector time horizon in minutes.
    #[serde(default = "default_horizon_minutes")]
    pub horizon_minutes: f64,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            horizon_minutes: default_horizon_minutes(),
        }
    }
}

/// One configured airspace sector.
///
/// A sector is a polygon when `vertices` is non-empty, otherwise a circle
/// when `center` and `radius_m` are both set.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SectorConfig {
    /// Stable sector identifier.
    pub id: String,

    /// Display name.
    #[serde(default)]
    pub name: String,

    /// Polygon vertices as `[lat, lon]` pairs in degrees.
    #[serde(default)]
    pub vertices: Vec<[f64; 2]>,

    /// Circle center as `[lat, lon]` in degrees.
    #[serde(default)]
    pub center: Option<[f64; 2]>,

    /// Circle radius in meters.
    #[serde(default)]
    pub radius_m: Option<f64>,

    /// Stroke color as a CSS-style hex string.
    #[serde(default = "default_sector_color")]
    pub stroke_color: String,

    /// Fill color as a CSS-style hex string.
    #[serde(default = "default_sector_color")]
    pub fill_color: String,

    /// Fill opacity (0.0 - 1.0).
    #[serde(default = "default_fill_opacity")]
    pub fill_opacity: f64,
}

/// Application configuration stored in TOML format.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    /// Configuration schema version for migrations.
    #[serde(default = "default_config_version")]
    pub config_version: u32,

    /// Feed endpoint and query region.
    #[serde(default)]
    pub feed: FeedConfig,

    /// Projection tuning.
    #[serde(default)]
    pub projection: ProjectionConfig,

    /// Airspace sectors; the built-in catalog is used when empty.
    #[serde(default)]
    pub sectors: Vec<SectorConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_version: default_config_version(),
            feed: FeedConfig::default(),
            projection: ProjectionConfig::default(),
            sectors: Vec::new(),
        }
    }
}

// Default value functions for serde
fn default_config_version() -> u32 {
    1
}

fn default_base_url() -> String {
    "https://api.adsb.lol/v2/point".to_string()
}

fn default_aircraft_field() -> String {
    "ac".to_string()
}

fn default_latitude() -> f64 {
    41.2481 // Porto
}

fn default_longitude() -> f64 {
    -8.6814
}

fn default_radius_nm() -> f64 {
    150.0
}

fn default_refresh_interval_secs() -> u64 {
    5
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_horizon_minutes() -> f64 {
    1.0
}

fn default_sector_color() -> String {
    "#3388ff".to_string()
}

fn default_fill_opacity() -> f64 {
    0.15
}

impl AppConfig {
    /// Load configuration from disk, creating defaults on first run.
    pub fn load() -> Result<Self, confy::ConfyError> {
        confy::load(APP_NAME, "config")
    }

    /// Get the config file path for display to the user.
    pub fn get_config_path() -> Result<std::path::PathBuf, confy::ConfyError> {
        confy::get_configuration_file_path(APP_NAME, "config")
    }

    /// Source configuration for the HTTP traffic source.
    pub fn source_config(&self) -> SourceConfig {
        SourceConfig {
            base_url: self.feed.base_url.clone(),
            aircraft_field: self.feed.aircraft_field.clone(),
            latitude: self.feed.latitude,
            longitude: self.feed.longitude,
            radius_nm: self.feed.radius_nm,
            request_timeout: Duration::from_secs(self.feed.request_timeout_secs),
        }
    }

    /// Poller configuration for the refresh loop.
    pub fn poller_config(&self) -> PollerConfig {
        PollerConfig {
            refresh_interval: Duration::from_secs(self.feed.refresh_interval_secs),
            horizon_minutes: self.projection.horizon_minutes,
            ..Default::default()
        }
    }
}
