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

//! Live air traffic client library for map-overlay pipelines.
//!
//! This library fetches nearby aircraft positions from an HTTP JSON feed,
//! validates and normalizes the entries, derives a short-horizon heading
//! segment per aircraft, and publishes render-ready snapshots. The layers
//! can be used independently or composed together:
//!
//! - **Source layer**: the [`TrafficSource`] seam and an HTTP implementation
//! - **Validation layer**: total normalization of loose upstream entries
//! - **Projection layer**: great-circle heading-segment derivation
//! - **Store layer**: atomic whole-snapshot replacement with change
//!   notification
//! - **Poller**: the refresh loop wiring the layers together with
//!   stale-but-available failure semantics
//!
//! # Quick Start
//!
//! ```no_run
//! use traffic_client::{
//!     FetchError, HttpTrafficSource, Poller, PollerConfig, SourceConfig, TrackingStore,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), FetchError> {
//!     let store = TrackingStore::new();
//!     let source = HttpTrafficSource::new(&SourceConfig {
//!         latitude: 41.2481,
//!         longitude: -8.6814,
//!         radius_nm: 150.0,
//!         ..Default::default()
//!     })?;
//!
//!     let poller = Poller::spawn(PollerConfig::default(), source, store.clone());
//!
//!     let mut snapshots = store.subscribe();
//!     while snapshots.changed().await.is_ok() {
//!         let snapshot = store.current();
//!         println!(
//!             "{} aircraft, {} heading segments",
//!             snapshot.records.len(),
//!             snapshot.segments.len()
//!         );
//!     }
//!
//!     poller.shutdown();
//!     Ok(())
//! }
//! ```
//!
//! # Using Individual Layers
//!
//! ## Validation and projection only
//!
//! ```
//! use serde_json::json;
//! use traffic_client::{heading_segment, validate};
//!
//! let raw = vec![json!({
//!     "hex": "4d2228", "lat": 41.0, "lon": -8.0, "track": 90.0, "gs": 420.0,
//! })];
//!
//! let records = validate(&raw);
//! let segment = heading_segment(&records[0], 1.0).unwrap();
//! assert!(segment.end.lon > segment.start.lon);
//! ```

pub mod poller;
pub mod projection;
pub mod record;
pub mod source;
pub mod store;
pub mod validate;

pub use poller::{Poller, PollerConfig, PollerEvent};
pub use projection::{heading_segment, project_position};
pub use record::{AircraftRecord, HeadingSegment, Position, Snapshot};
pub use source::{FetchError, HttpTrafficSource, SourceConfig, TrafficSource};
pub use store::TrackingStore;
pub use validate::validate;
