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

//! Core record model for the live-tracking pipeline.
//!
//! Records, heading segments, and snapshots are created per refresh cycle
//! and discarded wholesale when the next successful cycle replaces them.
//! A re-appearing aircraft id in a later snapshot is a new record, not an
//! update to the old one.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A geographic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    /// Latitude in degrees (positive north).
    pub lat: f64,
    /// Longitude in degrees (positive east).
    pub lon: f64,
}

impl Position {
    /// Create a position from latitude and longitude in degrees.
    #[must_use]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Whether both coordinates are finite real numbers.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }
}

/// One aircraft's latest known state within a single snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct AircraftRecord {
    /// ICAO 24-bit address (hex string, e.g. "4D2228").
    pub id: String,
    /// Current position in degrees.
    pub position: Position,
    /// Track angle in degrees (0-360, north = 0, clockwise).
    pub track: Option<f64>,
    /// Ground speed in knots.
    pub ground_speed: Option<f64>,
    /// Barometric altitude in feet.
    pub altitude: Option<f64>,
    /// Transponder squawk code.
    pub squawk: Option<String>,
    /// Flight label / callsign.
    pub flight: Option<String>,
    /// ICAO aircraft type designator (e.g. "A320").
    pub aircraft_type: Option<String>,
    /// Tail registration.
    pub registration: Option<String>,
}

/// Two-point line from an aircraft's current position to its estimated
/// position after the configured time horizon.
///
/// A segment exists if and only if the owning record had finite track and
/// ground speed. Zero ground speed yields a degenerate segment with
/// `end == start`.
#[derive(Debug, Clone, Serialize)]
pub struct HeadingSegment {
    /// Id of the owning [`AircraftRecord`].
    pub id: String,
    /// The aircraft's current position.
    pub start: Position,
    /// Projected position after the time horizon.
    pub end: Position,
}

/// Atomic point-in-time pairing of records and derived heading segments.
///
/// A snapshot fully replaces its predecessor; there is no incremental merge.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    /// Validated aircraft records, in upstream order.
    pub records: Vec<AircraftRecord>,
    /// Heading segments for the subset of records with track and speed.
    pub segments: Vec<HeadingSegment>,
    /// When the upstream fetch producing this snapshot completed.
    pub fetched_at: DateTime<Utc>,
}

impl Snapshot {
    /// An empty snapshot, used before the first successful refresh.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            records: Vec::new(),
            segments: Vec::new(),
            fetched_at: Utc::now(),
        }
    }

    /// Whether the snapshot holds no aircraft.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_finite_check() {
        assert!(Position::new(41.0, -8.0).is_finite());
        assert!(!Position::new(f64::NAN, -8.0).is_finite());
        assert!(!Position::new(41.0, f64::INFINITY).is_finite());
    }

    #[test]
    fn empty_snapshot_has_no_aircraft() {
        let snapshot = Snapshot::empty();
        assert!(snapshot.is_empty());
        assert!(snapshot.segments.is_empty());
    }
}
