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

//! Short-horizon great-circle projection.
//!
//! Turns an aircraft's instantaneous track and ground speed into an
//! estimated position a fixed number of minutes ahead, using the spherical
//! direct-position formula. Speed converts to angular distance through the
//! identity that one nautical mile subtends one arc-minute of great circle.

use crate::record::{AircraftRecord, HeadingSegment, Position};

const ARC_MINUTES_PER_DEGREE: f64 = 60.0;
const MINUTES_PER_HOUR: f64 = 60.0;

/// Wrap a longitude into [-180, 180).
fn normalize_lon(lon: f64) -> f64 {
    (lon + 540.0).rem_euclid(360.0) - 180.0
}

/// Project `start` along compass bearing `track_deg` at `speed_kn` knots
/// for `horizon_min` minutes of flight.
///
/// The track is taken modulo 360, so callers need not pre-normalize.
/// Zero speed returns `start` unchanged.
#[must_use]
pub fn project_position(
    start: Position,
    track_deg: f64,
    speed_kn: f64,
    horizon_min: f64,
) -> Position {
    // knots over the horizon -> nautical miles -> arc-minutes -> radians
    let arc_minutes = speed_kn * horizon_min / MINUTES_PER_HOUR;
    let delta = (arc_minutes / ARC_MINUTES_PER_DEGREE).to_radians();
    let theta = track_deg.rem_euclid(360.0).to_radians();

    let phi1 = start.lat.to_radians();
    let lam1 = start.lon.to_radians();

    let phi2 = (phi1.sin() * delta.cos() + phi1.cos() * delta.sin() * theta.cos()).asin();
    let lam2 = lam1
        + (theta.sin() * delta.sin() * phi1.cos()).atan2(delta.cos() - phi1.sin() * phi2.sin());

    Position::new(phi2.to_degrees(), normalize_lon(lam2.to_degrees()))
}

/// Derive the heading segment for a record, or `None` when the record has
/// no finite track or ground speed.
///
/// Missing heading data is the designed "no segment" case, not an error.
/// The segment always starts exactly at the record's current position.
#[must_use]
pub fn heading_segment(record: &AircraftRecord, horizon_min: f64) -> Option<HeadingSegment> {
    let track = record.track.filter(|t| t.is_finite())?;
    let speed = record.ground_speed.filter(|s| s.is_finite())?;

    let end = project_position(record.position, track, speed, horizon_min);
    Some(HeadingSegment {
        id: record.id.clone(),
        start: record.position,
        end,
    })
}
