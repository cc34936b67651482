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

//! Validation and normalization of raw upstream aircraft entries.
//!
//! The upstream feed is loosely typed JSON in the readsb dialect (`hex`,
//! `lat`, `lon`, `track`, `gs`, `alt_baro`, `squawk`, `flight`, `t`, `r`).
//! Validation is a total function: entries missing an id or finite
//! coordinates are dropped, never errored. Numeric fields are coerced
//! defensively, accepting JSON numbers and numeric strings (readsb reports
//! `"alt_baro": "ground"` for aircraft on the surface, which coerces to
//! no altitude).

use std::collections::HashMap;

use serde_json::Value;

use crate::record::{AircraftRecord, Position};

/// Coerce a JSON value to a finite f64.
///
/// Accepts numbers and numeric strings; everything else (including `NaN`
/// strings, nulls, and non-numeric strings) yields `None`.
fn finite_f64(value: Option<&Value>) -> Option<f64> {
    let n = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Extract a trimmed, non-empty string field.
fn non_empty_string(value: Option<&Value>) -> Option<String> {
    let s = value?.as_str()?.trim();
    (!s.is_empty()).then(|| s.to_string())
}

/// Parse a single raw entry, or `None` if it lacks the required id or a
/// finite position.
fn parse_entry(entry: &Value) -> Option<AircraftRecord> {
    let id = non_empty_string(entry.get("hex"))?;
    let lat = finite_f64(entry.get("lat"))?;
    let lon = finite_f64(entry.get("lon"))?;

    Some(AircraftRecord {
        id,
        position: Position::new(lat, lon),
        track: finite_f64(entry.get("track")),
        ground_speed: finite_f64(entry.get("gs")),
        altitude: finite_f64(entry.get("alt_baro")),
        squawk: non_empty_string(entry.get("squawk")),
        flight: non_empty_string(entry.get("flight")),
        aircraft_type: non_empty_string(entry.get("t")),
        registration: non_empty_string(entry.get("r")),
    })
}

/// Filter and normalize one raw upstream snapshot into well-formed records.
///
/// Input order is preserved. Duplicate ids are resolved deterministically:
/// the later entry wins, occupying the first occurrence's slot in the
/// output order.
#[must_use]
pub fn validate(raw: &[Value]) -> Vec<AircraftRecord> {
    let mut records: Vec<AircraftRecord> = Vec::with_capacity(raw.len());
    let mut index_by_id: HashMap<String, usize> = HashMap::new();

    for entry in raw {
        let Some(record) = parse_entry(entry) else {
            continue;
        };

        match index_by_id.get(&record.id) {
            Some(&slot) => records[slot] = record,
            None => {
                index_by_id.insert(record.id.clone(), records.len());
                records.push(record);
            }
        }
    }

    records
}
