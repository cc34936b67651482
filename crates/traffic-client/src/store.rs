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

//! Atomic snapshot storage.
//!
//! The store is a passive holder: the poller's pipeline is its only writer,
//! and the render boundary reads it. Replacement is whole-snapshot atomic,
//! so a reader always sees records and segments from the same refresh cycle.

use std::sync::Arc;

use tokio::sync::watch;

use crate::record::Snapshot;

/// Cloneable handle to the current authoritative snapshot.
#[derive(Debug, Clone)]
pub struct TrackingStore {
    tx: Arc<watch::Sender<Arc<Snapshot>>>,
}

impl TrackingStore {
    /// Create a store holding an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = watch::channel(Arc::new(Snapshot::empty()));
        Self { tx: Arc::new(tx) }
    }

    /// Atomically publish a new snapshot, discarding the previous one.
    pub fn replace(&self, snapshot: Snapshot) {
        self.tx.send_replace(Arc::new(snapshot));
    }

    /// The current snapshot. Always fully formed, never a partial update.
    #[must_use]
    pub fn current(&self) -> Arc<Snapshot> {
        self.tx.borrow().clone()
    }

    /// Subscribe to snapshot replacements.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<Snapshot>> {
        self.tx.subscribe()
    }
}

impl Default for TrackingStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{AircraftRecord, HeadingSegment, Position};
    use chrono::Utc;

    fn snapshot_with(id: &str) -> Snapshot {
        let position = Position::new(41.0, -8.0);
        Snapshot {
            records: vec![AircraftRecord {
                id: id.to_string(),
                position,
                track: Some(90.0),
                ground_speed: Some(120.0),
                altitude: None,
                squawk: None,
                flight: None,
                aircraft_type: None,
                registration: None,
            }],
            segments: vec![HeadingSegment {
                id: id.to_string(),
                start: position,
                end: Position::new(41.0, -7.95),
            }],
            fetched_at: Utc::now(),
        }
    }

    #[test]
    fn starts_empty() {
        let store = TrackingStore::new();
        assert!(store.current().is_empty());
    }

    #[test]
    fn replace_swaps_whole_snapshot() {
        let store = TrackingStore::new();
        store.replace(snapshot_with("aaa111"));
        store.replace(snapshot_with("bbb222"));

        let current = store.current();
        // Records and segments always come from the same replacement.
        assert_eq!(current.records[0].id, "bbb222");
        assert_eq!(current.segments[0].id, "bbb222");
    }

    #[test]
    fn clones_share_state() {
        let store = TrackingStore::new();
        let reader = store.clone();

        store.replace(snapshot_with("aaa111"));
        assert_eq!(reader.current().records.len(), 1);
    }

    #[test]
    fn readers_keep_their_snapshot_across_replacements() {
        let store = TrackingStore::new();
        store.replace(snapshot_with("aaa111"));

        let held = store.current();
        store.replace(snapshot_with("bbb222"));

        // A reader holding the old Arc still sees a consistent pairing.
        assert_eq!(held.records[0].id, "aaa111");
        assert_eq!(held.segments[0].id, "aaa111");
        assert_eq!(store.current().records[0].id, "bbb222");
    }

    #[tokio::test]
    async fn subscribers_observe_replacement() {
        let store = TrackingStore::new();
        let mut rx = store.subscribe();

        store.replace(snapshot_with("aaa111"));

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().records[0].id, "aaa111");
    }
}
