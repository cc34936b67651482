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

//! Refresh loop driving the fetch → validate → project → store pipeline.
//!
//! The poller owns the refresh cadence. Each cycle issues one fetch; on
//! success the validated records and derived heading segments replace the
//! stored snapshot atomically, and on failure the store is left untouched
//! so consumers keep the last good snapshot (stale-but-available). Failed
//! cycles retry at the normal cadence; no failure stops the loop.
//!
//! Cycles run inline in the polling task and ticks that fire while a fetch
//! is still pending are skipped, so at most one fetch is ever in flight and
//! results cannot reach the store out of arrival order.

use chrono::Utc;
use log::{debug, info, warn};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::projection::heading_segment;
use crate::record::Snapshot;
use crate::source::TrafficSource;
use crate::store::TrackingStore;
use crate::validate::validate;

/// Configuration for the poller.
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Interval between refresh cycles.
    pub refresh_interval: Duration,
    /// Projection horizon in minutes.
    pub horizon_minutes: f64,
    /// Broadcast channel capacity for events.
    pub event_channel_capacity: usize,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(5),
            horizon_minutes: 1.0,
            event_channel_capacity: 64,
        }
    }
}

/// Events emitted by the poller for observability.
#[derive(Debug, Clone)]
pub enum PollerEvent {
    /// A refresh cycle succeeded and its snapshot was applied.
    SnapshotApplied {
        /// Number of validated aircraft records.
        records: usize,
        /// Number of derived heading segments.
        segments: usize,
    },
    /// A refresh cycle failed; the previous snapshot was kept.
    FetchFailed(String),
}

/// Handle to the background polling task.
///
/// The task starts with an immediate first cycle and then repeats at the
/// configured interval until `shutdown()` is called or the handle is
/// dropped.
pub struct Poller {
    refresh_tx: mpsc::Sender<()>,
    event_tx: broadcast::Sender<PollerEvent>,
    cancel_token: CancellationToken,
}

impl std::fmt::Debug for Poller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Poller")
            .field("cancel_token", &self.cancel_token)
            .finish_non_exhaustive()
    }
}

impl Poller {
    /// Spawn the polling task with the given configuration, source, and
    /// destination store.
    #[must_use]
    pub fn spawn<S>(config: PollerConfig, source: S, store: TrackingStore) -> Self
    where
        S: TrafficSource + Send + Sync + 'static,
    {
        let (refresh_tx, refresh_rx) = mpsc::channel(1);
        let (event_tx, _) = broadcast::channel(config.event_channel_capacity);
        let cancel_token = CancellationToken::new();

        let task_events = event_tx.clone();
        let task_cancel = cancel_token.clone();

        tokio::spawn(async move {
            poll_loop(config, source, store, task_events, refresh_rx, task_cancel).await;
        });

        Self {
            refresh_tx,
            event_tx,
            cancel_token,
        }
    }

    /// Request an immediate refresh outside the regular cadence.
    ///
    /// The manual cycle shares the regular pipeline and failure policy.
    /// Requests coalesce: if a refresh is already queued, this is a no-op.
    pub fn refresh_now(&self) {
        let _ = self.refresh_tx.try_send(());
    }

    /// Subscribe to poller events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<PollerEvent> {
        self.event_tx.subscribe()
    }

    /// Stop the polling task.
    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}

async fn poll_loop<S: TrafficSource>(
    config: PollerConfig,
    source: S,
    store: TrackingStore,
    event_tx: broadcast::Sender<PollerEvent>,
    mut refresh_rx: mpsc::Receiver<()>,
    cancel_token: CancellationToken,
) {
    let mut ticker = interval(config.refresh_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            Some(()) = refresh_rx.recv() => {
                debug!("Manual refresh requested");
            }
            () = cancel_token.cancelled() => {
                info!("Poller cancelled");
                return;
            }
        }

        run_cycle(&config, &source, &store, &event_tx).await;
    }
}

async fn run_cycle<S: TrafficSource>(
    config: &PollerConfig,
    source: &S,
    store: &TrackingStore,
    event_tx: &broadcast::Sender<PollerEvent>,
) {
    let raw = match source.fetch().await {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Refresh failed, keeping previous snapshot: {}", e);
            let _ = event_tx.send(PollerEvent::FetchFailed(e.to_string()));
            return;
        }
    };

    let records = validate(&raw);
    let segments: Vec<_> = records
        .iter()
        .filter_map(|record| heading_segment(record, config.horizon_minutes))
        .collect();

    let applied = PollerEvent::SnapshotApplied {
        records: records.len(),
        segments: segments.len(),
    };
    debug!(
        "Applying snapshot: {} aircraft, {} heading segments",
        records.len(),
        segments.len()
    );

    store.replace(Snapshot {
        records,
        segments,
        fetched_at: Utc::now(),
    });
    let _ = event_tx.send(applied);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::FetchError;
    use serde_json::{json, Value};
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tokio::time::timeout;

    const WAIT: Duration = Duration::from_secs(5);

    /// Source that replays a scripted sequence of fetch results, then
    /// returns empty lists.
    struct ScriptedSource {
        responses: Mutex<VecDeque<Result<Vec<Value>, FetchError>>>,
    }

    impl ScriptedSource {
        fn new(responses: Vec<Result<Vec<Value>, FetchError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into_iter().collect()),
            }
        }
    }

    impl TrafficSource for ScriptedSource {
        async fn fetch(&self) -> Result<Vec<Value>, FetchError> {
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    fn long_interval_config() -> PollerConfig {
        PollerConfig {
            refresh_interval: Duration::from_secs(3600),
            ..Default::default()
        }
    }

    fn porto_entry() -> Value {
        json!({"hex": "A1", "lat": 41.0, "lon": -8.0, "track": 90.0, "gs": 120.0})
    }

    async fn wait_for_failure(events: &mut broadcast::Receiver<PollerEvent>) -> String {
        loop {
            match timeout(WAIT, events.recv()).await.unwrap().unwrap() {
                PollerEvent::FetchFailed(reason) => return reason,
                PollerEvent::SnapshotApplied { .. } => {}
            }
        }
    }

    #[tokio::test]
    async fn successful_cycle_applies_snapshot_with_segments() {
        let store = TrackingStore::new();
        let mut snapshots = store.subscribe();
        let source = ScriptedSource::new(vec![Ok(vec![porto_entry()])]);

        let _poller = Poller::spawn(long_interval_config(), source, store.clone());

        timeout(WAIT, snapshots.changed()).await.unwrap().unwrap();
        let snapshot = store.current();

        assert_eq!(snapshot.records.len(), 1);
        assert_eq!(snapshot.segments.len(), 1);

        // Eastward track moves longitude, not latitude.
        let segment = &snapshot.segments[0];
        assert_eq!(segment.id, "A1");
        assert_eq!(segment.start.lat, 41.0);
        assert_eq!(segment.start.lon, -8.0);
        assert!(segment.end.lon > segment.start.lon);
        assert!((segment.end.lat - 41.0).abs() < 1e-3);
    }

    #[tokio::test]
    async fn invalid_entries_yield_empty_snapshot() {
        let store = TrackingStore::new();
        let mut snapshots = store.subscribe();
        let source = ScriptedSource::new(vec![Ok(vec![
            json!({"hex": "B2", "lat": "NaN", "lon": -8.0}),
        ])]);

        let _poller = Poller::spawn(long_interval_config(), source, store.clone());

        timeout(WAIT, snapshots.changed()).await.unwrap().unwrap();
        let snapshot = store.current();

        assert!(snapshot.records.is_empty());
        assert!(snapshot.segments.is_empty());
    }

    #[tokio::test]
    async fn failed_fetch_keeps_previous_snapshot() {
        let store = TrackingStore::new();
        let mut snapshots = store.subscribe();
        let source = ScriptedSource::new(vec![
            Ok(vec![porto_entry()]),
            Err(FetchError::Payload("truncated".to_string())),
        ]);

        let poller = Poller::spawn(long_interval_config(), source, store.clone());

        timeout(WAIT, snapshots.changed()).await.unwrap().unwrap();
        let before = store.current();
        assert_eq!(before.records.len(), 1);

        let mut events = poller.subscribe();
        poller.refresh_now();
        let reason = wait_for_failure(&mut events).await;
        assert!(reason.contains("truncated"));

        // Same snapshot object: the store was not touched.
        let after = store.current();
        assert!(std::sync::Arc::ptr_eq(&before, &after));
    }

    #[tokio::test]
    async fn manual_refresh_runs_same_pipeline() {
        let store = TrackingStore::new();
        let mut snapshots = store.subscribe();
        let source = ScriptedSource::new(vec![
            Ok(Vec::new()),
            Ok(vec![porto_entry()]),
        ]);

        let poller = Poller::spawn(long_interval_config(), source, store.clone());

        // First (empty) cycle.
        timeout(WAIT, snapshots.changed()).await.unwrap().unwrap();
        assert!(store.current().is_empty());

        poller.refresh_now();
        timeout(WAIT, snapshots.changed()).await.unwrap().unwrap();
        assert_eq!(store.current().records.len(), 1);
    }

    #[tokio::test]
    async fn later_snapshot_fully_replaces_earlier_one() {
        let store = TrackingStore::new();
        let mut snapshots = store.subscribe();
        let source = ScriptedSource::new(vec![
            Ok(vec![porto_entry(), json!({"hex": "C3", "lat": 42.0, "lon": -9.0})]),
            Ok(vec![json!({"hex": "D4", "lat": 40.0, "lon": -7.0})]),
        ]);

        let poller = Poller::spawn(long_interval_config(), source, store.clone());

        timeout(WAIT, snapshots.changed()).await.unwrap().unwrap();
        assert_eq!(store.current().records.len(), 2);

        poller.refresh_now();
        timeout(WAIT, snapshots.changed()).await.unwrap().unwrap();

        let snapshot = store.current();
        let ids: Vec<_> = snapshot.records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["D4"]);
        // No segment survives from the prior cycle either.
        assert!(snapshot.segments.is_empty());
    }

    #[tokio::test]
    async fn shutdown_stops_the_loop() {
        let store = TrackingStore::new();
        let mut snapshots = store.subscribe();
        let source = ScriptedSource::new(vec![Ok(Vec::new())]);

        let poller = Poller::spawn(long_interval_config(), source, store.clone());
        timeout(WAIT, snapshots.changed()).await.unwrap().unwrap();

        poller.shutdown();
        tokio::time::sleep(Duration::from_millis(50)).await;
        poller.refresh_now();

        // The manual refresh is never serviced once cancelled.
        let result = timeout(Duration::from_millis(200), snapshots.changed()).await;
        assert!(result.is_err());
    }
}
