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

//! Render-boundary facade.
//!
//! A render adapter receives an [`Overlay`] by constructor injection and
//! reads structured snapshot and sector data from it. The core emits typed
//! fields only; icon choice, label markup, and tile projection belong
//! entirely to the adapter.

use std::sync::Arc;

use tokio::sync::watch;
use traffic_client::{Snapshot, TrackingStore};

use crate::sectors::{SectorCatalog, SectorShape};

/// Read-only view over the live snapshot and the static sector catalog.
#[derive(Debug, Clone)]
pub struct Overlay {
    store: TrackingStore,
    catalog: Arc<SectorCatalog>,
}

impl Overlay {
    /// Bundle a store handle with a sector catalog.
    #[must_use]
    pub fn new(store: TrackingStore, catalog: Arc<SectorCatalog>) -> Self {
        Self { store, catalog }
    }

    /// The current snapshot. Always fully formed.
    #[must_use]
    pub fn current(&self) -> Arc<Snapshot> {
        self.store.current()
    }

    /// Subscribe to snapshot replacements.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<Snapshot>> {
        self.store.subscribe()
    }

    /// The fixed airspace sector shapes.
    #[must_use]
    pub fn sectors(&self) -> &[SectorShape] {
        self.catalog.sectors()
    }
}
