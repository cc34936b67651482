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

//! Headless monitor for the live airspace overlay pipeline.
//!
//! Wires configuration, the sector catalog, the tracking store, and the
//! poller together, then logs a summary line for every applied snapshot
//! until interrupted. A real map frontend consumes the same [`Overlay`]
//! handle instead of the logging loop.

mod config;
mod overlay;
mod sectors;

use std::sync::Arc;

use clap::Parser;
use log::info;

use config::AppConfig;
use overlay::Overlay;
use sectors::SectorCatalog;
use traffic_client::{HttpTrafficSource, Poller, TrackingStore};

#[derive(Debug, Parser)]
#[command(name = "skytrack-overlay", about = "Live airspace overlay pipeline monitor")]
struct Args {
    /// Override the feed base URL.
    #[arg(long)]
    endpoint: Option<String>,

    /// Override the query center latitude in degrees.
    #[arg(long)]
    latitude: Option<f64>,

    /// Override the query center longitude in degrees.
    #[arg(long)]
    longitude: Option<f64>,

    /// Override the query radius in nautical miles.
    #[arg(long)]
    radius: Option<f64>,

    /// Override the refresh interval in seconds.
    #[arg(long)]
    interval: Option<u64>,

    /// Override the projection horizon in minutes.
    #[arg(long)]
    horizon: Option<f64>,

    /// Print the config file path and exit.
    #[arg(long)]
    show_config_path: bool,
}

fn apply_overrides(config: &mut AppConfig, args: &Args) {
    if let Some(endpoint) = &args.endpoint {
        config.feed.base_url = endpoint.clone();
    }
    if let Some(latitude) = args.latitude {
        config.feed.latitude = latitude;
    }
    if let Some(longitude) = args.longitude {
        config.feed.longitude = longitude;
    }
    if let Some(radius) = args.radius {
        config.feed.radius_nm = radius;
    }
    if let Some(interval) = args.interval {
        config.feed.refresh_interval_secs = interval;
    }
    if let Some(horizon) = args.horizon {
        config.projection.horizon_minutes = horizon;
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if args.show_config_path {
        println!("{}", AppConfig::get_config_path()?.display());
        return Ok(());
    }

    let mut config = AppConfig::load()?;
    apply_overrides(&mut config, &args);

    let catalog = Arc::new(if config.sectors.is_empty() {
        SectorCatalog::builtin()
    } else {
        SectorCatalog::from_config(&config.sectors)
    });
    info!("Loaded {} airspace sectors", catalog.len());

    let store = TrackingStore::new();
    let source = HttpTrafficSource::new(&config.source_config())?;
    info!(
        "Polling {} every {}s",
        source.url(),
        config.feed.refresh_interval_secs
    );

    let poller = Poller::spawn(config.poller_config(), source, store.clone());

    let overlay = Overlay::new(store, catalog);
    let mut snapshots = overlay.subscribe();

    loop {
        tokio::select! {
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = overlay.current();
                info!(
                    "{} aircraft, {} heading segments (fetched {})",
                    snapshot.records.len(),
                    snapshot.segments.len(),
                    snapshot.fetched_at.format("%H:%M:%S"),
                );
            }
            result = tokio::signal::ctrl_c() => {
                result?;
                info!("Shutting down");
                break;
            }
        }
    }

    poller.shutdown();
    Ok(())
}
