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

//! Static airspace-sector catalog.
//!
//! An immutable registry of sector geometries rendered as a fixed overlay
//! independent of live traffic. The catalog is built once at startup from
//! configuration, falling back to a built-in default set, and is never
//! mutated afterwards. Pure data; all visual mapping happens on the render
//! side.

use log::warn;
use traffic_client::Position;

use crate::config::SectorConfig;

/// Sector geometry.
#[derive(Debug, Clone)]
pub enum SectorKind {
    /// Closed polygon over the listed vertices.
    Polygon(Vec<Position>),
    /// Circle around a center point.
    Circle {
        /// Center of the circle.
        center: Position,
        /// Radius in meters.
        radius_m: f64,
    },
}

/// Display style metadata passed through to the render boundary.
#[derive(Debug, Clone)]
pub struct SectorStyle {
    /// Stroke color as a CSS-style hex string.
    pub stroke_color: String,
    /// Fill color as a CSS-style hex string.
    pub fill_color: String,
    /// Fill opacity (0.0 - 1.0).
    pub fill_opacity: f64,
}

impl Default for SectorStyle {
    fn default() -> Self {
        Self {
            stroke_color: "#3388ff".to_string(),
            fill_color: "#3388ff".to_string(),
            fill_opacity: 0.15,
        }
    }
}

/// A fixed airspace sector shape.
#[derive(Debug, Clone)]
pub struct SectorShape {
    /// Stable sector identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Geometry.
    pub kind: SectorKind,
    /// Style metadata.
    pub style: SectorStyle,
}

/// Immutable registry of airspace sectors.
#[derive(Debug)]
pub struct SectorCatalog {
    shapes: Vec<SectorShape>,
}

impl SectorCatalog {
    /// Build a catalog from configured sectors, skipping malformed entries.
    ///
    /// A polygon needs at least three vertices; a circle needs a center and
    /// a positive radius. Entries satisfying neither are dropped with a
    /// warning.
    #[must_use]
    pub fn from_config(configs: &[SectorConfig]) -> Self {
        let mut shapes = Vec::with_capacity(configs.len());

        for config in configs {
            let kind = if config.vertices.len() >= 3 {
                SectorKind::Polygon(
                    config
                        .vertices
                        .iter()
                        .map(|[lat, lon]| Position::new(*lat, *lon))
                        .collect(),
                )
            } else if let (Some([lat, lon]), Some(radius_m)) = (config.center, config.radius_m) {
                if radius_m <= 0.0 {
                    warn!("Skipping sector '{}': non-positive radius", config.id);
                    continue;
                }
                SectorKind::Circle {
                    center: Position::new(lat, lon),
                    radius_m,
                }
            } else {
                warn!(
                    "Skipping sector '{}': needs 3+ vertices or center and radius",
                    config.id
                );
                continue;
            };

            shapes.push(SectorShape {
                id: config.id.clone(),
                name: if config.name.is_empty() {
                    config.id.clone()
                } else {
                    config.name.clone()
                },
                kind,
                style: SectorStyle {
                    stroke_color: config.stroke_color.clone(),
                    fill_color: config.fill_color.clone(),
                    fill_opacity: config.fill_opacity,
                },
            });
        }

        Self { shapes }
    }

    /// The built-in default catalog: the Porto terminal area and the
    /// airport control zone it contains.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            shapes: vec![
                SectorShape {
                    id: "lppc-tma-porto".to_string(),
                    name: "Porto TMA".to_string(),
                    kind: SectorKind::Circle {
                        center: Position::new(41.2481, -8.6814),
                        radius_m: 92_600.0, // 50 nm
                    },
                    style: SectorStyle::default(),
                },
                SectorShape {
                    id: "lppr-ctr".to_string(),
                    name: "Porto CTR".to_string(),
                    kind: SectorKind::Polygon(vec![
                        Position::new(41.40, -8.85),
                        Position::new(41.40, -8.50),
                        Position::new(41.10, -8.50),
                        Position::new(41.10, -8.85),
                    ]),
                    style: SectorStyle {
                        stroke_color: "#ff8833".to_string(),
                        fill_color: "#ff8833".to_string(),
                        fill_opacity: 0.1,
                    },
                },
            ],
        }
    }

    /// All sector shapes.
    #[must_use]
    pub fn sectors(&self) -> &[SectorShape] {
        &self.shapes
    }

    /// Look up a sector by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&SectorShape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    /// Number of sectors in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}
