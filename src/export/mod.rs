//! JSON scene output for external renderers
//!
//! Document layout:
//! ```text
//! {
//!   "domain":   { "min_x": 0.0, "min_y": 0.0, "size": 10.0 },
//!   "polygons": [ [[x, y], ...], ... ],   // open rings
//!   "route":    [[x, y], ...] | null
//! }
//! ```

use anyhow::{Context, Result};
use geo::Coord;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::domain::Route;
use crate::field::PolygonField;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDomain {
    pub min_x: f64,
    pub min_y: f64,
    pub size: f64,
}

/// Plain-data view of a field and an optional route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub domain: SceneDomain,
    pub polygons: Vec<Vec<[f64; 2]>>,
    pub route: Option<Vec<[f64; 2]>>,
}

impl Scene {
    pub fn new(field: &PolygonField, route: Option<&Route>) -> Self {
        let domain = field.domain();

        let polygons = field
            .polygons()
            .iter()
            .map(|polygon| {
                let ring = &polygon.exterior().0;
                // geo closes rings; drop the repeated first vertex
                to_pairs(&ring[..ring.len().saturating_sub(1)])
            })
            .collect();

        Self {
            domain: SceneDomain {
                min_x: domain.min_x,
                min_y: domain.min_y,
                size: domain.size,
            },
            polygons,
            route: route.map(|r| to_pairs(&r.waypoints())),
        }
    }
}

fn to_pairs(coords: &[Coord<f64>]) -> Vec<[f64; 2]> {
    coords.iter().map(|c| [c.x, c.y]).collect()
}

/// Write a field and optional route as pretty-printed JSON
///
/// # Arguments
/// * `path` - Output file path
/// * `field` - Obstacles to draw
/// * `route` - Planned path, if one was computed
pub fn write_scene(path: &Path, field: &PolygonField, route: Option<&Route>) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create scene file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, &Scene::new(field, route))
        .context("Failed to serialize scene")?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    Ok(())
}
