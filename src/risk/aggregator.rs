use anyhow::bail;

use super::table::RiskTable;
use super::RiskRecord;
use crate::graph::{RoadGraph, Segment};
use crate::raster::{RasterStore, RasterSurface};

/// Spatial join of one species' raster surface against the segment
/// collection.
///
/// A segment contributes a record only when its full geometry overlaps the
/// surface (broad bbox-vs-tile test) — its centroid is then sampled, with an
/// out-of-tile or nodata centroid yielding an explicit zero. Segments whose
/// geometry misses the surface produce no record at all.
///
/// Risk is evaluated at the centroid only; sampling along the full geometry
/// of long segments crossing several cells is a known approximation gap.
pub fn sample_species(
    segments: &[Segment],
    species: &str,
    surface: &RasterSurface,
) -> Vec<RiskRecord> {
    let mut records = Vec::new();

    for segment in segments {
        let Some(bbox) = segment.geometry.bbox() else {
            continue;
        };
        if !surface.intersects(&bbox) {
            continue;
        }
        let Some(centroid) = segment.geometry.centroid() else {
            continue;
        };

        records.push(RiskRecord {
            gid: segment.gid,
            species: species.to_string(),
            risk_value: surface.sample(centroid).unwrap_or(0.0),
        });
    }

    records
}

#[derive(Debug)]
pub struct MaterializeSummary {
    pub species: Vec<String>,
    pub records: usize,
}

/// Rebuilds the risk table from current raster and road graph snapshots.
///
/// Every requested species is attempted even after one fails, and a run with
/// any failed species aborts before writing, listing them all; the
/// previously committed table stays intact. The sole writer path over the
/// risk table.
pub async fn materialize(
    graph: &RoadGraph,
    rasters: &RasterStore,
    table: &RiskTable,
    species: &[String],
) -> anyhow::Result<MaterializeSummary> {
    let segments = graph.segments().await?;
    log::info!("Loaded {} road segments", segments.len());

    let mut requested: Vec<&String> = Vec::new();
    for sp in species {
        if !requested.contains(&sp) {
            requested.push(sp);
        }
    }

    let mut records = Vec::new();
    let mut processed = Vec::new();
    let mut failures = Vec::new();

    for sp in requested {
        let surface = match rasters.surface(sp).await {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("{sp}: loading raster surface failed: {e:#}");
                failures.push(format!("{sp}: {e:#}"));
                continue;
            }
        };

        let batch = sample_species(&segments, sp, &surface);
        if batch.is_empty() {
            // Valid outcome: the surface covers none of the road graph.
            log::warn!("{sp}: no segments intersect the raster surface");
        } else {
            log::info!("{sp}: {} segments intersect the raster surface", batch.len());
        }

        records.extend(batch);
        processed.push(sp.clone());
    }

    if !failures.is_empty() {
        bail!(
            "materialization failed for {} of {} species: {}",
            failures.len(),
            failures.len() + processed.len(),
            failures.join("; ")
        );
    }

    table.replace_all(&records).await?;
    log::info!(
        "Materialized {} risk records for {} species",
        records.len(),
        processed.len()
    );

    Ok(MaterializeSummary {
        species: processed,
        records: records.len(),
    })
}
