use std::collections::HashMap;

use anyhow::{anyhow, bail};

use crate::geometry::{BBox, Point};

/// One species' gridded risk surface.
///
/// The surface is a sparse, regular grid of tiles anchored at an upper-left
/// origin, the shape `raster2pgsql`-style tiled imports produce. Tiles are
/// keyed by integer tile coordinates in a hash map, so both point sampling
/// and extent tests resolve a tile in O(1) instead of scanning cells.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    /// Upper-left corner of tile (0, 0).
    origin: Point,
    /// Cell width in degrees (x grows eastward).
    cell_dx: f64,
    /// Cell height in degrees (y shrinks southward).
    cell_dy: f64,
    tile_cols: usize,
    tile_rows: usize,
    /// Row-major `tile_rows * tile_cols` cell values; nodata cells are NaN.
    tiles: HashMap<(i32, i32), Vec<f64>>,
    extent: Option<BBox>,
}

impl RasterSurface {
    pub fn new(
        origin: Point,
        cell_dx: f64,
        cell_dy: f64,
        tile_cols: usize,
        tile_rows: usize,
    ) -> anyhow::Result<Self> {
        if cell_dx <= 0.0 || cell_dy <= 0.0 {
            bail!("cell size must be positive, got {cell_dx} x {cell_dy}");
        }
        if tile_cols == 0 || tile_rows == 0 {
            bail!("tile dimensions must be nonzero, got {tile_cols} x {tile_rows}");
        }

        Ok(RasterSurface {
            origin,
            cell_dx,
            cell_dy,
            tile_cols,
            tile_rows,
            tiles: HashMap::new(),
            extent: None,
        })
    }

    pub fn insert_tile(&mut self, tx: i32, ty: i32, cells: Vec<f64>) -> anyhow::Result<()> {
        let expected = self.tile_cols * self.tile_rows;
        if cells.len() != expected {
            bail!(
                "tile ({tx}, {ty}) has {} cells, expected {expected}",
                cells.len()
            );
        }

        let bbox = self.tile_bbox(tx, ty);
        self.extent = Some(match self.extent {
            None => bbox,
            Some(e) => BBox::new(
                Point {
                    x: e.min.x.min(bbox.min.x),
                    y: e.min.y.min(bbox.min.y),
                },
                Point {
                    x: e.max.x.max(bbox.max.x),
                    y: e.max.y.max(bbox.max.y),
                },
            ),
        });

        self.tiles.insert((tx, ty), cells);
        Ok(())
    }

    /// Overall geographic extent, `None` for a surface with no tiles.
    pub fn extent(&self) -> Option<BBox> {
        self.extent
    }

    fn tile_bbox(&self, tx: i32, ty: i32) -> BBox {
        let w = self.cell_dx * self.tile_cols as f64;
        let h = self.cell_dy * self.tile_rows as f64;
        BBox::new(
            Point {
                x: self.origin.x + tx as f64 * w,
                y: self.origin.y - (ty + 1) as f64 * h,
            },
            Point {
                x: self.origin.x + (tx + 1) as f64 * w,
                y: self.origin.y - ty as f64 * h,
            },
        )
    }

    /// Whether `bbox` overlaps any populated tile of this surface.
    pub fn intersects(&self, bbox: &BBox) -> bool {
        let Some(extent) = self.extent else {
            return false;
        };
        if !extent.intersects(bbox) {
            return false;
        }

        let w = self.cell_dx * self.tile_cols as f64;
        let h = self.cell_dy * self.tile_rows as f64;

        let tx0 = ((bbox.min.x - self.origin.x) / w).floor() as i64;
        let tx1 = ((bbox.max.x - self.origin.x) / w).floor() as i64;
        let ty0 = ((self.origin.y - bbox.max.y) / h).floor() as i64;
        let ty1 = ((self.origin.y - bbox.min.y) / h).floor() as i64;

        let candidates = (tx1 - tx0 + 1).saturating_mul(ty1 - ty0 + 1);
        if candidates as usize > self.tiles.len() {
            // A bbox spanning more tile slots than exist; walk the tiles.
            return self
                .tiles
                .keys()
                .any(|&(tx, ty)| self.tile_bbox(tx, ty).intersects(bbox));
        }

        for tx in tx0..=tx1 {
            for ty in ty0..=ty1 {
                if self.tiles.contains_key(&(tx as i32, ty as i32)) {
                    return true;
                }
            }
        }
        false
    }

    /// Risk value at `p`, or `None` when `p` falls outside every populated
    /// tile or on a nodata cell. Values are clamped at zero so a surface can
    /// never yield a negative risk.
    pub fn sample(&self, p: Point) -> Option<f64> {
        let col = ((p.x - self.origin.x) / self.cell_dx).floor() as i64;
        let row = ((self.origin.y - p.y) / self.cell_dy).floor() as i64;

        let tx = col.div_euclid(self.tile_cols as i64);
        let ty = row.div_euclid(self.tile_rows as i64);
        let cells = self.tiles.get(&(tx as i32, ty as i32))?;

        let local_col = col.rem_euclid(self.tile_cols as i64) as usize;
        let local_row = row.rem_euclid(self.tile_rows as i64) as usize;
        let value = cells[local_row * self.tile_cols + local_col];

        if value.is_nan() {
            None
        } else {
            Some(value.max(0.0))
        }
    }
}

/// Postgres-backed raster store, one surface per species.
///
/// `raster_meta` holds the grid parameters, `raster_tile` the cell payloads
/// written by the external ingestion pipeline (nodata stored as NaN).
#[derive(Clone)]
pub struct RasterStore {
    pool: sqlx::PgPool,
}

impl RasterStore {
    pub fn new(pool: sqlx::PgPool) -> Self {
        RasterStore { pool }
    }

    pub async fn surface(&self, species: &str) -> anyhow::Result<RasterSurface> {
        let meta: (f64, f64, f64, f64, i32, i32) = sqlx::query_as(
            "SELECT origin_x, origin_y, cell_dx, cell_dy, tile_cols, tile_rows
             FROM raster_meta
             WHERE species = $1;",
        )
        .bind(species)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| anyhow!("no raster surface for species {species}"))?;

        let (origin_x, origin_y, cell_dx, cell_dy, tile_cols, tile_rows) = meta;
        if tile_cols <= 0 || tile_rows <= 0 {
            bail!("raster_meta for {species} has invalid tile dimensions");
        }

        let mut surface = RasterSurface::new(
            Point {
                x: origin_x,
                y: origin_y,
            },
            cell_dx,
            cell_dy,
            tile_cols as usize,
            tile_rows as usize,
        )?;

        let tiles: Vec<(i32, i32, Vec<f64>)> = sqlx::query_as(
            "SELECT tx, ty, cells FROM raster_tile WHERE species = $1 ORDER BY ty, tx;",
        )
        .bind(species)
        .fetch_all(&self.pool)
        .await?;

        for (tx, ty, cells) in tiles {
            surface.insert_tile(tx, ty, cells)?;
        }

        Ok(surface)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: f64, y: f64) -> Point {
        Point { x, y }
    }

    /// 2x2-cell tiles, one-degree cells, origin at (0, 4).
    fn surface() -> RasterSurface {
        let mut s = RasterSurface::new(pt(0.0, 4.0), 1.0, 1.0, 2, 2).unwrap();
        // Tile (0, 0) covers x 0..2, y 2..4.
        s.insert_tile(0, 0, vec![0.8, 0.3, f64::NAN, 0.0]).unwrap();
        // Tile (2, 1) covers x 4..6, y 0..2 (sparse: (1, 0) etc. absent).
        s.insert_tile(2, 1, vec![0.1, 0.2, 0.3, 0.4]).unwrap();
        s
    }

    #[test]
    fn samples_cells_row_major_from_upper_left() {
        let s = surface();
        assert_eq!(s.sample(pt(0.5, 3.5)), Some(0.8));
        assert_eq!(s.sample(pt(1.5, 3.5)), Some(0.3));
        assert_eq!(s.sample(pt(1.5, 2.5)), Some(0.0));
        assert_eq!(s.sample(pt(4.5, 0.5)), Some(0.3));
    }

    #[test]
    fn nodata_and_out_of_grid_sample_to_none() {
        let s = surface();
        assert_eq!(s.sample(pt(0.5, 2.5)), None); // NaN cell
        assert_eq!(s.sample(pt(2.5, 3.5)), None); // unpopulated tile slot
        assert_eq!(s.sample(pt(-1.0, 3.5)), None); // west of the grid
    }

    #[test]
    fn negative_cell_values_clamp_to_zero() {
        let mut s = RasterSurface::new(pt(0.0, 2.0), 1.0, 1.0, 2, 2).unwrap();
        s.insert_tile(0, 0, vec![-9999.0, 0.5, 0.5, 0.5]).unwrap();
        assert_eq!(s.sample(pt(0.5, 1.5)), Some(0.0));
    }

    #[test]
    fn intersects_respects_sparse_tiles() {
        let s = surface();
        assert!(s.intersects(&BBox::new(pt(0.5, 2.5), pt(1.0, 3.0))));
        assert!(s.intersects(&BBox::new(pt(4.0, 0.0), pt(6.0, 2.0))));
        // Inside the overall extent but over an unpopulated tile slot.
        assert!(!s.intersects(&BBox::new(pt(2.5, 2.5), pt(3.5, 3.5))));
        // Entirely outside the extent.
        assert!(!s.intersects(&BBox::new(pt(10.0, 10.0), pt(11.0, 11.0))));
    }

    #[test]
    fn empty_surface_intersects_nothing() {
        let s = RasterSurface::new(pt(0.0, 0.0), 1.0, 1.0, 2, 2).unwrap();
        assert_eq!(s.extent(), None);
        assert!(!s.intersects(&BBox::new(pt(-100.0, -100.0), pt(100.0, 100.0))));
    }

    #[test]
    fn tile_with_wrong_cell_count_is_rejected() {
        let mut s = RasterSurface::new(pt(0.0, 0.0), 1.0, 1.0, 2, 2).unwrap();
        assert!(s.insert_tile(0, 0, vec![1.0, 2.0]).is_err());
    }
}
