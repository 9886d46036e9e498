use sqlx::postgres::types::PgPoint;

use crate::geometry::{Point, Polyline};

/// A directed road segment from the `ways` table. Read-only input to the
/// risk pipeline; `gid` is stable across materialization runs.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub gid: i64,
    pub source: i64,
    pub target: i64,
    pub geometry: Polyline,
    pub maxspeed_forward: f64,
    pub maxspeed_backward: f64,
    pub cost: f64,
    pub reverse_cost: f64,
    pub length_m: f64,
}

/// Postgres-backed road graph store.
#[derive(Clone)]
pub struct RoadGraph {
    pool: sqlx::PgPool,
}

type SegmentRow = (i64, i64, i64, Vec<PgPoint>, f64, f64, f64, f64, f64);

impl RoadGraph {
    pub fn new(pool: sqlx::PgPool) -> Self {
        RoadGraph { pool }
    }

    /// The full segment collection, ordered by `gid` so repeated loads of an
    /// unchanged graph are identical.
    pub async fn segments(&self) -> anyhow::Result<Vec<Segment>> {
        let rows: Vec<SegmentRow> = sqlx::query_as(
            "SELECT gid, source, target, points,
                    maxspeed_forward, maxspeed_backward,
                    cost, reverse_cost, length_m
             FROM ways
             ORDER BY gid;",
        )
        .fetch_all(&self.pool)
        .await?;

        let segments = rows
            .into_iter()
            .map(
                |(
                    gid,
                    source,
                    target,
                    points,
                    maxspeed_forward,
                    maxspeed_backward,
                    cost,
                    reverse_cost,
                    length_m,
                )| Segment {
                    gid,
                    source,
                    target,
                    geometry: Polyline::new(points.into_iter().map(Point::from).collect()),
                    maxspeed_forward,
                    maxspeed_backward,
                    cost,
                    reverse_cost,
                    length_m,
                },
            )
            .collect();

        Ok(segments)
    }
}
