use axum::extract::{Json, Query, State};
use sqlx::PgPool;

use crate::api::geocoder;
use crate::graph::RoadGraph;
use crate::risk::aggregator;
use crate::risk::query;
use crate::risk::table::RiskTable;

use super::types::*;

pub type Result<T> = std::result::Result<T, ErrorResponse>;

/// The risk-weighted road graph under an optional species filter. Every
/// segment comes back exactly once; unknown species names match nothing.
pub async fn risk_weighted_graph(
    State(pool): State<PgPool>,
    Json(r): Json<RiskWeightedGraphRequest>,
) -> Result<Json<RiskWeightedGraphResponse>> {
    let graph = RoadGraph::new(pool.clone());
    let table = RiskTable::new(pool);

    let segments = query::risk_weighted_graph(&graph, &table, r.species.as_deref())
        .await
        .map_err(|e| ErrorResponse::new(format!("query failed: {e:#}")))?;

    Ok(Json(RiskWeightedGraphResponse {
        segments: segments.into_iter().map(Into::into).collect(),
    }))
}

/// Rebuilds the risk table. Sole writer path; a failure for any species
/// aborts the run and leaves the previous table generation in place.
pub async fn materialize(
    State(state): State<super::State>,
    Json(r): Json<MaterializeRequest>,
) -> Result<Json<MaterializeResponse>> {
    let pool = state.db.pool;
    let graph = RoadGraph::new(pool.clone());
    let rasters = crate::raster::RasterStore::new(pool.clone());
    let table = RiskTable::new(pool);

    let species = r.species.unwrap_or(state.species);
    if species.is_empty() {
        return Err(ErrorResponse::new("no species requested"));
    }

    let summary = aggregator::materialize(&graph, &rasters, &table, &species)
        .await
        .map_err(|e| ErrorResponse::new(format!("materialization failed: {e:#}")))?;

    Ok(Json(MaterializeResponse {
        species_processed: summary.species,
        records: summary.records,
    }))
}

pub async fn geocode(
    State(client): State<geocoder::Client>,
    Json(r): Json<GeocodeRequest>,
) -> Result<Json<GeocodeResponse>> {
    if r.address.is_empty() {
        return Err(ErrorResponse::new("address is required"));
    }

    let coord = client
        .geocode(&r.address)
        .await
        .map_err(|e| ErrorResponse::new(format!("geocoder returned error: {e:#}")))?
        .ok_or_else(|| ErrorResponse::new("address not found"))?;

    Ok(Json(GeocodeResponse {
        lat: coord.lat,
        lon: coord.lon,
    }))
}

pub async fn search(
    State(client): State<geocoder::Client>,
    Query(r): Query<SearchRequest>,
) -> Result<Json<serde_json::Value>> {
    if r.query.is_empty() {
        return Err(ErrorResponse::new("query parameter is required"));
    }

    let features = client
        .search(&r.query, r.limit.unwrap_or(5), r.lang.as_deref().unwrap_or("en"))
        .await
        .map_err(|e| ErrorResponse::new(format!("geocoder returned error: {e:#}")))?;

    Ok(Json(features))
}
