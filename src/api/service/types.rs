use serde::{Deserialize, Serialize};

use crate::risk::query;

#[derive(Serialize, Deserialize)]
pub struct RiskWeightedGraphRequest {
    /// `null`/absent or empty means every species in the risk table.
    pub species: Option<Vec<String>>,
}

/// Wire shape of one risk-weighted segment, as consumed by the routing
/// engine. `geometry` is a list of `[lon, lat]` vertex pairs.
#[derive(Serialize, Deserialize)]
pub struct RiskWeightedSegment {
    pub gid: i64,
    pub source: i64,
    pub target: i64,
    pub geometry: Vec<[f64; 2]>,
    pub maxspeed_forward: f64,
    pub maxspeed_backward: f64,
    pub risk_value: f64,
    pub species: Vec<String>,
    pub cost: f64,
    pub reverse_cost: f64,
    pub length: f64,
}

impl From<query::RiskWeightedSegment> for RiskWeightedSegment {
    fn from(value: query::RiskWeightedSegment) -> Self {
        let segment = value.segment;
        Self {
            gid: segment.gid,
            source: segment.source,
            target: segment.target,
            geometry: segment
                .geometry
                .points
                .iter()
                .map(|p| [p.x, p.y])
                .collect(),
            maxspeed_forward: segment.maxspeed_forward,
            maxspeed_backward: segment.maxspeed_backward,
            risk_value: value.risk_value,
            species: value.species,
            cost: segment.cost,
            reverse_cost: segment.reverse_cost,
            length: segment.length_m,
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct RiskWeightedGraphResponse {
    pub segments: Vec<RiskWeightedSegment>,
}

#[derive(Serialize, Deserialize)]
pub struct MaterializeRequest {
    /// Species to rebuild for; absent means the configured default list.
    pub species: Option<Vec<String>>,
}

#[derive(Serialize, Deserialize)]
pub struct MaterializeResponse {
    pub species_processed: Vec<String>,
    pub records: usize,
}

#[derive(Serialize, Deserialize)]
pub struct GeocodeRequest {
    pub address: String,
}

#[derive(Serialize, Deserialize)]
pub struct GeocodeResponse {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub limit: Option<u32>,
    pub lang: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}
