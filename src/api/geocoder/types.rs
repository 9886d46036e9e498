use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
pub struct Coord {
    pub lat: f64,
    pub lon: f64,
}

/// Minimal slice of a Photon (GeoJSON) response: the first feature's
/// coordinates are all forward geocoding needs.
#[derive(Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
}

#[derive(Deserialize)]
pub struct Feature {
    pub geometry: Geometry,
}

#[derive(Deserialize)]
pub struct Geometry {
    /// `[lon, lat]` per GeoJSON.
    pub coordinates: [f64; 2],
}
