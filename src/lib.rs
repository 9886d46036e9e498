pub mod api;
pub mod config;
pub mod db;
pub mod geometry;
pub mod graph;
pub mod raster;
pub mod risk;
pub mod schema;
