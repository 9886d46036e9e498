pub mod geocoder;
pub mod service;
