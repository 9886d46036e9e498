pub mod endpoints;
pub mod router;
pub mod types;

use axum::response::{IntoResponse, Response};
use axum::http::StatusCode;
use axum::Json;

use crate::api::geocoder;
use crate::db;

#[derive(Clone)]
pub struct State {
    pub db: db::Database,
    pub geocoder: geocoder::Client,
    /// Default species list for materialization runs, from `Config`.
    pub species: Vec<String>,
}

impl State {
    pub fn new(db: db::Database, geocoder: geocoder::Client, species: Vec<String>) -> Self {
        Self {
            db,
            geocoder,
            species,
        }
    }
}

impl axum::extract::FromRef<State> for geocoder::Client {
    fn from_ref(input: &State) -> Self {
        input.geocoder.clone()
    }
}

impl axum::extract::FromRef<State> for sqlx::PgPool {
    fn from_ref(input: &State) -> Self {
        input.db.pool.clone()
    }
}

impl IntoResponse for types::ErrorResponse {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, Json(self)).into_response()
    }
}

impl types::ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<sqlx::Error> for types::ErrorResponse {
    fn from(value: sqlx::Error) -> Self {
        types::ErrorResponse::new(format!("db returned error: {value}"))
    }
}

impl From<anyhow::Error> for types::ErrorResponse {
    fn from(value: anyhow::Error) -> Self {
        types::ErrorResponse::new(format!("{value:#}"))
    }
}
