use axum::routing::{get, post};

use super::endpoints;

pub fn router(state: super::State) -> axum::Router {
    axum::Router::new()
        .route(
            "/api/risk_weighted_graph",
            post(endpoints::risk_weighted_graph),
        )
        .route("/api/materialize", post(endpoints::materialize))
        .route("/api/geocode", post(endpoints::geocode))
        .route("/api/search", get(endpoints::search))
        .with_state(state)
}
