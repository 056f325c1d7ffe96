use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use util::state::AppState;

use crate::response::ApiResponse;

/// Builds the `/health` route group.
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/", get(health_check))
}

/// GET /health
///
/// Liveness probe that also pings the database.
///
/// ### Responses
/// - `200 OK` with `data: "OK"`
/// - `503 Service Unavailable` when the database does not answer
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.db().ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::success("OK", "Health check passed")),
        ),
        Err(e) => {
            tracing::error!(error = %e, "database ping failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse::<&str>::error("Database unavailable")),
            )
        }
    }
}
