use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use db::reports::AdminStats;
use util::{event_date, state::AppState};

use crate::response::ApiResponse;

/// GET /api/admin/stats
///
/// Dashboard counts for today: checked in, roster size, rate and a
/// `{grade, checkedIn, total}` row for each grade 7 to 12.
///
/// ### Responses
/// - `200 OK`
/// - `401 Unauthorized`: missing or invalid admin token
/// - `500 Internal Server Error`: `"Failed to fetch stats"`
pub async fn get_stats(State(state): State<AppState>) -> impl IntoResponse {
    let today = event_date::today(state.config());

    match AdminStats::build(state.db(), today).await {
        Ok(stats) => (
            StatusCode::OK,
            Json(ApiResponse::success(stats, "Stats retrieved")),
        ),
        Err(e) => {
            tracing::error!(error = %e, "failed to build admin stats");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<AdminStats>::error("Failed to fetch stats")),
            )
        }
    }
}
