use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use db::models::student;
use serde::{Deserialize, Serialize};
use util::{event_date, state::AppState};

use crate::response::ApiResponse;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

/// One search hit, annotated with today's check-in status.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentSearchResult {
    pub id: i64,
    pub full_name: String,
    pub grade: i32,
    pub avatar_url: Option<String>,
    /// Check-in time for today's event, `null` if not yet checked in.
    pub checked: Option<DateTime<Utc>>,
}

/// GET /api/students/search
///
/// Case-insensitive substring search on student names, ordered by grade then
/// name. A missing or blank `q` returns an empty list rather than the roster.
///
/// ### Query Parameters
/// - `q`: name fragment
///
/// ### Example Response
/// ```json
/// {
///   "success": true,
///   "data": [
///     { "id": 3, "fullName": "John Smith", "grade": 10, "avatarUrl": null, "checked": null }
///   ],
///   "message": "Students retrieved"
/// }
/// ```
///
/// ### Errors
/// - `500 Internal Server Error`: `"Search failed"`
pub async fn search_students(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> impl IntoResponse {
    let query = params.q.unwrap_or_default();
    let today = event_date::today(state.config());

    match student::Model::search_with_checkin(state.db(), &query, today).await {
        Ok(rows) => {
            let results: Vec<StudentSearchResult> = rows
                .into_iter()
                .map(|(s, checkin)| StudentSearchResult {
                    id: s.id,
                    full_name: s.full_name,
                    grade: s.grade,
                    avatar_url: s.avatar_url,
                    checked: checkin.map(|c| c.checkin_time),
                })
                .collect();
            (
                StatusCode::OK,
                Json(ApiResponse::success(results, "Students retrieved")),
            )
        }
        Err(e) => {
            tracing::error!(error = %e, query = %query, "student search failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<Vec<StudentSearchResult>>::error("Search failed")),
            )
        }
    }
}
