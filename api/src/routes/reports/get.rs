use axum::{Json, extract::State, response::IntoResponse};
use db::reports::AttendanceReport;
use util::{event_date, state::AppState};

use crate::response::ApiResponse;

/// GET /api/reports
///
/// Today's attendance report: overall summary, a row per grade 7 to 12 with
/// the students checked in, and the ten most recent check-ins.
///
/// Always answers `200 OK`; sections whose queries fail come back zeroed.
///
/// ### Example Response
/// ```json
/// {
///   "success": true,
///   "data": {
///     "eventDate": "2026-06-12",
///     "summary": { "total": 1, "totalStudents": 3, "percentage": 33 },
///     "gradeData": [
///       { "grade": 9, "total": 2, "checkedIn": 1, "students": [ ... ] }
///     ],
///     "recentCheckins": [
///       { "fullName": "A", "grade": 9, "avatarUrl": null, "checkinTime": "2026-06-12T18:03:11Z" }
///     ]
///   },
///   "message": "Report generated"
/// }
/// ```
pub async fn get_report(State(state): State<AppState>) -> impl IntoResponse {
    let today = event_date::today(state.config());
    let report = AttendanceReport::build(state.db(), today).await;
    Json(ApiResponse::success(report, "Report generated"))
}
