use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use db::models::attendance::{self, CheckInError};
use serde::{Deserialize, Serialize};
use util::{event_date, state::AppState};

use crate::response::ApiResponse;

/// Kiosk clients send the id either as a number or as a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StudentIdInput {
    Number(i64),
    Text(String),
}

impl StudentIdInput {
    fn parse(&self) -> Option<i64> {
        match self {
            StudentIdInput::Number(n) => Some(*n),
            StudentIdInput::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CheckInRequest {
    pub id: Option<StudentIdInput>,
}

#[derive(Debug, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CheckInResponse {
    pub student_id: i64,
    pub event_date: String,
    pub checkin_time: Option<DateTime<Utc>>,
}

/// POST /api/attendance/checkin
///
/// Records that a student arrived at today's event. Each student can check in
/// once per event date; the database's unique constraint decides races.
///
/// ### Request Body
/// ```json
/// { "id": 42 }
/// ```
///
/// ### Responses
/// - `200 OK`: `"Checked in successfully"`
/// - `400 Bad Request`: `"Student ID required"` | `"Already checked in"`
/// - `404 Not Found`: `"Student not found"`
/// - `500 Internal Server Error`: `"Check-in failed"`
pub async fn check_in(
    State(state): State<AppState>,
    payload: Result<Json<CheckInRequest>, JsonRejection>,
) -> impl IntoResponse {
    let student_id = payload
        .ok()
        .and_then(|Json(req)| req.id)
        .and_then(|id| id.parse());

    let Some(student_id) = student_id else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<CheckInResponse>::error("Student ID required")),
        );
    };

    let today = event_date::today(state.config());

    match attendance::Model::check_in(state.db(), student_id, today, Utc::now()).await {
        Ok(row) => {
            tracing::info!(student_id, event_date = %today, "student checked in");
            let data = CheckInResponse {
                student_id: row.student_id,
                event_date: row.event_date.to_string(),
                checkin_time: Some(row.checkin_time),
            };
            (
                StatusCode::OK,
                Json(ApiResponse::success(data, "Checked in successfully")),
            )
        }
        Err(CheckInError::AlreadyCheckedIn) => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error("Already checked in")),
        ),
        Err(CheckInError::StudentNotFound) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Student not found")),
        ),
        Err(CheckInError::Database(e)) => {
            tracing::error!(error = %e, student_id, "check-in failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Check-in failed")),
            )
        }
    }
}
