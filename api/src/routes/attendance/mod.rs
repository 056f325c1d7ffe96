//! # Attendance Routes Module
//!
//! Public self check-in.
//!
//! - `POST /attendance/checkin` → `check_in`

use axum::{Router, routing::post};
use util::state::AppState;

pub mod post;

use post::check_in;

pub fn attendance_routes() -> Router<AppState> {
    Router::new().route("/checkin", post(check_in))
}
