//! # Students Routes Module
//!
//! Public roster lookup used by the self check-in kiosk.
//!
//! - `GET /students/search?q=` → `search_students`

use axum::{Router, routing::get};
use util::state::AppState;

pub mod get;

use get::search_students;

pub fn students_routes() -> Router<AppState> {
    Router::new().route("/search", get(search_students))
}
