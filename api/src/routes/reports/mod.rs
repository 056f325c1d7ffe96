//! # Reports Routes Module
//!
//! Live attendance report and its email export. The whole group sits behind
//! the shared-secret gate applied in [`crate::routes::routes`].
//!
//! - `GET /reports` → `get_report`
//! - `POST /reports/email` → `email_report`

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use util::state::AppState;

pub mod get;
pub mod post;

use get::get_report;
use post::email_report;

/// `/email` carries a base64 PDF, so its body cap comes from
/// `MAX_REPORT_EMAIL_BYTES` instead of axum's 2 MB default.
pub fn reports_routes(app_state: &AppState) -> Router<AppState> {
    let email_limit = app_state.config().max_report_email_bytes;

    Router::new()
        .route("/", get(get_report))
        .route(
            "/email",
            post(email_report).layer(DefaultBodyLimit::max(email_limit)),
        )
}
