//! # Admin Routes Module
//!
//! Event management for the organiser. The group sits behind the
//! shared-secret gate; every route except login also needs an admin JWT.
//!
//! - `POST /admin/login` → `login`
//! - `POST /admin/reset` → `reset_attendance` (admin)
//! - `GET /admin/stats` → `get_stats` (admin)
//! - `POST /admin/students/upload` → `upload_avatar` (admin)

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use util::state::AppState;

use crate::auth::guards::allow_admin;

pub mod common;
pub mod get;
pub mod post;

use get::get_stats;
use post::{login, reset_attendance, upload_avatar};

/// Room for multipart framing and the `studentId` field on top of the image.
const MULTIPART_OVERHEAD_BYTES: usize = 16 * 1024;

pub fn admin_routes(app_state: AppState) -> Router<AppState> {
    let upload_limit = app_state.config().max_avatar_bytes + MULTIPART_OVERHEAD_BYTES;

    let protected = Router::new()
        .route("/reset", post(reset_attendance))
        .route("/stats", get(get_stats))
        .route(
            "/students/upload",
            post(upload_avatar).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route_layer(from_fn_with_state(app_state, allow_admin));

    Router::new()
        .route("/login", post(login))
        .merge(protected)
}
