//! HTTP route entry point for `/api/...`.
//!
//! Route groups:
//! - `/health` → liveness (public)
//! - `/students` → roster search for the check-in kiosk (public)
//! - `/attendance` → self check-in (public)
//! - `/avatars` → stored avatar images (public)
//! - `/reports` → live report and email export (shared-secret gate)
//! - `/admin` → login, reset, stats, avatar upload (shared-secret gate, admin JWT)

use axum::{Router, middleware::from_fn_with_state};
use util::state::AppState;

use crate::auth::guards::require_secret_key;
use crate::routes::{
    admin::admin_routes, attendance::attendance_routes, avatars::avatars_routes,
    health::health_routes, reports::reports_routes, students::students_routes,
};

pub mod admin;
pub mod attendance;
pub mod avatars;
pub mod health;
pub mod reports;
pub mod students;

/// Builds the complete application router for all HTTP endpoints.
///
/// The secret-key gate runs before the admin JWT guard, so a request without
/// the key gets `403` even when it carries a valid token.
pub fn routes(app_state: AppState) -> Router {
    let gate = from_fn_with_state(app_state.clone(), require_secret_key);

    Router::new()
        .nest("/health", health_routes())
        .nest("/students", students_routes())
        .nest("/attendance", attendance_routes())
        .nest("/avatars", avatars_routes())
        .nest("/reports", reports_routes(&app_state).route_layer(gate.clone()))
        .nest(
            "/admin",
            admin_routes(app_state.clone()).route_layer(gate),
        )
        .with_state(app_state)
}
