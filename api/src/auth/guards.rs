use axum::{
    Json,
    body::Body,
    extract::{FromRequestParts, State},
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use util::state::AppState;

use crate::auth::claims::AdminUser;
use crate::auth::extractors::provided_secret_key;
use crate::response::{ApiResponse, Empty};

type GuardRejection = (StatusCode, Json<ApiResponse<Empty>>);

/// Shared-secret gate in front of the report and admin routes.
///
/// The secret comes from the `key` query parameter or the `x-secret-key`
/// header. With no secret configured every request is refused.
pub async fn require_secret_key(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, GuardRejection> {
    let (parts, body) = req.into_parts();

    let authorized = match (&state.config().secret_key, provided_secret_key(&parts)) {
        (Some(expected), Some(provided)) => *expected == provided,
        _ => false,
    };

    if !authorized {
        tracing::debug!(path = %parts.uri.path(), "secret key missing or wrong");
        return Err((StatusCode::FORBIDDEN, Json(ApiResponse::error("Forbidden"))));
    }

    Ok(next.run(Request::from_parts(parts, body)).await)
}

/// Admin-only guard.
///
/// Verifies the bearer token and inserts the resulting `AdminUser` into the
/// request extensions for handlers that want the claims.
pub async fn allow_admin(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, GuardRejection> {
    let (mut parts, body) = req.into_parts();
    let admin = AdminUser::from_request_parts(&mut parts, &state).await?;

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(admin);
    Ok(next.run(req).await)
}
