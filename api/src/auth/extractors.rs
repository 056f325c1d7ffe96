use axum::{
    Json,
    extract::{FromRequestParts, Query},
    http::{StatusCode, request::Parts},
};
use axum_extra::extract::TypedHeader;
use headers::{Authorization, authorization::Bearer};
use std::collections::HashMap;
use util::state::AppState;

use crate::auth::{claims::AdminUser, verify_admin_token};
use crate::response::{ApiResponse, Empty};

/// Header carrying the report/admin gate secret.
pub const SECRET_KEY_HEADER: &str = "x-secret-key";
/// Query parameter carrying the report/admin gate secret.
pub const SECRET_KEY_PARAM: &str = "key";

/// Extracts an `AdminUser` from the `Authorization: Bearer` header.
///
/// The token is verified on every request (signature, expiry, admin flag);
/// there is no server-side session.
///
/// # Errors
/// - `401 Unauthorized` if the header is missing or malformed.
/// - `401 Unauthorized` if the token is invalid, expired or not an admin token.
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = (StatusCode, Json<ApiResponse<Empty>>);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| {
                    (
                        StatusCode::UNAUTHORIZED,
                        Json(ApiResponse::error("Unauthorized")),
                    )
                })?;

        verify_admin_token(state, bearer.token())
            .map(AdminUser)
            .ok_or((
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::error("Invalid token")),
            ))
    }
}

/// The gate secret supplied with a request, from the `key` query parameter
/// or, failing that, the `x-secret-key` header.
pub fn provided_secret_key(parts: &Parts) -> Option<String> {
    let from_query = Query::<HashMap<String, String>>::try_from_uri(&parts.uri)
        .ok()
        .and_then(|Query(params)| params.get(SECRET_KEY_PARAM).cloned());

    from_query.or_else(|| {
        parts
            .headers
            .get(SECRET_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
    })
}
