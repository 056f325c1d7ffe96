use axum::{
    Extension, Json,
    extract::{Multipart, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use common::format_validation_errors;
use db::models::{attendance, student};
use util::{event_date, paths, state::AppState};
use validator::Validate;

use crate::auth::{AdminUser, generate_jwt};
use crate::response::ApiResponse;
use crate::routes::admin::common::{
    AvatarResponse, LoginRequest, LoginResponse, ResetResponse, avatar_extension,
};

/// POST /api/admin/login
///
/// Exchanges the shared admin password for a signed admin token.
///
/// ### Request Body
/// ```json
/// { "password": "..." }
/// ```
///
/// ### Example Response
/// ```json
/// {
///   "success": true,
///   "data": { "token": "eyJhbGciOi...", "expiresAt": "2026-06-13T18:00:00+00:00" },
///   "message": "Login successful"
/// }
/// ```
///
/// ### Errors
/// - `400 Bad Request`: `"Password is required"`
/// - `401 Unauthorized`: `"Invalid password"`
/// - `500 Internal Server Error`: `"Failed to issue token"`
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Ok(Json(req)) = payload else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<LoginResponse>::error("Password is required")),
        );
    };

    if let Err(errors) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<LoginResponse>::error(format_validation_errors(&errors))),
        );
    }

    if req.password != state.config().admin_password {
        tracing::warn!("admin login with wrong password");
        return (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::<LoginResponse>::error("Invalid password")),
        );
    }

    match generate_jwt(&state) {
        Ok((token, expires_at)) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                LoginResponse { token, expires_at },
                "Login successful",
            )),
        ),
        Err(e) => {
            tracing::error!(error = %e, "failed to sign admin token");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to issue token")),
            )
        }
    }
}

/// POST /api/admin/reset
///
/// Deletes every check-in for today's event date. Earlier dates and the
/// student roster are left alone.
///
/// ### Example Response
/// ```json
/// {
///   "success": true,
///   "data": { "deleted": 42 },
///   "message": "All attendance records for today have been reset"
/// }
/// ```
///
/// ### Errors
/// - `401 Unauthorized`: missing or invalid admin token
/// - `500 Internal Server Error`: `"Reset failed"`
pub async fn reset_attendance(
    State(state): State<AppState>,
    Extension(AdminUser(claims)): Extension<AdminUser>,
) -> impl IntoResponse {
    let today = event_date::today(state.config());

    match attendance::Model::reset_on(state.db(), today).await {
        Ok(deleted) => {
            tracing::info!(admin = %claims.sub, event_date = %today, deleted, "attendance reset");
            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    ResetResponse { deleted },
                    "All attendance records for today have been reset",
                )),
            )
        }
        Err(e) => {
            tracing::error!(error = %e, event_date = %today, "attendance reset failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<ResetResponse>::error("Reset failed")),
            )
        }
    }
}

/// POST /api/admin/students/upload
///
/// Stores a new avatar image for a student and records its public URL.
/// Each upload is written under a fresh `{studentId}_{unixMillis}.{ext}`
/// name; earlier files are kept.
///
/// ### Request (multipart/form-data)
/// - `file` (required): JPEG, PNG, GIF or WebP image up to `MAX_AVATAR_BYTES`
/// - `studentId` (required): numeric student id
///
/// ### Example Response
/// ```json
/// {
///   "success": true,
///   "data": { "avatarUrl": "/api/avatars/12_1760000000000.png" },
///   "message": "Avatar uploaded successfully"
/// }
/// ```
///
/// ### Errors
/// - `400 Bad Request`: `"Missing file or student ID"`, `"Invalid student ID"`,
///   `"File type not supported"`, `"File too large"`, `"Invalid upload"`
/// - `404 Not Found`: `"Student not found"`
/// - `413 Payload Too Large`: `"File too large"` (body over the request limit)
/// - `500 Internal Server Error`: `"Failed to store avatar"`
pub async fn upload_avatar(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let max_bytes = state.config().max_avatar_bytes;

    let mut student_id_raw: Option<String> = None;
    let mut upload: Option<(&'static str, Vec<u8>)> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return multipart_failure(e.status(), &e.body_text()),
        };

        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("file") => {
                let content_type = field.content_type().unwrap_or_default().to_owned();
                let Some(ext) = avatar_extension(&content_type) else {
                    return error(StatusCode::BAD_REQUEST, "File type not supported");
                };

                let bytes = match field.bytes().await {
                    Ok(b) => b,
                    Err(e) => return multipart_failure(e.status(), &e.body_text()),
                };
                if bytes.len() > max_bytes {
                    return error(StatusCode::BAD_REQUEST, "File too large");
                }
                if !bytes.is_empty() {
                    upload = Some((ext, bytes.to_vec()));
                }
            }
            Some("studentId") => match field.text().await {
                Ok(text) => student_id_raw = Some(text),
                Err(e) => return multipart_failure(e.status(), &e.body_text()),
            },
            _ => {}
        }
    }

    let (Some(raw_id), Some((ext, bytes))) = (student_id_raw, upload) else {
        return error(StatusCode::BAD_REQUEST, "Missing file or student ID");
    };

    let Ok(student_id) = raw_id.trim().parse::<i64>() else {
        return error(StatusCode::BAD_REQUEST, "Invalid student ID");
    };

    match student::Model::find_by_id(state.db(), student_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return error(StatusCode::NOT_FOUND, "Student not found"),
        Err(e) => {
            tracing::error!(error = %e, student_id, "student lookup failed");
            return error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to store avatar");
        }
    }

    let root = paths::avatar_root(&state.config().avatar_storage_root);
    if let Err(e) = paths::ensure_dir(&root) {
        tracing::error!(error = %e, root = %root.display(), "cannot create avatar directory");
        return error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to store avatar");
    }

    let filename = paths::avatar_filename(student_id, Utc::now().timestamp_millis(), ext);
    let path = root.join(&filename);
    if let Err(e) = tokio::fs::write(&path, &bytes).await {
        tracing::error!(error = %e, path = %path.display(), "failed to write avatar");
        return error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to store avatar");
    }

    let avatar_url = paths::avatar_url(&filename);
    match student::Model::set_avatar(state.db(), student_id, &avatar_url).await {
        Ok(_) => {
            tracing::info!(student_id, avatar_url = %avatar_url, "avatar uploaded");
            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    AvatarResponse { avatar_url },
                    "Avatar uploaded successfully",
                )),
            )
        }
        Err(e) => {
            tracing::error!(error = %e, student_id, "failed to record avatar");
            error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to store avatar")
        }
    }
}

fn error(status: StatusCode, message: &str) -> (StatusCode, Json<ApiResponse<AvatarResponse>>) {
    (status, Json(ApiResponse::error(message)))
}

fn multipart_failure(
    status: StatusCode,
    detail: &str,
) -> (StatusCode, Json<ApiResponse<AvatarResponse>>) {
    tracing::debug!(%status, detail, "multipart read failed");
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        error(status, "File too large")
    } else {
        error(StatusCode::BAD_REQUEST, "Invalid upload")
    }
}
