use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use base64::{Engine, engine::general_purpose::STANDARD};
use common::format_validation_errors;
use serde::Deserialize;
use util::{event_date, mailer::EmailAttachment, state::AppState};
use validator::Validate;

use crate::response::{ApiResponse, Empty};
use crate::services::email::{DEFAULT_REPORT_FILENAME, ReportDigest, compose_report_email};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EmailReportRequest {
    pub report_data: Option<serde_json::Value>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    /// Base64 PDF, optionally as a `data:` URL.
    pub pdf_attachment: Option<String>,
    pub filename: Option<String>,
}

type Reply = (StatusCode, Json<ApiResponse<Empty>>);

fn bad_request(message: impl Into<String>) -> Reply {
    (StatusCode::BAD_REQUEST, Json(ApiResponse::error(message)))
}

/// POST /api/reports/email
///
/// Emails an attendance summary, with the client-rendered PDF attached when
/// one is supplied.
///
/// ### Request Body
/// ```json
/// {
///   "reportData": { "summary": { ... }, "gradeData": [ ... ] },
///   "email": "principal@example.com",
///   "pdfAttachment": "JVBERi0xLjQK...",
///   "filename": "Attendance_Report.pdf"
/// }
/// ```
///
/// ### Responses
/// - `200 OK`: `"Email sent successfully"`
/// - `400 Bad Request`: `"Invalid request body"`, `"Missing report data or email"`,
///   `"Invalid email format"`, `"Invalid report data"`, `"Invalid PDF attachment"`
/// - `413 Payload Too Large`: `"Report email too large"` (body over `MAX_REPORT_EMAIL_BYTES`)
/// - `500 Internal Server Error`: `"Email delivery is not configured"`, `"Failed to send email"`
pub async fn email_report(
    State(state): State<AppState>,
    payload: Result<Json<EmailReportRequest>, JsonRejection>,
) -> Reply {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            tracing::debug!(%rejection, "unreadable report email body");
            if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                return (
                    StatusCode::PAYLOAD_TOO_LARGE,
                    Json(ApiResponse::error("Report email too large")),
                );
            }
            return bad_request("Invalid request body");
        }
    };

    let (Some(report_data), Some(email)) = (
        req.report_data.as_ref().filter(|v| !v.is_null()),
        req.email.as_deref().map(str::trim).filter(|e| !e.is_empty()),
    ) else {
        return bad_request("Missing report data or email");
    };

    if let Err(errors) = req.validate() {
        return bad_request(format_validation_errors(&errors));
    }

    let digest: ReportDigest = match serde_json::from_value(report_data.clone()) {
        Ok(d) => d,
        Err(e) => {
            tracing::debug!(error = %e, "unreadable report data");
            return bad_request("Invalid report data");
        }
    };

    let attachment = match req.pdf_attachment.as_deref().filter(|p| !p.is_empty()) {
        Some(encoded) => match decode_pdf(encoded) {
            Some(bytes) => Some(EmailAttachment {
                filename: req
                    .filename
                    .clone()
                    .filter(|f| !f.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_REPORT_FILENAME.to_string()),
                content_type: "application/pdf".to_string(),
                bytes,
            }),
            None => return bad_request("Invalid PDF attachment"),
        },
        None => None,
    };

    let Some(mailer) = state.mailer() else {
        tracing::warn!("report email requested but SMTP is not configured");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error("Email delivery is not configured")),
        );
    };

    let message = compose_report_email(
        &state.config().email_from_name,
        email,
        event_date::today(state.config()),
        &digest,
        attachment,
    );

    match mailer.send(message).await {
        Ok(()) => {
            tracing::info!(to = %email, "report email sent");
            (
                StatusCode::OK,
                Json(ApiResponse::success(Empty::default(), "Email sent successfully")),
            )
        }
        Err(e) => {
            tracing::error!(error = %e, to = %email, "report email failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to send email")),
            )
        }
    }
}

/// Decodes a base64 PDF, accepting a `data:application/pdf;base64,` prefix.
fn decode_pdf(encoded: &str) -> Option<Vec<u8>> {
    let payload = match encoded.split_once("base64,") {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => encoded,
    };
    STANDARD.decode(payload.trim()).ok()
}
