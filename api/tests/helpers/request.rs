use api::auth::generate_jwt;
use axum::{
    body::Body,
    http::{Request, header::AUTHORIZATION, header::CONTENT_TYPE},
    response::Response,
};
use serde_json::Value;
use util::{state::AppState, test_helpers::TEST_SECRET_KEY};

pub const MULTIPART_BOUNDARY: &str = "gala-test-boundary";

pub fn admin_token(state: &AppState) -> String {
    generate_jwt(state).unwrap().0
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(uri: &str, payload: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(payload).unwrap()))
        .unwrap()
}

/// Adds the gate secret header and, when given, a bearer token.
pub fn authorized(mut req: Request<Body>, token: Option<&str>) -> Request<Body> {
    let headers = req.headers_mut();
    headers.insert("x-secret-key", TEST_SECRET_KEY.parse().unwrap());
    if let Some(token) = token {
        headers.insert(AUTHORIZATION, format!("Bearer {token}").parse().unwrap());
    }
    req
}

/// Multipart avatar upload; either part may be left out.
pub fn multipart_upload(
    student_id: Option<&str>,
    file: Option<(&str, &[u8])>,
) -> Request<Body> {
    let mut body: Vec<u8> = Vec::new();
    if let Some(id) = student_id {
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"studentId\"\r\n\r\n{id}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((content_type, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"avatar\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/admin/students/upload")
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
