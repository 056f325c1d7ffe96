use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{
        HeaderName, Method, Request,
        header::{ORIGIN, USER_AGENT},
    },
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;
use tracing::info;

/// Logs method, path, IP address, origin and user-agent for each incoming
/// HTTP request, then the response status. CORS preflight `OPTIONS`
/// requests pass through silently.
///
/// ### Usage:
/// ```ignore
/// use axum::Router;
/// use axum::middleware::from_fn;
/// use api::auth::middleware::log_request;
///
/// let app = Router::new().layer(from_fn(log_request));
/// ```
pub async fn log_request(req: Request<Body>, next: Next) -> Response {
    if req.method() == Method::OPTIONS {
        return next.run(req).await;
    }

    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let ip = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".into());
    let origin = header_or_unknown(&req, ORIGIN);
    let user_agent = header_or_unknown(&req, USER_AGENT);

    info!(method = %method, path = %path, ip = %ip, origin = %origin, user_agent = %user_agent, "Incoming request");

    let response = next.run(req).await;
    info!(method = %method, path = %path, status = response.status().as_u16(), "Request completed");
    response
}

fn header_or_unknown(req: &Request<Body>, name: HeaderName) -> String {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_owned()
}
