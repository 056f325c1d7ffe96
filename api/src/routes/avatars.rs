use axum::{
    Router,
    body::Body,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use mime_guess::from_path;
use tokio::fs::File;
use tokio_util::io::ReaderStream;
use util::{paths, state::AppState};

pub fn avatars_routes() -> Router<AppState> {
    Router::new().route("/{filename}", get(get_avatar))
}

/// GET /api/avatars/{filename}
///
/// Streams a stored avatar with a content type guessed from its extension.
///
/// ### Responses
/// - `200 OK` with the image bytes
/// - `404 Not Found` if the name is not a plain file name or nothing is stored under it
pub async fn get_avatar(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Response {
    let root = paths::avatar_root(&state.config().avatar_storage_root);
    let Some(path) = paths::avatar_path(&root, &filename) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let file = match File::open(&path).await {
        Ok(f) => f,
        Err(_) => return StatusCode::NOT_FOUND.into_response(),
    };

    let mime = from_path(&path).first_or_octet_stream();
    let body = Body::from_stream(ReaderStream::new(file));

    ([(header::CONTENT_TYPE, mime.to_string())], body).into_response()
}
