//! File download handler: streams an asset's original rendition.
//!
//! The handler deliberately bypasses the JSON error machinery. Every
//! rejection, including internal lookup failures, is a bare `404 Not Found`
//! with an empty body so that neither asset existence nor repository
//! structure can be probed through this endpoint. The reason is logged.

use crate::api::AppState;
use crate::disposition::content_disposition;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tokio_util::io::ReaderStream;

/// GET /bin/download.file/{id}/{filename} - Stream an asset's file
#[utoipa::path(
    get,
    path = "/bin/download.file/{id}/{filename}",
    tag = "download",
    params(
        ("id" = String, Path, description = "Opaque asset identifier"),
        ("filename" = String, Path, description = "Filename of the asset, matched case-insensitively")
    ),
    responses(
        (status = 200, description = "The asset's original bytes, with Content-Type and Content-Disposition headers"),
        (status = 404, description = "Unknown id, filename mismatch, non-asset resource, or malformed path; always an empty body")
    )
)]
pub async fn download_file(
    State(state): State<AppState>,
    Path(suffix): Path<String>,
) -> Response {
    // The wildcard capture drops the leading separator; restore it so the
    // suffix grammar sees the path as sent on the wire.
    let suffix = format!("/{suffix}");

    let download = match state.gateway.open_download(&suffix).await {
        Ok(download) => download,
        Err(e) => {
            tracing::error!(suffix = %suffix, error = %e, "download request rejected");
            return not_found();
        }
    };

    let force_download = state.gateway.config().force_download();
    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, &download.mime_type)
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition(force_download, &download.filename),
        );
    // A zero size means unknown; leave the length to the transfer encoding
    if download.size > 0 {
        builder = builder.header(header::CONTENT_LENGTH, download.size);
    }

    match builder.body(Body::from_stream(ReaderStream::new(download.source))) {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(error = %e, "could not build download response");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// GET /bin/download.file - Missing suffix
///
/// A request for the endpoint path with no suffix at all cannot name an
/// asset, so it gets the same empty 404 as every other rejection.
pub async fn download_missing_suffix() -> Response {
    not_found()
}

fn not_found() -> Response {
    StatusCode::NOT_FOUND.into_response()
}
