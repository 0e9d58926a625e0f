//! HTTP upload surface.
//!
//! Two POST endpoints accept a multipart video upload plus query parameters
//! and respond with the frame archive:
//!
//! - `POST /extract_frames?quality=70&skip_frames=0` (exhaustive mode)
//! - `POST /extract_frames_fast?max_frames=100&quality=60` (bounded mode)
//!
//! The upload is decoded and encoded on a blocking worker (the pipeline is
//! CPU-bound), against the process-wide [`EncodePool`] owned by [`AppState`].
//! The archive response is written in fixed-size chunks; per the pipeline's
//! contract it is fully assembled before the first byte leaves.
//!
//! Only available with the `server` cargo feature.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::{DefaultBodyLimit, Multipart, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use bytes::Bytes;
use serde::Deserialize;

use crate::encode::EncodePool;
use crate::error::FramepackError;
use crate::options::{DEFAULT_FAST_QUALITY, DEFAULT_QUALITY, ExtractOptions};
use crate::pipeline::{Extraction, ExtractionMode, extract};
use crate::source::FrameSource;

/// Default cap on uploaded request bodies.
pub const DEFAULT_BODY_LIMIT: usize = 512 * 1024 * 1024;

/// Default number of kept frames in fast mode.
pub const DEFAULT_MAX_FRAMES: u64 = 100;

/// Process-wide state shared by all requests.
///
/// Owns the encode worker pool; everything else is per-request.
pub struct AppState {
    pool: EncodePool,
}

impl AppState {
    /// Wrap an encode pool constructed at process start.
    pub fn new(pool: EncodePool) -> Self {
        Self { pool }
    }
}

/// Error response: 400 for faulty input, 500 for everything else.
#[derive(Debug)]
enum ApiError {
    BadRequest(String),
    Internal(String),
}

impl From<FramepackError> for ApiError {
    fn from(error: FramepackError) -> Self {
        if error.is_client_error() {
            ApiError::BadRequest(error.to_string())
        } else {
            ApiError::Internal(error.to_string())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Internal(message) => {
                log::error!("extraction failed: {message}");
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };
        (status, body).into_response()
    }
}

/// Query parameters of `POST /extract_frames`.
///
/// Negative values fail query deserialization and surface as a 400 before
/// any work happens; out-of-range quality is rejected by the pipeline.
#[derive(Debug, Deserialize)]
struct ExtractParams {
    #[serde(default = "default_quality")]
    quality: i64,
    #[serde(default)]
    skip_frames: u64,
}

fn default_quality() -> i64 {
    DEFAULT_QUALITY as i64
}

/// Query parameters of `POST /extract_frames_fast`.
#[derive(Debug, Deserialize)]
struct FastParams {
    #[serde(default = "default_max_frames")]
    max_frames: u64,
    #[serde(default = "default_fast_quality")]
    quality: i64,
}

fn default_max_frames() -> u64 {
    DEFAULT_MAX_FRAMES
}

fn default_fast_quality() -> i64 {
    DEFAULT_FAST_QUALITY as i64
}

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    router_with_body_limit(state, DEFAULT_BODY_LIMIT)
}

/// [`router`] with a custom upload size cap.
pub fn router_with_body_limit(state: Arc<AppState>, body_limit: usize) -> Router {
    Router::new()
        .route("/extract_frames", post(extract_frames))
        .route("/extract_frames_fast", post(extract_frames_fast))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// Bind and serve until ctrl-c.
pub async fn serve(addr: SocketAddr, state: Arc<AppState>) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("listening on {addr}");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        log::info!("shutting down");
    }
}

async fn extract_frames(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ExtractParams>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let upload = read_upload(multipart).await?;
    let options = ExtractOptions::new().with_quality(params.quality);
    let mode = ExtractionMode::Exhaustive {
        skip_frames: params.skip_frames,
    };

    let extraction = run_pipeline(state, upload.data, mode, options).await?;
    Ok(archive_response(extraction, &upload.stem, "_frames.zip"))
}

async fn extract_frames_fast(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FastParams>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let upload = read_upload(multipart).await?;
    let options = ExtractOptions::new().with_quality(params.quality);
    let mode = ExtractionMode::Fast {
        max_frames: params.max_frames,
    };

    let extraction = run_pipeline(state, upload.data, mode, options).await?;
    Ok(archive_response(extraction, &upload.stem, "_frames_fast.zip"))
}

struct Upload {
    stem: String,
    data: Bytes,
}

/// Pull the `file` field out of the multipart body.
async fn read_upload(mut multipart: Multipart) -> Result<Upload, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|error| ApiError::BadRequest(format!("malformed multipart body: {error}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let stem = field
            .file_name()
            .map(file_stem)
            .unwrap_or_else(|| "video".to_string());
        let data = field
            .bytes()
            .await
            .map_err(|error| ApiError::BadRequest(format!("failed to read upload: {error}")))?;
        return Ok(Upload { stem, data });
    }
    Err(ApiError::BadRequest(
        "missing multipart field 'file'".to_string(),
    ))
}

/// Filename stem of the uploaded file, with path components removed and
/// anything unsafe for a `Content-Disposition` header replaced.
fn file_stem(name: &str) -> String {
    let stem: String = Path::new(name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("video")
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if stem.is_empty() {
        "video".to_string()
    } else {
        stem
    }
}

/// Run the blocking pipeline on a worker thread.
async fn run_pipeline(
    state: Arc<AppState>,
    data: Bytes,
    mode: ExtractionMode,
    options: ExtractOptions,
) -> Result<Extraction, ApiError> {
    let handle = tokio::task::spawn_blocking(move || {
        let source = FrameSource::from_bytes(&data)?;
        extract(source, mode, &options, &state.pool)
    });
    handle
        .await
        .map_err(|error| ApiError::Internal(format!("extraction task failed: {error}")))?
        .map_err(ApiError::from)
}

/// Build the archive response, streamed in fixed-size chunks.
fn archive_response(extraction: Extraction, stem: &str, suffix: &str) -> Response {
    let archive = extraction.archive;
    let disposition = format!("attachment; filename=\"{stem}{suffix}\"");
    let length = archive.len();
    let body = Body::from_stream(futures::stream::iter(
        archive.into_chunks().map(Ok::<Bytes, Infallible>),
    ));

    (
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
            (header::CONTENT_LENGTH, length.to_string()),
        ],
        body,
    )
        .into_response()
}
