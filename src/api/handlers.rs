//! Analyze API handlers

use axum::{
    extract::{Multipart, State},
    http::{header, StatusCode},
    Json,
};
use bytes::Bytes;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

use crate::api::models::{messages, ErrorBody};
use crate::metrics::METRICS;
use crate::notify::NotificationRouter;
use crate::storage::ImageStore;
use crate::vision::VisionClient;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ImageStore>,
    pub vision: Arc<VisionClient>,
    pub notifications: Arc<NotificationRouter>,
}

type ApiResult<T> = Result<T, (StatusCode, Json<ErrorBody>)>;

/// Analyze an uploaded image and notify the matching channel
///
/// POST /analyze-image
pub async fn analyze_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<serde_json::Value>> {
    let start = Instant::now();

    let upload = match read_file_field(&mut multipart).await {
        Ok(upload) => upload,
        Err(rejection) => {
            METRICS.record_analyze("bad_request");
            finish(start);
            return Err(rejection);
        }
    };

    info!(bytes = upload.len(), "analyze request received");

    let stored = match state.store.store(&upload).await {
        Ok(stored) => stored,
        Err(err) => {
            error!(error = %err, "failed to persist upload");
            METRICS.record_analyze("storage_error");
            finish(start);
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody::new(messages::UPLOAD_FAILED)),
            ));
        }
    };

    let analysis = match state.vision.analyze(&stored.path).await {
        Ok(analysis) => {
            METRICS.record_vision(true);
            analysis
        }
        Err(err) => {
            // Every classifier failure collapses into the same fixed
            // response; the cause stays in the logs.
            METRICS.record_vision(false);
            warn!(error = %err, "image analysis failed");
            state.store.remove(&stored).await;
            METRICS.record_analyze("analysis_failed");
            finish(start);
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorBody::new(messages::ANALYSIS_FAILED)),
            ));
        }
    };

    info!(tags = ?analysis.tags(), "image classified");

    if let Err(err) = state.notifications.dispatch(&analysis, &stored).await {
        // Classified but not notified: logged and counted, the response
        // shape stays the raw classification payload.
        warn!(error = %err, "classification succeeded but notification failed");
    }

    state.store.remove(&stored).await;
    METRICS.record_analyze("success");
    finish(start);

    Ok(Json(analysis.into_raw()))
}

/// Liveness probe
///
/// GET /health
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Prometheus text exposition
///
/// GET /metrics
pub async fn metrics() -> ([(header::HeaderName, &'static str); 1], String) {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        METRICS.export_prometheus(),
    )
}

/// Pull the `file` upload out of the multipart body.
///
/// A body without the field is a deterministic 400, not an unhandled
/// failure; a body that cannot be parsed at all gets its own message.
async fn read_file_field(multipart: &mut Multipart) -> ApiResult<Bytes> {
    loop {
        let field = multipart.next_field().await.map_err(|err| {
            warn!(error = %err, "rejecting malformed multipart body");
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody::new(messages::MALFORMED_MULTIPART)),
            )
        })?;

        let Some(field) = field else {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorBody::new(messages::MISSING_FILE_FIELD)),
            ));
        };

        if field.name() == Some("file") {
            return field.bytes().await.map_err(|err| {
                warn!(error = %err, "failed to read upload field");
                (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorBody::new(messages::MALFORMED_MULTIPART)),
                )
            });
        }
    }
}

fn finish(start: Instant) {
    METRICS
        .request_duration
        .with_label_values(&["analyze"])
        .observe(start.elapsed().as_secs_f64());
}
