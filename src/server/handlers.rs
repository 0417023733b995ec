//! Request handlers.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderName, HeaderValue, header};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use futures::{StreamExt, stream};
use log::{error, info};
use std::time::Duration;

use super::dto::{TranslateBody, TranslateResponse};
use super::error::HttpError;
use super::state::AppState;
use crate::file_utils::FileManager;
use crate::providers::sse::DONE_MARKER;
use crate::translation::{OutputFormat, TranslationRequest};

const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(15);

const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Buffered translation, or a stream when the body asks for one.
pub async fn translate(
    State(state): State<AppState>,
    body: Result<Json<TranslateBody>, JsonRejection>,
) -> Result<Response, HttpError> {
    let Json(body) = body.map_err(|rejection| HttpError::BadRequest(rejection.body_text()))?;
    let request = body.into_request(state.server.max_text_length, false)?;

    if request.streaming() {
        return Ok(event_stream(&state, &request));
    }

    let result = state
        .service
        .translate(request.text(), request.want_glossary())
        .await?;

    let document_url = match request.output_format() {
        OutputFormat::Json => None,
        OutputFormat::Document => {
            let document = state
                .renderer
                .render_to_file(request.text(), &result.translated_text, &result.glossary)
                .await?;
            Some(document.url())
        }
    };

    let response = TranslateResponse::new(result, request.want_glossary(), document_url);
    Ok(Json(response).into_response())
}

/// Streaming translation as server-sent events.
pub async fn translate_stream(
    State(state): State<AppState>,
    body: Result<Json<TranslateBody>, JsonRejection>,
) -> Result<Response, HttpError> {
    let Json(body) = body.map_err(|rejection| HttpError::BadRequest(rejection.body_text()))?;
    let request = body.into_request(state.server.max_text_length, true)?;
    Ok(event_stream(&state, &request))
}

// Each event is `data: <json>`; the stream is closed by `data: [DONE]`.
fn event_stream(state: &AppState, request: &TranslationRequest) -> Response {
    info!("Opening event stream ({} chars)", request.text().chars().count());

    let events = state
        .service
        .translate_stream(request.text(), request.want_glossary())
        .map(|event| Event::default().json_data(&event))
        .chain(stream::once(async { Ok::<_, axum::Error>(Event::default().data(DONE_MARKER)) }));

    let sse = Sse::new(events).keep_alive(KeepAlive::new().interval(KEEP_ALIVE_INTERVAL));
    (
        [(
            HeaderName::from_static("x-accel-buffering"),
            HeaderValue::from_static("no"),
        )],
        sse,
    )
        .into_response()
}

/// Liveness probe
pub async fn healthz() -> &'static str {
    "ok"
}

/// Serve a previously rendered document
pub async fn download(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Response, HttpError> {
    let path = FileManager::resolve_download(state.renderer.output_dir(), &name)
        .ok_or_else(|| HttpError::NotFound(format!("document '{}' not found", name)))?;

    let bytes = tokio::fs::read(&path).await.map_err(|e| {
        error!("Failed to read document {:?}: {}", path, e);
        HttpError::Internal(format!("failed to read document '{}'", name))
    })?;

    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", name))
        .map_err(|e| HttpError::Internal(e.to_string()))?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(DOCX_CONTENT_TYPE)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}
