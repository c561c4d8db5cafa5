//! HTTP surface: routes, query parsing, and JSON error bodies.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

use crate::{Error, ErrorKind};
use crate::response::{TranscriptDocument, map_error};
use crate::tubescribe::{DEFAULT_LANGUAGE, TubeScribe};

pub const EXAMPLE_VIDEO_ID: &str = "dQw4w9WgXcQ";

#[derive(Clone)]
pub struct AppState {
    pub tubescribe: TubeScribe,
}

impl AppState {
    pub fn new(tubescribe: TubeScribe) -> Self {
        Self { tubescribe }
    }
}

#[derive(Debug, Deserialize)]
pub struct TranscriptQuery {
    #[serde(default)]
    video_id: Option<String>,
    #[serde(default = "default_language")]
    language: String,
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_owned()
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct RootResponse {
    pub message: String,
    pub usage: String,
    pub example: String,
    pub docs: String,
    pub proxy_enabled: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// How a `/transcript` request that reached the fetch pipeline ended.
///
/// Attached to the response as an extension; the server binary counts these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscriptOutcome {
    Served { fell_back: bool },
    Failed(ErrorKind),
}

impl TranscriptOutcome {
    pub fn label(self) -> &'static str {
        match self {
            TranscriptOutcome::Served { .. } => "ok",
            TranscriptOutcome::Failed(kind) => kind.label(),
        }
    }
}

#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    fn unprocessable(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: message.into(),
        }
    }
}

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        let mapped = map_error(&err);
        let status =
            StatusCode::from_u16(mapped.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            warn!(error = %err, "transcript request failed");
        }
        Self {
            status,
            message: mapped.detail,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            detail: self.message,
        });
        (self.status, body).into_response()
    }
}

/// Build the API router. Any origin may issue `GET` requests.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/docs", get(docs))
        .route("/healthz", get(healthz))
        .route("/transcript", get(transcript))
        .with_state(state)
        .layer(cors)
}

async fn root(State(state): State<AppState>) -> Json<RootResponse> {
    Json(RootResponse {
        message: "YouTube Transcript API is running!".to_owned(),
        usage: "GET /transcript?video_id=<VIDEO_ID>".to_owned(),
        example: format!("/transcript?video_id={EXAMPLE_VIDEO_ID}"),
        docs: "/docs".to_owned(),
        proxy_enabled: state.tubescribe.proxy_enabled(),
    })
}

async fn docs() -> Json<Value> {
    Json(json!({
        "title": "YouTube Transcript API",
        "description": "Fetch the transcript of any YouTube video by passing its video ID or full URL.",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            {
                "method": "GET",
                "path": "/",
                "description": "Service status and usage hint."
            },
            {
                "method": "GET",
                "path": "/transcript",
                "description": "Fetch the full transcript of a YouTube video, falling back to any available language.",
                "query": {
                    "video_id": "YouTube video ID (e.g. dQw4w9WgXcQ) or full URL. Required.",
                    "language": "Language code, default is 'en' (English)."
                }
            }
        ]
    }))
}

async fn healthz() -> &'static str {
    "ok"
}

async fn transcript(
    State(state): State<AppState>,
    query: std::result::Result<Query<TranscriptQuery>, QueryRejection>,
) -> std::result::Result<Response, AppError> {
    let Query(query) = query.map_err(|rejection| AppError::unprocessable(rejection.body_text()))?;
    let video_id = query
        .video_id
        .ok_or_else(|| AppError::unprocessable("Missing required query parameter: video_id"))?;

    let (mut response, outcome) = match state
        .tubescribe
        .transcript(&video_id, &query.language)
        .await
    {
        Ok(doc) => {
            // The first tier only succeeds on an exact language code match.
            let fell_back = doc.language_code != query.language;
            (
                Json::<TranscriptDocument>(doc).into_response(),
                TranscriptOutcome::Served { fell_back },
            )
        }
        Err(err) => {
            let outcome = TranscriptOutcome::Failed(err.kind());
            (AppError::from(err).into_response(), outcome)
        }
    };

    response.extensions_mut().insert(outcome);
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_error_uses_mapped_status() {
        let err = AppError::from(Error::IpBlocked("vid".into()));
        assert_eq!(err.status, StatusCode::TOO_MANY_REQUESTS);

        let err = AppError::from(Error::msg("boom"));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "boom");
    }

    #[test]
    fn outcome_labels() {
        assert_eq!(TranscriptOutcome::Served { fell_back: true }.label(), "ok");
        assert_eq!(
            TranscriptOutcome::Failed(ErrorKind::TranscriptsDisabled).label(),
            "transcripts_disabled"
        );
    }

    #[test]
    fn language_defaults_to_english() -> Result<(), serde_json::Error> {
        let query: TranscriptQuery = serde_json::from_value(json!({ "video_id": "abc" }))?;
        assert_eq!(query.language, "en");
        assert_eq!(query.video_id.as_deref(), Some("abc"));
        Ok(())
    }
}
