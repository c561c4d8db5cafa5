//! Wire-level documents returned by the HTTP API.

use serde::{Deserialize, Serialize};

use crate::error::{Error, ErrorKind};
use crate::transcript::TranscriptTrack;

pub const INVALID_INPUT_DETAIL: &str = "Could not extract video ID from the provided URL.";
pub const TRANSCRIPTS_DISABLED_DETAIL: &str = "Transcripts are disabled for this video.";
pub const VIDEO_UNAVAILABLE_DETAIL: &str = "Video is unavailable or does not exist.";
pub const BLOCKED_DETAIL: &str = "YouTube has blocked this server's IP. Try again later or configure a proxy via WEBSHARE_USERNAME and WEBSHARE_PASSWORD.";

/// Successful `/transcript` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptDocument {
    pub success: bool,
    pub video_id: String,
    pub language: String,
    pub language_code: String,
    pub is_generated: bool,
    pub total_snippets: usize,
    pub transcript_text: String,
    pub snippets: Vec<SnippetBody>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnippetBody {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

/// HTTP status and `detail` message for a failed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub status: u16,
    pub detail: String,
}

/// Build the response document for a fetched track.
pub fn assemble(video_id: &str, track: &TranscriptTrack) -> TranscriptDocument {
    let snippets: Vec<SnippetBody> = track
        .snippets
        .iter()
        .map(|s| SnippetBody {
            text: s.text.clone(),
            start: round2(s.start),
            duration: round2(s.duration),
        })
        .collect();

    TranscriptDocument {
        success: true,
        video_id: video_id.to_owned(),
        language: track.language.clone(),
        language_code: track.language_code.clone(),
        is_generated: track.is_generated,
        total_snippets: snippets.len(),
        transcript_text: track.text(),
        snippets,
    }
}

/// Map an error onto its HTTP status and client-facing message.
///
/// Known failure kinds get a fixed message. Anything unclassified is a 500 carrying the
/// error's own description.
pub fn map_error(err: &Error) -> ErrorResponse {
    let (status, detail) = match err.kind() {
        ErrorKind::InvalidInput => (400, INVALID_INPUT_DETAIL.to_owned()),
        ErrorKind::TranscriptsDisabled => (404, TRANSCRIPTS_DISABLED_DETAIL.to_owned()),
        ErrorKind::VideoUnavailable => (404, VIDEO_UNAVAILABLE_DETAIL.to_owned()),
        ErrorKind::Blocked => (429, BLOCKED_DETAIL.to_owned()),
        ErrorKind::Unclassified => (500, err.to_string()),
    };

    ErrorResponse { status, detail }
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
