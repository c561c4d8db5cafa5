use serde::{Deserialize, Serialize};

/// A single caption cue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snippet {
    pub text: String,
    /// Seconds from the start of the video.
    pub start: f64,
    /// Seconds the cue stays on screen.
    pub duration: f64,
}

/// A fetched caption track with its snippets in chronological order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptTrack {
    pub video_id: String,
    /// Human-readable language name, e.g. `English (auto-generated)`.
    pub language: String,
    pub language_code: String,
    /// `true` for ASR captions, `false` for human-authored ones.
    pub is_generated: bool,
    pub snippets: Vec<Snippet>,
}

impl TranscriptTrack {
    /// All snippet texts joined by single spaces, in order.
    pub fn text(&self) -> String {
        self.snippets
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A listed caption track that has not been fetched yet.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackHandle {
    pub video_id: String,
    pub language: String,
    pub language_code: String,
    pub is_generated: bool,
    pub is_translatable: bool,
    /// Where the source fetches the track's content from. Opaque to callers.
    pub url: String,
}
