use std::time::Duration;

use thiserror::Error;

/// tubescribe's crate-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// tubescribe's crate-wide error type.
///
/// The variants mirror the failure signals a transcript source can raise. Callers that only
/// care about the HTTP-facing taxonomy should match on [`Error::kind`] instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Could not extract video ID from the provided URL.")]
    InvalidInput,

    #[error("no transcript found for video {video_id} in languages {languages:?}")]
    NoTranscriptFound {
        video_id: String,
        languages: Vec<String>,
    },

    #[error("transcripts are disabled for video {0}")]
    TranscriptsDisabled(String),

    #[error("video {0} is unavailable")]
    VideoUnavailable(String),

    #[error("YouTube is asking to confirm this is not a bot for video {0}")]
    RequestBlocked(String),

    #[error("YouTube is blocking requests from this IP (video {0})")]
    IpBlocked(String),

    #[error("video {0} is age restricted")]
    AgeRestricted(String),

    #[error("video {video_id} is unplayable: {reason}")]
    VideoUnplayable { video_id: String, reason: String },

    #[error("caption track for video {0} requires a PO token")]
    PoTokenRequired(String),

    #[error("timed out after {}s fetching transcript", .0.as_secs())]
    Timeout(Duration),

    #[error("failed to parse YouTube data for video {video_id}: {message}")]
    Parse { video_id: String, message: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Message(String),
}

/// The fixed failure taxonomy exposed at the HTTP boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    TranscriptsDisabled,
    VideoUnavailable,
    Blocked,
    Unclassified,
}

impl ErrorKind {
    /// Stable snake_case name, used as a metrics label.
    pub fn label(self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::TranscriptsDisabled => "transcripts_disabled",
            ErrorKind::VideoUnavailable => "video_unavailable",
            ErrorKind::Blocked => "blocked",
            ErrorKind::Unclassified => "unclassified",
        }
    }
}

impl Error {
    pub(crate) fn msg(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }

    pub(crate) fn parse(video_id: &str, message: impl Into<String>) -> Self {
        Self::Parse {
            video_id: video_id.to_owned(),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidInput => ErrorKind::InvalidInput,
            Error::TranscriptsDisabled(_) => ErrorKind::TranscriptsDisabled,
            Error::VideoUnavailable(_) => ErrorKind::VideoUnavailable,
            Error::RequestBlocked(_) | Error::IpBlocked(_) => ErrorKind::Blocked,
            _ => ErrorKind::Unclassified,
        }
    }

    /// Whether a rotating proxy might get a different answer on retry.
    pub fn is_blocked(&self) -> bool {
        self.kind() == ErrorKind::Blocked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocked_variants_share_a_kind() {
        assert_eq!(Error::RequestBlocked("x".into()).kind(), ErrorKind::Blocked);
        assert_eq!(Error::IpBlocked("x".into()).kind(), ErrorKind::Blocked);
        assert!(Error::IpBlocked("x".into()).is_blocked());
    }

    #[test]
    fn unknown_failures_are_unclassified() {
        let err = Error::NoTranscriptFound {
            video_id: "abc".into(),
            languages: vec!["en".into()],
        };
        assert_eq!(err.kind(), ErrorKind::Unclassified);
        assert_eq!(Error::msg("boom").kind(), ErrorKind::Unclassified);
    }

    #[test]
    fn kind_labels_are_snake_case() {
        assert_eq!(ErrorKind::Blocked.label(), "blocked");
        assert_eq!(Error::InvalidInput.kind().label(), "invalid_input");
        assert_eq!(
            Error::VideoUnavailable("x".into()).kind().label(),
            "video_unavailable"
        );
    }

    #[test]
    fn timeout_message_mentions_seconds() {
        let err = Error::Timeout(Duration::from_secs(60));
        assert_eq!(err.to_string(), "timed out after 60s fetching transcript");
    }
}
