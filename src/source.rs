use async_trait::async_trait;

use crate::Result;
use crate::transcript::{TrackHandle, TranscriptTrack};

/// Pluggable caption retrieval used by [`crate::TubeScribe`].
///
/// A source is responsible for talking to YouTube (directly or through a proxy) and turning
/// caption data into [`TranscriptTrack`]s. Implementations must report the well-known failure
/// signals as their matching [`crate::Error`] variants:
/// - `NoTranscriptFound` when none of the requested languages exist
/// - `TranscriptsDisabled`, `VideoUnavailable`
/// - `RequestBlocked` / `IpBlocked`
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Fetch the first track matching `languages`, in priority order.
    async fn fetch(&self, video_id: &str, languages: &[&str]) -> Result<TranscriptTrack>;

    /// List every track available for a video.
    ///
    /// The order is whatever the source considers natural; callers must not assume a ranking.
    async fn list(&self, video_id: &str) -> Result<Vec<TrackHandle>>;

    /// Fetch a track previously returned by [`TranscriptSource::list`].
    async fn fetch_track(&self, track: &TrackHandle) -> Result<TranscriptTrack>;
}
