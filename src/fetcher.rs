use tracing::{debug, info};

use crate::source::TranscriptSource;
use crate::transcript::TranscriptTrack;
use crate::{Error, Result};

/// Fetch a track in `language`, falling back to the first listed track when that language
/// does not exist.
///
/// Only `NoTranscriptFound` triggers the fallback. Every other failure, from either step, is
/// returned untouched.
pub async fn fetch_with_fallback(
    source: &dyn TranscriptSource,
    video_id: &str,
    language: &str,
) -> Result<TranscriptTrack> {
    match source.fetch(video_id, &[language]).await {
        Ok(track) => {
            debug!(video_id, language, "fetched transcript in requested language");
            Ok(track)
        }
        Err(Error::NoTranscriptFound { .. }) => {
            let tracks = source.list(video_id).await?;
            let Some(first) = tracks.first() else {
                return Err(Error::NoTranscriptFound {
                    video_id: video_id.to_owned(),
                    languages: vec![language.to_owned()],
                });
            };

            info!(
                video_id,
                requested = language,
                fallback = %first.language_code,
                available = tracks.len(),
                "requested language missing, falling back to first listed track"
            );
            source.fetch_track(first).await
        }
        Err(err) => Err(err),
    }
}
