#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tubescribe::{Error, Result, Snippet, TrackHandle, TranscriptSource, TranscriptTrack};

/// How a [`MockSource`] answers every call.
#[derive(Debug, Clone)]
pub enum Behavior {
    /// Serve the listed tracks.
    Tracks(Vec<TrackHandle>),
    TranscriptsDisabled,
    VideoUnavailable,
    Blocked,
    Fail(String),
    /// Never answer in time.
    Hang,
}

pub struct MockSource {
    behavior: Behavior,
    list_calls: AtomicUsize,
    fetched_ids: Mutex<Vec<String>>,
}

impl MockSource {
    pub fn new(behavior: Behavior) -> Self {
        Self {
            behavior,
            list_calls: AtomicUsize::new(0),
            fetched_ids: Mutex::new(Vec::new()),
        }
    }

    pub fn with_tracks(codes: &[&str]) -> Self {
        Self::new(Behavior::Tracks(codes.iter().map(|c| handle(c)).collect()))
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn fetched_ids(&self) -> Vec<String> {
        self.fetched_ids.lock().expect("fetched ids lock").clone()
    }

    async fn check(&self, video_id: &str) -> Result<&[TrackHandle]> {
        self.fetched_ids
            .lock()
            .expect("fetched ids lock")
            .push(video_id.to_owned());

        match &self.behavior {
            Behavior::Tracks(tracks) => Ok(tracks.as_slice()),
            Behavior::TranscriptsDisabled => Err(Error::TranscriptsDisabled(video_id.into())),
            Behavior::VideoUnavailable => Err(Error::VideoUnavailable(video_id.into())),
            Behavior::Blocked => Err(Error::RequestBlocked(video_id.into())),
            Behavior::Fail(message) => Err(Error::Message(message.clone())),
            Behavior::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(Error::Message("unreachable".into()))
            }
        }
    }
}

pub fn handle(code: &str) -> TrackHandle {
    TrackHandle {
        video_id: "dQw4w9WgXcQ".into(),
        language: format!("Language {code}"),
        language_code: code.into(),
        is_generated: code.ends_with("-auto"),
        is_translatable: true,
        url: format!("mock://{code}"),
    }
}

pub fn track_for(video_id: &str, handle: &TrackHandle) -> TranscriptTrack {
    TranscriptTrack {
        video_id: video_id.to_owned(),
        language: handle.language.clone(),
        language_code: handle.language_code.clone(),
        is_generated: handle.is_generated,
        snippets: vec![
            Snippet {
                text: "Never gonna".into(),
                start: 0.123_456,
                duration: 1.987_654,
            },
            Snippet {
                text: "give you up".into(),
                start: 2.111,
                duration: 3.0,
            },
        ],
    }
}

#[async_trait]
impl TranscriptSource for MockSource {
    async fn fetch(&self, video_id: &str, languages: &[&str]) -> Result<TranscriptTrack> {
        let tracks = self.check(video_id).await?;
        languages
            .iter()
            .find_map(|lang| tracks.iter().find(|t| t.language_code == *lang))
            .map(|h| track_for(video_id, h))
            .ok_or_else(|| Error::NoTranscriptFound {
                video_id: video_id.to_owned(),
                languages: languages.iter().map(|l| (*l).to_owned()).collect(),
            })
    }

    async fn list(&self, video_id: &str) -> Result<Vec<TrackHandle>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.check(video_id).await?.to_vec())
    }

    async fn fetch_track(&self, track: &TrackHandle) -> Result<TranscriptTrack> {
        Ok(track_for(&track.video_id, track))
    }
}
