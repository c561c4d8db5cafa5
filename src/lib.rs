//! `tubescribe` — serve YouTube caption tracks as structured JSON.
//!
//! This crate provides:
//! - Video ID resolution from raw IDs or YouTube URLs
//! - Transcript retrieval with a fallback to any available caption track
//! - A pluggable retrieval source, with a built-in YouTube client that can run
//!   through a Webshare rotating proxy
//! - The JSON response documents and the HTTP error mapping
//! - An axum router exposing all of the above (`server` feature)

// High-level API (most consumers should start here).
pub mod opts;
pub mod tubescribe;

// Pipeline steps.
pub mod fetcher;
pub mod response;
pub mod video_id;

// Data model and retrieval.
pub mod proxy;
pub mod source;
pub mod transcript;
pub mod youtube;

pub mod error;
pub mod output_type;

#[cfg(feature = "cli")]
pub mod cli;

// Logging configuration and control.
#[cfg(feature = "logging")]
pub mod logging;

#[cfg(feature = "server")]
pub mod server;

pub use error::{Error, ErrorKind, Result};
pub use opts::Opts;
pub use source::TranscriptSource;
pub use transcript::{Snippet, TrackHandle, TranscriptTrack};
pub use tubescribe::TubeScribe;
pub use youtube::YouTubeClient;

#[cfg(feature = "logging")]
pub use logging::init as init_logging;
