//! High-level API for serving transcripts.
//!
//! We expose a single entry point (`TubeScribe`) that wires identifier resolution →
//! fetch with language fallback → response assembly, while keeping each step testable in
//! its own module.
//!
//! The intent is:
//! - We build the retrieval source once (HTTP client, proxy settings).
//! - We share it read-only across concurrent requests.
//! - Every request is bounded by `Opts::fetch_timeout`.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::fetcher::fetch_with_fallback;
use crate::opts::Opts;
use crate::response::{TranscriptDocument, assemble};
use crate::source::TranscriptSource;
use crate::video_id;
use crate::youtube::YouTubeClient;
use crate::{Error, Result};

/// Language used when the caller does not ask for one.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Owns the long-lived retrieval resources.
///
/// Cloning is cheap; clones share the same source.
#[derive(Clone)]
pub struct TubeScribe {
    source: Arc<dyn TranscriptSource>,
    fetch_timeout: Duration,
    proxy_enabled: bool,
}

impl TubeScribe {
    /// Create an instance backed by [`YouTubeClient`].
    pub fn new(opts: &Opts) -> Result<Self> {
        let client = YouTubeClient::from_opts(opts)?;
        Ok(Self::with_source(Arc::new(client), opts))
    }

    /// Create an instance using a custom source.
    pub fn with_source(source: Arc<dyn TranscriptSource>, opts: &Opts) -> Self {
        Self {
            source,
            fetch_timeout: opts.fetch_timeout,
            proxy_enabled: opts.proxy_enabled(),
        }
    }

    pub fn proxy_enabled(&self) -> bool {
        self.proxy_enabled
    }

    /// Resolve `input`, fetch its transcript in `language` (or whatever is available), and
    /// build the response document.
    pub async fn transcript(&self, input: &str, language: &str) -> Result<TranscriptDocument> {
        let video_id = video_id::resolve(input)?;
        debug!(%video_id, language, "resolved video id");

        let fetch = fetch_with_fallback(self.source.as_ref(), &video_id, language);
        let track = tokio::time::timeout(self.fetch_timeout, fetch)
            .await
            .map_err(|_| Error::Timeout(self.fetch_timeout))??;

        Ok(assemble(&video_id, &track))
    }
}

impl std::fmt::Debug for TubeScribe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TubeScribe")
            .field("fetch_timeout", &self.fetch_timeout)
            .field("proxy_enabled", &self.proxy_enabled)
            .finish_non_exhaustive()
    }
}
