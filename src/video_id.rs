//! Turning user input into a YouTube video ID.

use std::sync::LazyLock;

use regex::Regex;

use crate::{Error, Result};

static VIDEO_ID_IN_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:v=|youtu\.be/)([a-zA-Z0-9_-]{11})").expect("video ID pattern must compile")
});

/// Resolve a raw video ID or a YouTube URL into a video ID.
///
/// Anything mentioning `youtube.com` or `youtu.be` is treated as a URL and must contain an
/// 11-character ID after `v=` or `youtu.be/`. Anything else is taken as a raw ID and only
/// trimmed; a bogus raw ID surfaces later as a fetch failure.
pub fn resolve(input: &str) -> Result<String> {
    if input.contains("youtube.com") || input.contains("youtu.be") {
        return VIDEO_ID_IN_URL
            .captures(input)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_owned())
            .ok_or(Error::InvalidInput);
    }

    Ok(input.trim().to_owned())
}
