//! A [`TranscriptSource`] backed by YouTube's own web endpoints.
//!
//! Retrieval goes watch page → InnerTube player API → timedtext XML:
//! - the watch page yields the InnerTube API key (and tells us about consent walls and
//!   captchas)
//! - the player response carries playability status and the caption track list
//! - each caption track URL serves the cues as XML (see [`captions`])

pub mod captions;

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::header::{self, HeaderMap, HeaderValue};
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::opts::Opts;
use crate::proxy::{self, ProxyCredentials};
use crate::source::TranscriptSource;
use crate::transcript::{TrackHandle, TranscriptTrack};
use crate::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "https://www.youtube.com";

const CONSENT_FORM_MARKER: &str = "action=\"https://consent.youtube.com/s\"";
const RECAPTCHA_MARKER: &str = "class=\"g-recaptcha\"";
const INNERTUBE_CLIENT_NAME: &str = "ANDROID";
const INNERTUBE_CLIENT_VERSION: &str = "20.10.38";

static INNERTUBE_API_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""INNERTUBE_API_KEY":\s*"([a-zA-Z0-9_-]+)""#)
        .expect("api key pattern must compile")
});

static CONSENT_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"name="v" value="(.*?)""#).expect("consent pattern must compile")
});

/// Builder for [`YouTubeClient`].
#[derive(Debug, Clone)]
pub struct YouTubeClientBuilder {
    base_url: String,
    proxy: Option<ProxyCredentials>,
    proxy_url: String,
    request_timeout: Duration,
    retries_when_blocked: u32,
}

impl YouTubeClientBuilder {
    /// Point the client at another host. Used to test against a local mock server.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    pub fn proxy(mut self, proxy: Option<ProxyCredentials>) -> Self {
        self.proxy = proxy;
        self
    }

    /// Send proxied traffic somewhere other than Webshare's rotating endpoint.
    pub fn proxy_url(mut self, proxy_url: impl Into<String>) -> Self {
        self.proxy_url = proxy_url.into();
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn retries_when_blocked(mut self, retries: u32) -> Self {
        self.retries_when_blocked = retries;
        self
    }

    pub fn build(self) -> Result<YouTubeClient> {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_static("en-US"));

        let mut http = reqwest::Client::builder().timeout(self.request_timeout);

        // Retrying from the same IP is pointless, so only the proxy gets extra attempts.
        let attempts_when_blocked = match &self.proxy {
            Some(proxy) => {
                // Closing each connection makes the rotating proxy hand out a fresh IP.
                headers.insert(header::CONNECTION, HeaderValue::from_static("close"));
                http = http.proxy(proxy.to_reqwest(&self.proxy_url)?);
                self.retries_when_blocked.max(1)
            }
            None => 1,
        };

        let http = http.default_headers(headers).build()?;

        Ok(YouTubeClient {
            http,
            base_url: self.base_url,
            attempts_when_blocked,
        })
    }
}

impl Default for YouTubeClientBuilder {
    fn default() -> Self {
        let opts = Opts::default();
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            proxy: None,
            proxy_url: proxy::webshare_proxy_url(),
            request_timeout: opts.request_timeout,
            retries_when_blocked: opts.retries_when_blocked,
        }
    }
}

/// Fetches caption tracks straight from YouTube, optionally through a Webshare proxy.
#[derive(Debug, Clone)]
pub struct YouTubeClient {
    http: reqwest::Client,
    base_url: String,
    attempts_when_blocked: u32,
}

impl YouTubeClient {
    pub fn builder() -> YouTubeClientBuilder {
        YouTubeClientBuilder::default()
    }

    /// Build a client from library options.
    pub fn from_opts(opts: &Opts) -> Result<Self> {
        Self::builder()
            .proxy(opts.proxy.clone())
            .request_timeout(opts.request_timeout)
            .retries_when_blocked(opts.retries_when_blocked)
            .build()
    }

    /// List tracks, retrying blocked lookups until `attempts_when_blocked` is used up.
    async fn list_tracks(&self, video_id: &str) -> Result<Vec<TrackHandle>> {
        let mut attempt = 1;
        loop {
            match self.list_tracks_once(video_id).await {
                Err(err) if err.is_blocked() && attempt < self.attempts_when_blocked => {
                    warn!(
                        video_id,
                        attempt,
                        max = self.attempts_when_blocked,
                        error = %err,
                        "blocked by YouTube, retrying through a new proxy IP"
                    );
                    attempt += 1;
                }
                res => return res,
            }
        }
    }

    async fn list_tracks_once(&self, video_id: &str) -> Result<Vec<TrackHandle>> {
        let html = self.fetch_watch_page(video_id).await?;
        let api_key = extract_api_key(&html, video_id)?;
        let player = self.fetch_player(video_id, &api_key).await?;
        extract_tracks(video_id, &player)
    }

    async fn fetch_watch_page(&self, video_id: &str) -> Result<String> {
        let url = format!("{}/watch?v={}", self.base_url, video_id);
        debug!(%url, "fetching watch page");

        let html = self.get_text(&url, video_id, None).await?;
        if !html.contains(CONSENT_FORM_MARKER) {
            return Ok(html);
        }

        let consent = CONSENT_VALUE
            .captures(&html)
            .and_then(|caps| caps.get(1))
            .map(|m| format!("CONSENT=YES+{}", m.as_str()))
            .ok_or_else(|| consent_error(video_id))?;

        debug!(video_id, "accepting consent form and retrying watch page");
        let html = self.get_text(&url, video_id, Some(&consent)).await?;
        if html.contains(CONSENT_FORM_MARKER) {
            return Err(consent_error(video_id));
        }

        Ok(html)
    }

    async fn fetch_player(&self, video_id: &str, api_key: &str) -> Result<Value> {
        let url = format!("{}/youtubei/v1/player?key={}", self.base_url, api_key);
        let body = json!({
            "context": {
                "client": {
                    "clientName": INNERTUBE_CLIENT_NAME,
                    "clientVersion": INNERTUBE_CLIENT_VERSION,
                }
            },
            "videoId": video_id,
        });

        let response = self.http.post(&url).json(&body).send().await?;
        let response = check_status(response, video_id)?;
        response
            .json::<Value>()
            .await
            .map_err(|err| Error::parse(video_id, format!("invalid player response: {err}")))
    }

    async fn get_text(&self, url: &str, video_id: &str, cookie: Option<&str>) -> Result<String> {
        let mut request = self.http.get(url);
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }

        let response = check_status(request.send().await?, video_id)?;
        Ok(response.text().await?)
    }
}

#[async_trait]
impl TranscriptSource for YouTubeClient {
    async fn fetch(&self, video_id: &str, languages: &[&str]) -> Result<TranscriptTrack> {
        let tracks = self.list_tracks(video_id).await?;
        let track = find_track(&tracks, languages).ok_or_else(|| Error::NoTranscriptFound {
            video_id: video_id.to_owned(),
            languages: languages.iter().map(|l| (*l).to_owned()).collect(),
        })?;

        self.fetch_track(track).await
    }

    async fn list(&self, video_id: &str) -> Result<Vec<TrackHandle>> {
        self.list_tracks(video_id).await
    }

    async fn fetch_track(&self, track: &TrackHandle) -> Result<TranscriptTrack> {
        if track.url.contains("&exp=xpe") {
            return Err(Error::PoTokenRequired(track.video_id.clone()));
        }

        debug!(
            video_id = %track.video_id,
            language_code = %track.language_code,
            "fetching caption track"
        );
        let xml = self.get_text(&track.url, &track.video_id, None).await?;
        let snippets =
            captions::parse(&xml).map_err(|message| Error::parse(&track.video_id, message))?;

        Ok(TranscriptTrack {
            video_id: track.video_id.clone(),
            language: track.language.clone(),
            language_code: track.language_code.clone(),
            is_generated: track.is_generated,
            snippets,
        })
    }
}

fn check_status(response: reqwest::Response, video_id: &str) -> Result<reqwest::Response> {
    let status = response.status();
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(Error::IpBlocked(video_id.to_owned()));
    }
    if !status.is_success() {
        return Err(Error::msg(format!(
            "YouTube responded with HTTP {} for video {video_id}",
            status
        )));
    }
    Ok(response)
}

fn consent_error(video_id: &str) -> Error {
    Error::msg(format!(
        "failed to create consent cookie for video {video_id}"
    ))
}

fn extract_api_key(html: &str, video_id: &str) -> Result<String> {
    if html.contains(RECAPTCHA_MARKER) {
        return Err(Error::IpBlocked(video_id.to_owned()));
    }

    INNERTUBE_API_KEY
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_owned())
        .ok_or_else(|| Error::parse(video_id, "watch page has no InnerTube API key"))
}

fn assert_playability(video_id: &str, player: &Value) -> Result<()> {
    let Some(playability) = player.get("playabilityStatus") else {
        return Ok(());
    };

    let status = playability
        .get("status")
        .and_then(Value::as_str)
        .unwrap_or("");
    if status == "OK" {
        return Ok(());
    }

    let reason = playability
        .get("reason")
        .and_then(Value::as_str)
        .unwrap_or("");

    match status {
        "LOGIN_REQUIRED" if reason.contains("not a bot") => {
            Err(Error::RequestBlocked(video_id.to_owned()))
        }
        "LOGIN_REQUIRED" if reason.contains("inappropriate for some users") => {
            Err(Error::AgeRestricted(video_id.to_owned()))
        }
        "ERROR" if reason.contains("unavailable") => {
            Err(Error::VideoUnavailable(video_id.to_owned()))
        }
        _ => Err(Error::VideoUnplayable {
            video_id: video_id.to_owned(),
            reason: reason.to_owned(),
        }),
    }
}

/// Read the caption track list out of an InnerTube player response.
///
/// Human-authored tracks come first, then generated ones, each in YouTube's order.
fn extract_tracks(video_id: &str, player: &Value) -> Result<Vec<TrackHandle>> {
    assert_playability(video_id, player)?;

    let caption_tracks = player
        .pointer("/captions/playerCaptionsTracklistRenderer/captionTracks")
        .and_then(Value::as_array)
        .ok_or_else(|| Error::TranscriptsDisabled(video_id.to_owned()))?;

    let (manual, generated): (Vec<TrackHandle>, Vec<TrackHandle>) = caption_tracks
        .iter()
        .filter_map(|caption| track_handle(video_id, caption))
        .partition(|track| !track.is_generated);

    if manual.is_empty() && generated.is_empty() {
        return Err(Error::TranscriptsDisabled(video_id.to_owned()));
    }

    Ok(manual.into_iter().chain(generated).collect())
}

fn track_handle(video_id: &str, caption: &Value) -> Option<TrackHandle> {
    let language_code = caption.get("languageCode")?.as_str()?.to_owned();
    let url = caption
        .get("baseUrl")?
        .as_str()?
        .replace("&fmt=srv3", "");

    let language = caption
        .get("name")
        .and_then(|name| {
            name.pointer("/runs/0/text")
                .or_else(|| name.get("simpleText"))
                .and_then(Value::as_str)
        })
        .unwrap_or(&language_code)
        .to_owned();

    Some(TrackHandle {
        video_id: video_id.to_owned(),
        language,
        is_generated: caption.get("kind").and_then(Value::as_str) == Some("asr"),
        is_translatable: caption
            .get("isTranslatable")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        language_code,
        url,
    })
}

/// First track matching the earliest language in `languages`, human-authored before generated.
fn find_track<'a>(tracks: &'a [TrackHandle], languages: &[&str]) -> Option<&'a TrackHandle> {
    languages.iter().find_map(|lang| {
        tracks
            .iter()
            .filter(|t| t.language_code == *lang)
            .min_by_key(|t| t.is_generated)
    })
}
