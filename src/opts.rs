use std::time::Duration;

use crate::proxy::{DEFAULT_RETRIES_WHEN_BLOCKED, ProxyCredentials};

/// Options that control how transcripts are retrieved.
///
/// This struct represents *library-level configuration*, not CLI flags directly.
/// The binaries map their arguments and environment into this type so other frontends
/// (tests, embedding services) can construct it programmatically.
#[derive(Debug, Clone)]
pub struct Opts {
    /// Webshare credentials. When set, every outbound YouTube request is proxied.
    pub proxy: Option<ProxyCredentials>,

    /// Upper bound on one whole transcript fetch, fallback and blocked-retries included.
    pub fetch_timeout: Duration,

    /// Upper bound on each individual HTTP call to YouTube.
    pub request_timeout: Duration,

    /// How many attempts a blocked lookup gets. Only honoured when a proxy is configured;
    /// without one a lookup is attempted once.
    pub retries_when_blocked: u32,
}

impl Opts {
    pub fn proxy_enabled(&self) -> bool {
        self.proxy.is_some()
    }
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            proxy: None,
            fetch_timeout: Duration::from_secs(60),
            request_timeout: Duration::from_secs(15),
            retries_when_blocked: DEFAULT_RETRIES_WHEN_BLOCKED,
        }
    }
}
