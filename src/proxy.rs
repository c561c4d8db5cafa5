//! Webshare rotating residential proxy credentials.

use std::fmt;

pub const WEBSHARE_USERNAME_ENV: &str = "WEBSHARE_USERNAME";
pub const WEBSHARE_PASSWORD_ENV: &str = "WEBSHARE_PASSWORD";

pub const WEBSHARE_DOMAIN: &str = "p.webshare.io";
pub const WEBSHARE_PORT: u16 = 80;

/// How many attempts a blocked lookup gets through the rotating proxy.
pub const DEFAULT_RETRIES_WHEN_BLOCKED: u32 = 10;

/// The Webshare rotating endpoint.
pub fn webshare_proxy_url() -> String {
    format!("http://{WEBSHARE_DOMAIN}:{WEBSHARE_PORT}")
}

/// Username/password pair for a Webshare account.
///
/// Built once at startup and handed to the YouTube client; never re-read per request.
#[derive(Clone, PartialEq, Eq)]
pub struct ProxyCredentials {
    username: String,
    password: String,
}

impl ProxyCredentials {
    /// Credentials are only present when both values are set and non-empty.
    pub fn from_vars(username: Option<String>, password: Option<String>) -> Option<Self> {
        let username = username.filter(|u| !u.trim().is_empty())?;
        let password = password.filter(|p| !p.trim().is_empty())?;
        Some(Self { username, password })
    }

    /// Webshare rotates the exit IP per connection for `<username>-rotate`.
    pub fn rotating_username(&self) -> String {
        format!("{}-rotate", self.username)
    }

    /// A reqwest proxy for `proxy_url`, authenticated with the rotating username.
    pub fn to_reqwest(&self, proxy_url: &str) -> reqwest::Result<reqwest::Proxy> {
        let proxy = reqwest::Proxy::all(proxy_url)?;
        Ok(proxy.basic_auth(&self.rotating_username(), &self.password))
    }
}

impl fmt::Debug for ProxyCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
