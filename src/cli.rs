use std::time::Duration;

use clap::Args;

use crate::opts::Opts;
use crate::proxy::{
    DEFAULT_RETRIES_WHEN_BLOCKED, ProxyCredentials, WEBSHARE_PASSWORD_ENV, WEBSHARE_USERNAME_ENV,
};

/// Retrieval flags shared by every binary.
#[derive(Args, Debug, Clone)]
pub struct FetchArgs {
    /// Webshare proxy username. The proxy is only used when the password is set too.
    #[arg(long = "webshare-username", env = WEBSHARE_USERNAME_ENV, hide_env_values = true)]
    pub webshare_username: Option<String>,

    /// Webshare proxy password.
    #[arg(long = "webshare-password", env = WEBSHARE_PASSWORD_ENV, hide_env_values = true)]
    pub webshare_password: Option<String>,

    /// Upper bound on one transcript fetch, fallback included (seconds).
    #[arg(long = "fetch-timeout-secs", default_value_t = 60)]
    pub fetch_timeout_secs: u64,

    /// Upper bound on each HTTP call to YouTube (seconds).
    #[arg(long = "request-timeout-secs", default_value_t = 15)]
    pub request_timeout_secs: u64,

    /// Retries for blocked lookups when going through the proxy.
    #[arg(long = "retries-when-blocked", default_value_t = DEFAULT_RETRIES_WHEN_BLOCKED)]
    pub retries_when_blocked: u32,
}

impl FetchArgs {
    pub fn to_opts(&self) -> Opts {
        Opts {
            proxy: ProxyCredentials::from_vars(
                self.webshare_username.clone(),
                self.webshare_password.clone(),
            ),
            fetch_timeout: Duration::from_secs(self.fetch_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            retries_when_blocked: self.retries_when_blocked,
        }
    }
}
