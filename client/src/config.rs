//! Client configuration loaded via OrthoConfig.

use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::domain::OrderingPolicy;

/// Backend root used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/";
const DEFAULT_SESSION_DIR: &str = ".codelab";

/// Configuration values for the command-line client.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CODELAB")]
pub struct ClientSettings {
    /// Backend root that endpoint paths are joined onto.
    pub base_url: Option<String>,
    /// Directory holding the persisted session record.
    pub session_dir: Option<PathBuf>,
    /// Optional per-request timeout in seconds; unset or zero waits forever.
    pub request_timeout_secs: Option<u64>,
    /// Drop responses superseded by a newer invocation.
    #[ortho_config(default = false)]
    pub discard_stale_responses: bool,
}

impl ClientSettings {
    /// Return the configured backend root, falling back to the default.
    ///
    /// # Errors
    ///
    /// Returns the parse error when the configured value is not a URL.
    pub fn base_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL))
    }

    /// Return the configured session directory, falling back to the default.
    #[must_use]
    pub fn session_dir(&self) -> PathBuf {
        self.session_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_DIR))
    }

    /// Return the request timeout, if one applies.
    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// Ordering policy for the shared output region.
    #[must_use]
    pub const fn ordering_policy(&self) -> OrderingPolicy {
        if self.discard_stale_responses {
            OrderingPolicy::LatestInvocation
        } else {
            OrderingPolicy::LastArrival
        }
    }
}
