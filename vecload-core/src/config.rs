use crate::{
    ConfigError, DEFAULT_MAX_WAIT, DEFAULT_MIN_WAIT, DEFAULT_SPAWN_RATE, DEFAULT_USERS,
};
use serde::Serialize;
use serde_with::{serde_as, DurationMilliSeconds, DurationSeconds};
use std::num::{NonZeroU32, NonZeroUsize};
use std::time::Duration;
use url::Url;

/// Everything a swarm needs to know before it starts.
#[serde_as]
#[derive(Clone, Debug, Serialize)]
pub struct SwarmConfig {
    pub name: String,
    pub host: Option<String>,
    pub users: NonZeroUsize,
    pub spawn_rate: NonZeroU32,
    #[serde_as(as = "Option<DurationSeconds>")]
    pub run_time: Option<Duration>,
    #[serde_as(as = "DurationMilliSeconds")]
    pub min_wait: Duration,
    #[serde_as(as = "DurationMilliSeconds")]
    pub max_wait: Duration,
}

impl SwarmConfig {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            host: None,
            users: DEFAULT_USERS,
            spawn_rate: DEFAULT_SPAWN_RATE,
            run_time: None,
            min_wait: DEFAULT_MIN_WAIT,
            max_wait: DEFAULT_MAX_WAIT,
        }
    }

    /// Check everything that can be checked before users are spawned.
    pub fn validate(&self) -> Result<Url, ConfigError> {
        if self.min_wait > self.max_wait {
            return Err(ConfigError::InvertedWait {
                min: self.min_wait,
                max: self.max_wait,
            });
        }
        self.base_url()
    }

    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let host = self.host.as_deref().ok_or(ConfigError::MissingHost)?;
        parse_host(host)
    }
}

/// Parse a host such as `http://localhost:8080` into a base URL that paths can be joined onto.
pub fn parse_host(host: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(host)?;
    if !matches!(url.scheme(), "http" | "https") || url.host().is_none() {
        return Err(ConfigError::UnsupportedHost(host.to_string()));
    }
    Ok(url)
}

/// Resolve `path` against the host. The host's own path is kept as a prefix, so
/// `http://h/api` + `/vector/` becomes `http://h/api/vector/`.
pub fn endpoint(base: &Url, path: &str) -> Result<Url, ConfigError> {
    let joined = format!("{}{}", base.as_str().trim_end_matches('/'), path);
    Ok(Url::parse(&joined)?)
}
