use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("A task set needs at least one task.")]
    NoTasks,

    #[error("Every task in the set has a weight of zero.")]
    ZeroWeights,

    #[error("Minimum wait {min:?} is larger than maximum wait {max:?}.")]
    InvertedWait { min: Duration, max: Duration },

    #[error("Invalid host: {0}")]
    InvalidHost(#[from] url::ParseError),

    #[error("Host `{0}` must be an absolute http(s) URL.")]
    UnsupportedHost(String),

    #[error("No host configured.")]
    MissingHost,
}
