#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

// Lets `#[transaction]` expand to `::vecload::...` inside this crate as well.
extern crate self as vecload;

pub mod payload;
pub mod swarm;
pub mod task;
#[doc(hidden)]
pub mod transaction;
pub mod user;
pub mod vector_user;
pub mod wait;

mod error;
mod reporter;

pub use error::Error;
pub use swarm::Swarm;
pub use vecload_core::{
    endpoint, generate_labels, parse_host, ConfigError, RunStatistics, SwarmConfig,
    TransactionLabels, TransactionStats, DEFAULT_MAX_WAIT, DEFAULT_MIN_WAIT, DEFAULT_SPAWN_RATE,
    DEFAULT_USERS, VECTOR_PATH,
};
pub use vecload_macros::transaction;

pub mod prelude {
    pub use crate::payload::{Op, Payload, PayloadSet, PayloadSize};
    pub use crate::swarm::Swarm;
    pub use crate::task::TaskSet;
    pub use crate::user::{User, UserContext};
    pub use crate::vector_user::VectorUser;
    pub use crate::wait::WaitTime;
    pub use vecload_core::{RunStatistics, TransactionStats};
    pub use vecload_macros::transaction;
}
