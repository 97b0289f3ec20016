use std::num::{NonZeroU32, NonZeroUsize};
use std::time::Duration;

/// Route every vector transaction posts to.
pub const VECTOR_PATH: &str = "/vector/";

/// Length of the random vectors generated for each user. Payloads are prefixes of these.
pub const VECTOR_LEN: usize = 1000;

/// Default lower bound of the wait between two tasks of the same user.
pub const DEFAULT_MIN_WAIT: Duration = Duration::from_millis(1000);

/// Default upper bound of the wait between two tasks of the same user.
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_millis(2000);

pub const DEFAULT_USERS: NonZeroUsize = NonZeroUsize::MIN;

/// Users started per second.
pub const DEFAULT_SPAWN_RATE: NonZeroU32 = NonZeroU32::MIN;

/// How often the swarm drains transaction atomics and logs a summary.
pub const REPORT_INTERVAL: Duration = Duration::from_secs(2);
