//! Simulated users.
use crate::{task::TaskSet, Error};
use reqwest::Client;
use std::fmt;
use std::future::Future;
use url::Url;
use vecload_core::ConfigError;

/// Everything a user gets from the swarm when it starts.
#[derive(Clone, Debug)]
pub struct UserContext {
    pub client: Client,
    pub host: Url,
}

impl UserContext {
    pub fn new(client: Client, host: Url) -> Self {
        Self { client, host }
    }
}

/// One virtual client of a load test.
///
/// A user is created by [`User::on_start`] when the swarm spawns it, then repeatedly executes a
/// task picked from [`User::tasks`], waiting between tasks. Execution within one user is strictly
/// sequential. The user is dropped when the swarm stops.
pub trait User: Send + Sized + 'static {
    type Task: Copy + fmt::Debug + Send + Sync + 'static;

    fn on_start(ctx: UserContext) -> Result<Self, Error>;

    /// Default task weights, used unless the swarm is given its own [`TaskSet`].
    fn tasks() -> Result<TaskSet<Self::Task>, ConfigError>;

    /// Run one task. Failures are recorded by the transactions the task calls.
    fn execute(&mut self, task: Self::Task) -> impl Future<Output = ()> + Send;
}
