//! Swarm runner
use crate::reporter::Reporter;
use crate::task::TaskSet;
use crate::transaction::{TransactionData, TRANSACTION_HOOK};
use crate::user::{User, UserContext};
use crate::wait::WaitTime;
use crate::Error;
use governor::{Quota, RateLimiter};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use reqwest::Client;
use std::{
    future::Future,
    marker::PhantomData,
    num::{NonZeroU32, NonZeroUsize},
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
    time::Duration,
};
use tokio::task::JoinSet;
#[allow(unused_imports)]
use tracing::{debug, error, info, info_span, instrument, trace, warn, Instrument};
use vecload_core::{RunStatistics, SwarmConfig, REPORT_INTERVAL};

type ShutdownSignal = Pin<Box<dyn Future<Output = ()> + Send>>;
type Runner = Pin<Box<dyn Future<Output = Result<RunStatistics, Error>> + Send>>;

/// A load test: a number of simulated users of type `U`, all hitting the same host.
///
/// Awaiting the swarm spawns the users at the configured spawn rate and runs them until the run
/// time elapses or the shutdown signal resolves.
///
/// # Example
/// ```no_run
/// use vecload::prelude::*;
/// use std::num::NonZeroUsize;
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() -> Result<(), vecload::Error> {
///     let stats = Swarm::<VectorUser>::new("vector")
///         .host("http://localhost:8080")
///         .users(NonZeroUsize::new(10).unwrap())
///         .run_time(Duration::from_secs(60))
///         .await?;
///     println!("{stats}");
///     Ok(())
/// }
/// ```
#[pin_project::pin_project]
pub struct Swarm<U: User> {
    config: SwarmConfig,
    tasks: Option<TaskSet<U::Task>>,
    shutdown: Option<ShutdownSignal>,
    runner_fut: Option<Runner>,
    _user: PhantomData<fn() -> U>,
}

impl<U: User> Swarm<U> {
    pub fn new(name: &str) -> Self {
        Self::from_config(SwarmConfig::new(name))
    }

    pub fn from_config(config: SwarmConfig) -> Self {
        Self {
            config,
            tasks: None,
            shutdown: None,
            runner_fut: None,
            _user: PhantomData,
        }
    }

    /// Base URL of the system under test, e.g. `http://localhost:8080`.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = Some(host.into());
        self
    }

    /// Number of users to spawn.
    pub fn users(mut self, users: NonZeroUsize) -> Self {
        self.config.users = users;
        self
    }

    /// Users started per second until all are running.
    pub fn spawn_rate(mut self, spawn_rate: NonZeroU32) -> Self {
        self.config.spawn_rate = spawn_rate;
        self
    }

    /// Stop after the given duration. Without it the swarm runs until the shutdown signal.
    pub fn run_time(mut self, run_time: Duration) -> Self {
        self.config.run_time = Some(run_time);
        self
    }

    /// Bounds of the pause between two tasks of a user.
    pub fn wait(mut self, min: Duration, max: Duration) -> Self {
        self.config.min_wait = min;
        self.config.max_wait = max;
        self
    }

    /// Override the user's default task weights.
    pub fn tasks(mut self, tasks: TaskSet<U::Task>) -> Self {
        self.tasks = Some(tasks);
        self
    }

    /// Stop the swarm once `signal` resolves.
    pub fn with_shutdown<F>(mut self, signal: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.shutdown = Some(Box::pin(signal));
        self
    }
}

impl<U: User> Future for Swarm<U> {
    type Output = Result<RunStatistics, Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let runner = this.runner_fut.get_or_insert_with(|| {
            Box::pin(run_swarm::<U>(
                this.config.clone(),
                this.tasks.take(),
                this.shutdown.take(),
            ))
        });
        runner.as_mut().poll(cx)
    }
}

#[instrument(name = "swarm", skip_all, fields(name = config.name))]
async fn run_swarm<U: User>(
    config: SwarmConfig,
    tasks: Option<TaskSet<U::Task>>,
    shutdown: Option<ShutdownSignal>,
) -> Result<RunStatistics, Error> {
    let host = config.validate()?;
    let wait = WaitTime::between(config.min_wait, config.max_wait)?;
    let tasks = Arc::new(match tasks {
        Some(tasks) => tasks,
        None => U::tasks()?,
    });
    let client = Client::builder().build()?;

    info!("Running {} with config {:?}", config.name, &config);

    let data = TransactionData::default();
    let mut reporter = Reporter::new(data.clone(), REPORT_INTERVAL);

    let spawner = RateLimiter::direct(
        Quota::per_second(config.spawn_rate).allow_burst(NonZeroU32::MIN),
    );
    let target_users = config.users.get();
    // Users are aborted when the set is dropped, even if the swarm future is.
    let mut users = JoinSet::new();
    let mut spawned = 0;

    let run_time = config.run_time;
    let deadline = async move {
        match run_time {
            Some(run_time) => tokio::time::sleep(run_time).await,
            None => std::future::pending().await,
        }
    };
    tokio::pin!(deadline);
    let mut shutdown = shutdown.unwrap_or_else(|| Box::pin(std::future::pending()));

    loop {
        tokio::select! {
            _ = &mut deadline => {
                info!("Run time elapsed.");
                break;
            }
            _ = &mut shutdown => {
                info!("Shutdown requested.");
                break;
            }
            _ = spawner.until_ready(), if spawned < target_users => {
                let ctx = UserContext::new(client.clone(), host.clone());
                spawn_user::<U>(&mut users, spawned, ctx, tasks.clone(), wait, data.clone());
                spawned += 1;
                if spawned == target_users {
                    info!("All {target_users} users spawned.");
                }
            }
            _ = reporter.tick() => {}
        }
    }

    users.shutdown().await;
    reporter.collect();

    info!("Swarm complete");

    Ok(reporter.statistics(&config.name, spawned))
}

fn spawn_user<U: User>(
    users: &mut JoinSet<()>,
    id: usize,
    ctx: UserContext,
    tasks: Arc<TaskSet<U::Task>>,
    wait: WaitTime,
    data: TransactionData,
) {
    debug!("Spawning user {id}");
    users.spawn(
        TRANSACTION_HOOK
            .scope(data, async move {
                let mut user = match U::on_start(ctx) {
                    Ok(user) => user,
                    Err(err) => {
                        error!("User failed to start: {err}");
                        return;
                    }
                };

                let mut rng = SmallRng::from_entropy();
                loop {
                    let task = tasks.pick(&mut rng);
                    trace!("Executing {task:?}");
                    user.execute(task).await;
                    tokio::time::sleep(wait.sample(&mut rng)).await;
                }
            })
            .instrument(info_span!("user", id)),
    );
}
