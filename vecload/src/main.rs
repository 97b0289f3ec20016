use anyhow::{anyhow, Context};
use clap::Parser;
use std::num::{NonZeroU32, NonZeroUsize};
use std::time::Duration;
use tracing::error;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use vecload::prelude::*;
use vecload::{
    SwarmConfig, DEFAULT_MAX_WAIT, DEFAULT_MIN_WAIT, DEFAULT_SPAWN_RATE, DEFAULT_USERS,
};

const DEFAULT_FILTER: &str = "vecload=info";

#[derive(Parser, Debug)]
#[command(version, about = "Load generator for the /vector/ endpoint")]
struct VecloadCli {
    /// Base URL of the system under test
    #[arg(short = 'H', long, env = "VECLOAD_HOST")]
    host: String,

    /// Number of simulated users
    #[arg(short, long, env = "VECLOAD_USERS", default_value_t = DEFAULT_USERS)]
    users: NonZeroUsize,

    /// Users started per second
    #[arg(short = 'r', long, env = "VECLOAD_SPAWN_RATE", default_value_t = DEFAULT_SPAWN_RATE)]
    spawn_rate: NonZeroU32,

    /// Stop after this long (`30s`, `5m`, ...). Runs until Ctrl-C otherwise
    #[arg(short = 't', long, env = "VECLOAD_RUN_TIME", value_parser = humantime::parse_duration)]
    run_time: Option<Duration>,

    /// Minimum wait between tasks, in milliseconds
    #[arg(long, env = "VECLOAD_MIN_WAIT", default_value_t = DEFAULT_MIN_WAIT.as_millis() as u64)]
    min_wait: u64,

    /// Maximum wait between tasks, in milliseconds
    #[arg(long, env = "VECLOAD_MAX_WAIT", default_value_t = DEFAULT_MAX_WAIT.as_millis() as u64)]
    max_wait: u64,

    /// Relative weights of the small, medium and large tasks
    #[arg(long, env = "VECLOAD_WEIGHTS", value_delimiter = ',', default_values_t = [1, 1, 1])]
    weights: Vec<u32>,

    /// Print the final statistics as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = VecloadCli::parse();

    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        )
        .init();

    let weights: [u32; 3] = args
        .weights
        .as_slice()
        .try_into()
        .map_err(|_| anyhow!("--weights takes exactly three values, got {:?}", args.weights))?;
    let tasks = VectorUser::task_set(weights).context("Invalid --weights")?;

    let mut config = SwarmConfig::new("vector");
    config.host = Some(args.host);
    config.users = args.users;
    config.spawn_rate = args.spawn_rate;
    config.run_time = args.run_time;
    config.min_wait = Duration::from_millis(args.min_wait);
    config.max_wait = Duration::from_millis(args.max_wait);

    let stats = Swarm::<VectorUser>::from_config(config)
        .tasks(tasks)
        .with_shutdown(ctrl_c())
        .await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("{stats}");
    }

    Ok(())
}

async fn ctrl_c() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Unable to listen for Ctrl-C: {err}");
        std::future::pending::<()>().await;
    }
}
