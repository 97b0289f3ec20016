//! The user driving the `/vector/` endpoint.
use crate::payload::{PayloadSet, PayloadSize};
use crate::task::TaskSet;
use crate::transaction;
use crate::user::{User, UserContext};
use crate::Error;
use reqwest::Client;
use url::Url;
#[allow(unused)]
use tracing::{debug, error, info, trace, warn};
use vecload_core::{endpoint, ConfigError, VECTOR_PATH};

/// Relative weights of the small, medium and large tasks.
pub const DEFAULT_WEIGHTS: [u32; 3] = [1, 1, 1];

/// Posts one of three pre-serialized payloads to `/vector/` on every task.
pub struct VectorUser {
    client: Client,
    endpoint: Url,
    payloads: PayloadSet,
}

impl VectorUser {
    pub fn new(ctx: UserContext) -> Result<Self, Error> {
        let endpoint = endpoint(&ctx.host, VECTOR_PATH)?;
        let payloads = PayloadSet::generate(&mut rand::thread_rng())?;
        debug!("User started against {endpoint}");

        Ok(Self {
            client: ctx.client,
            endpoint,
            payloads,
        })
    }

    /// Task set with custom `[small, medium, large]` weights.
    pub fn task_set(weights: [u32; 3]) -> Result<TaskSet<PayloadSize>, ConfigError> {
        TaskSet::new(PayloadSize::ALL.into_iter().zip(weights))
    }

    pub fn payloads(&self) -> &PayloadSet {
        &self.payloads
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    #[transaction]
    pub async fn send_small_payload(&self) -> Result<(), reqwest::Error> {
        self.post(PayloadSize::Small).await
    }

    #[transaction]
    pub async fn send_medium_payload(&self) -> Result<(), reqwest::Error> {
        self.post(PayloadSize::Medium).await
    }

    #[transaction]
    pub async fn send_large_payload(&self) -> Result<(), reqwest::Error> {
        self.post(PayloadSize::Large).await
    }

    async fn post(&self, size: PayloadSize) -> Result<(), reqwest::Error> {
        self.client
            .post(self.endpoint.clone())
            .body(self.payloads.get(size).to_owned())
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

impl User for VectorUser {
    type Task = PayloadSize;

    fn on_start(ctx: UserContext) -> Result<Self, Error> {
        Self::new(ctx)
    }

    fn tasks() -> Result<TaskSet<PayloadSize>, ConfigError> {
        Self::task_set(DEFAULT_WEIGHTS)
    }

    async fn execute(&mut self, task: PayloadSize) {
        let res = match task {
            PayloadSize::Small => self.send_small_payload().await,
            PayloadSize::Medium => self.send_medium_payload().await,
            PayloadSize::Large => self.send_large_payload().await,
        };

        if let Err(err) = res {
            trace!("{task} payload failed: {err}");
        }
    }
}
