use metrics_util::AtomicBucket;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};
use vecload_core::TransactionLabels;

/// Transaction hook used by the `#[transaction]` macro. Not intended to be used manually.
pub async fn transaction_hook<T, R, E>(labels: TransactionLabels, func: T) -> T::Output
where
    T: Future<Output = Result<R, E>>,
{
    if let Ok(hook) = TRANSACTION_HOOK.try_with(|v| v.clone()) {
        let atomics = hook.entry(labels.name);

        let start = Instant::now();
        let res = func.await;
        let elapsed = start.elapsed();

        atomics.latency.push(elapsed);

        #[cfg(feature = "metrics")]
        metrics::histogram!(labels.latency).record(elapsed.as_secs_f64());

        if res.is_ok() {
            atomics.success.fetch_add(1, Ordering::Relaxed);

            #[cfg(feature = "metrics")]
            metrics::counter!(labels.success).increment(1);
        } else {
            atomics.error.fetch_add(1, Ordering::Relaxed);

            #[cfg(feature = "metrics")]
            metrics::counter!(labels.error).increment(1);
        }

        res
    } else {
        tracing::warn!("No transaction hook available for {}.", labels.name);
        func.await
    }
}

pub(crate) struct TransactionAtomics {
    success: AtomicU64,
    error: AtomicU64,
    latency: AtomicBucket<Duration>,
}

impl Default for TransactionAtomics {
    fn default() -> Self {
        Self {
            success: AtomicU64::new(0),
            error: AtomicU64::new(0),
            latency: AtomicBucket::new(),
        }
    }
}

impl TransactionAtomics {
    fn collect(&self) -> Collected {
        let success = self.success.swap(0, Ordering::Relaxed);
        let error = self.error.swap(0, Ordering::Relaxed);
        let mut latency = vec![];
        self.latency.clear_with(|dur| latency.extend_from_slice(dur));

        Collected {
            success,
            error,
            latency,
        }
    }
}

/// What a transaction recorded since the last collection.
#[derive(Debug, Default)]
pub(crate) struct Collected {
    pub success: u64,
    pub error: u64,
    pub latency: Vec<Duration>,
}

/// Counters shared by every user of a swarm, keyed by transaction name.
#[derive(Clone, Default)]
pub(crate) struct TransactionData {
    entries: Arc<RwLock<HashMap<&'static str, Arc<TransactionAtomics>>>>,
}

impl TransactionData {
    fn entry(&self, name: &'static str) -> Arc<TransactionAtomics> {
        {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(atomics) = entries.get(name) {
                return atomics.clone();
            }
        }

        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(name)
            .or_default()
            .clone()
    }

    /// Drain every transaction's counters. Transactions that recorded nothing are still listed.
    pub fn collect(&self) -> Vec<(&'static str, Collected)> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .iter()
            .map(|(name, atomics)| (*name, atomics.collect()))
            .collect()
    }
}

tokio::task_local! {
    pub(crate) static TRANSACTION_HOOK: TransactionData;
}
