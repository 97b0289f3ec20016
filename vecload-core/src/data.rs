use crate::TransactionStats;
use pdatastructs::tdigest::{TDigest, K1};
use std::time::Duration;

const TDIGEST_BACKLOG_SIZE: usize = 100;

/// Cumulative measurements for one transaction over a whole run.
#[derive(Debug, Clone)]
pub struct Measurement {
    pub success: u64,
    pub error: u64,
    latency: TDigest<K1>,
    latency_count: u64,
}

impl Default for Measurement {
    fn default() -> Self {
        Self::new()
    }
}

impl Measurement {
    pub fn new() -> Self {
        Self {
            success: 0,
            error: 0,
            latency: default_tdigest(),
            latency_count: 0,
        }
    }

    pub fn record(&mut self, success: u64, error: u64) {
        self.success += success;
        self.error += error;
    }

    /// Separate latency method since the TDigest datastructure does not support merge, and is
    /// probabilistic in nature.
    pub fn populate_latencies(&mut self, durations: &[Duration]) {
        for latency in durations {
            self.latency.insert(latency.as_secs_f64());
        }
        self.latency_count += durations.len() as u64;
    }

    pub fn total(&self) -> u64 {
        self.success + self.error
    }

    pub fn error_rate(&self) -> f64 {
        if self.total() == 0 {
            0.
        } else {
            self.error as f64 / self.total() as f64
        }
    }

    pub fn rps(&self, elapsed: Duration) -> f64 {
        let secs = elapsed.as_secs_f64();
        if secs > 0. {
            self.total() as f64 / secs
        } else {
            0.
        }
    }

    pub fn latency(&self, quantile: f64) -> Duration {
        if self.latency_count == 0 {
            return Duration::ZERO;
        }

        let secs = self.latency.quantile(quantile);

        // TDigest can return NaN for degenerate inputs.
        let secs = if secs.is_finite() && secs >= 0. {
            secs
        } else {
            tracing::error!("Non-finite latency estimate for quantile {quantile}.");
            0.
        };

        Duration::from_secs_f64(secs)
    }

    pub fn to_stats(&self, name: &str, elapsed: Duration) -> TransactionStats {
        TransactionStats {
            name: name.to_string(),
            success: self.success,
            error: self.error,
            rps: self.rps(elapsed),
            error_rate: self.error_rate(),
            latency_p50: self.latency(0.5),
            latency_p90: self.latency(0.9),
            latency_p99: self.latency(0.99),
        }
    }
}

fn default_tdigest() -> TDigest<K1> {
    TDigest::new(K1::new(10.), TDIGEST_BACKLOG_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_measurement_is_zeroed() {
        let m = Measurement::new();
        assert_eq!(m.total(), 0);
        assert_eq!(m.error_rate(), 0.);
        assert_eq!(m.rps(Duration::from_secs(1)), 0.);
        assert_eq!(m.latency(0.99), Duration::ZERO);
    }

    #[test]
    fn rates_are_cumulative() {
        let mut m = Measurement::new();
        m.record(3, 1);
        m.record(5, 1);
        assert_eq!(m.total(), 10);
        assert!((m.error_rate() - 0.2).abs() < 1e-9);
        assert!((m.rps(Duration::from_secs(5)) - 2.).abs() < 1e-9);
    }

    #[test]
    fn latency_quantiles_are_ordered() {
        let mut m = Measurement::new();
        let durations: Vec<_> = (1..=100).map(Duration::from_millis).collect();
        m.populate_latencies(&durations);

        let p50 = m.latency(0.5);
        let p99 = m.latency(0.99);
        assert!(p50 <= p99);
        assert!(p50 >= Duration::from_millis(40) && p50 <= Duration::from_millis(60));
        assert!(p99 <= Duration::from_millis(100));
    }
}
