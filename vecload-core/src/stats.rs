use serde::Serialize;
use serde_with::{serde_as, DurationMilliSecondsWithFrac, DurationSecondsWithFrac};
use std::fmt;
use std::time::Duration;

/// Statistics of a single transaction over a swarm run.
#[serde_as]
#[derive(Clone, Debug, Serialize)]
pub struct TransactionStats {
    pub name: String,
    pub success: u64,
    pub error: u64,
    pub rps: f64,
    pub error_rate: f64,
    #[serde_as(as = "DurationMilliSecondsWithFrac<f64>")]
    pub latency_p50: Duration,
    #[serde_as(as = "DurationMilliSecondsWithFrac<f64>")]
    pub latency_p90: Duration,
    #[serde_as(as = "DurationMilliSecondsWithFrac<f64>")]
    pub latency_p99: Duration,
}

impl TransactionStats {
    pub fn total(&self) -> u64 {
        self.success + self.error
    }
}

/// Run statistics of a swarm
///
/// One entry per transaction name, sorted by name, plus an aggregate over all of them.
#[serde_as]
#[derive(Clone, Debug, Serialize)]
pub struct RunStatistics {
    pub name: String,
    pub users: usize,
    #[serde_as(as = "DurationSecondsWithFrac<f64>")]
    pub elapsed: Duration,
    pub transactions: Vec<TransactionStats>,
    pub total: TransactionStats,
}

impl RunStatistics {
    pub fn transaction(&self, name: &str) -> Option<&TransactionStats> {
        self.transactions.iter().find(|t| t.name == name)
    }
}

impl fmt::Display for TransactionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<28} {:>9} {:>9} {:>9.2} {:>7.2}% {:>10} {:>10} {:>10}",
            self.name,
            self.total(),
            self.error,
            self.rps,
            self.error_rate * 100.,
            format_latency(self.latency_p50),
            format_latency(self.latency_p90),
            format_latency(self.latency_p99),
        )
    }
}

impl fmt::Display for RunStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} ({} users, {})",
            self.name,
            self.users,
            humantime::format_duration(Duration::from_secs(self.elapsed.as_secs()))
        )?;
        writeln!(
            f,
            "{:<28} {:>9} {:>9} {:>9} {:>8} {:>10} {:>10} {:>10}",
            "Name", "# reqs", "# fails", "req/s", "fail", "p50", "p90", "p99"
        )?;
        for transaction in &self.transactions {
            writeln!(f, "{transaction}")?;
        }
        write!(f, "{}", self.total)
    }
}

fn format_latency(latency: Duration) -> String {
    format!("{:.1}ms", latency.as_secs_f64() * 1e3)
}
