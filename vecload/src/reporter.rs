mod timer;

use crate::transaction::TransactionData;
use std::collections::BTreeMap;
use std::time::Duration;
use timer::ReportClock;
#[allow(unused)]
use tracing::{debug, error, info, trace, warn};
use vecload_core::{Measurement, RunStatistics};

const TOTAL_NAME: &str = "Aggregated";

/// Turns the per-transaction atomics into cumulative run statistics.
pub(crate) struct Reporter {
    data: TransactionData,
    clock: ReportClock,
    measurements: BTreeMap<&'static str, Measurement>,
    total: Measurement,
}

impl Reporter {
    pub fn new(data: TransactionData, interval: Duration) -> Self {
        Self {
            data,
            clock: ReportClock::start(interval),
            measurements: BTreeMap::new(),
            total: Measurement::new(),
        }
    }

    /// Wait for the next report interval, then collect and log.
    pub async fn tick(&mut self) {
        let tick = self.clock.tick().await;
        trace!("Report after {:?} ({})", tick.since_last, self.clock);
        self.collect();
        self.log(tick.since_start);
    }

    pub fn collect(&mut self) {
        for (name, collected) in self.data.collect() {
            let measurement = self.measurements.entry(name).or_default();
            measurement.record(collected.success, collected.error);
            measurement.populate_latencies(&collected.latency);

            self.total.record(collected.success, collected.error);
            self.total.populate_latencies(&collected.latency);
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.clock.elapsed()
    }

    pub fn statistics(&self, name: &str, users: usize) -> RunStatistics {
        let elapsed = self.elapsed();
        RunStatistics {
            name: name.to_string(),
            users,
            elapsed,
            transactions: self
                .measurements
                .iter()
                .map(|(name, m)| m.to_stats(name, elapsed))
                .collect(),
            total: self.total.to_stats(TOTAL_NAME, elapsed),
        }
    }

    fn log(&self, elapsed: Duration) {
        for (name, measurement) in &self.measurements {
            info!("{}", measurement.to_stats(name, elapsed));
        }
        if self.measurements.len() > 1 {
            info!("{}", self.total.to_stats(TOTAL_NAME, elapsed));
        }
    }
}
