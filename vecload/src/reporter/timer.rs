use std::fmt;
use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior};

/// Report clock of a swarm run. Ticks at a fixed period and keeps the run's start.
pub(crate) struct ReportClock {
    ticks: Interval,
    period: Duration,
    started: Instant,
    last_report: Instant,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Tick {
    pub since_last: Duration,
    pub since_start: Duration,
}

impl ReportClock {
    pub fn start(period: Duration) -> Self {
        let started = Instant::now();
        // Skip the immediate first tick: nothing has been recorded yet.
        let mut ticks = tokio::time::interval_at(started + period, period);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self {
            ticks,
            period,
            started,
            last_report: started,
        }
    }

    pub async fn tick(&mut self) -> Tick {
        let now = self.ticks.tick().await;
        let tick = Tick {
            since_last: now.saturating_duration_since(self.last_report),
            since_start: now.saturating_duration_since(self.started),
        };
        self.last_report = now;
        tick
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

impl fmt::Display for ReportClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "every {}, running for {}",
            humantime::format_duration(self.period),
            humantime::format_duration(Duration::from_secs(self.elapsed().as_secs()))
        )
    }
}
