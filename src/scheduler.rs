//! Recurring job scheduling.

use anyhow::Result;
use std::future::Future;
use std::time::Duration;
use tokio::time::{self, Instant};
use tracing::{error, info};

/// Granularity of the pending-check loop.
const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Pause after an unexpected job error before ticking resumes.
const ERROR_COOLDOWN: Duration = Duration::from_secs(60);

/// Runs a job once immediately, then once per interval, until the
/// shutdown future resolves. Job errors never stop the loop.
pub struct Scheduler {
    interval: Duration,
}

impl Scheduler {
    pub fn new(interval: Duration) -> Self {
        Scheduler { interval }
    }

    /// Drives the loop. The next run is scheduled one interval after
    /// the previous run completes, so a slow job shifts the cadence
    /// rather than stacking runs. Shutdown is observed at the sleep
    /// boundaries, not within an in-flight job.
    pub async fn run<F, Fut, S>(&self, mut job: F, shutdown: S)
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<()>>,
        S: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        info!(
            interval_secs = self.interval.as_secs(),
            "Background worker started"
        );

        let mut next_run = Instant::now();
        loop {
            if Instant::now() >= next_run {
                if let Err(e) = job().await {
                    error!(error = %e, "An unexpected error occurred");
                    tokio::select! {
                        _ = &mut shutdown => break,
                        _ = time::sleep(ERROR_COOLDOWN) => {}
                    }
                }
                next_run = Instant::now() + self.interval;
            }

            tokio::select! {
                _ = &mut shutdown => break,
                _ = time::sleep(POLL_INTERVAL) => {}
            }
        }

        info!("Background worker stopped by user");
    }
}
