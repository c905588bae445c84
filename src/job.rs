//! One fetch-then-forward job execution.

use std::sync::Arc;
use tracing::{error, info};

use crate::analytics::AnalyticsClient;
use crate::rate_provider::RateProvider;

/// What happened during a single job run. Expected failures are
/// outcomes, not errors; the scheduler keeps ticking either way.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JobOutcome {
    Sent { rate: f64 },
    RateUnavailable,
    SendFailed { rate: f64 },
}

pub struct JobRunner {
    provider: Arc<dyn RateProvider>,
    sink: AnalyticsClient,
    currency: String,
}

impl JobRunner {
    pub fn new(provider: Arc<dyn RateProvider>, sink: AnalyticsClient, currency: &str) -> Self {
        JobRunner {
            provider,
            sink,
            currency: currency.to_string(),
        }
    }

    /// Fetches the current rate and forwards it to the collector. An
    /// event is only sent when a rate was actually obtained.
    pub async fn run_once(&self) -> JobOutcome {
        info!("Starting scheduled job");

        let rate = match self.provider.fetch_rate(&self.currency).await {
            Ok(Some(rate)) => {
                info!(rate, "Fetched {} rate", self.currency);
                rate
            }
            Ok(None) => {
                error!("Could not fetch {} rate. Event not sent", self.currency);
                return JobOutcome::RateUnavailable;
            }
            Err(e) => {
                error!(error = %e, "Error fetching {} rate. Event not sent", self.currency);
                return JobOutcome::RateUnavailable;
            }
        };

        match self.sink.send_rate(rate).await {
            Ok(()) => {
                info!(rate, "Event sent successfully");
                JobOutcome::Sent { rate }
            }
            Err(e) => {
                error!(error = %e, "Failed to send event");
                JobOutcome::SendFailed { rate }
            }
        }
    }
}
