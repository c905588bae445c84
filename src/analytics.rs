//! Measurement Protocol client for the analytics collector.

use anyhow::{Result, anyhow};
use chrono::Utc;
use reqwest::StatusCode;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

pub const EVENT_NAME: &str = "uah_usd_rate";

const ENGAGEMENT_TIME_MSEC: &str = "100";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Serialize)]
struct EventParams {
    rate: f64,
    engagement_time_msec: &'static str,
    session_id: String,
}

#[derive(Debug, Serialize)]
struct RateEvent {
    name: &'static str,
    params: EventParams,
}

#[derive(Debug, Serialize)]
struct CollectBody {
    client_id: String,
    timestamp_micros: i64,
    events: Vec<RateEvent>,
}

/// Sends rate events to the collector's `/mp/collect` endpoint.
///
/// The client identifier is fixed for the lifetime of this client; a
/// fresh session identifier is generated for every send, so the
/// collector sees each event as its own session.
pub struct AnalyticsClient {
    base_url: String,
    measurement_id: String,
    api_secret: String,
    client_id: String,
    client: reqwest::Client,
}

impl AnalyticsClient {
    pub fn new(
        base_url: &str,
        measurement_id: &str,
        api_secret: &str,
        client_id: &str,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("ratecast/0.1")
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(AnalyticsClient {
            base_url: base_url.to_string(),
            measurement_id: measurement_id.to_string(),
            api_secret: api_secret.to_string(),
            client_id: client_id.to_string(),
            client,
        })
    }

    /// Posts one rate event. The collector answers 204 with an empty
    /// body on success; any other status is an error.
    pub async fn send_rate(&self, rate: f64) -> Result<()> {
        let session_id = Uuid::new_v4().to_string();
        let timestamp_micros = Utc::now().timestamp_micros();

        let body = CollectBody {
            client_id: self.client_id.clone(),
            timestamp_micros,
            events: vec![RateEvent {
                name: EVENT_NAME,
                params: EventParams {
                    rate,
                    engagement_time_msec: ENGAGEMENT_TIME_MSEC,
                    session_id,
                },
            }],
        };

        let url = format!("{}/mp/collect", self.base_url);
        debug!("Posting rate event to {}", url);

        let response = self
            .client
            .post(&url)
            .query(&[
                ("measurement_id", self.measurement_id.as_str()),
                ("api_secret", self.api_secret.as_str()),
            ])
            .json(&body)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} while sending event", e))?;

        match response.status() {
            StatusCode::NO_CONTENT => Ok(()),
            status => {
                let text = response.text().await.unwrap_or_default();
                Err(anyhow!(
                    "Collector rejected event: status {}, response: {}",
                    status,
                    text
                ))
            }
        }
    }
}
