use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::rate_provider::RateProvider;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Exchange rate provider backed by the National Bank of Ukraine
/// statdirectory API. Rates are quoted as UAH per unit of the foreign
/// currency.
pub struct NbuProvider {
    base_url: String,
    client: reqwest::Client,
}

impl NbuProvider {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("ratecast/0.1")
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(NbuProvider {
            base_url: base_url.to_string(),
            client,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ExchangeRateRecord {
    cc: String,
    rate: f64,
}

#[async_trait]
impl RateProvider for NbuProvider {
    async fn fetch_rate(&self, currency: &str) -> Result<Option<f64>> {
        let url = format!("{}/NBUStatService/v1/statdirectory/exchange?json", self.base_url);
        debug!("Requesting exchange rates from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for URL: {}", e, url))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} from rate source",
                response.status()
            ));
        }

        let text = response.text().await?;
        let records: Vec<ExchangeRateRecord> = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse rate source response: {}", e))?;

        let rate = records.into_iter().find(|r| r.cc == currency).map(|r| r.rate);
        if rate.is_none() {
            warn!("{} rate not found in the response", currency);
        }
        Ok(rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn create_mock_server(mock_response: &str, status_code: u16) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/NBUStatService/v1/statdirectory/exchange"))
            .respond_with(ResponseTemplate::new(status_code).set_body_string(mock_response))
            .mount(&mock_server)
            .await;

        mock_server
    }

    #[tokio::test]
    async fn test_successful_rate_fetch() {
        let mock_response = r#"[
            {"r030": 978, "txt": "Євро", "rate": 40.0, "cc": "EUR", "exchangedate": "04.08.2026"},
            {"r030": 840, "txt": "Долар США", "rate": 41.2, "cc": "USD", "exchangedate": "04.08.2026"}
        ]"#;
        let mock_server = create_mock_server(mock_response, 200).await;

        let provider = NbuProvider::new(&mock_server.uri()).unwrap();
        let rate = provider.fetch_rate("USD").await.unwrap();
        assert_eq!(rate, Some(41.2));
    }

    #[tokio::test]
    async fn test_rate_found_regardless_of_ordering() {
        let mock_response = r#"[
            {"cc": "USD", "rate": 41.2},
            {"cc": "EUR", "rate": 40.0},
            {"cc": "PLN", "rate": 10.5}
        ]"#;
        let mock_server = create_mock_server(mock_response, 200).await;

        let provider = NbuProvider::new(&mock_server.uri()).unwrap();
        let rate = provider.fetch_rate("USD").await.unwrap();
        assert_eq!(rate, Some(41.2));
    }

    #[tokio::test]
    async fn test_rate_not_in_response() {
        let mock_response = r#"[{"cc": "EUR", "rate": 40.0}]"#;
        let mock_server = create_mock_server(mock_response, 200).await;

        let provider = NbuProvider::new(&mock_server.uri()).unwrap();
        let rate = provider.fetch_rate("USD").await.unwrap();
        assert_eq!(rate, None);
    }

    #[tokio::test]
    async fn test_rate_source_error_response() {
        let mock_server = create_mock_server("Server Error", 500).await;

        let provider = NbuProvider::new(&mock_server.uri()).unwrap();
        let result = provider.fetch_rate("USD").await;
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "HTTP error: 500 Internal Server Error from rate source"
        );
    }

    #[tokio::test]
    async fn test_rate_source_malformed_response() {
        let mock_response = r#"{"cc": "USD", "rate": 41.2}"#; // object instead of array
        let mock_server = create_mock_server(mock_response, 200).await;

        let provider = NbuProvider::new(&mock_server.uri()).unwrap();
        let result = provider.fetch_rate("USD").await;
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to parse rate source response")
        );
    }
}
