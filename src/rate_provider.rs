//! Exchange rate retrieval abstraction.

use anyhow::Result;
use async_trait::async_trait;

/// Source of exchange rates quoted against the local currency.
///
/// `Ok(None)` means the source answered but carried no record for the
/// requested currency code; transport and parse failures are `Err`.
#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn fetch_rate(&self, currency: &str) -> Result<Option<f64>>;
}
