use crate::domain::model::Facility;
use crate::domain::ports::FacilityDirectory;
use crate::utils::error::{NavError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Facility directory backed by the hospital GIS REST API.
///
/// Endpoints are `{base}/hospital` for the full list and
/// `{base}/hospital/{id}` for a single document.
pub struct HttpFacilityDirectory {
    client: Client,
    base_url: String,
}

impl HttpFacilityDirectory {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        tracing::debug!("📡 Making API request to: {}", url);
        let response = self.client.get(url).send().await?;
        tracing::debug!("📡 API response status: {}", response.status());

        if !response.status().is_success() {
            let error_msg = format!("API request failed with status: {}", response.status());
            tracing::error!("❌ {}", error_msg);
            return Err(NavError::FetchFailed { reason: error_msg });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("❌ Failed to decode directory payload from {}: {}", url, e);
            tracing::debug!("Offending payload: {}", body);
            NavError::SerializationError(e)
        })
    }
}

#[async_trait]
impl FacilityDirectory for HttpFacilityDirectory {
    async fn fetch_all(&self) -> Result<Vec<Facility>> {
        let url = format!("{}/hospital", self.base_url);
        let facilities: Vec<Facility> = self.get_json(&url).await?;
        tracing::info!("📡 Fetched {} facilities from directory", facilities.len());
        Ok(facilities)
    }

    async fn fetch_by_id(&self, id: &str) -> Result<Facility> {
        let url = format!("{}/hospital/{}", self.base_url, id);
        self.get_json(&url).await
    }
}
