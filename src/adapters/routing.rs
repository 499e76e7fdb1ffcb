use crate::domain::model::{Coordinates, RouteResult};
use crate::domain::ports::RoutingProvider;
use crate::utils::error::{NavError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

/// Directions client for an OpenRouteService-compatible API.
///
/// Calls `POST {base}/v2/directions/driving-car/geojson` with the API key in
/// the `Authorization` header. ORS speaks GeoJSON, so coordinates go out and
/// come back as `[longitude, latitude]`; everything else in this crate uses
/// latitude-first pairs, and this adapter owns the flip.
pub struct OrsRoutingProvider {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    features: Vec<RouteFeature>,
}

#[derive(Debug, Deserialize)]
struct RouteFeature {
    properties: RouteProperties,
    geometry: RouteGeometry,
}

#[derive(Debug, Deserialize)]
struct RouteProperties {
    summary: RouteSummary,
}

#[derive(Debug, Deserialize)]
struct RouteSummary {
    /// Meters.
    distance: f64,
    /// Seconds.
    duration: f64,
}

#[derive(Debug, Deserialize)]
struct RouteGeometry {
    coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorPayload {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    code: u32,
    message: String,
}

impl OrsRoutingProvider {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }
}

#[async_trait]
impl RoutingProvider for OrsRoutingProvider {
    async fn route(&self, origin: Coordinates, destination: Coordinates) -> Result<RouteResult> {
        // Out-of-range endpoints never reach the provider.
        if !origin.is_valid() {
            return Err(NavError::RouteUnavailable {
                reason: format!(
                    "origin out of range: ({}, {})",
                    origin.latitude, origin.longitude
                ),
            });
        }
        if !destination.is_valid() {
            return Err(NavError::RouteUnavailable {
                reason: format!(
                    "destination out of range: ({}, {})",
                    destination.latitude, destination.longitude
                ),
            });
        }

        let url = format!("{}/v2/directions/driving-car/geojson", self.base_url);
        let body = json!({
            "coordinates": [origin.as_lon_lat(), destination.as_lon_lat()]
        });

        tracing::debug!(
            "📡 Requesting directions ({}, {}) -> ({}, {})",
            origin.latitude,
            origin.longitude,
            destination.latitude,
            destination.longitude
        );
        let response = self
            .client
            .post(&url)
            .header("Authorization", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("📡 Directions API response status: {}", status);
        let text = response.text().await?;

        if !status.is_success() {
            // ORS error bodies carry {"error": {"code", "message"}}.
            if let Ok(payload) = serde_json::from_str::<ApiErrorPayload>(&text) {
                tracing::error!(
                    "❌ Directions API error {}: {}",
                    payload.error.code,
                    payload.error.message
                );
                return Err(NavError::RoutingApiError {
                    code: payload.error.code,
                    message: payload.error.message,
                });
            }
            let error_msg = format!("Directions API request failed with status: {}", status);
            tracing::error!("❌ {}", error_msg);
            return Err(NavError::RouteUnavailable { reason: error_msg });
        }

        let decoded: DirectionsResponse = serde_json::from_str(&text).map_err(|e| {
            tracing::error!("❌ Failed to decode directions payload: {}", e);
            tracing::debug!("Offending payload: {}", text);
            NavError::SerializationError(e)
        })?;

        let feature = decoded
            .features
            .first()
            .ok_or_else(|| NavError::RouteUnavailable {
                reason: "directions response contained no route".to_string(),
            })?;

        let summary = &feature.properties.summary;
        tracing::debug!(
            "📡 Route summary: {:.1} km, {:.0} s",
            summary.distance / 1000.0,
            summary.duration
        );

        let path = feature
            .geometry
            .coordinates
            .iter()
            .map(|pair| Coordinates::new(pair[1], pair[0]))
            .collect();

        Ok(RouteResult {
            // Seconds to whole minutes, rounding up.
            duration_minutes: (summary.duration / 60.0).ceil() as u32,
            path,
        })
    }
}
