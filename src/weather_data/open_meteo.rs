//! A [`WeatherSource`] backed by the Open-Meteo historical weather API.

use crate::types::variable::VariableId;
use crate::weather_data::error::WeatherDataError;
use crate::weather_data::source::{WeatherRequest, WeatherSource};
use async_trait::async_trait;
use bon::bon;
use log::{debug, warn};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://archive-api.open-meteo.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct ArchiveResponse {
    #[serde(default)]
    error: bool,
    reason: Option<String>,
    #[serde(default)]
    hourly: HashMap<String, Value>,
}

/// Client for `GET /v1/archive` with hourly series.
///
/// # Examples
///
/// ```no_run
/// # use polygon_weather::{OpenMeteo, WeatherDataError};
/// # use std::time::Duration;
/// # fn run() -> Result<(), WeatherDataError> {
/// // Defaults: the public archive endpoint and a 30 second timeout.
/// let source = OpenMeteo::builder().build()?;
///
/// let local = OpenMeteo::builder()
///     .base_url("http://localhost:8080".to_string())
///     .timeout(Duration::from_secs(5))
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct OpenMeteo {
    base_url: String,
    client: Client,
}

#[bon]
impl OpenMeteo {
    /// Creates a client.
    ///
    /// * `.base_url(String)`: Optional. Scheme and host of the API.
    ///   Defaults to [`DEFAULT_BASE_URL`].
    /// * `.timeout(Duration)`: Optional. Per-request timeout. Defaults to [`DEFAULT_TIMEOUT`].
    ///   Ignored when `.client()` is given.
    /// * `.client(reqwest::Client)`: Optional. A preconfigured HTTP client to share.
    ///
    /// # Errors
    ///
    /// Returns [`WeatherDataError::ClientBuild`] if the HTTP client cannot be created.
    #[builder]
    pub fn new(
        base_url: Option<String>,
        timeout: Option<Duration>,
        client: Option<Client>,
    ) -> Result<Self, WeatherDataError> {
        let client = match client {
            Some(client) => client,
            None => Client::builder()
                .timeout(timeout.unwrap_or(DEFAULT_TIMEOUT))
                .build()
                .map_err(WeatherDataError::ClientBuild)?,
        };
        let base_url = base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        Ok(Self { base_url, client })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/archive", self.base_url)
    }

    fn query(request: &WeatherRequest) -> [(&'static str, String); 6] {
        let location = request.location.clamped();
        [
            ("latitude", format!("{:.4}", location.lat())),
            ("longitude", format!("{:.4}", location.lon())),
            ("start_date", request.start_date.format("%Y-%m-%d").to_string()),
            ("end_date", request.end_date.format("%Y-%m-%d").to_string()),
            ("hourly", request.variable.series_key().to_string()),
            ("timezone", "UTC".to_string()),
        ]
    }
}

/// Extracts the hourly series for `variable` from an archive response body.
pub(crate) fn parse_series(
    body: &[u8],
    variable: VariableId,
) -> Result<Vec<Option<f64>>, WeatherDataError> {
    let mut response: ArchiveResponse = serde_json::from_slice(body)?;
    if response.error {
        return Err(WeatherDataError::Service(
            response.reason.unwrap_or_else(|| "unknown error".to_string()),
        ));
    }
    let key = variable.series_key();
    let series = response
        .hourly
        .remove(key)
        .ok_or_else(|| WeatherDataError::MissingSeries {
            variable,
            key: key.to_string(),
        })?;
    Ok(serde_json::from_value(series)?)
}

#[async_trait]
impl WeatherSource for OpenMeteo {
    async fn fetch_series(
        &self,
        request: &WeatherRequest,
    ) -> Result<Vec<Option<f64>>, WeatherDataError> {
        let url = self.endpoint();
        debug!(
            "Requesting {} at {:?} for {}..{}",
            request.variable, request.location, request.start_date, request.end_date
        );

        let response = self
            .client
            .get(&url)
            .query(&Self::query(request))
            .send()
            .await
            .map_err(|e| WeatherDataError::NetworkRequest(url.clone(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(if let Some(status) = e.status() {
                    WeatherDataError::HttpStatus {
                        url,
                        status,
                        source: e,
                    }
                } else {
                    WeatherDataError::NetworkRequest(url, e)
                });
            }
        };

        let body = response
            .bytes()
            .await
            .map_err(|e| WeatherDataError::ResponseBody(url.clone(), e))?;
        parse_series(&body, request.variable)
    }
}
