use crate::types::variable::VariableId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeatherDataError {
    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to read response body from {0}")]
    ResponseBody(String, #[source] reqwest::Error),

    #[error("Failed to parse weather response")]
    JsonParse(#[from] serde_json::Error),

    #[error("Weather response has no '{key}' series for {variable}")]
    MissingSeries { variable: VariableId, key: String },

    #[error("Weather service reported an error: {0}")]
    Service(String),
}
