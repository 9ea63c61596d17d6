use crate::drawing::error::DrawingError;
use crate::store::error::StoreError;
use crate::types::time_range::TimeRangeError;
use crate::weather_data::error::WeatherDataError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Drawing(#[from] DrawingError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    TimeRange(#[from] TimeRangeError),

    #[error(transparent)]
    WeatherData(#[from] WeatherDataError),

    #[error("Failed to serialize the map view")]
    ViewSerialization(#[from] serde_json::Error),

    #[error("Could not interpret the requested analysis range")]
    UnrecognizedTimeRange,
}
