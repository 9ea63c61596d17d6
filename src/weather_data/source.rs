//! The seam between the recompute coordinator and whatever serves weather data.

use crate::types::lat_lon::LatLon;
use crate::types::time_range::TimeRange;
use crate::types::variable::VariableId;
use crate::weather_data::error::WeatherDataError;
use async_trait::async_trait;
use chrono::NaiveDate;

/// A request for one variable's samples at one location over a span of days.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherRequest {
    pub location: LatLon,
    pub variable: VariableId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl WeatherRequest {
    /// Builds a request for the days covered by `range`. The location is clamped
    /// to valid latitude/longitude bounds.
    pub fn new(location: LatLon, variable: VariableId, range: &TimeRange) -> Self {
        Self {
            location: location.clamped(),
            variable,
            start_date: range.start_date(),
            end_date: range.end_date(),
        }
    }
}

/// Anything that can return a time series of samples for a [`WeatherRequest`].
///
/// Samples may be missing (`None`); the coordinator reduces the series with
/// [`average_series`].
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn fetch_series(
        &self,
        request: &WeatherRequest,
    ) -> Result<Vec<Option<f64>>, WeatherDataError>;
}

/// Mean of the present, finite samples. `None` if no such sample exists.
///
/// # Examples
///
/// ```
/// use polygon_weather::average_series;
///
/// assert_eq!(average_series(&[Some(1.0), None, Some(3.0)]), Some(2.0));
/// assert_eq!(average_series(&[None, None]), None);
/// ```
pub fn average_series(samples: &[Option<f64>]) -> Option<f64> {
    let (sum, count) = samples
        .iter()
        .flatten()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}
