mod classifier;
mod coordinator;
mod dashboard;
mod drawing;
mod error;
mod store;
mod types;
mod view;
mod weather_data;

pub use classifier::{classify, classify_with_rules};
pub use coordinator::{ApplyOutcome, FetchResult, RecomputeCoordinator, SelectionTag};
pub use dashboard::{Dashboard, Intent, MapEvent};
pub use error::DashboardError;
pub use view::{Legend, MapView, PolygonLayer};

pub use drawing::error::DrawingError;
pub use drawing::session::{DrawingSession, DrawingUpdate, MAX_POINTS, MIN_POINTS};

pub use store::error::StoreError;
pub use store::polygon::{centroid, Polygon, PolygonId};
pub use store::polygon_store::PolygonStore;

pub use types::lat_lon::LatLon;
pub use types::time_range::{AnyTimeRange, TimeRange, TimeRangeError, Timeline};
pub use types::variable::{Color, ColorRule, Variable, VariableId};

pub use weather_data::error::WeatherDataError;
pub use weather_data::open_meteo::{OpenMeteo, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use weather_data::source::{average_series, WeatherRequest, WeatherSource};
