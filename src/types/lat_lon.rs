use serde::{Deserialize, Serialize};

/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the second (index 1).
///
/// # Examples
///
/// ```
/// use polygon_weather::LatLon;
///
/// let berlin_center = LatLon(52.5200, 13.4050);
/// assert_eq!(berlin_center.lat(), 52.5200);
/// assert_eq!(berlin_center.lon(), 13.4050);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon(pub f64, pub f64);

impl LatLon {
    pub fn lat(self) -> f64 {
        self.0
    }

    pub fn lon(self) -> f64 {
        self.1
    }

    /// Clamps latitude to `[-90, 90]` and longitude to `[-180, 180]`.
    ///
    /// ```
    /// use polygon_weather::LatLon;
    ///
    /// assert_eq!(LatLon(95.0, -200.0).clamped(), LatLon(90.0, -180.0));
    /// ```
    pub fn clamped(self) -> LatLon {
        LatLon(self.0.clamp(-90.0, 90.0), self.1.clamp(-180.0, 180.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamped_leaves_valid_coordinates() {
        let amsterdam = LatLon(52.37, 4.89);
        assert_eq!(amsterdam.clamped(), amsterdam);
    }

    #[test]
    fn test_clamped_bounds_both_axes() {
        assert_eq!(LatLon(-123.0, 181.5).clamped(), LatLon(-90.0, 180.0));
    }
}
