//! Defines the selectable weather variables, their units and the threshold rules
//! used to turn an averaged value into a display color.

use serde::Serialize;
use std::fmt;

/// A display color token in `#rrggbb` form.
///
/// Colors are only ever produced from the static variable catalog or from the
/// neutral fallback, so the token is a `&'static str`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Color(pub &'static str);

impl Color {
    /// The "unknown" color shown while a polygon has no value.
    pub const NEUTRAL: Color = Color("#9ca3af");

    pub fn as_str(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// A half-open interval `[min, max)` mapped to a color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColorRule {
    pub min: f64,
    pub max: f64,
    pub color: Color,
}

impl ColorRule {
    pub const fn new(min: f64, max: f64, color: &'static str) -> Self {
        Self {
            min,
            max,
            color: Color(color),
        }
    }

    /// Whether `value` lies in `[min, max)`. Always false for NaN.
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value < self.max
    }
}

/// Identifies one of the four weather quantities a polygon can be colored by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableId {
    /// Air temperature at 2 m, in °C.
    Temperature,
    /// Relative humidity at 2 m, in %.
    Humidity,
    /// Precipitation sum per hour, in mm.
    Precipitation,
    /// Wind speed at 10 m, in km/h.
    WindSpeed,
}

impl VariableId {
    pub const ALL: [VariableId; 4] = [
        VariableId::Temperature,
        VariableId::Humidity,
        VariableId::Precipitation,
        VariableId::WindSpeed,
    ];

    /// The name of the hourly series in the weather API response.
    pub(crate) fn series_key(&self) -> &'static str {
        match self {
            VariableId::Temperature => "temperature_2m",
            VariableId::Humidity => "relative_humidity_2m",
            VariableId::Precipitation => "precipitation",
            VariableId::WindSpeed => "wind_speed_10m",
        }
    }
}

impl fmt::Display for VariableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VariableId::Temperature => "temperature",
            VariableId::Humidity => "humidity",
            VariableId::Precipitation => "precipitation",
            VariableId::WindSpeed => "wind_speed",
        };
        f.write_str(name)
    }
}

/// A selectable weather variable with its classification rules.
///
/// Rules are ordered; the last one doubles as the catch-all color, see
/// [`crate::classify`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Variable {
    pub id: VariableId,
    pub name: &'static str,
    pub unit: &'static str,
    pub rules: Vec<ColorRule>,
}

impl Variable {
    /// Looks up the catalog entry for `id`.
    ///
    /// # Examples
    ///
    /// ```
    /// use polygon_weather::{Variable, VariableId};
    ///
    /// let humidity = Variable::get(VariableId::Humidity);
    /// assert_eq!(humidity.unit, "%");
    /// ```
    pub fn get(id: VariableId) -> Variable {
        match id {
            VariableId::Temperature => Variable {
                id,
                name: "Temperature",
                unit: "°C",
                rules: vec![
                    ColorRule::new(-50.0, 0.0, "#1d4ed8"),
                    ColorRule::new(0.0, 10.0, "#60a5fa"),
                    ColorRule::new(10.0, 20.0, "#22c55e"),
                    ColorRule::new(20.0, 30.0, "#f59e0b"),
                    ColorRule::new(30.0, 50.0, "#ef4444"),
                ],
            },
            VariableId::Humidity => Variable {
                id,
                name: "Relative humidity",
                unit: "%",
                rules: vec![
                    ColorRule::new(0.0, 30.0, "#fde68a"),
                    ColorRule::new(30.0, 50.0, "#a3e635"),
                    ColorRule::new(50.0, 70.0, "#34d399"),
                    ColorRule::new(70.0, 85.0, "#38bdf8"),
                    ColorRule::new(85.0, 101.0, "#1d4ed8"),
                ],
            },
            VariableId::Precipitation => Variable {
                id,
                name: "Precipitation",
                unit: "mm",
                rules: vec![
                    ColorRule::new(0.0, 0.1, "#f1f5f9"),
                    ColorRule::new(0.1, 1.0, "#93c5fd"),
                    ColorRule::new(1.0, 5.0, "#3b82f6"),
                    ColorRule::new(5.0, 20.0, "#1e40af"),
                    ColorRule::new(20.0, 500.0, "#7c3aed"),
                ],
            },
            VariableId::WindSpeed => Variable {
                id,
                name: "Wind speed",
                unit: "km/h",
                rules: vec![
                    ColorRule::new(0.0, 10.0, "#d1fae5"),
                    ColorRule::new(10.0, 20.0, "#6ee7b7"),
                    ColorRule::new(20.0, 40.0, "#fbbf24"),
                    ColorRule::new(40.0, 60.0, "#f97316"),
                    ColorRule::new(60.0, 200.0, "#dc2626"),
                ],
            },
        }
    }

    /// The full catalog, in display order.
    pub fn catalog() -> Vec<Variable> {
        VariableId::ALL.into_iter().map(Variable::get).collect()
    }
}
