//! Radial gauge: a single clamped value with coloured zones.

use serde::{Deserialize, Serialize};

/// A coloured band of the gauge scale, `[min, max)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaugeZone {
    pub min: f64,
    pub max: f64,
    /// CSS colour.
    pub color: String,
}

impl GaugeZone {
    #[must_use]
    pub fn new(min: f64, max: f64, color: impl Into<String>) -> Self {
        Self {
            min,
            max,
            color: color.into(),
        }
    }
}

/// Leakage current bands: safe, caution, trip.
#[must_use]
pub fn default_zones() -> Vec<GaugeZone> {
    vec![
        GaugeZone::new(0.0, 5.0, "#30B32D"),
        GaugeZone::new(5.0, 10.0, "#FFDD00"),
        GaugeZone::new(10.0, 100.0, "#F03E3E"),
    ]
}

/// Gauge state. The pointer never leaves `[min, max]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gauge {
    /// Caption, e.g. `DL1 Current (A)`.
    pub label: String,
    pub min: f64,
    pub max: f64,
    /// Current pointer position.
    pub value: f64,
    pub zones: Vec<GaugeZone>,
}

impl Gauge {
    /// Create a gauge resting at `min`, with the default zones.
    #[must_use]
    pub fn new(label: impl Into<String>, min: f64, max: f64) -> Self {
        Self {
            label: label.into(),
            min,
            max,
            value: min,
            zones: default_zones(),
        }
    }

    /// Replace the coloured bands.
    #[must_use]
    pub fn with_zones(mut self, zones: Vec<GaugeZone>) -> Self {
        self.zones = zones;
        self
    }

    /// Move the pointer to `value`, clamped into `[min, max]`.
    ///
    /// `NaN` leaves the pointer where it is; returns whether it moved.
    pub fn set(&mut self, value: f64) -> bool {
        if value.is_nan() {
            return false;
        }
        self.value = value.max(self.min).min(self.max);
        true
    }

    /// Zone containing the pointer. The upper bound of the last zone is inclusive.
    #[must_use]
    pub fn zone(&self) -> Option<&GaugeZone> {
        let last = self.zones.len().checked_sub(1)?;
        self.zones.iter().enumerate().find_map(|(idx, zone)| {
            let below_max = self.value < zone.max || (idx == last && self.value <= zone.max);
            (self.value >= zone.min && below_max).then_some(zone)
        })
    }

    /// Pointer position as a fraction of the scale, in `[0, 1]`.
    #[must_use]
    pub fn fraction(&self) -> f64 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 0.0;
        }
        ((self.value - self.min) / span).clamp(0.0, 1.0)
    }
}
