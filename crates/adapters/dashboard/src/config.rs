//! Dashboard rendering configuration.

use serde::Deserialize;

use gridwatch_domain::field::Measurement;

use crate::gauge::{GaugeZone, default_zones};

/// Presentation settings for the dashboard.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Measurement plotted on the line chart, one series per channel.
    pub chart_measurement: Measurement,
    /// Measurement shown on the gauge (first channel that reports it).
    pub gauge_measurement: Measurement,
    /// Lower bound of the gauge scale.
    pub gauge_min: f64,
    /// Upper bound of the gauge scale; larger readings pin the pointer here.
    pub gauge_max: f64,
    /// Coloured bands of the gauge scale, checked in order.
    pub gauge_zones: Vec<GaugeZone>,
    /// Plot the recent window newest-first instead of oldest-first.
    pub newest_first: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            chart_measurement: Measurement::Voltage,
            gauge_measurement: Measurement::Current,
            gauge_min: 0.0,
            gauge_max: 100.0,
            gauge_zones: default_zones(),
            newest_first: false,
        }
    }
}
