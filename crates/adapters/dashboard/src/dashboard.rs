//! Render target: everything a presentation layer needs to draw the page.

use std::sync::{Arc, PoisonError, RwLock};

use serde::Serialize;

use gridwatch_domain::field::FieldMapping;

use crate::chart::{LineChart, series_name};
use crate::config::DashboardConfig;
use crate::gauge::Gauge;
use crate::status::StatusLine;
use crate::text::{TextField, placeholder_fields};

/// Full dashboard state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub status: StatusLine,
    /// Latest value of every mapped measurement.
    pub fields: Vec<TextField>,
    pub chart: LineChart,
    /// `None` when no channel reports the gauge measurement.
    pub gauge: Option<Gauge>,
    /// Raw timestamp of the latest reading.
    pub latest_timestamp: Option<String>,
}

impl Dashboard {
    /// Empty dashboard laid out for `mapping`.
    #[must_use]
    pub fn new(mapping: &FieldMapping, config: &DashboardConfig) -> Self {
        let gauge = mapping
            .first_with(config.gauge_measurement)
            .map(|(channel, _)| {
                Gauge::new(
                    series_name(&channel.name, config.gauge_measurement),
                    config.gauge_min,
                    config.gauge_max,
                )
                .with_zones(config.gauge_zones.clone())
            });

        Self {
            status: StatusLine::waiting(),
            fields: placeholder_fields(mapping),
            chart: LineChart::default(),
            gauge,
            latest_timestamp: None,
        }
    }
}

/// Shared handle to a [`Dashboard`].
///
/// Owned by the composition root; cloned into the renderer (writer) and
/// the presentation layer (readers).
#[derive(Debug, Clone)]
pub struct DashboardHandle {
    inner: Arc<RwLock<Dashboard>>,
}

impl DashboardHandle {
    /// Wrap an initial dashboard.
    #[must_use]
    pub fn new(dashboard: Dashboard) -> Self {
        Self {
            inner: Arc::new(RwLock::new(dashboard)),
        }
    }

    /// Copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> Dashboard {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Mutate the dashboard in place.
    pub fn update<R>(&self, f: impl FnOnce(&mut Dashboard) -> R) -> R {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}
