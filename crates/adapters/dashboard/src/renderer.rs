//! [`RefreshCallbacks`] implementation that writes into a [`DashboardHandle`].

use gridwatch_app::ports::RefreshCallbacks;
use gridwatch_domain::field::FieldMapping;
use gridwatch_domain::reading::{Reading, extract_field};
use gridwatch_domain::time::now;

use crate::config::DashboardConfig;
use crate::dashboard::DashboardHandle;
use crate::status::StatusLine;
use crate::text::text_fields;

/// Renders refresh outcomes into a shared dashboard.
///
/// Empty and failed ticks only touch the status line, so the last good
/// values stay on screen.
pub struct DashboardRenderer {
    target: DashboardHandle,
    mapping: FieldMapping,
    config: DashboardConfig,
}

impl DashboardRenderer {
    /// Create a renderer writing into `target`.
    #[must_use]
    pub fn new(target: DashboardHandle, mapping: FieldMapping, config: DashboardConfig) -> Self {
        Self {
            target,
            mapping,
            config,
        }
    }
}

impl RefreshCallbacks for DashboardRenderer {
    fn on_ready(&mut self, latest: &Reading, window: &[Reading]) {
        let fields = text_fields(latest, &self.mapping);
        let gauge_value = self
            .mapping
            .first_with(self.config.gauge_measurement)
            .map(|(_, key)| extract_field(latest, key));
        let latest_timestamp = latest.timestamp(&self.mapping.timestamp);

        self.target.update(|dashboard| {
            dashboard.fields = fields;
            dashboard.chart.plot(
                window,
                &self.mapping,
                self.config.chart_measurement,
                self.config.newest_first,
            );
            if let (Some(gauge), Some(value)) = (dashboard.gauge.as_mut(), gauge_value)
                && !gauge.set(value)
            {
                tracing::debug!(label = %gauge.label, "gauge value is not numeric, keeping pointer");
            }
            dashboard.latest_timestamp = latest_timestamp;
            dashboard.status = StatusLine::updated(now());
        });
    }

    fn on_empty(&mut self) {
        self.target
            .update(|dashboard| dashboard.status = StatusLine::no_data());
    }

    fn on_error(&mut self, message: &str) {
        self.target
            .update(|dashboard| dashboard.status = StatusLine::error(message));
    }
}
