//! Line chart: one series per channel over the recent window.

use serde::Serialize;

use gridwatch_domain::field::{FieldMapping, Measurement};
use gridwatch_domain::reading::{Reading, extract_field};
use gridwatch_domain::time::{clock_label, parse_timestamp};

/// One plotted line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    /// Legend label, e.g. `DL1 Voltage (V)`.
    pub name: String,
    /// One point per label; `None` marks a gap (missing or non-numeric).
    pub points: Vec<Option<f64>>,
}

/// Rolling chart state, replaced wholesale on every refresh.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LineChart {
    pub measurement: Option<Measurement>,
    /// X-axis labels derived from reading timestamps.
    pub labels: Vec<String>,
    pub series: Vec<Series>,
}

impl LineChart {
    /// Replace labels and series with the contents of `window`.
    ///
    /// `window` is expected oldest-first; `newest_first` reverses it for
    /// display without touching the caller's slice.
    pub fn plot(
        &mut self,
        window: &[Reading],
        mapping: &FieldMapping,
        measurement: Measurement,
        newest_first: bool,
    ) {
        let ordered: Vec<&Reading> = if newest_first {
            window.iter().rev().collect()
        } else {
            window.iter().collect()
        };

        self.measurement = Some(measurement);
        self.labels = ordered
            .iter()
            .map(|reading| time_label(reading, &mapping.timestamp))
            .collect();
        self.series = mapping
            .channels
            .iter()
            .filter_map(|channel| {
                let key = channel.key(measurement)?;
                Some(Series {
                    name: series_name(&channel.name, measurement),
                    points: ordered
                        .iter()
                        .map(|reading| {
                            let value = extract_field(reading, key);
                            value.is_finite().then_some(value)
                        })
                        .collect(),
                })
            })
            .collect();
    }

    /// Number of points per series.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether nothing has been plotted yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Smallest and largest plotted value across all series.
    #[must_use]
    pub fn bounds(&self) -> Option<(f64, f64)> {
        self.series
            .iter()
            .flat_map(|series| series.points.iter().flatten().copied())
            .fold(None, |acc, value| match acc {
                None => Some((value, value)),
                Some((lo, hi)) => Some((lo.min(value), hi.max(value))),
            })
    }
}

/// Legend label for a channel's series.
#[must_use]
pub fn series_name(channel: &str, measurement: Measurement) -> String {
    let label = measurement.label();
    let mut chars = label.chars();
    let title: String = chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect())
        .unwrap_or_default();
    format!("{channel} {title} ({})", measurement.unit())
}

/// `HH:MM:SS` for RFC 3339 timestamps, the raw text otherwise.
fn time_label(reading: &Reading, key: &str) -> String {
    match reading.timestamp(key) {
        Some(raw) => parse_timestamp(&raw).map_or(raw, clock_label),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(second: u32, v1: &str, v2: &str) -> Reading {
        Reading::new()
            .with_field("timestamp", format!("2025-03-01T10:00:{second:02}.000Z"))
            .with_field("V1", v1)
            .with_field("V2", v2)
    }

    fn window() -> Vec<Reading> {
        vec![
            reading(1, "230.0", "229.0"),
            reading(2, "231.0", "error"),
            reading(3, "232.0", "228.0"),
        ]
    }

    #[test]
    fn should_plot_one_series_per_channel_in_window_order() {
        let mut chart = LineChart::default();
        chart.plot(&window(), &FieldMapping::default(), Measurement::Voltage, false);

        assert_eq!(chart.labels, vec!["10:00:01", "10:00:02", "10:00:03"]);
        assert_eq!(chart.series.len(), 2);
        assert_eq!(chart.series[0].name, "DL1 Voltage (V)");
        assert_eq!(chart.series[0].points, vec![Some(230.0), Some(231.0), Some(232.0)]);
        assert_eq!(chart.series[1].name, "DL2 Voltage (V)");
        assert_eq!(chart.series[1].points, vec![Some(229.0), None, Some(228.0)]);
    }

    #[test]
    fn should_reverse_for_newest_first_display() {
        let mut chart = LineChart::default();
        chart.plot(&window(), &FieldMapping::default(), Measurement::Voltage, true);

        assert_eq!(chart.labels, vec!["10:00:03", "10:00:02", "10:00:01"]);
        assert_eq!(chart.series[0].points, vec![Some(232.0), Some(231.0), Some(230.0)]);
    }

    #[test]
    fn should_skip_channels_without_the_measurement() {
        let mut chart = LineChart::default();
        chart.plot(&window(), &FieldMapping::default(), Measurement::Current, false);

        assert_eq!(chart.series.len(), 1);
        assert_eq!(chart.series[0].name, "DL1 Current (A)");
        assert!(chart.series[0].points.iter().all(Option::is_none));
    }

    #[test]
    fn should_keep_raw_label_for_unparsable_timestamp() {
        let data = vec![Reading::new().with_field("timestamp", "3/1/2025 10:00")];
        let mut chart = LineChart::default();
        chart.plot(&data, &FieldMapping::default(), Measurement::Voltage, false);
        assert_eq!(chart.labels, vec!["3/1/2025 10:00"]);
    }

    #[test]
    fn should_use_empty_label_for_missing_timestamp() {
        let data = vec![Reading::new().with_field("V1", "1")];
        let mut chart = LineChart::default();
        chart.plot(&data, &FieldMapping::default(), Measurement::Voltage, false);
        assert_eq!(chart.labels, vec![String::new()]);
    }

    #[test]
    fn should_replace_previous_plot() {
        let mut chart = LineChart::default();
        chart.plot(&window(), &FieldMapping::default(), Measurement::Voltage, false);
        chart.plot(&window()[2..], &FieldMapping::default(), Measurement::Voltage, false);
        assert_eq!(chart.len(), 1);
    }

    #[test]
    fn should_compute_bounds_ignoring_gaps() {
        let mut chart = LineChart::default();
        assert!(chart.bounds().is_none());

        chart.plot(&window(), &FieldMapping::default(), Measurement::Voltage, false);
        assert_eq!(chart.bounds(), Some((228.0, 232.0)));
    }
}
