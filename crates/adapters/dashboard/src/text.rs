//! Text fields: the latest value of every mapped measurement.

use serde::Serialize;

use gridwatch_domain::field::{FieldMapping, Measurement};
use gridwatch_domain::reading::{Reading, extract_field};

/// Shown in place of a value that is missing or not a number.
pub const PLACEHOLDER: &str = "—";

/// One labelled value on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextField {
    pub channel: String,
    pub measurement: Measurement,
    /// `None` when the source value is missing or non-numeric.
    pub value: Option<f64>,
    /// Formatted value with unit, or [`PLACEHOLDER`].
    pub display: String,
}

/// Format `value` with the precision and unit of `measurement`.
#[must_use]
pub fn format_value(value: f64, measurement: Measurement) -> String {
    if !value.is_finite() {
        return PLACEHOLDER.to_string();
    }
    format!(
        "{value:.precision$} {unit}",
        precision = measurement.precision(),
        unit = measurement.unit()
    )
}

/// Placeholder fields for every mapped measurement, before any data arrived.
#[must_use]
pub fn placeholder_fields(mapping: &FieldMapping) -> Vec<TextField> {
    mapping
        .channels
        .iter()
        .flat_map(|channel| {
            channel.keys().map(move |(measurement, _)| TextField {
                channel: channel.name.clone(),
                measurement,
                value: None,
                display: PLACEHOLDER.to_string(),
            })
        })
        .collect()
}

/// Text fields for `reading`, in channel then measurement order.
#[must_use]
pub fn text_fields(reading: &Reading, mapping: &FieldMapping) -> Vec<TextField> {
    mapping
        .channels
        .iter()
        .flat_map(|channel| {
            channel.keys().map(move |(measurement, key)| {
                let raw = extract_field(reading, key);
                TextField {
                    channel: channel.name.clone(),
                    measurement,
                    value: raw.is_finite().then_some(raw),
                    display: format_value(raw, measurement),
                }
            })
        })
        .collect()
}
