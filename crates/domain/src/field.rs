//! Field mapping: which source keys hold which measurement, per channel.
//!
//! Key names are whatever the spreadsheet columns are called, so they are
//! configuration, never constants in the polling code.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A kind of measurement a channel can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Measurement {
    Voltage,
    Frequency,
    Current,
    Temperature,
    Humidity,
}

impl Measurement {
    /// All measurements, in display order.
    pub const ALL: [Self; 5] = [
        Self::Voltage,
        Self::Frequency,
        Self::Current,
        Self::Temperature,
        Self::Humidity,
    ];

    /// Lowercase label used in configuration and JSON.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Voltage => "voltage",
            Self::Frequency => "frequency",
            Self::Current => "current",
            Self::Temperature => "temperature",
            Self::Humidity => "humidity",
        }
    }

    /// Display unit.
    #[must_use]
    pub fn unit(self) -> &'static str {
        match self {
            Self::Voltage => "V",
            Self::Frequency => "Hz",
            Self::Current => "A",
            Self::Temperature => "°C",
            Self::Humidity => "%",
        }
    }

    /// Number of decimals shown for this measurement.
    ///
    /// Leakage currents are in the micro-ampere range, hence six digits.
    #[must_use]
    pub fn precision(self) -> usize {
        match self {
            Self::Voltage | Self::Frequency => 2,
            Self::Current => 6,
            Self::Temperature | Self::Humidity => 1,
        }
    }
}

impl std::fmt::Display for Measurement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Source keys of one monitored channel (data logger).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelFields {
    /// Display name (e.g. `DL1`).
    pub name: String,
    pub voltage: Option<String>,
    pub frequency: Option<String>,
    pub current: Option<String>,
    pub temperature: Option<String>,
    pub humidity: Option<String>,
}

impl ChannelFields {
    /// Source key for `measurement`, if this channel reports it.
    #[must_use]
    pub fn key(&self, measurement: Measurement) -> Option<&str> {
        match measurement {
            Measurement::Voltage => self.voltage.as_deref(),
            Measurement::Frequency => self.frequency.as_deref(),
            Measurement::Current => self.current.as_deref(),
            Measurement::Temperature => self.temperature.as_deref(),
            Measurement::Humidity => self.humidity.as_deref(),
        }
    }

    /// Measurements this channel reports, paired with their source keys.
    pub fn keys(&self) -> impl Iterator<Item = (Measurement, &str)> {
        Measurement::ALL
            .into_iter()
            .filter_map(move |m| self.key(m).map(|key| (m, key)))
    }
}

/// Full mapping from source keys to channels and measurements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldMapping {
    /// Key of the per-reading timestamp.
    pub timestamp: String,
    /// Monitored channels, in display order.
    pub channels: Vec<ChannelFields>,
}

impl Default for FieldMapping {
    /// Two data loggers as laid out in the monitoring spreadsheet; only the
    /// first one carries a leakage current sensor.
    fn default() -> Self {
        Self {
            timestamp: "timestamp".to_string(),
            channels: vec![
                ChannelFields {
                    name: "DL1".to_string(),
                    voltage: Some("V1".to_string()),
                    frequency: Some("Freq1".to_string()),
                    current: Some("AED1".to_string()),
                    temperature: Some("Tem1".to_string()),
                    humidity: Some("Humidity1".to_string()),
                },
                ChannelFields {
                    name: "DL2".to_string(),
                    voltage: Some("V2".to_string()),
                    frequency: Some("Freq2".to_string()),
                    current: None,
                    temperature: Some("Tem2".to_string()),
                    humidity: Some("Humidity2".to_string()),
                },
            ],
        }
    }
}

impl FieldMapping {
    /// Check that keys and channel names are usable.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for an empty timestamp key, an empty or
    /// duplicate channel name, or an empty measurement key.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.timestamp.trim().is_empty() {
            return Err(ValidationError::EmptyTimestampKey);
        }
        let mut seen = HashSet::new();
        for channel in &self.channels {
            if channel.name.trim().is_empty() {
                return Err(ValidationError::EmptyChannelName);
            }
            if !seen.insert(channel.name.as_str()) {
                return Err(ValidationError::DuplicateChannel(channel.name.clone()));
            }
            if let Some((measurement, _)) = channel.keys().find(|(_, key)| key.trim().is_empty()) {
                return Err(ValidationError::EmptyFieldKey {
                    channel: channel.name.clone(),
                    measurement: measurement.label(),
                });
            }
        }
        Ok(())
    }

    /// First channel that reports `measurement`, with its key.
    #[must_use]
    pub fn first_with(&self, measurement: Measurement) -> Option<(&ChannelFields, &str)> {
        self.channels
            .iter()
            .find_map(|channel| channel.key(measurement).map(|key| (channel, key)))
    }
}
