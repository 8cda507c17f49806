//! Readings and datasets: the raw records delivered by the data source.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One timestamped record of measurement fields.
///
/// Fields are kept as opaque JSON values; the only interpretation the
/// domain applies is numeric extraction via [`extract_field`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Reading {
    fields: Map<String, Value>,
}

/// Ordered sequence of readings, oldest first.
pub type Dataset = Vec<Reading>;

impl Reading {
    /// Create an empty reading.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion of a field.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Look up a raw field by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Iterate over all fields in source order.
    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    /// Textual form of the timestamp field stored under `key`.
    ///
    /// Strings are returned as-is and numbers are formatted; any other
    /// value (or a missing key) yields `None`.
    #[must_use]
    pub fn timestamp(&self, key: &str) -> Option<String> {
        match self.fields.get(key)? {
            Value::String(text) => Some(text.clone()),
            Value::Number(number) => Some(number.to_string()),
            _ => None,
        }
    }
}

impl FromIterator<(String, Value)> for Reading {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// Decode a response body into a [`Dataset`].
///
/// The body must be a JSON array of objects. Anything else (an error
/// object, a bare string, HTML) is rejected.
///
/// # Errors
///
/// Returns the underlying [`serde_json::Error`] when the body does not
/// match that shape.
pub fn parse_dataset(body: &[u8]) -> Result<Dataset, serde_json::Error> {
    serde_json::from_slice(body)
}

/// Extract a numeric value from a reading.
///
/// JSON numbers pass through. Strings are trimmed and their longest leading
/// decimal number is parsed, so `"12.5 V"` yields `12.5`. Missing keys,
/// `null`, booleans, nested values, strings without a leading number and
/// non-finite spellings (`"inf"`, `"NaN"`) all yield `NaN`. Never panics.
#[must_use]
pub fn extract_field(reading: &Reading, key: &str) -> f64 {
    match reading.get(key) {
        Some(Value::Number(number)) => number.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(text)) => parse_leading_number(text.trim()).unwrap_or(f64::NAN),
        _ => f64::NAN,
    }
}

/// Parse the longest prefix of `text` shaped like `[+-]digits[.digits][e[+-]digits]`.
fn parse_leading_number(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    let digits_from = |start: usize| {
        bytes[start..]
            .iter()
            .take_while(|byte| byte.is_ascii_digit())
            .count()
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let integer = digits_from(end);
    end += integer;
    let mut fraction = 0;
    if bytes.get(end) == Some(&b'.') {
        fraction = digits_from(end + 1);
        if integer > 0 || fraction > 0 {
            end += 1 + fraction;
        }
    }
    if integer == 0 && fraction == 0 {
        return None;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exponent = digits_from(end + 1 + sign);
        if exponent > 0 {
            end += 1 + sign + exponent;
        }
    }

    text[..end].parse::<f64>().ok().filter(|value| value.is_finite())
}
