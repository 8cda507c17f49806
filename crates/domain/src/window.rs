//! Recent window: the bounded suffix of a dataset handed to renderers.

use crate::reading::Reading;

/// Number of readings kept in the recent window unless configured otherwise.
pub const DEFAULT_WINDOW_SIZE: usize = 20;

/// Return the last `min(size, items.len())` elements, in original order.
#[must_use]
pub fn recent_window<T>(items: &[T], size: usize) -> &[T] {
    let start = items.len().saturating_sub(size);
    &items[start..]
}

/// The latest reading of a dataset together with its recent window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot<'a> {
    /// Last reading of the dataset.
    pub latest: &'a Reading,
    /// Last `min(size, len)` readings, oldest first.
    pub window: &'a [Reading],
}

impl<'a> Snapshot<'a> {
    /// Derive a snapshot from `dataset`, or `None` when it is empty.
    #[must_use]
    pub fn derive(dataset: &'a [Reading], size: usize) -> Option<Self> {
        let latest = dataset.last()?;
        Some(Self {
            latest,
            window: recent_window(dataset, size),
        })
    }
}
