//! Data source port: where datasets come from.

use std::future::Future;
use std::sync::Arc;

use gridwatch_domain::error::FetchError;
use gridwatch_domain::reading::Dataset;

/// Capability to fetch the current dataset snapshot.
///
/// Implementations return the full dataset, oldest reading first. Every
/// failure (transport, status, malformed body) is a [`FetchError`].
pub trait DatasetSource: Send + Sync {
    /// Fetch the current dataset.
    fn fetch_dataset(&self) -> impl Future<Output = Result<Dataset, FetchError>> + Send;
}

impl<T: DatasetSource> DatasetSource for Arc<T> {
    fn fetch_dataset(&self) -> impl Future<Output = Result<Dataset, FetchError>> + Send {
        (**self).fetch_dataset()
    }
}
