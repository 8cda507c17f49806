//! Render port: how refresh outcomes reach the presentation layer.

use gridwatch_domain::reading::Reading;

/// Consumer-supplied callbacks invoked once per settled tick.
///
/// Exactly one method is called per tick, always from the controller's own
/// task and never after the controller has been stopped.
pub trait RefreshCallbacks: Send {
    /// The dataset was non-empty. `window` is the recent window, oldest first,
    /// and always ends with `latest`.
    fn on_ready(&mut self, latest: &Reading, window: &[Reading]);

    /// The dataset was a valid, empty array.
    fn on_empty(&mut self);

    /// The fetch failed. `message` is human-readable and non-empty.
    fn on_error(&mut self, message: &str);
}

impl<T: RefreshCallbacks + ?Sized> RefreshCallbacks for Box<T> {
    fn on_ready(&mut self, latest: &Reading, window: &[Reading]) {
        (**self).on_ready(latest, window);
    }

    fn on_empty(&mut self) {
        (**self).on_empty();
    }

    fn on_error(&mut self, message: &str) {
        (**self).on_error(message);
    }
}
