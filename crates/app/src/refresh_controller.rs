//! Refresh controller: polls a [`DatasetSource`] on a fixed interval and
//! feeds the outcome of every tick to [`RefreshCallbacks`].
//!
//! ## Tick lifecycle
//!
//! 1. state becomes [`RefreshState::Loading`]
//! 2. the source is asked for the current dataset
//! 3. the outcome is settled: `on_error`, `on_empty` or `on_ready` fires
//!    exactly once and the state becomes `Error`, `Empty` or `Ready`
//!
//! The first tick runs as soon as the background task is scheduled; each
//! following tick starts one interval after the previous one settled, so
//! two ticks never overlap.
//!
//! ## Stopping
//!
//! [`RefreshHandle::stop`] cancels the pending sleep. A fetch already in
//! flight is allowed to finish, but its result is discarded. Settling and
//! stopping share a lock, so once `stop` returns no callback can fire.
//! A callback may stop its own loop: the stop takes effect as soon as that
//! callback returns.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, ThreadId};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;

use gridwatch_domain::error::display_chain;
use gridwatch_domain::state::RefreshState;
use gridwatch_domain::time::now;
use gridwatch_domain::window::{DEFAULT_WINDOW_SIZE, Snapshot};

use crate::ports::{DatasetSource, RefreshCallbacks};

/// Poll interval used unless configured otherwise.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(1000);

/// Polling parameters supplied at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshConfig {
    /// Delay between the end of one tick and the start of the next.
    pub interval: Duration,
    /// Maximum number of readings in the recent window.
    pub window_size: usize,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            window_size: DEFAULT_WINDOW_SIZE,
        }
    }
}

/// Starts polling loops with a fixed [`RefreshConfig`].
#[derive(Debug, Clone, Default)]
pub struct RefreshController {
    config: RefreshConfig,
}

impl RefreshController {
    /// Create a controller with the given configuration.
    #[must_use]
    pub fn new(config: RefreshConfig) -> Self {
        Self { config }
    }

    /// Configuration used by loops started from this controller.
    #[must_use]
    pub fn config(&self) -> RefreshConfig {
        self.config
    }

    /// Spawn a polling loop on the current tokio runtime.
    ///
    /// The first fetch is issued immediately. Failures never escape: each
    /// one is reported through `callbacks.on_error` and the loop carries on.
    /// Dropping the returned handle stops the loop.
    #[must_use = "dropping the handle stops the polling loop"]
    pub fn start<S, C>(&self, source: S, callbacks: C) -> RefreshHandle
    where
        S: DatasetSource + 'static,
        C: RefreshCallbacks + 'static,
    {
        let (state, _) = watch::channel(RefreshState::Idle);
        let shared = Arc::new(Shared {
            gate: Mutex::new(()),
            stopped: AtomicBool::new(false),
            settling: Mutex::new(None),
            state,
        });
        let token = CancellationToken::new();

        let poller = Poller {
            source,
            callbacks,
            shared: Arc::clone(&shared),
            token: token.clone(),
            config: self.config,
            tick: 0,
        };
        let task = tokio::spawn(poller.run());

        tracing::info!(
            interval = ?self.config.interval,
            window_size = self.config.window_size,
            "refresh controller started"
        );

        RefreshHandle {
            shared,
            token,
            task: Some(task),
        }
    }
}

/// State shared between a [`RefreshHandle`] and its background task.
struct Shared {
    /// Held while a tick settles and while `stop` flips `stopped`.
    gate: Mutex<()>,
    stopped: AtomicBool,
    /// Thread running a callback, if any.
    settling: Mutex<Option<ThreadId>>,
    state: watch::Sender<RefreshState>,
}

impl Shared {
    /// Whether the caller is inside a callback of this loop, and so already
    /// holds `gate`.
    fn is_settling_here(&self) -> bool {
        *self.settling.lock().unwrap_or_else(PoisonError::into_inner)
            == Some(thread::current().id())
    }
}

/// Marks the current thread as running a callback until dropped.
struct SettlingGuard<'a>(&'a Mutex<Option<ThreadId>>);

impl<'a> SettlingGuard<'a> {
    fn enter(slot: &'a Mutex<Option<ThreadId>>) -> Self {
        *slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(thread::current().id());
        Self(slot)
    }
}

impl Drop for SettlingGuard<'_> {
    fn drop(&mut self) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

/// Handle to a running polling loop.
pub struct RefreshHandle {
    shared: Arc<Shared>,
    token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl RefreshHandle {
    /// Stop polling.
    ///
    /// Waits for a callback that is currently executing, then guarantees
    /// that no further callback fires. Idempotent. The state is reset to
    /// [`RefreshState::Idle`].
    ///
    /// Called from inside one of this loop's callbacks, it returns at once
    /// and the loop exits when that callback returns.
    pub fn stop(&self) {
        if self.shared.is_settling_here() {
            if !self.shared.stopped.swap(true, Ordering::SeqCst) {
                self.token.cancel();
                tracing::info!("refresh controller stopped from callback");
            }
            return;
        }

        let _gate = self
            .shared
            .gate
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if self.shared.stopped.swap(true, Ordering::SeqCst) {
            return;
        }
        self.token.cancel();
        self.shared.state.send_replace(RefreshState::Idle);
        tracing::info!("refresh controller stopped");
    }

    /// Whether [`stop`](Self::stop) has been called.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.shared.stopped.load(Ordering::SeqCst)
    }

    /// Snapshot of the current refresh state.
    #[must_use]
    pub fn state(&self) -> RefreshState {
        self.shared.state.borrow().clone()
    }

    /// Receiver notified on every state transition.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<RefreshState> {
        self.shared.state.subscribe()
    }

    /// Stop the loop and wait for the background task to exit.
    ///
    /// If a fetch is in flight this waits for it to resolve (its result is
    /// discarded).
    ///
    /// # Errors
    ///
    /// Returns the [`JoinError`] if the background task panicked, which
    /// only happens when a callback panics.
    pub async fn join(mut self) -> Result<(), JoinError> {
        self.stop();
        match self.task.take() {
            Some(task) => task.await,
            None => Ok(()),
        }
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// The background task of one polling loop.
struct Poller<S, C> {
    source: S,
    callbacks: C,
    shared: Arc<Shared>,
    token: CancellationToken,
    config: RefreshConfig,
    tick: u64,
}

impl<S: DatasetSource, C: RefreshCallbacks> Poller<S, C> {
    /// Tick, wait for the interval, repeat until cancelled.
    async fn run(mut self) {
        while self.iterate().await {
            tokio::select! {
                () = self.token.cancelled() => break,
                () = tokio::time::sleep(self.config.interval) => {}
            }
        }
        tracing::debug!(ticks = self.tick, "refresh loop exited");
    }

    /// Run a single tick. Returns `false` once the loop has been stopped.
    async fn iterate(&mut self) -> bool {
        self.tick += 1;
        let tick = self.tick;

        if !self.settle(|_, state| {
            state.send_replace(RefreshState::Loading);
        }) {
            return false;
        }

        let result = self.source.fetch_dataset().await;

        let window_size = self.config.window_size;
        let settled = self.settle(|callbacks, state| match result {
            Err(err) => {
                let message = display_chain(&err);
                tracing::warn!(tick, error = %message, "refresh failed, retrying next interval");
                state.send_replace(RefreshState::Error(message.clone()));
                callbacks.on_error(&message);
            }
            Ok(dataset) => match Snapshot::derive(&dataset, window_size) {
                None => {
                    tracing::debug!(tick, "source returned an empty dataset");
                    state.send_replace(RefreshState::Empty);
                    callbacks.on_empty();
                }
                Some(snapshot) => {
                    tracing::debug!(
                        tick,
                        readings = dataset.len(),
                        window = snapshot.window.len(),
                        "refresh succeeded"
                    );
                    state.send_replace(RefreshState::Ready(now()));
                    callbacks.on_ready(snapshot.latest, snapshot.window);
                }
            },
        });

        if !settled {
            tracing::debug!(tick, "discarding result of fetch that outlived stop");
        }
        settled
    }

    /// Apply `f` unless the loop has been stopped, holding the stop gate
    /// for the duration of the call. Returns `false` if the loop is stopped
    /// before or during `f`.
    fn settle(&mut self, f: impl FnOnce(&mut C, &watch::Sender<RefreshState>)) -> bool {
        let _gate = self
            .shared
            .gate
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if self.shared.stopped.load(Ordering::SeqCst) {
            return false;
        }
        {
            let _settling = SettlingGuard::enter(&self.shared.settling);
            f(&mut self.callbacks, &self.shared.state);
        }
        if self.shared.stopped.load(Ordering::SeqCst) {
            self.shared.state.send_replace(RefreshState::Idle);
            return false;
        }
        true
    }
}
