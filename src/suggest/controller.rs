//! Suggestion controller
//!
//! Turns a rapid stream of keystrokes into at most one suggestion fetch per
//! pause (debounce) or per window (throttle), and guarantees only the
//! freshest response reaches the sink.
//!
//! Sink calls are decided under the state lock but made after it is
//! released, so the sink and error callbacks may call back into the
//! controller, including `submit`. A delivery overtaken by a later `submit`
//! is dropped before it reaches the sink.

mod state;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use self::state::{ControllerState, PendingTimer};
use super::error::{ControllerError, FetchError};
use super::fetcher::SuggestionFetcher;
use super::types::{ControllerPhase, Query, RequestToken, SuggestionResult};
use crate::config::{SuggestMode, SuggestionConfig};

type ResultSink = Box<dyn Fn(SuggestionResult) + Send + Sync>;
type ErrorSink = Box<dyn Fn(&FetchError) + Send + Sync>;

/// Debounced/throttled, cancelable suggestion fetching
///
/// Dropping the controller disposes it.
pub struct SuggestionController<F: SuggestionFetcher> {
    shared: Arc<Shared<F>>,
}

struct Shared<F> {
    delay: Duration,
    mode: SuggestMode,
    fetcher: F,
    on_result: ResultSink,
    on_error: ErrorSink,
    runtime: Handle,
    state: Mutex<ControllerState>,
}

/// A fetch that has been assigned a token but not yet awaited
struct PreparedFetch {
    query: Query,
    token: RequestToken,
    cancel: CancellationToken,
}

impl<F: SuggestionFetcher> SuggestionController<F> {
    /// Create a controller bound to the current tokio runtime
    ///
    /// # Arguments
    /// * `config` - Delay window and debounce/throttle mode
    /// * `fetcher` - Produces suggestions; must honour its cancellation token
    /// * `on_result` - Receives every delivered suggestion (or `None`)
    /// * `on_error` - Receives non-cancellation fetch failures
    pub fn new<R, E>(
        config: &SuggestionConfig,
        fetcher: F,
        on_result: R,
        on_error: E,
    ) -> Result<Self, ControllerError>
    where
        R: Fn(SuggestionResult) + Send + Sync + 'static,
        E: Fn(&FetchError) + Send + Sync + 'static,
    {
        let runtime = Handle::try_current().map_err(|_| ControllerError::NoRuntime)?;

        Ok(Self {
            shared: Arc::new(Shared {
                delay: config.delay(),
                mode: config.mode,
                fetcher,
                on_result: Box::new(on_result),
                on_error: Box::new(on_error),
                runtime,
                state: Mutex::new(ControllerState::default()),
            }),
        })
    }

    /// Record new input
    ///
    /// Blank input cancels everything and delivers `None`, before returning
    /// unless a sink call is already in progress on another path.
    /// Any other input cancels the in-flight fetch and schedules a new one
    /// according to the configured mode.
    ///
    /// Returns `ControllerError::Disposed` after [`dispose`](Self::dispose);
    /// the call then has no effect.
    pub fn submit(&self, query: impl Into<Query>) -> Result<(), ControllerError> {
        let query = query.into();
        let mut state = self.shared.lock_state();
        if state.disposed {
            return Err(ControllerError::Disposed);
        }
        state.bump_epoch();

        if query.is_blank() {
            state.clear_timer();
            if let Some(token) = state.cancel_active() {
                log::debug!("Cancelled request {} (input cleared)", token);
            }
            state.query = None;
            state.queue_delivery(None, None);
            self.shared.flush_deliveries(state);
            return Ok(());
        }

        if let Some(token) = state.cancel_active() {
            log::debug!("Cancelled request {} (superseded by new input)", token);
        }
        state.query = Some(query);

        match self.shared.mode {
            SuggestMode::Debounce => {
                state.clear_timer();
                self.shared.arm_timer(&mut state, self.shared.delay);
            }
            SuggestMode::Throttle => {
                if state.pending_timer.is_some() {
                    // The armed timer picks up the newest query when it fires
                    return Ok(());
                }
                let now = Instant::now();
                let window_start = state.window_start;
                match window_start {
                    Some(start) if now.duration_since(start) < self.shared.delay => {
                        let remaining = self.shared.delay - now.duration_since(start);
                        self.shared.arm_timer(&mut state, remaining);
                    }
                    _ => self.shared.spawn_fetch(&mut state),
                }
            }
        }

        Ok(())
    }

    /// Clear the pending timer and cancel the in-flight fetch
    ///
    /// Idempotent. Subsequent `submit` calls return `ControllerError::Disposed`.
    pub fn dispose(&self) {
        let mut state = self.shared.lock_state();
        if state.disposed {
            return;
        }
        state.disposed = true;
        state.clear_timer();
        if let Some(token) = state.cancel_active() {
            log::debug!("Cancelled request {} (controller disposed)", token);
        }
        state.query = None;
        state.deliveries.clear();
        log::debug!("Suggestion controller disposed");
    }

    /// Current state machine phase
    pub fn phase(&self) -> ControllerPhase {
        self.shared.lock_state().phase()
    }

    /// True once [`dispose`](Self::dispose) has run
    pub fn is_disposed(&self) -> bool {
        self.shared.lock_state().disposed
    }
}

impl<F: SuggestionFetcher> Drop for SuggestionController<F> {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl<F: SuggestionFetcher> Shared<F> {
    fn lock_state(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn arm_timer(self: &Arc<Self>, state: &mut ControllerState, delay: Duration) {
        let generation = state.next_timer_generation();
        let shared = Arc::clone(self);
        let handle = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            shared.on_timer(generation).await;
        });
        state.pending_timer = Some(PendingTimer { generation, handle });
    }

    /// Start a fetch right away (throttle leading edge)
    fn spawn_fetch(self: &Arc<Self>, state: &mut ControllerState) {
        if let Some(fetch) = self.prepare_fetch(state) {
            let shared = Arc::clone(self);
            self.runtime.spawn(async move {
                shared.run_fetch(fetch).await;
            });
        }
    }

    async fn on_timer(&self, generation: u64) {
        let fetch = {
            let mut state = self.lock_state();
            if state.disposed || !state.timer_is_current(generation) {
                return;
            }
            // This task becomes the fetch task; nothing may abort it now
            state.pending_timer = None;
            self.prepare_fetch(&mut state)
        };

        if let Some(fetch) = fetch {
            self.run_fetch(fetch).await;
        }
    }

    fn prepare_fetch(&self, state: &mut ControllerState) -> Option<PreparedFetch> {
        let query = state.query.clone()?;
        let (token, cancel) = state.begin_request(Instant::now());
        log::debug!("Starting suggestion request {} ({} chars)", token, query.as_str().len());
        Some(PreparedFetch {
            query,
            token,
            cancel,
        })
    }

    async fn run_fetch(&self, fetch: PreparedFetch) {
        let PreparedFetch {
            query,
            token,
            cancel,
        } = fetch;
        let outcome = self.fetcher.fetch(query, cancel).await;
        self.complete(token, outcome);
    }

    fn complete(&self, token: RequestToken, outcome: Result<SuggestionResult, FetchError>) {
        let mut state = self.lock_state();
        let current = state.finish_request(token);

        match outcome {
            Ok(result) if current => {
                log::debug!("Request {} completed", token);
                state.queue_delivery(result, None);
            }
            Ok(_) => {
                log::debug!("Discarding stale result for request {}", token);
            }
            Err(FetchError::Cancelled) => {
                log::debug!("Request {} cancelled", token);
            }
            Err(err) if current => {
                log::warn!("Suggestion request {} failed: {}", token, err);
                state.queue_delivery(None, Some(err));
            }
            Err(err) => {
                log::debug!("Discarding stale failure for request {}: {}", token, err);
            }
        }

        self.flush_deliveries(state);
    }

    /// Make queued sink calls with the state lock released
    ///
    /// Only one caller drains at a time, which keeps deliveries in queue
    /// order. A callback that re-enters the controller only queues; the
    /// drainer already running picks its delivery up.
    fn flush_deliveries<'a>(&'a self, mut state: MutexGuard<'a, ControllerState>) {
        if state.delivering {
            return;
        }
        state.delivering = true;
        let mut guard = DrainGuard {
            shared: self,
            armed: true,
        };

        loop {
            let Some(delivery) = state.next_delivery() else {
                state.delivering = false;
                guard.armed = false;
                return;
            };
            drop(state);

            (self.on_result)(delivery.result);
            if let Some(err) = &delivery.error {
                (self.on_error)(err);
            }

            state = self.lock_state();
        }
    }
}

/// Releases the drain flag if a callback panics mid-delivery
struct DrainGuard<'a, F: SuggestionFetcher> {
    shared: &'a Shared<F>,
    armed: bool,
}

impl<F: SuggestionFetcher> Drop for DrainGuard<'_, F> {
    fn drop(&mut self) {
        if self.armed {
            self.shared.lock_state().delivering = false;
        }
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod controller_tests;
