//! Mutable controller state
//!
//! Everything here runs under the controller's mutex. Timer and request
//! bookkeeping follows one rule: a completion or timer callback only acts
//! if its generation/token still matches what the state holds.
//!
//! Sink calls are queued here and made with the mutex released. Each queued
//! delivery carries the submit epoch it was produced in; a later submit
//! bumps the epoch, so a delivery it overtook is dropped instead of made.

use std::collections::VecDeque;

use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::suggest::error::FetchError;
use crate::suggest::types::{ControllerPhase, Query, RequestToken, SuggestionResult};

pub(super) struct PendingTimer {
    pub generation: u64,
    pub handle: JoinHandle<()>,
}

pub(super) struct ActiveRequest {
    pub token: RequestToken,
    pub cancel: CancellationToken,
}

pub(super) struct Delivery {
    pub epoch: u64,
    pub result: SuggestionResult,
    pub error: Option<FetchError>,
}

#[derive(Default)]
pub(super) struct ControllerState {
    pub pending_timer: Option<PendingTimer>,
    pub active_request: Option<ActiveRequest>,
    pub latest_token: RequestToken,
    /// Bumped each time a timer is armed so a superseded timer can't fire
    pub timer_generation: u64,
    /// Latest non-blank input, consumed by the next fetch
    pub query: Option<Query>,
    /// When the most recent fetch started; anchors the throttle window
    pub window_start: Option<Instant>,
    /// Bumped on every submit
    pub epoch: u64,
    pub deliveries: VecDeque<Delivery>,
    /// Some caller is already draining `deliveries`
    pub delivering: bool,
    pub disposed: bool,
}

impl ControllerState {
    pub fn phase(&self) -> ControllerPhase {
        if self.disposed {
            ControllerPhase::Disposed
        } else if self.active_request.is_some() {
            ControllerPhase::Fetching
        } else if self.pending_timer.is_some() {
            ControllerPhase::TimerArmed
        } else {
            ControllerPhase::Idle
        }
    }

    pub fn bump_epoch(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
    }

    /// Queue a sink call for the current epoch
    pub fn queue_delivery(&mut self, result: SuggestionResult, error: Option<FetchError>) {
        self.deliveries.push_back(Delivery {
            epoch: self.epoch,
            result,
            error,
        });
    }

    /// Pop the next delivery still valid for the current epoch
    pub fn next_delivery(&mut self) -> Option<Delivery> {
        while let Some(delivery) = self.deliveries.pop_front() {
            if !self.disposed && delivery.epoch == self.epoch {
                return Some(delivery);
            }
        }
        None
    }

    /// Abort the pending timer, if any. Returns true if one was pending.
    pub fn clear_timer(&mut self) -> bool {
        match self.pending_timer.take() {
            Some(timer) => {
                timer.handle.abort();
                true
            }
            None => false,
        }
    }

    pub fn next_timer_generation(&mut self) -> u64 {
        self.timer_generation = self.timer_generation.wrapping_add(1);
        self.timer_generation
    }

    /// True if `generation` belongs to the timer currently pending
    pub fn timer_is_current(&self, generation: u64) -> bool {
        self.pending_timer
            .as_ref()
            .is_some_and(|timer| timer.generation == generation)
    }

    /// Signal the in-flight fetch to stop and forget it
    ///
    /// Returns the token of the cancelled request. Its eventual completion,
    /// whatever the outcome, no longer matches `active_request` and is
    /// discarded.
    pub fn cancel_active(&mut self) -> Option<RequestToken> {
        self.active_request.take().map(|request| {
            request.cancel.cancel();
            request.token
        })
    }

    /// Mint a token for a new fetch, cancelling any fetch still in flight
    pub fn begin_request(&mut self, now: Instant) -> (RequestToken, CancellationToken) {
        self.cancel_active();
        let token = self.latest_token.next();
        let cancel = CancellationToken::new();
        self.latest_token = token;
        self.active_request = Some(ActiveRequest {
            token,
            cancel: cancel.clone(),
        });
        self.window_start = Some(now);
        (token, cancel)
    }

    /// Record that the fetch for `token` finished
    ///
    /// Returns true only when the result may reach the sink: the token is
    /// still the active request and the latest one minted.
    pub fn finish_request(&mut self, token: RequestToken) -> bool {
        let is_active = self
            .active_request
            .as_ref()
            .is_some_and(|request| request.token == token);
        if is_active {
            self.active_request = None;
        }
        is_active && token == self.latest_token && !self.disposed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_idle() {
        let state = ControllerState::default();
        assert_eq!(state.phase(), ControllerPhase::Idle);
        assert_eq!(state.latest_token, RequestToken::default());
    }

    #[test]
    fn test_begin_request_mints_increasing_tokens() {
        let mut state = ControllerState::default();
        let (first, _) = state.begin_request(Instant::now());
        let (second, _) = state.begin_request(Instant::now());

        assert!(second > first);
        assert_eq!(state.latest_token, second);
        assert_eq!(state.phase(), ControllerPhase::Fetching);
    }

    #[test]
    fn test_begin_request_cancels_previous() {
        let mut state = ControllerState::default();
        let (_, first_cancel) = state.begin_request(Instant::now());
        let (_, second_cancel) = state.begin_request(Instant::now());

        assert!(first_cancel.is_cancelled());
        assert!(!second_cancel.is_cancelled());
    }

    #[test]
    fn test_finish_current_request_is_deliverable() {
        let mut state = ControllerState::default();
        let (token, _) = state.begin_request(Instant::now());

        assert!(state.finish_request(token));
        assert!(state.active_request.is_none());
        assert_eq!(state.phase(), ControllerPhase::Idle);
    }

    #[test]
    fn test_finish_superseded_request_is_stale() {
        let mut state = ControllerState::default();
        let (first, _) = state.begin_request(Instant::now());
        let (second, _) = state.begin_request(Instant::now());

        assert!(!state.finish_request(first));
        // The newer request is untouched by the stale completion
        assert_eq!(state.phase(), ControllerPhase::Fetching);
        assert!(state.finish_request(second));
    }

    #[test]
    fn test_finish_cancelled_request_is_stale() {
        let mut state = ControllerState::default();
        let (token, cancel) = state.begin_request(Instant::now());

        assert_eq!(state.cancel_active(), Some(token));
        assert!(cancel.is_cancelled());
        assert!(!state.finish_request(token));
    }

    #[test]
    fn test_finish_after_dispose_is_stale() {
        let mut state = ControllerState::default();
        let (token, _) = state.begin_request(Instant::now());
        state.disposed = true;

        assert!(!state.finish_request(token));
        assert_eq!(state.phase(), ControllerPhase::Disposed);
    }

    #[test]
    fn test_delivery_overtaken_by_submit_is_dropped() {
        let mut state = ControllerState::default();
        state.queue_delivery(Some("lo".to_string()), None);
        state.bump_epoch();
        state.queue_delivery(None, None);

        let delivery = state.next_delivery().unwrap();
        assert_eq!(delivery.result, None);
        assert!(state.next_delivery().is_none());
    }

    #[test]
    fn test_no_deliveries_after_dispose() {
        let mut state = ControllerState::default();
        state.queue_delivery(None, None);
        state.disposed = true;
        assert!(state.next_delivery().is_none());
    }

    #[test]
    fn test_cancel_active_without_request() {
        let mut state = ControllerState::default();
        assert_eq!(state.cancel_active(), None);
    }

    #[test]
    fn test_timer_generations_are_distinct() {
        let mut state = ControllerState::default();
        let first = state.next_timer_generation();
        let second = state.next_timer_generation();
        assert_ne!(first, second);
        assert!(!state.timer_is_current(first));
    }
}
