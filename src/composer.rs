//! Journal entry composer state
//!
//! Holds the entry text and the ghost-text suggestion shown after it.
//! Suggestions arrive from a [`SuggestionController`] through a channel and
//! are applied when the owner polls, so the composer itself stays
//! single-owner and `&mut`-driven.

use tokio::sync::mpsc::{self, UnboundedReceiver};

use crate::config::SuggestionConfig;
use crate::suggest::{
    ControllerError, ControllerPhase, SuggestionController, SuggestionFetcher, SuggestionResult,
};

pub struct Composer<F: SuggestionFetcher> {
    text: String,
    suggestion: Option<String>,
    controller: SuggestionController<F>,
    results_rx: UnboundedReceiver<SuggestionResult>,
}

impl<F: SuggestionFetcher> Composer<F> {
    /// Create a composer; must be called inside a tokio runtime
    ///
    /// Fetch failures are logged and otherwise only show up as "no
    /// suggestion".
    pub fn new(config: &SuggestionConfig, fetcher: F) -> Result<Self, ControllerError> {
        let (results_tx, results_rx) = mpsc::unbounded_channel();
        let controller = SuggestionController::new(
            config,
            fetcher,
            move |result| {
                // Receiver gone means the composer is being dropped
                let _ = results_tx.send(result);
            },
            |err| log::warn!("Suggestion unavailable: {}", err),
        )?;

        Ok(Self {
            text: String::new(),
            suggestion: None,
            controller,
            results_rx,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Suggestion to render after the text, if any
    pub fn ghost_text(&self) -> Option<&str> {
        self.suggestion.as_deref()
    }

    pub fn phase(&self) -> ControllerPhase {
        self.controller.phase()
    }

    /// Replace the entry text (one call per keystroke)
    ///
    /// Hides the current suggestion and asks the controller for a new one.
    pub fn input(&mut self, text: impl Into<String>) -> Result<(), ControllerError> {
        self.text = text.into();
        self.suggestion = None;
        // Anything still queued was produced for the previous text
        while self.results_rx.try_recv().is_ok() {}
        self.controller.submit(self.text.as_str())
    }

    /// Apply every result delivered so far; returns true if any arrived
    pub fn poll_results(&mut self) -> bool {
        let mut received = false;
        while self.try_next_result().is_some() {
            received = true;
        }
        received
    }

    /// Apply the next already-delivered result, if there is one
    pub fn try_next_result(&mut self) -> Option<SuggestionResult> {
        let result = self.results_rx.try_recv().ok()?;
        self.apply(result.clone());
        Some(result)
    }

    /// Wait for the next delivered result and apply it
    ///
    /// Cancel safe: a result is only consumed when this returns.
    pub async fn next_result(&mut self) -> Option<SuggestionResult> {
        let result = self.results_rx.recv().await?;
        self.apply(result.clone());
        Some(result)
    }

    fn apply(&mut self, result: SuggestionResult) {
        self.suggestion = result.filter(|_| !self.text.is_empty());
    }

    /// Accept the shown suggestion (Tab/Enter)
    ///
    /// Returns false when nothing is shown, so the key can be handled
    /// normally.
    pub fn accept(&mut self) -> bool {
        match self.suggestion.take() {
            Some(suffix) if !self.text.is_empty() => {
                self.text.push_str(&suffix);
                true
            }
            _ => false,
        }
    }

    /// Input lost focus
    pub fn blur(&mut self) {
        self.suggestion = None;
    }

    /// Hand the entry off for saving and reset the composer
    ///
    /// Returns `Ok(None)` and leaves everything untouched when the text is
    /// blank.
    pub fn take_entry(&mut self) -> Result<Option<String>, ControllerError> {
        if self.text.trim().is_empty() {
            return Ok(None);
        }
        let entry = std::mem::take(&mut self.text);
        self.suggestion = None;
        self.controller.submit("")?;
        // Drop the `None` the blank submit just delivered
        while self.results_rx.try_recv().is_ok() {}
        Ok(Some(entry))
    }
}

#[cfg(test)]
#[path = "composer_tests.rs"]
mod composer_tests;
