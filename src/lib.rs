//! DayCache suggestion core
//!
//! Debounced, cancelable completion suggestions for the journal entry
//! composer, plus the configuration and HTTP plumbing around them.

pub mod composer;
pub mod config;
pub mod error;
pub mod suggest;


pub use composer::Composer;
pub use config::{Config, SuggestMode, SuggestionConfig};
pub use error::ConfigError;
pub use suggest::{
    ControllerError, ControllerPhase, FetchError, HttpSuggestionFetcher, Query,
    SuggestionController, SuggestionFetcher, SuggestionResult,
};
