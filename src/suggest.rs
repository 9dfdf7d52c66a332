//! Journal-entry suggestions
//!
//! [`SuggestionController`] owns the timing and staleness rules,
//! [`SuggestionFetcher`] is the injected transport seam and
//! [`HttpSuggestionFetcher`] talks to the DayCache autocomplete endpoint.

pub mod controller;
pub mod error;
pub mod fetcher;
pub mod http;
pub mod types;

pub use controller::SuggestionController;
pub use error::{ControllerError, FetchError};
pub use fetcher::SuggestionFetcher;
pub use http::HttpSuggestionFetcher;
pub use types::{ControllerPhase, Query, RequestToken, SuggestionResult};
