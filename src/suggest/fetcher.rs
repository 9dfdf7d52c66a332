//! Injected fetch seam
//!
//! The controller knows nothing about transport. Anything that can turn a
//! query into a suggestion, and stop when its cancellation token fires,
//! implements [`SuggestionFetcher`]. Closures get it for free.

use std::future::Future;

use tokio_util::sync::CancellationToken;

use super::error::FetchError;
use super::types::{Query, SuggestionResult};

pub trait SuggestionFetcher: Send + Sync + 'static {
    /// Fetch the best completion suffix for `query`
    ///
    /// Implementations should return `Err(FetchError::Cancelled)` once
    /// `cancel` fires. The controller still tolerates a late `Ok` from a
    /// cancelled fetch and discards it.
    fn fetch(
        &self,
        query: Query,
        cancel: CancellationToken,
    ) -> impl Future<Output = Result<SuggestionResult, FetchError>> + Send;
}

impl<F, Fut> SuggestionFetcher for F
where
    F: Fn(Query, CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<SuggestionResult, FetchError>> + Send,
{
    fn fetch(
        &self,
        query: Query,
        cancel: CancellationToken,
    ) -> impl Future<Output = Result<SuggestionResult, FetchError>> + Send {
        self(query, cancel)
    }
}
