use pricepulse_catalog::CatalogClient;
use pricepulse_core::Product;

use crate::session::{SearchGuard, SessionCache};

/// What the home view should show.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchPhase {
    /// Results are current.
    Ready,
    /// A search for this session has not settled yet.
    Loading,
    /// The catalog request failed; `results` are the previous ones.
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchState {
    /// Text shown in the search box.
    pub query: String,
    pub results: Vec<Product>,
    pub phase: SearchPhase,
}

/// What the home view shows without a new submission: the search in
/// flight, an unreported failure over the previous results, or the saved
/// search.
pub fn restore(cache: &SessionCache) -> SearchState {
    if let Some(query) = cache.pending_search() {
        return SearchState {
            query,
            results: Vec::new(),
            phase: SearchPhase::Loading,
        };
    }

    let (saved_query, results) = cache.load();
    match cache.take_failure() {
        Some(query) => SearchState {
            query,
            results,
            phase: SearchPhase::Failed,
        },
        None => SearchState {
            query: saved_query,
            results,
            phase: SearchPhase::Ready,
        },
    }
}

/// Accepts one search submission for a session.
///
/// Blank queries issue no request and leave the session untouched. A
/// submission made while the session already has a search in flight is
/// ignored. Otherwise the request runs in a background task that writes the
/// outcome to the session, and the view renders the loading state until a
/// later [`restore`] sees it settle.
pub fn submit_query(catalog: &CatalogClient, cache: &SessionCache, query: &str) -> SearchState {
    let query = query.trim();
    if query.is_empty() {
        return restore(cache);
    }

    match cache.try_begin_search(query) {
        Some(slot) => {
            tokio::spawn(run_search(
                catalog.clone(),
                cache.clone(),
                query.to_owned(),
                slot,
            ));
        }
        None => {
            tracing::debug!(query, "search already in flight for session; ignoring submission");
        }
    }

    SearchState {
        query: query.to_owned(),
        results: Vec::new(),
        phase: SearchPhase::Loading,
    }
}

/// Runs the catalog search and records the outcome. The slot is held until
/// the session has been written, so the view never sees a settled search
/// without its results.
async fn run_search(catalog: CatalogClient, cache: SessionCache, query: String, slot: SearchGuard) {
    match catalog.search(&query).await {
        Ok(results) => {
            tracing::info!(query, count = results.len(), "search completed");
            cache.save(&query, &results);
        }
        Err(e) => {
            tracing::warn!(error = %e, query, "search failed; keeping previous results");
            cache.record_failure(&query);
        }
    }
    drop(slot);
}
