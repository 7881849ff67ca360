//! Server-side session state: the last search and the products a view made
//! selectable.
//!
//! Sessions live only in memory, keyed by the `pp_session` cookie, and are
//! dropped after an idle period. Nothing here survives a restart.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use pricepulse_core::Product;
use uuid::Uuid;

use crate::middleware::SessionId;

#[derive(Debug, Default)]
struct SessionEntry {
    saved_query: String,
    /// The result list exactly as serialized on save.
    saved_results: Option<String>,
    /// Payloads the last rendered grid offered for selection, by product id.
    carried: HashMap<i64, Product>,
    search_in_flight: bool,
    /// Query of the search currently in flight.
    pending_query: Option<String>,
    /// Query of the last search that failed, until a view reports it.
    failed_query: Option<String>,
    last_seen: Option<Instant>,
}

/// All live sessions. Cloning shares the same map.
#[derive(Debug, Clone)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<Uuid, SessionEntry>>>,
    idle_timeout: Duration,
}

impl SessionStore {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            idle_timeout,
        }
    }

    /// Handle scoped to one session. Marks the session as recently used.
    pub fn cache(&self, id: SessionId) -> SessionCache {
        self.lock().entry(id.0).or_default().last_seen = Some(Instant::now());
        SessionCache {
            store: self.clone(),
            id: id.0,
        }
    }

    /// Drops sessions idle for longer than the configured timeout, except
    /// those with a search in flight. Returns how many were removed.
    pub fn evict_idle(&self) -> usize {
        let timeout = self.idle_timeout;
        let mut sessions = self.lock();
        let before = sessions.len();
        sessions.retain(|_, entry| {
            entry.search_in_flight || entry.last_seen.is_some_and(|t| t.elapsed() < timeout)
        });
        before - sessions.len()
    }

    pub fn live_sessions(&self) -> usize {
        self.lock().len()
    }

    // No lock is ever held across an await or a panic-prone call, so a
    // poisoned map is still consistent.
    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, SessionEntry>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn with_entry<T>(&self, id: Uuid, f: impl FnOnce(&mut SessionEntry) -> T) -> T {
        f(self.lock().entry(id).or_default())
    }
}

/// One session's view of the store: the Session Cache (`save`/`load`) plus
/// carried navigation state and the in-flight search flag.
#[derive(Debug, Clone)]
pub struct SessionCache {
    store: SessionStore,
    id: Uuid,
}

impl SessionCache {
    /// Replaces the saved search. Never merges with the previous one.
    pub fn save(&self, query: &str, results: &[Product]) {
        let serialized = match serde_json::to_string(results) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, "could not serialize search results for session");
                return;
            }
        };
        self.store.with_entry(self.id, |entry| {
            entry.saved_query = query.to_owned();
            entry.saved_results = Some(serialized);
            entry.failed_query = None;
        });
    }

    /// The last saved `(query, results)`, or empty values when nothing was
    /// saved. Unreadable results are logged and treated as absent.
    pub fn load(&self) -> (String, Vec<Product>) {
        let (query, serialized) = self
            .store
            .with_entry(self.id, |entry| (entry.saved_query.clone(), entry.saved_results.clone()));

        let results = match serialized.as_deref().map(serde_json::from_str::<Vec<Product>>) {
            Some(Ok(results)) => results,
            Some(Err(e)) => {
                tracing::warn!(error = %e, "discarding unreadable session results");
                Vec::new()
            }
            None => Vec::new(),
        };
        (query, results)
    }

    /// Replaces the carried products with the ones just rendered as
    /// selectable cards.
    pub fn carry<'a>(&self, products: impl IntoIterator<Item = &'a Product>) {
        let carried: HashMap<i64, Product> =
            products.into_iter().map(|p| (p.id, p.clone())).collect();
        self.store.with_entry(self.id, |entry| entry.carried = carried);
    }

    /// The payload carried for `product_id`, if the last grid offered it.
    pub fn carried(&self, product_id: i64) -> Option<Product> {
        self.store
            .with_entry(self.id, |entry| entry.carried.get(&product_id).cloned())
    }

    /// Claims the session's single search slot for `query`.
    ///
    /// Returns `None` while another search for this session is in flight.
    /// The slot is released when the guard drops, whether the search
    /// settled or the task running it was aborted.
    pub fn try_begin_search(&self, query: &str) -> Option<SearchGuard> {
        let claimed = self.store.with_entry(self.id, |entry| {
            if entry.search_in_flight {
                false
            } else {
                entry.search_in_flight = true;
                entry.pending_query = Some(query.to_owned());
                true
            }
        });
        claimed.then(|| SearchGuard {
            cache: self.clone(),
        })
    }

    /// The query of the search in flight for this session, if any.
    pub fn pending_search(&self) -> Option<String> {
        self.store.with_entry(self.id, |entry| {
            if entry.search_in_flight {
                entry.pending_query.clone()
            } else {
                None
            }
        })
    }

    /// Records that the search for `query` failed. The saved search is
    /// left as it was.
    pub fn record_failure(&self, query: &str) {
        self.store
            .with_entry(self.id, |entry| entry.failed_query = Some(query.to_owned()));
    }

    /// The query of an unreported failed search. Reported once.
    pub fn take_failure(&self) -> Option<String> {
        self.store.with_entry(self.id, |entry| entry.failed_query.take())
    }
}

/// Holds a session's search slot; see [`SessionCache::try_begin_search`].
#[derive(Debug)]
pub struct SearchGuard {
    cache: SessionCache,
}

impl Drop for SearchGuard {
    fn drop(&mut self) {
        self.cache
            .store
            .with_entry(self.cache.id, |entry| {
                entry.search_in_flight = false;
                entry.pending_query = None;
            });
    }
}
