//! Debouncing, supersession and de-duplication of searches.
//!
//! [`SearchCoordinator`] sits between the input source and the pipeline.
//! Every keystroke restarts a debounce window; when the window elapses the
//! current query is resolved on a background task. New input cancels the
//! previous task unless it normalizes to the same query, and only the
//! latest task may deliver results.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::classify::normalize_query;
use super::pipeline::{PipelineState, Resolution, SearchPipeline};
use crate::domain::SearchResult;

/// Default quiet period before a query is resolved.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

// ============================================================================
// In-Flight Set
// ============================================================================

/// Normalized queries currently being resolved.
#[derive(Debug, Default)]
pub struct InFlightSet {
    queries: Mutex<HashSet<String>>,
}

impl InFlightSet {
    /// Marks `query` in flight, or returns `None` if it already is.
    ///
    /// The marker is cleared when the guard drops, however the run ends.
    pub fn try_acquire(&self, query: &str) -> Option<InFlightGuard<'_>> {
        let inserted = self.queries.lock().insert(query.to_string());
        inserted.then(|| InFlightGuard {
            set: self,
            query: query.to_string(),
        })
    }

    #[cfg(test)]
    pub fn contains(&self, query: &str) -> bool {
        self.queries.lock().contains(query)
    }
}

/// Clears an in-flight marker on drop.
#[derive(Debug)]
pub struct InFlightGuard<'a> {
    set: &'a InFlightSet,
    query: String,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.set.queries.lock().remove(&self.query);
    }
}

// ============================================================================
// Coordinator
// ============================================================================

/// Results delivered to the consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchUpdate {
    /// Increases with every accepted input.
    pub generation: u64,
    pub query: String,
    pub results: Vec<SearchResult>,
    pub state: PipelineState,
    pub from_cache: bool,
}

struct ActiveSearch {
    query: String,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

/// Drives the pipeline from a stream of raw inputs.
///
/// Must be used from within a Tokio runtime.
pub struct SearchCoordinator {
    pipeline: Arc<SearchPipeline>,
    debounce: Duration,
    latest: Arc<AtomicU64>,
    active: Option<ActiveSearch>,
    updates: mpsc::UnboundedSender<SearchUpdate>,
}

impl SearchCoordinator {
    /// Creates a coordinator and the receiver its updates are sent to.
    #[must_use]
    pub fn new(
        pipeline: Arc<SearchPipeline>,
        debounce: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<SearchUpdate>) {
        let (updates, receiver) = mpsc::unbounded_channel();
        let coordinator = Self {
            pipeline,
            debounce,
            latest: Arc::new(AtomicU64::new(0)),
            active: None,
            updates,
        };
        (coordinator, receiver)
    }

    /// Generation of the most recently accepted input.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }

    /// True when no search is pending or running.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.active
            .as_ref()
            .is_none_or(|active| active.task.is_finished())
    }

    /// Accepts a new input value.
    ///
    /// Input that normalizes to the query already pending or running is
    /// ignored. Anything else cancels the current search and starts a new
    /// debounce window. Empty input clears the results immediately.
    pub fn on_input(&mut self, raw: &str) {
        let query = normalize_query(raw);

        if let Some(active) = &self.active {
            if active.query == query && !active.task.is_finished() {
                tracing::trace!("Ignoring repeated input for '{query}'");
                return;
            }
        }

        self.cancel_active();
        let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;

        if query.is_empty() {
            self.deliver_now(SearchUpdate {
                generation,
                query,
                results: Vec::new(),
                state: PipelineState::Done,
                from_cache: false,
            });
            return;
        }

        let cancel = CancellationToken::new();
        let task = tokio::spawn(Self::search(
            self.pipeline.clone(),
            query.clone(),
            generation,
            self.debounce,
            cancel.clone(),
            self.latest.clone(),
            self.updates.clone(),
        ));

        self.active = Some(ActiveSearch {
            query,
            cancel,
            task,
        });
    }

    /// Cancels any pending or running search.
    pub fn clear(&mut self) {
        self.cancel_active();
        self.latest.fetch_add(1, Ordering::SeqCst);
    }

    fn cancel_active(&mut self) {
        if let Some(active) = self.active.take() {
            if !active.task.is_finished() {
                tracing::debug!("Cancelling search for '{}'", active.query);
            }
            active.cancel.cancel();
        }
    }

    fn deliver_now(&self, update: SearchUpdate) {
        if self.updates.send(update).is_err() {
            tracing::debug!("Search update receiver dropped");
        }
    }

    async fn search(
        pipeline: Arc<SearchPipeline>,
        query: String,
        generation: u64,
        debounce: Duration,
        cancel: CancellationToken,
        latest: Arc<AtomicU64>,
        updates: mpsc::UnboundedSender<SearchUpdate>,
    ) {
        tokio::select! {
            () = cancel.cancelled() => return,
            () = tokio::time::sleep(debounce) => {}
        }

        let outcome = match pipeline.resolve(&query, &cancel).await {
            Resolution::Completed(outcome) => outcome,
            Resolution::Aborted | Resolution::Duplicate => return,
        };

        if cancel.is_cancelled() || latest.load(Ordering::SeqCst) != generation {
            tracing::debug!("Discarding stale results for '{query}'");
            return;
        }

        let update = SearchUpdate {
            generation,
            query: outcome.query,
            results: outcome.results,
            state: outcome.state,
            from_cache: outcome.from_cache,
        };
        if updates.send(update).is_err() {
            tracing::debug!("Search update receiver dropped");
        }
    }
}

impl Drop for SearchCoordinator {
    fn drop(&mut self) {
        self.cancel_active();
    }
}

impl std::fmt::Debug for SearchCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchCoordinator")
            .field("debounce", &self.debounce)
            .field("generation", &self.generation())
            .field("active", &self.active.as_ref().map(|a| a.query.as_str()))
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Network, ReferenceData};
    use crate::search::cache::ResultCache;
    use crate::test_utils::MockChainClient;

    fn coordinator(
        client: MockChainClient,
    ) -> (
        SearchCoordinator,
        mpsc::UnboundedReceiver<SearchUpdate>,
        Arc<MockChainClient>,
        Arc<SearchPipeline>,
    ) {
        let client = Arc::new(client);
        let pipeline = Arc::new(SearchPipeline::new(
            Network::Mainnet,
            client.clone(),
            Arc::new(ReferenceData::builtin()),
            ResultCache::session(),
        ));
        let (coordinator, updates) = SearchCoordinator::new(pipeline.clone(), DEFAULT_DEBOUNCE);
        (coordinator, updates, client, pipeline)
    }

    #[test]
    fn test_in_flight_guard_releases_on_drop() {
        let set = InFlightSet::default();

        let guard = set.try_acquire("0x1");
        assert!(guard.is_some());
        assert!(set.contains("0x1"));
        assert!(set.try_acquire("0x1").is_none());

        drop(guard);
        assert!(!set.contains("0x1"));
        assert!(set.try_acquire("0x1").is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_resolves_only_final_value() {
        let (mut coordinator, mut updates, client, _) =
            coordinator(MockChainClient::new().with_account("0x1"));

        coordinator.on_input("0");
        tokio::time::sleep(Duration::from_millis(100)).await;
        coordinator.on_input("0x");
        tokio::time::sleep(Duration::from_millis(100)).await;
        coordinator.on_input("0x1");

        let update = updates.recv().await.unwrap();
        assert_eq!(update.query, "0x1");
        assert_eq!(update.generation, 3);
        assert_eq!(client.calls(), vec!["account_exists:0x1"]);
        assert!(updates.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_search_never_delivers() {
        let (mut coordinator, mut updates, client, pipeline) = coordinator(
            MockChainClient::new()
                .with_account("0x1")
                .with_account("0x4")
                .with_latency(Duration::from_millis(300)),
        );

        coordinator.on_input("0x1");
        tokio::time::sleep(DEFAULT_DEBOUNCE + Duration::from_millis(100)).await;
        assert_eq!(client.call_count("account_exists"), 1);

        coordinator.on_input("0x4");
        let update = updates.recv().await.unwrap();
        assert_eq!(update.query, "0x4");
        assert!(updates.try_recv().is_err());
        assert!(pipeline.cache().get(Network::Mainnet, "0x1").is_none());
        assert!(pipeline.cache().get(Network::Mainnet, "0x4").is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeated_input_does_not_restart() {
        let (mut coordinator, mut updates, client, _) = coordinator(
            MockChainClient::new()
                .with_account("0x1")
                .with_latency(Duration::from_millis(300)),
        );

        coordinator.on_input("0x1");
        tokio::time::sleep(DEFAULT_DEBOUNCE + Duration::from_millis(100)).await;
        coordinator.on_input(" 0X1 ");

        let update = updates.recv().await.unwrap();
        assert_eq!(update.generation, 1);
        assert_eq!(client.call_count("account_exists"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_lookup_is_served_from_cache() {
        let (mut coordinator, mut updates, client, _) =
            coordinator(MockChainClient::new().with_account("0x1"));

        coordinator.on_input("0x1");
        assert!(!updates.recv().await.unwrap().from_cache);

        coordinator.on_input("0x");
        coordinator.on_input("0x1");
        let update = updates.recv().await.unwrap();
        assert!(update.from_cache);
        assert_eq!(client.call_count("account_exists"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_input_clears_immediately() {
        let (mut coordinator, mut updates, client, _) = coordinator(MockChainClient::new());

        coordinator.on_input("0x1");
        coordinator.on_input("  ");

        let update = updates.recv().await.unwrap();
        assert!(update.results.is_empty());
        assert_eq!(update.generation, 2);
        tokio::time::sleep(DEFAULT_DEBOUNCE * 2).await;
        assert!(client.calls().is_empty());
        assert!(coordinator.is_idle());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pending_search() {
        let (mut coordinator, mut updates, client, _) =
            coordinator(MockChainClient::new().with_account("0x1"));

        coordinator.on_input("0x1");
        drop(coordinator);

        assert!(updates.recv().await.is_none());
        assert!(client.calls().is_empty());
    }
}
