//! The per-query resolution pipeline.
//!
//! One [`SearchPipeline::resolve`] call walks a query through
//! `Idle -> Classifying -> Probing -> Aggregating -> Done`. The cancellation
//! token is checked at every transition and raced against every network
//! call; a cancelled run ends in `Aborted` and neither caches nor returns
//! results. A run whose probes all failed ends in `Errored` with the
//! not-found sentinel and is never cached.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::aggregate::{TtlPolicy, aggregate, ttl_for};
use super::cache::ResultCache;
use super::classify::{InputClassification, classify, normalize_query};
use super::coordinator::InFlightSet;
use super::probes::{
    ProbeContext, ProbeKind, ProbeResult, account_probe, ans_probe, block_or_version_probe,
    coin_list_probe, emoji_probe, label_probe, onchain_coin_probe, owned_objects_probe,
    transaction_probe,
};
use crate::client::ChainClient;
use crate::domain::{ChainError, Network, ReferenceData, SearchResult};

// ============================================================================
// Run State
// ============================================================================

/// Lifecycle of a single resolution run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Classifying,
    Probing,
    Aggregating,
    Done,
    Aborted,
    Errored,
}

/// What a run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Normalized form of the query.
    pub query: String,
    pub results: Vec<SearchResult>,
    /// `Done` or `Errored`.
    pub state: PipelineState,
    pub from_cache: bool,
    /// TTL the results were cached with, `None` when they were not cached.
    pub cached_for: Option<Duration>,
    /// Probes attempted, in invocation order. Empty for cache hits.
    pub probes: Vec<ProbeKind>,
}

/// How a call to [`SearchPipeline::resolve`] ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Completed(SearchOutcome),
    /// Cancelled before completion. Nothing was cached.
    Aborted,
    /// Another run for the same query is in flight on this pipeline.
    Duplicate,
}

#[cfg(test)]
impl Resolution {
    pub fn outcome(&self) -> Option<&SearchOutcome> {
        match self {
            Self::Completed(outcome) => Some(outcome),
            Self::Aborted | Self::Duplicate => None,
        }
    }
}

/// Tracks state transitions for one run and checks the token at each step.
struct Run<'a> {
    query: &'a str,
    state: PipelineState,
    cancel: &'a CancellationToken,
}

impl<'a> Run<'a> {
    fn new(query: &'a str, cancel: &'a CancellationToken) -> Self {
        Self {
            query,
            state: PipelineState::Idle,
            cancel,
        }
    }

    fn advance(&mut self, next: PipelineState) -> Result<(), ChainError> {
        if self.cancel.is_cancelled() {
            tracing::debug!("Search '{}' aborted in {:?}", self.query, self.state);
            self.state = PipelineState::Aborted;
            return Err(ChainError::Cancelled);
        }
        tracing::trace!("Search '{}': {:?} -> {:?}", self.query, self.state, next);
        self.state = next;
        Ok(())
    }
}

/// Raw probe output accumulated during the probing phase.
#[derive(Debug, Default)]
struct Collected {
    results: Vec<SearchResult>,
    probes: Vec<ProbeKind>,
    /// Network probes attempted.
    remote: usize,
    failed: usize,
    /// Set when a definitive probe hit; nothing else was gathered.
    definitive: bool,
}

impl Collected {
    /// Records a network probe's outcome. Transport failures are logged and
    /// absorbed; cancellation propagates.
    fn settle(&mut self, kind: ProbeKind, outcome: ProbeResult) -> Result<usize, ChainError> {
        self.probes.push(kind);
        self.remote += 1;
        match outcome {
            Ok(results) => {
                let found = results.len();
                self.results.extend(results);
                Ok(found)
            }
            Err(e) if e.is_cancelled() => Err(e),
            Err(e) => {
                tracing::warn!("Probe {} failed: {e}", kind.as_str());
                self.failed += 1;
                Ok(0)
            }
        }
    }

    fn local(&mut self, kind: ProbeKind, results: Vec<SearchResult>) {
        self.probes.push(kind);
        self.results.extend(results);
    }

    /// Every network probe failed and nothing was found locally.
    fn errored(&self) -> bool {
        self.failed > 0 && self.failed == self.remote && self.results.is_empty()
    }
}

// ============================================================================
// Pipeline
// ============================================================================

/// Resolves queries against one network.
pub struct SearchPipeline {
    network: Network,
    probes: ProbeContext,
    cache: ResultCache,
    ttl: TtlPolicy,
    in_flight: InFlightSet,
}

impl SearchPipeline {
    #[must_use]
    pub fn new(
        network: Network,
        client: Arc<dyn ChainClient>,
        reference: Arc<ReferenceData>,
        cache: ResultCache,
    ) -> Self {
        Self {
            network,
            probes: ProbeContext::new(client, reference),
            cache,
            ttl: TtlPolicy::default(),
            in_flight: InFlightSet::default(),
        }
    }

    #[must_use]
    pub fn with_ttl_policy(mut self, ttl: TtlPolicy) -> Self {
        self.ttl = ttl;
        self
    }

    #[must_use]
    pub fn with_owned_objects_limit(mut self, limit: usize) -> Self {
        self.probes.owned_objects_limit = limit;
        self
    }

    #[must_use]
    pub const fn network(&self) -> Network {
        self.network
    }

    #[cfg(test)]
    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    /// Resolves a raw query to an ordered, grouped result list.
    ///
    /// Cached results are returned without touching the network. A query
    /// already being resolved by this pipeline yields
    /// [`Resolution::Duplicate`] without starting a second run.
    pub async fn resolve(&self, raw: &str, cancel: &CancellationToken) -> Resolution {
        let query = normalize_query(raw);
        let mut run = Run::new(&query, cancel);

        match self.run(&mut run, cancel).await {
            Ok(resolution) => resolution,
            Err(_) => {
                tracing::debug!("Search '{query}' cancelled");
                Resolution::Aborted
            }
        }
    }

    async fn run(
        &self,
        run: &mut Run<'_>,
        cancel: &CancellationToken,
    ) -> Result<Resolution, ChainError> {
        let query = run.query;

        run.advance(PipelineState::Classifying)?;
        let facets = classify(query);
        if facets.is_empty() {
            run.advance(PipelineState::Done)?;
            return Ok(Resolution::Completed(SearchOutcome {
                query: query.to_string(),
                results: Vec::new(),
                state: PipelineState::Done,
                from_cache: false,
                cached_for: None,
                probes: Vec::new(),
            }));
        }

        if let Some(results) = self.cache.get(self.network, query) {
            tracing::debug!("Cache hit for '{query}' on {}", self.network);
            run.advance(PipelineState::Done)?;
            return Ok(Resolution::Completed(SearchOutcome {
                query: query.to_string(),
                results,
                state: PipelineState::Done,
                from_cache: true,
                cached_for: None,
                probes: Vec::new(),
            }));
        }

        let Some(_guard) = self.in_flight.try_acquire(query) else {
            tracing::debug!("Search '{query}' already in flight");
            return Ok(Resolution::Duplicate);
        };

        run.advance(PipelineState::Probing)?;
        let collected = self.probe(query, &facets, cancel).await?;

        run.advance(PipelineState::Aggregating)?;
        let errored = collected.errored();
        let results = aggregate(collected.results);

        let state = if errored {
            PipelineState::Errored
        } else {
            PipelineState::Done
        };
        run.advance(state)?;

        let cached_for = if collected.failed == 0 {
            let ttl = ttl_for(&results, self.ttl);
            self.cache.set(self.network, query, &results, ttl);
            Some(ttl)
        } else {
            tracing::debug!(
                "Not caching '{query}': {} of {} probes failed",
                collected.failed,
                collected.remote
            );
            None
        };

        tracing::debug!(
            "Search '{query}' finished as {state:?} with {} rows{}",
            results.len(),
            if collected.definitive {
                " (definitive)"
            } else {
                ""
            }
        );

        Ok(Resolution::Completed(SearchOutcome {
            query: query.to_string(),
            results,
            state,
            from_cache: false,
            cached_for,
            probes: collected.probes,
        }))
    }

    /// Runs the probes that apply to the query's facets in priority order.
    async fn probe(
        &self,
        query: &str,
        facets: &InputClassification,
        cancel: &CancellationToken,
    ) -> Result<Collected, ChainError> {
        let ctx = &self.probes;
        let mut collected = Collected::default();

        if facets.is_ans_name {
            let found = collected.settle(ProbeKind::AnsName, ans_probe(query, ctx, cancel).await)?;
            if found > 0 {
                collected.definitive = true;
                return Ok(collected);
            }
        }

        if facets.is_struct {
            collected.local(
                ProbeKind::CoinList,
                coin_list_probe(query, facets, &ctx.reference),
            );
            collected.settle(
                ProbeKind::OnChainCoin,
                onchain_coin_probe(query, ctx, cancel).await,
            )?;
        }

        if facets.is_valid_block_height_or_version {
            let earlier = collected.results.len();
            let found = collected.settle(
                ProbeKind::BlockOrVersion,
                block_or_version_probe(query, ctx, cancel).await,
            )?;
            if found > 0 {
                collected.results.drain(..earlier);
                collected.definitive = true;
                return Ok(collected);
            }
        }

        if facets.is_address_like() {
            let transaction = async {
                if facets.is_32_byte_hex {
                    Some(transaction_probe(query, ctx, cancel).await)
                } else {
                    None
                }
            };
            let account = async {
                if facets.is_valid_account_address {
                    Some(account_probe(query, ctx, cancel).await)
                } else {
                    None
                }
            };
            let (transaction, account) = tokio::join!(transaction, account);

            if let Some(outcome) = transaction {
                collected.settle(ProbeKind::TransactionByHash, outcome)?;
            }
            if let Some(outcome) = account {
                collected.settle(ProbeKind::Account, outcome)?;
            }
            if !facets.is_struct {
                collected.local(
                    ProbeKind::CoinList,
                    coin_list_probe(query, facets, &ctx.reference),
                );
            }
        }

        if facets.is_emoji {
            collected.settle(ProbeKind::EmojiCoin, emoji_probe(query, ctx, cancel).await)?;
        }

        if facets.is_generic {
            collected.local(ProbeKind::LabelTable, label_probe(query, &ctx.reference));
            collected.local(
                ProbeKind::CoinList,
                coin_list_probe(query, facets, &ctx.reference),
            );
        }

        if collected.results.is_empty() {
            collected.settle(
                ProbeKind::OwnedObjects,
                owned_objects_probe(query, facets, ctx, cancel).await,
            )?;
        }

        Ok(collected)
    }
}

impl std::fmt::Debug for SearchPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchPipeline")
            .field("network", &self.network)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
