//! Lookup probes.
//!
//! Each probe is an independent lookup strategy that turns a query into zero
//! or more result rows. Not finding anything is an empty vector. Transport
//! failures are returned as errors for the pipeline to log and absorb, and
//! every network call is raced against the run's cancellation token so a
//! superseded run stops at its next await point.

use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::classify::{InputClassification, StructTag, ans_name};
use crate::client::ChainClient;
use crate::domain::address::{canonical_struct, display_address};
use crate::domain::chain::{FA_METADATA_TYPE, OBJECT_CORE_TYPE};
use crate::domain::{ChainError, CoinEntry, ReferenceData, ResultKind, SearchResult, route};

/// Default cap on rows returned by the owned-objects fallback.
pub const DEFAULT_OWNED_OBJECTS_LIMIT: usize = 20;

pub type ProbeResult = Result<Vec<SearchResult>, ChainError>;

// ============================================================================
// Probe Context
// ============================================================================

/// Collaborators shared by every probe of a pipeline.
#[derive(Clone)]
pub struct ProbeContext {
    pub client: Arc<dyn ChainClient>,
    pub reference: Arc<ReferenceData>,
    pub owned_objects_limit: usize,
}

impl ProbeContext {
    #[must_use]
    pub fn new(client: Arc<dyn ChainClient>, reference: Arc<ReferenceData>) -> Self {
        Self {
            client,
            reference,
            owned_objects_limit: DEFAULT_OWNED_OBJECTS_LIMIT,
        }
    }
}

impl std::fmt::Debug for ProbeContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProbeContext")
            .field("owned_objects_limit", &self.owned_objects_limit)
            .finish_non_exhaustive()
    }
}

/// Identifies a probe in logs and run summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbeKind {
    AnsName,
    CoinList,
    OnChainCoin,
    BlockOrVersion,
    TransactionByHash,
    Account,
    EmojiCoin,
    LabelTable,
    OwnedObjects,
}

impl ProbeKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AnsName => "ans-name",
            Self::CoinList => "coin-list",
            Self::OnChainCoin => "on-chain-coin",
            Self::BlockOrVersion => "block-or-version",
            Self::TransactionByHash => "transaction-by-hash",
            Self::Account => "account",
            Self::EmojiCoin => "emoji-coin",
            Self::LabelTable => "label-table",
            Self::OwnedObjects => "owned-objects",
        }
    }
}

/// Awaits `call` unless `cancel` fires first.
pub async fn cancellable<T, F>(cancel: &CancellationToken, call: F) -> Result<T, ChainError>
where
    F: Future<Output = Result<T, ChainError>>,
{
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(ChainError::Cancelled),
        result = call => result,
    }
}

// ============================================================================
// Network Probes
// ============================================================================

/// Resolves a name-service name. A hit identifies exactly one account.
pub async fn ans_probe(query: &str, ctx: &ProbeContext, cancel: &CancellationToken) -> ProbeResult {
    let Some(name) = ans_name(query) else {
        return Ok(Vec::new());
    };

    let address = cancellable(cancel, ctx.client.resolve_ans_name(&name)).await?;

    Ok(address
        .and_then(|address| display_address(&address))
        .map(|address| {
            SearchResult::link(
                ResultKind::Account,
                format!("{name} ({address})"),
                route::account(&address),
            )
        })
        .into_iter()
        .collect())
}

/// Looks up on-chain `CoinInfo` for a struct query, falling back to the
/// module that declares the type when it is not a coin.
pub async fn onchain_coin_probe(
    query: &str,
    ctx: &ProbeContext,
    cancel: &CancellationToken,
) -> ProbeResult {
    let Some(tag) = StructTag::parse(query) else {
        return Ok(Vec::new());
    };
    let coin_type = canonical_struct(tag.coin_type(query));

    if let Some(coin) = cancellable(cancel, ctx.client.coin_info(&coin_type)).await? {
        let image = ctx
            .reference
            .coin_by_type(&coin_type)
            .and_then(|entry| entry.logo_url.clone());

        return Ok(vec![
            SearchResult::link(
                ResultKind::Coin,
                format!("{} ({})", coin.name, coin.symbol),
                route::coin(&coin_type),
            )
            .with_image(image),
        ]);
    }

    let Some(declaring) = StructTag::parse(&coin_type) else {
        return Ok(Vec::new());
    };
    let Some(address) = display_address(declaring.address) else {
        return Ok(Vec::new());
    };

    let exists = cancellable(cancel, ctx.client.module_exists(&address, declaring.module)).await?;
    if !exists {
        return Ok(Vec::new());
    }

    Ok(vec![SearchResult::link(
        ResultKind::Module,
        format!("Module {address}::{}", declaring.module),
        route::module(&address, declaring.module),
    )])
}

/// Fetches the block at a height and the transaction at a version
/// concurrently. Either hit is definitive.
pub async fn block_or_version_probe(
    query: &str,
    ctx: &ProbeContext,
    cancel: &CancellationToken,
) -> ProbeResult {
    let Ok(number) = query.trim().parse::<u64>() else {
        return Ok(Vec::new());
    };

    let (block, transaction) = tokio::join!(
        cancellable(cancel, ctx.client.block_by_height(number)),
        cancellable(cancel, ctx.client.transaction_by_version(number))
    );

    let (block, transaction) = match (block, transaction) {
        (Err(ChainError::Cancelled), _) | (_, Err(ChainError::Cancelled)) => {
            return Err(ChainError::Cancelled);
        }
        (Err(e), Err(_)) => return Err(e),
        (Err(e), Ok(None)) | (Ok(None), Err(e)) => return Err(e),
        (Err(e), Ok(transaction)) => {
            tracing::warn!("Block {number} lookup failed: {e}");
            (None, transaction)
        }
        (Ok(block), Err(e)) => {
            tracing::warn!("Version {number} lookup failed: {e}");
            (block, None)
        }
        (Ok(block), Ok(transaction)) => (block, transaction),
    };

    let mut results = Vec::new();
    if let Some(block) = block {
        results.push(SearchResult::link(
            ResultKind::Block,
            format!("Block {}", block.height),
            route::block(block.height),
        ));
    }
    if let Some(version) = transaction.and_then(|txn| txn.version) {
        results.push(SearchResult::link(
            ResultKind::Transaction,
            format!("Transaction {version}"),
            route::transaction(&version.to_string()),
        ));
    }
    Ok(results)
}

/// Looks up a 32-byte hex string as a transaction hash.
pub async fn transaction_probe(
    query: &str,
    ctx: &ProbeContext,
    cancel: &CancellationToken,
) -> ProbeResult {
    let hash = query.trim().to_ascii_lowercase();
    let hash = if hash.starts_with("0x") {
        hash
    } else {
        format!("0x{hash}")
    };

    let transaction = cancellable(cancel, ctx.client.transaction_by_hash(&hash)).await?;

    Ok(transaction
        .map(|txn| {
            SearchResult::link(
                ResultKind::Transaction,
                format!("Transaction {}", txn.hash),
                route::transaction(&txn.hash),
            )
        })
        .into_iter()
        .collect())
}

/// Looks up an address as an account. When no account exists there, the
/// resources at the address tell whether it is an object or fungible asset
/// metadata.
pub async fn account_probe(
    query: &str,
    ctx: &ProbeContext,
    cancel: &CancellationToken,
) -> ProbeResult {
    let Some(address) = display_address(query.trim()) else {
        return Ok(Vec::new());
    };
    let known_label = ctx.reference.label_for(&address);

    if cancellable(cancel, ctx.client.account_exists(&address)).await? {
        let label = match known_label {
            Some(label) => format!("Account {address} ({label})"),
            None => format!("Account {address}"),
        };
        return Ok(vec![SearchResult::link(
            ResultKind::Account,
            label,
            route::account(&address),
        )]);
    }

    let resource_types = cancellable(cancel, ctx.client.account_resource_types(&address)).await?;
    let has = |wanted: &str| resource_types.iter().any(|t| t == wanted);

    let mut results = Vec::new();
    if has(FA_METADATA_TYPE) {
        let entry = ctx.reference.coin_by_fa_address(&address);
        let label = match entry {
            Some(entry) => format!("{} ({})", entry.name, entry.symbol),
            None => format!("Fungible Asset {address}"),
        };
        results.push(
            SearchResult::link(ResultKind::FungibleAsset, label, route::fungible_asset(&address))
                .with_image(entry.and_then(|e| e.logo_url.clone())),
        );
    }
    if has(OBJECT_CORE_TYPE) {
        let label = match known_label {
            Some(label) => format!("Object {address} ({label})"),
            None => format!("Object {address}"),
        };
        results.push(SearchResult::link(
            ResultKind::Object,
            label,
            route::object(&address),
        ));
    }
    Ok(results)
}

/// Looks up an emoji sequence as a fungible asset symbol.
pub async fn emoji_probe(query: &str, ctx: &ProbeContext, cancel: &CancellationToken) -> ProbeResult {
    let symbol = query.trim();
    let asset = cancellable(cancel, ctx.client.fungible_asset_by_symbol(symbol)).await?;

    Ok(asset
        .map(|asset| {
            let target = display_address(&asset.asset_type).unwrap_or(asset.asset_type);
            SearchResult::link(
                ResultKind::EmojiCoin,
                format!("{} ({})", asset.name, asset.symbol),
                route::fungible_asset(&target),
            )
            .with_image(asset.icon_uri)
        })
        .into_iter()
        .collect())
}

/// Lists objects owned by the query address. Input that is not an address
/// yields nothing without touching the network.
pub async fn owned_objects_probe(
    query: &str,
    facets: &InputClassification,
    ctx: &ProbeContext,
    cancel: &CancellationToken,
) -> ProbeResult {
    if !facets.is_valid_account_address {
        return Ok(Vec::new());
    }
    let Some(owner) = display_address(query.trim()) else {
        return Ok(Vec::new());
    };

    let objects = cancellable(
        cancel,
        ctx.client.owned_objects(&owner, ctx.owned_objects_limit),
    )
    .await?;

    Ok(objects
        .iter()
        .filter_map(|object| display_address(&object.object_address))
        .map(|address| {
            SearchResult::link(
                ResultKind::Object,
                format!("Object {address} (owned by {owner})"),
                route::object(&address),
            )
        })
        .take(ctx.owned_objects_limit)
        .collect())
}

// ============================================================================
// Local Probes
// ============================================================================

/// Matches the query against the static coin registry: struct tags by coin
/// type, addresses by fungible asset metadata address, free text by symbol
/// or name.
#[must_use]
pub fn coin_list_probe(
    query: &str,
    facets: &InputClassification,
    reference: &ReferenceData,
) -> Vec<SearchResult> {
    let query = query.trim();

    if facets.is_struct {
        let Some(tag) = StructTag::parse(query) else {
            return Vec::new();
        };
        return reference
            .coin_by_type(tag.coin_type(query))
            .map(coin_entry_result)
            .into_iter()
            .collect();
    }

    if facets.is_valid_account_address {
        return reference
            .coin_by_fa_address(query)
            .map(coin_entry_result)
            .into_iter()
            .collect();
    }

    if facets.is_generic {
        return reference
            .coins_matching_text(query)
            .into_iter()
            .map(coin_entry_result)
            .collect();
    }

    Vec::new()
}

/// Matches free text against the well-known label table.
#[must_use]
pub fn label_probe(query: &str, reference: &ReferenceData) -> Vec<SearchResult> {
    reference
        .labels_matching_text(query)
        .into_iter()
        .map(|(address, label)| {
            SearchResult::link(ResultKind::Label, label, route::account(address))
        })
        .collect()
}

fn coin_entry_result(entry: &CoinEntry) -> SearchResult {
    let label = format!("{} ({})", entry.name, entry.symbol);
    let result = match (&entry.coin_type, &entry.fa_address) {
        (Some(coin_type), _) => SearchResult::link(ResultKind::Coin, label, route::coin(coin_type)),
        (None, Some(address)) => SearchResult::link(
            ResultKind::FungibleAsset,
            label,
            route::fungible_asset(address),
        ),
        (None, None) => SearchResult::link(ResultKind::Coin, label, route::coin(&entry.symbol)),
    };
    result.with_image(entry.logo_url.clone())
}

// ============================================================================
// Tests
// ============================================================================
