//! Shared test utilities and Mother pattern factories.
//!
//! Use these helpers to avoid copy-pasting setup code across tests.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::client::ChainClient;
use crate::domain::address::{canonical_struct, display_address};
use crate::domain::{
    BlockSummary, ChainError, CoinMetadata, FungibleAssetMetadata, OwnedObject, ResultKind,
    SearchResult, TransactionSummary, route,
};
use crate::search::cache::Clock;

// ============================================================================
// Mother Pattern Factories
// ============================================================================

pub struct ResultMother;

impl ResultMother {
    #[must_use]
    pub fn account(address: &str) -> SearchResult {
        SearchResult::link(
            ResultKind::Account,
            format!("Account {address}"),
            route::account(address),
        )
    }

    #[must_use]
    pub fn object(address: &str) -> SearchResult {
        SearchResult::link(
            ResultKind::Object,
            format!("Object {address}"),
            route::object(address),
        )
    }

    #[must_use]
    pub fn label(address: &str, label: &str) -> SearchResult {
        SearchResult::link(ResultKind::Label, label, route::account(address))
    }

    #[must_use]
    pub fn coin(coin_type: &str, symbol: &str) -> SearchResult {
        SearchResult::link(ResultKind::Coin, symbol, route::coin(coin_type))
    }

    #[must_use]
    pub fn block(height: u64) -> SearchResult {
        SearchResult::link(ResultKind::Block, format!("Block {height}"), route::block(height))
    }

    #[must_use]
    pub fn transaction(hash: &str) -> SearchResult {
        SearchResult::link(
            ResultKind::Transaction,
            format!("Transaction {hash}"),
            route::transaction(hash),
        )
    }
}

pub struct ChainMother;

impl ChainMother {
    #[must_use]
    pub fn apt_coin() -> CoinMetadata {
        CoinMetadata {
            coin_type: "0x1::aptos_coin::AptosCoin".to_string(),
            name: "Aptos Coin".to_string(),
            symbol: "APT".to_string(),
            decimals: 8,
        }
    }

    #[must_use]
    pub fn block(height: u64) -> BlockSummary {
        BlockSummary {
            height,
            hash: format!("0x{height:064x}"),
            first_version: height * 10,
            last_version: height * 10 + 9,
        }
    }

    #[must_use]
    pub fn transaction(hash: &str, version: Option<u64>) -> TransactionSummary {
        TransactionSummary {
            hash: hash.to_string(),
            version,
            txn_type: "user_transaction".to_string(),
        }
    }

    #[must_use]
    pub fn emoji_coin(symbol: &str) -> FungibleAssetMetadata {
        FungibleAssetMetadata {
            asset_type: format!("0x{}", "c4".repeat(32)),
            name: "Emoji Coin".to_string(),
            symbol: symbol.to_string(),
            icon_uri: Some("https://example.invalid/emoji.png".to_string()),
        }
    }
}

// ============================================================================
// Clock
// ============================================================================

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now_ms: AtomicI64,
}

impl ManualClock {
    #[must_use]
    pub fn new(now_ms: i64) -> Self {
        Self {
            now_ms: AtomicI64::new(now_ms),
        }
    }

    pub fn advance(&self, by: Duration) {
        let by = i64::try_from(by.as_millis()).unwrap_or(i64::MAX);
        self.now_ms.fetch_add(by, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}

// ============================================================================
// Mock Chain Client
// ============================================================================

/// In-memory [`ChainClient`] recording every call as `"method:argument"`.
#[derive(Debug, Default)]
pub struct MockChainClient {
    ans_names: HashMap<String, String>,
    transactions: HashMap<String, TransactionSummary>,
    versions: HashMap<u64, TransactionSummary>,
    blocks: HashMap<u64, BlockSummary>,
    accounts: HashSet<String>,
    resources: HashMap<String, Vec<String>>,
    coins: HashMap<String, CoinMetadata>,
    modules: HashSet<(String, String)>,
    fungible_assets: HashMap<String, FungibleAssetMetadata>,
    owned_objects: HashMap<String, Vec<OwnedObject>>,
    failing: HashSet<&'static str>,
    fail_everything: bool,
    latency: Duration,
    calls: Mutex<Vec<String>>,
}

fn address_key(address: &str) -> String {
    display_address(address).unwrap_or_else(|| address.to_string())
}

impl MockChainClient {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_ans_name(mut self, name: &str, address: &str) -> Self {
        self.ans_names.insert(name.to_string(), address.to_string());
        self
    }

    #[must_use]
    pub fn with_transaction(mut self, transaction: TransactionSummary) -> Self {
        self.transactions
            .insert(transaction.hash.to_ascii_lowercase(), transaction);
        self
    }

    #[must_use]
    pub fn with_version_transaction(mut self, version: u64, transaction: TransactionSummary) -> Self {
        self.versions.insert(version, transaction);
        self
    }

    #[must_use]
    pub fn with_block(mut self, block: BlockSummary) -> Self {
        self.blocks.insert(block.height, block);
        self
    }

    #[must_use]
    pub fn with_account(mut self, address: &str) -> Self {
        self.accounts.insert(address_key(address));
        self
    }

    #[must_use]
    pub fn with_resources(mut self, address: &str, types: &[&str]) -> Self {
        self.resources.insert(
            address_key(address),
            types.iter().map(|t| (*t).to_string()).collect(),
        );
        self
    }

    #[must_use]
    pub fn with_coin(mut self, coin: CoinMetadata) -> Self {
        self.coins.insert(canonical_struct(&coin.coin_type), coin);
        self
    }

    #[must_use]
    pub fn with_module(mut self, address: &str, module: &str) -> Self {
        self.modules
            .insert((address_key(address), module.to_string()));
        self
    }

    #[must_use]
    pub fn with_fungible_asset(mut self, asset: FungibleAssetMetadata) -> Self {
        self.fungible_assets.insert(asset.symbol.clone(), asset);
        self
    }

    #[must_use]
    pub fn with_owned_objects(mut self, owner: &str, objects: &[&str]) -> Self {
        let owner = address_key(owner);
        let objects = objects
            .iter()
            .map(|object| OwnedObject {
                object_address: (*object).to_string(),
                owner_address: owner.clone(),
            })
            .collect();
        self.owned_objects.insert(owner, objects);
        self
    }

    /// Makes `method` fail with a transport error.
    #[must_use]
    pub fn failing(mut self, method: &'static str) -> Self {
        self.failing.insert(method);
        self
    }

    #[must_use]
    pub fn failing_everything(mut self) -> Self {
        self.fail_everything = true;
        self
    }

    /// Delays every call; use with a paused Tokio clock.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Every call made so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    #[must_use]
    pub fn call_count(&self, method: &str) -> usize {
        let prefix = format!("{method}:");
        self.calls
            .lock()
            .iter()
            .filter(|call| call.starts_with(&prefix))
            .count()
    }

    async fn call(&self, method: &'static str, argument: &str) -> Result<(), ChainError> {
        self.calls.lock().push(format!("{method}:{argument}"));

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        if self.fail_everything || self.failing.contains(method) {
            return Err(ChainError::status(503, format!("mock://{method}")));
        }
        Ok(())
    }
}

#[async_trait]
impl ChainClient for MockChainClient {
    async fn resolve_ans_name(&self, name: &str) -> Result<Option<String>, ChainError> {
        self.call("resolve_ans_name", name).await?;
        Ok(self.ans_names.get(name).cloned())
    }

    async fn transaction_by_hash(
        &self,
        hash: &str,
    ) -> Result<Option<TransactionSummary>, ChainError> {
        self.call("transaction_by_hash", hash).await?;
        Ok(self.transactions.get(&hash.to_ascii_lowercase()).cloned())
    }

    async fn transaction_by_version(
        &self,
        version: u64,
    ) -> Result<Option<TransactionSummary>, ChainError> {
        self.call("transaction_by_version", &version.to_string())
            .await?;
        Ok(self.versions.get(&version).cloned())
    }

    async fn block_by_height(&self, height: u64) -> Result<Option<BlockSummary>, ChainError> {
        self.call("block_by_height", &height.to_string()).await?;
        Ok(self.blocks.get(&height).cloned())
    }

    async fn account_exists(&self, address: &str) -> Result<bool, ChainError> {
        let address = address_key(address);
        self.call("account_exists", &address).await?;
        Ok(self.accounts.contains(&address))
    }

    async fn account_resource_types(&self, address: &str) -> Result<Vec<String>, ChainError> {
        let address = address_key(address);
        self.call("account_resource_types", &address).await?;
        Ok(self.resources.get(&address).cloned().unwrap_or_default())
    }

    async fn coin_info(&self, coin_type: &str) -> Result<Option<CoinMetadata>, ChainError> {
        let coin_type = canonical_struct(coin_type);
        self.call("coin_info", &coin_type).await?;
        Ok(self.coins.get(&coin_type).cloned())
    }

    async fn module_exists(&self, address: &str, module: &str) -> Result<bool, ChainError> {
        let address = address_key(address);
        self.call("module_exists", &format!("{address}::{module}"))
            .await?;
        Ok(self.modules.contains(&(address, module.to_string())))
    }

    async fn fungible_asset_by_symbol(
        &self,
        symbol: &str,
    ) -> Result<Option<FungibleAssetMetadata>, ChainError> {
        self.call("fungible_asset_by_symbol", symbol).await?;
        Ok(self.fungible_assets.get(symbol).cloned())
    }

    async fn owned_objects(
        &self,
        owner: &str,
        limit: usize,
    ) -> Result<Vec<OwnedObject>, ChainError> {
        let owner = address_key(owner);
        self.call("owned_objects", &owner).await?;
        Ok(self
            .owned_objects
            .get(&owner)
            .map(|objects| objects.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }
}
