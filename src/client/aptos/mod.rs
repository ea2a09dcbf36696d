//! Aptos API client.
//!
//! `AptosClient` implements [`ChainClient`] on top of three services:
//! - Fullnode REST API (`/v1`) - transactions, blocks, accounts, resources
//! - Indexer GraphQL API - fungible asset metadata and object ownership
//! - ANS API - name resolution (Mainnet and Testnet only)

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use super::ChainClient;
use super::http::{HttpConfig, build_http_client, fetch_json};
use crate::domain::{
    BlockSummary, ChainError, CoinMetadata, FungibleAssetMetadata, Network, OwnedObject,
    TransactionSummary,
};

mod accounts;
mod blocks;
mod coins;
mod indexer;
mod names;
mod transactions;

// ============================================================================
// Aptos API Client
// ============================================================================

#[derive(Debug, Clone)]
pub struct AptosClient {
    /// The fullnode REST API URL, including `/v1`.
    pub(crate) node_url: String,
    /// The indexer GraphQL endpoint.
    pub(crate) indexer_url: String,
    /// The ANS API URL, if the network has ANS.
    ans_api_url: Option<String>,
    /// Optional API key sent as bearer token.
    api_key: Option<String>,
    /// HTTP client for requests.
    pub(crate) client: Client,
}

impl AptosClient {
    /// Creates a new client for a built-in network.
    ///
    /// # Errors
    ///
    /// Returns `ChainError::Network` if the HTTP client fails to initialize
    /// (e.g., TLS backend unavailable).
    pub fn new(network: Network, http: &HttpConfig) -> Result<Self, ChainError> {
        Ok(Self {
            node_url: network.node_url().to_string(),
            indexer_url: network.indexer_url().to_string(),
            ans_api_url: network.ans_api_url().map(String::from),
            api_key: http.api_key.clone(),
            client: build_http_client(http)?,
        })
    }

    /// Overrides the node and indexer endpoints (custom deployments).
    #[must_use]
    pub fn with_endpoints(mut self, node_url: Option<String>, indexer_url: Option<String>) -> Self {
        if let Some(url) = node_url {
            self.node_url = url.trim_end_matches('/').to_string();
        }
        if let Some(url) = indexer_url {
            self.indexer_url = url;
        }
        self
    }

    #[must_use]
    pub fn node_url(&self) -> &str {
        &self.node_url
    }

    #[must_use]
    pub fn supports_ans(&self) -> bool {
        self.ans_api_url.is_some()
    }

    pub(crate) fn build_node_request(&self, url: &str) -> reqwest::RequestBuilder {
        let request = self.client.get(url).header("accept", "application/json");
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    /// GET a node REST path (relative to `/v1`), mapping 404/410 to `None`.
    pub(crate) async fn node_get(&self, path: &str) -> Result<Option<Value>, ChainError> {
        let url = format!("{}{}", self.node_url, path);
        fetch_json(self.build_node_request(&url), &url).await
    }
}

// ============================================================================
// ChainClient
// ============================================================================

#[async_trait]
impl ChainClient for AptosClient {
    async fn resolve_ans_name(&self, name: &str) -> Result<Option<String>, ChainError> {
        let Some(ans_url) = self.ans_api_url.as_deref() else {
            return Ok(None);
        };
        self.get_ans_address(ans_url, name).await
    }

    async fn transaction_by_hash(
        &self,
        hash: &str,
    ) -> Result<Option<TransactionSummary>, ChainError> {
        self.get_transaction_by_hash(hash).await
    }

    async fn transaction_by_version(
        &self,
        version: u64,
    ) -> Result<Option<TransactionSummary>, ChainError> {
        self.get_transaction_by_version(version).await
    }

    async fn block_by_height(&self, height: u64) -> Result<Option<BlockSummary>, ChainError> {
        self.get_block_by_height(height).await
    }

    async fn account_exists(&self, address: &str) -> Result<bool, ChainError> {
        self.get_account_exists(address).await
    }

    async fn account_resource_types(&self, address: &str) -> Result<Vec<String>, ChainError> {
        self.get_account_resource_types(address).await
    }

    async fn coin_info(&self, coin_type: &str) -> Result<Option<CoinMetadata>, ChainError> {
        self.get_coin_info(coin_type).await
    }

    async fn module_exists(&self, address: &str, module: &str) -> Result<bool, ChainError> {
        self.get_module_exists(address, module).await
    }

    async fn fungible_asset_by_symbol(
        &self,
        symbol: &str,
    ) -> Result<Option<FungibleAssetMetadata>, ChainError> {
        self.query_fungible_asset_by_symbol(symbol).await
    }

    async fn owned_objects(
        &self,
        owner: &str,
        limit: usize,
    ) -> Result<Vec<OwnedObject>, ChainError> {
        self.query_owned_objects(owner, limit).await
    }
}
