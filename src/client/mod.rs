//! Chain clients consumed by the search resolver.
//!
//! The resolver only talks to the chain through the [`ChainClient`] trait so
//! the lookup probes can be exercised against an in-memory double. The
//! production implementation is [`AptosClient`], which combines:
//! - the fullnode REST API - transactions, blocks, accounts, resources
//! - the indexer GraphQL API - fungible asset metadata, object ownership
//! - the ANS API - name to address resolution
//!
//! # Example
//!
//! ```ignore
//! use crate::client::{AptosClient, ChainClient};
//! use crate::domain::Network;
//!
//! let client = AptosClient::new(Network::Mainnet, &HttpConfig::default())?;
//! let block = client.block_by_height(123_456).await?;
//! ```

use async_trait::async_trait;

use crate::domain::{
    BlockSummary, ChainError, CoinMetadata, FungibleAssetMetadata, OwnedObject,
    TransactionSummary,
};

pub mod aptos;
pub mod http;

// ============================================================================
// Re-exports
// ============================================================================

pub use aptos::AptosClient;
pub use http::HttpConfig;

// ============================================================================
// Chain Client
// ============================================================================

/// Read-only lookups against the chain.
///
/// "Not found" is never an error: it is `Ok(None)`, `Ok(false)` or an empty
/// vector. Errors are reserved for transport and decoding failures.
/// Dropping a returned future abandons the request.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Resolves an ANS name (with its `.apt` suffix) to an address.
    async fn resolve_ans_name(&self, name: &str) -> Result<Option<String>, ChainError>;

    async fn transaction_by_hash(
        &self,
        hash: &str,
    ) -> Result<Option<TransactionSummary>, ChainError>;

    async fn transaction_by_version(
        &self,
        version: u64,
    ) -> Result<Option<TransactionSummary>, ChainError>;

    async fn block_by_height(&self, height: u64) -> Result<Option<BlockSummary>, ChainError>;

    /// Whether an account resource exists at `address`.
    async fn account_exists(&self, address: &str) -> Result<bool, ChainError>;

    /// Type tags of every resource stored at `address`.
    async fn account_resource_types(&self, address: &str) -> Result<Vec<String>, ChainError>;

    /// On-chain `CoinInfo` for a coin type.
    async fn coin_info(&self, coin_type: &str) -> Result<Option<CoinMetadata>, ChainError>;

    async fn module_exists(&self, address: &str, module: &str) -> Result<bool, ChainError>;

    /// Fungible asset metadata registered under `symbol` (emoji coins use
    /// their emoji sequence as symbol).
    async fn fungible_asset_by_symbol(
        &self,
        symbol: &str,
    ) -> Result<Option<FungibleAssetMetadata>, ChainError>;

    /// Objects owned by `owner`, at most `limit`.
    async fn owned_objects(
        &self,
        owner: &str,
        limit: usize,
    ) -> Result<Vec<OwnedObject>, ChainError>;
}
