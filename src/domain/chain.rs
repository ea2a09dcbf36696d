//! Chain entity summaries returned by the chain client.
//!
//! These are deliberately thin: the search resolver only needs enough of
//! each entity to label a result row and build its route.

use serde_json::Value;

use super::ChainError;

/// Resource type marking an address as an object.
pub const OBJECT_CORE_TYPE: &str = "0x1::object::ObjectCore";

/// Resource type marking an address as fungible asset metadata.
pub const FA_METADATA_TYPE: &str = "0x1::fungible_asset::Metadata";

// ============================================================================
// Transactions & Blocks
// ============================================================================

/// Minimal view of a committed (or pending) transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionSummary {
    pub hash: String,
    /// Ledger version, absent for pending transactions.
    pub version: Option<u64>,
    pub txn_type: String,
}

impl TransactionSummary {
    /// Parses the REST representation of a transaction.
    ///
    /// # Errors
    ///
    /// Returns `ChainError::Parse` if the hash is missing.
    pub fn from_json(json: &Value) -> Result<Self, ChainError> {
        let hash = json["hash"]
            .as_str()
            .ok_or_else(|| ChainError::parse("transaction response missing 'hash'"))?
            .to_string();
        let version = json["version"].as_str().and_then(|v| v.parse().ok());
        let txn_type = json["type"]
            .as_str()
            .unwrap_or("unknown_transaction")
            .to_string();

        Ok(Self {
            hash,
            version,
            txn_type,
        })
    }
}

/// Minimal view of a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockSummary {
    pub height: u64,
    pub hash: String,
    pub first_version: u64,
    pub last_version: u64,
}

impl BlockSummary {
    /// Parses the REST representation of a block.
    ///
    /// Numeric fields are encoded as decimal strings by the node API.
    ///
    /// # Errors
    ///
    /// Returns `ChainError::Parse` if the height is missing or malformed.
    pub fn from_json(json: &Value) -> Result<Self, ChainError> {
        let number = |field: &str| json[field].as_str().and_then(|v| v.parse::<u64>().ok());

        let height = number("block_height")
            .ok_or_else(|| ChainError::parse("block response missing 'block_height'"))?;

        Ok(Self {
            height,
            hash: json["block_hash"].as_str().unwrap_or_default().to_string(),
            first_version: number("first_version").unwrap_or_default(),
            last_version: number("last_version").unwrap_or_default(),
        })
    }
}

// ============================================================================
// Coins & Assets
// ============================================================================

/// On-chain `CoinInfo` data for a coin type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinMetadata {
    pub coin_type: String,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Fungible asset metadata as reported by the indexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FungibleAssetMetadata {
    /// Metadata object address (or coin type for coin-backed assets).
    pub asset_type: String,
    pub name: String,
    pub symbol: String,
    pub icon_uri: Option<String>,
}

impl FungibleAssetMetadata {
    /// Parses one row of the indexer's `fungible_asset_metadata` table.
    ///
    /// # Errors
    ///
    /// Returns `ChainError::Parse` if `asset_type` is missing.
    pub fn from_json(json: &Value) -> Result<Self, ChainError> {
        let asset_type = json["asset_type"]
            .as_str()
            .ok_or_else(|| ChainError::parse("asset metadata missing 'asset_type'"))?
            .to_string();

        Ok(Self {
            asset_type,
            name: json["name"].as_str().unwrap_or_default().to_string(),
            symbol: json["symbol"].as_str().unwrap_or_default().to_string(),
            icon_uri: json["icon_uri"]
                .as_str()
                .filter(|uri| !uri.is_empty())
                .map(String::from),
        })
    }
}

/// An object owned by an address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedObject {
    pub object_address: String,
    pub owner_address: String,
}

// ============================================================================
// Tests
// ============================================================================
