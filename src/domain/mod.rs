//! Domain types for the LazyAptos explorer search.
//!
//! # Module Organization
//!
//! - [`address`] - Account address parsing and display forms
//! - [`chain`] - Entity summaries returned by the chain client
//! - [`error`] - Chain lookup error type
//! - [`network`] - Network configuration (Mainnet, Testnet, Devnet, Local)
//! - [`reference`] - Static coin registry and address labels
//! - [`result`] - Search result rows and their categories

// ============================================================================
// Module Declarations
// ============================================================================

pub mod address;
pub mod chain;
pub mod error;
pub mod network;
pub mod reference;
pub mod result;

// ============================================================================
// Re-exports
// ============================================================================

pub use chain::{
    BlockSummary, CoinMetadata, FungibleAssetMetadata, OwnedObject, TransactionSummary,
};
pub use error::ChainError;
pub use network::Network;
pub use reference::{CoinEntry, ReferenceData};
pub use result::{Category, ResultKind, SearchResult, route};
