//! Transaction lookups for AptosClient.

use super::AptosClient;
use crate::domain::address::hex_digits;
use crate::domain::{ChainError, TransactionSummary};

impl AptosClient {
    /// Fetch a transaction by its 32-byte hash.
    ///
    /// Malformed hashes are reported as not found without a request.
    pub(crate) async fn get_transaction_by_hash(
        &self,
        hash: &str,
    ) -> Result<Option<TransactionSummary>, ChainError> {
        let Some(digits) = hex_digits(hash).filter(|d| d.len() == 64) else {
            return Ok(None);
        };

        let path = format!("/transactions/by_hash/0x{}", digits.to_ascii_lowercase());
        self.node_get(&path)
            .await?
            .map(|json| TransactionSummary::from_json(&json))
            .transpose()
    }

    /// Fetch a committed transaction by ledger version.
    pub(crate) async fn get_transaction_by_version(
        &self,
        version: u64,
    ) -> Result<Option<TransactionSummary>, ChainError> {
        let path = format!("/transactions/by_version/{version}");
        self.node_get(&path)
            .await?
            .map(|json| TransactionSummary::from_json(&json))
            .transpose()
    }
}
