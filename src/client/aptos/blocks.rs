//! Block lookups for AptosClient.

use super::AptosClient;
use crate::domain::{BlockSummary, ChainError};

impl AptosClient {
    /// Fetch a block header by height, without its transactions.
    pub(crate) async fn get_block_by_height(
        &self,
        height: u64,
    ) -> Result<Option<BlockSummary>, ChainError> {
        let path = format!("/blocks/by_height/{height}?with_transactions=false");
        let block = self
            .node_get(&path)
            .await?
            .map(|json| BlockSummary::from_json(&json))
            .transpose()?;

        if block.is_none() {
            tracing::debug!("Block {height} not found");
        }
        Ok(block)
    }
}
