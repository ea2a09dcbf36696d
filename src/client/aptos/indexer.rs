//! Indexer GraphQL queries for AptosClient.

use serde_json::{Value, json};

use super::AptosClient;
use crate::client::http::fetch_json;
use crate::domain::address::long_address;
use crate::domain::{ChainError, FungibleAssetMetadata, OwnedObject};

const FA_BY_SYMBOL_QUERY: &str = r#"
query FungibleAssetBySymbol($symbol: String) {
  fungible_asset_metadata(where: {symbol: {_eq: $symbol}}, limit: 1) {
    asset_type
    name
    symbol
    icon_uri
  }
}"#;

const OWNED_OBJECTS_QUERY: &str = r#"
query OwnedObjects($owner: String, $limit: Int) {
  current_objects(where: {owner_address: {_eq: $owner}}, limit: $limit) {
    object_address
    owner_address
  }
}"#;

impl AptosClient {
    /// Run a GraphQL query and return its `data` object.
    async fn indexer_query(&self, query: &str, variables: Value) -> Result<Value, ChainError> {
        let url = self.indexer_url.clone();
        let request = self
            .client
            .post(&url)
            .json(&json!({ "query": query, "variables": variables }));

        let body = fetch_json(request, &url)
            .await?
            .ok_or_else(|| ChainError::status(404, &url))?;

        if let Some(errors) = body.get("errors").and_then(Value::as_array) {
            let message = errors
                .first()
                .and_then(|e| e["message"].as_str())
                .unwrap_or("unknown indexer error");
            return Err(ChainError::parse(format!("indexer query failed: {message}")));
        }

        body.get("data")
            .cloned()
            .ok_or_else(|| ChainError::parse("indexer response missing 'data'"))
    }

    pub(crate) async fn query_fungible_asset_by_symbol(
        &self,
        symbol: &str,
    ) -> Result<Option<FungibleAssetMetadata>, ChainError> {
        let data = self
            .indexer_query(FA_BY_SYMBOL_QUERY, json!({ "symbol": symbol }))
            .await?;

        data["fungible_asset_metadata"]
            .as_array()
            .and_then(|rows| rows.first())
            .map(FungibleAssetMetadata::from_json)
            .transpose()
    }

    pub(crate) async fn query_owned_objects(
        &self,
        owner: &str,
        limit: usize,
    ) -> Result<Vec<OwnedObject>, ChainError> {
        let Some(owner) = long_address(owner) else {
            return Ok(Vec::new());
        };

        let data = self
            .indexer_query(OWNED_OBJECTS_QUERY, json!({ "owner": owner, "limit": limit }))
            .await?;

        let rows = data["current_objects"].as_array().cloned().unwrap_or_default();

        Ok(rows
            .iter()
            .filter_map(|row| {
                Some(OwnedObject {
                    object_address: row["object_address"].as_str()?.to_string(),
                    owner_address: row["owner_address"].as_str().unwrap_or(&owner).to_string(),
                })
            })
            .collect())
    }
}
