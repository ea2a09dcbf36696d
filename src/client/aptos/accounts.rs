//! Account and resource lookups for AptosClient.

use serde_json::Value;

use super::AptosClient;
use crate::domain::ChainError;
use crate::domain::address::long_address;

/// Upper bound on resources fetched when classifying an address.
const RESOURCE_PAGE_LIMIT: usize = 100;

impl AptosClient {
    /// Check whether an account exists at the address.
    pub(crate) async fn get_account_exists(&self, address: &str) -> Result<bool, ChainError> {
        let Some(address) = long_address(address) else {
            return Ok(false);
        };

        let account = self.node_get(&format!("/accounts/{address}")).await?;
        Ok(account.is_some())
    }

    /// List the type tags of the resources stored at the address.
    pub(crate) async fn get_account_resource_types(
        &self,
        address: &str,
    ) -> Result<Vec<String>, ChainError> {
        let Some(address) = long_address(address) else {
            return Ok(Vec::new());
        };

        let path = format!("/accounts/{address}/resources?limit={RESOURCE_PAGE_LIMIT}");
        let Some(json) = self.node_get(&path).await? else {
            return Ok(Vec::new());
        };

        let resources = json
            .as_array()
            .ok_or_else(|| ChainError::parse("resources response is not an array"))?;

        Ok(resources
            .iter()
            .filter_map(|resource| resource.get("type").and_then(Value::as_str))
            .map(String::from)
            .collect())
    }

    /// Check whether a module is published under the address.
    pub(crate) async fn get_module_exists(
        &self,
        address: &str,
        module: &str,
    ) -> Result<bool, ChainError> {
        let Some(address) = long_address(address) else {
            return Ok(false);
        };

        let module = self
            .node_get(&format!("/accounts/{address}/module/{module}"))
            .await?;
        Ok(module.is_some())
    }
}
