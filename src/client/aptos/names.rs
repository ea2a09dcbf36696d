//! ANS (Aptos Name Service) lookups for AptosClient.

use std::time::Duration;

use super::AptosClient;
use crate::client::http::{ANS_TIMEOUT_SECS, fetch_json};
use crate::domain::ChainError;
use crate::domain::address::display_address;

impl AptosClient {
    /// Resolve a name such as `alice.apt` or `wallet.alice.apt` to the
    /// address it points at.
    ///
    /// The ANS API answers unknown names with an empty object, which is
    /// reported as `None`.
    pub(crate) async fn get_ans_address(
        &self,
        ans_url: &str,
        name: &str,
    ) -> Result<Option<String>, ChainError> {
        let lowered = name.trim().to_lowercase();
        let bare = lowered.strip_suffix(".apt").unwrap_or(&lowered);
        if bare.is_empty() {
            return Ok(None);
        }

        let url = format!("{ans_url}/address/{bare}");
        let request = self
            .client
            .get(&url)
            .header("accept", "application/json")
            .timeout(Duration::from_secs(ANS_TIMEOUT_SECS));

        let Some(json) = fetch_json(request, &url).await? else {
            return Ok(None);
        };

        Ok(json
            .get("address")
            .and_then(|address| address.as_str())
            .and_then(display_address))
    }
}
