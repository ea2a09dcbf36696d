//! Coin metadata lookups for AptosClient.

use super::AptosClient;
use crate::domain::address::{canonical_struct, long_address};
use crate::domain::{ChainError, CoinMetadata};

impl AptosClient {
    /// Fetch the `0x1::coin::CoinInfo<T>` resource for a coin type.
    ///
    /// The resource lives at the address that declared the coin type.
    pub(crate) async fn get_coin_info(
        &self,
        coin_type: &str,
    ) -> Result<Option<CoinMetadata>, ChainError> {
        let coin_type = canonical_struct(coin_type);
        let Some(owner) = coin_type.split("::").next().and_then(long_address) else {
            return Ok(None);
        };

        let path = format!("/accounts/{owner}/resource/0x1::coin::CoinInfo<{coin_type}>");
        let Some(json) = self.node_get(&path).await? else {
            return Ok(None);
        };

        let data = &json["data"];
        let symbol = data["symbol"]
            .as_str()
            .ok_or_else(|| ChainError::parse("CoinInfo resource missing 'symbol'"))?;

        Ok(Some(CoinMetadata {
            coin_type,
            name: data["name"].as_str().unwrap_or(symbol).to_string(),
            symbol: symbol.to_string(),
            decimals: data["decimals"]
                .as_u64()
                .and_then(|d| u8::try_from(d).ok())
                .unwrap_or_default(),
        }))
    }
}
