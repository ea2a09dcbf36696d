//! Static reference data consulted by the local lookup probes.
//!
//! Holds the coin registry (known coin types and fungible assets with their
//! display metadata) and the table of well-known address labels. Both are
//! read-only snapshots loaded before any search runs.

use super::address::{canonical_struct, display_address};

// ============================================================================
// Coin Registry
// ============================================================================

/// Display metadata for a known coin or fungible asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinEntry {
    /// Legacy coin type tag, if the asset has one.
    pub coin_type: Option<String>,
    /// Fungible asset metadata address, if the asset has one.
    pub fa_address: Option<String>,
    pub symbol: String,
    pub name: String,
    pub logo_url: Option<String>,
}

impl CoinEntry {
    /// Creates an entry for a legacy coin type.
    #[must_use]
    pub fn coin(coin_type: &str, symbol: &str, name: &str) -> Self {
        Self {
            coin_type: Some(canonical_struct(coin_type)),
            fa_address: None,
            symbol: symbol.to_string(),
            name: name.to_string(),
            logo_url: None,
        }
    }

    /// Creates an entry for a fungible asset.
    #[must_use]
    pub fn fungible_asset(fa_address: &str, symbol: &str, name: &str) -> Self {
        Self {
            coin_type: None,
            fa_address: display_address(fa_address),
            symbol: symbol.to_string(),
            name: name.to_string(),
            logo_url: None,
        }
    }

    #[must_use]
    pub fn with_fa_address(mut self, fa_address: &str) -> Self {
        self.fa_address = display_address(fa_address);
        self
    }

    #[must_use]
    pub fn with_logo(mut self, logo_url: &str) -> Self {
        self.logo_url = Some(logo_url.to_string());
        self
    }
}

// ============================================================================
// Reference Data
// ============================================================================

/// Read-only snapshot of coin and label reference data.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    coins: Vec<CoinEntry>,
    /// (display address, label), in declaration order.
    labels: Vec<(String, String)>,
}

impl ReferenceData {
    /// Builds a snapshot from explicit tables.
    ///
    /// Label addresses that do not parse are skipped.
    #[must_use]
    pub fn new(coins: Vec<CoinEntry>, labels: Vec<(&str, &str)>) -> Self {
        let labels = labels
            .into_iter()
            .filter_map(|(address, label)| {
                display_address(address).map(|address| (address, label.to_string()))
            })
            .collect();

        Self { coins, labels }
    }

    /// The snapshot shipped with the explorer.
    #[must_use]
    pub fn builtin() -> Self {
        let coins = vec![
            CoinEntry::coin("0x1::aptos_coin::AptosCoin", "APT", "Aptos Coin")
                .with_fa_address("0xa")
                .with_logo("https://assets.panora.exchange/tokens/aptos/APT.svg"),
            CoinEntry::fungible_asset(
                "0xbae207659db88bea0cbead6da0ed00aac12edcdda169e591cd41c94180b46f3b",
                "USDC",
                "USD Coin",
            )
            .with_logo("https://assets.panora.exchange/tokens/aptos/USDC.svg"),
            CoinEntry::fungible_asset(
                "0x357b0b74bc833e95a115ad22604854d6b0fca151cecd94111770e5d6ffc9dc2b",
                "USDt",
                "Tether USD",
            )
            .with_logo("https://assets.panora.exchange/tokens/aptos/USDT.svg"),
            CoinEntry::coin(
                "0xf22bede237a07e121b56d91a491eb7bcdfd1f5907926a9e58338f964a01b17fa::asset::USDC",
                "lzUSDC",
                "LayerZero USD Coin",
            ),
            CoinEntry::coin(
                "0x7fd500c11216f0fe3095d0c4b8aa4d64a4e2e04f83758462f2b127255643615::thl_coin::THL",
                "THL",
                "Thala Token",
            ),
        ];

        let labels = vec![
            ("0x1", "Framework"),
            ("0x3", "Legacy Token"),
            ("0x4", "Digital Assets"),
            ("0xa", "Aptos Coin Fungible Asset"),
            (
                "0x867ed1f6bf916171b1de3ee92849b8978b7d1b9e0a8cc982a3d19d535dfd9c0c",
                "Aptos Names",
            ),
            (
                "0x190d44266241744264b964a37b8f09863167a12d3e70cda39376cfb4e3561e12",
                "Liquidswap",
            ),
            (
                "0xc7efb4076dbe143cbcd98cfaaa929ecfc8f299203dfff63b95ccb6bfe19850fa",
                "PancakeSwap",
            ),
            (
                "0x48271d39d0b05bd6efca2278f22277d6fcc375504f9839fd73f74ace240861af",
                "Thala",
            ),
        ];

        Self::new(coins, labels)
    }

    /// Finds the coin registered under a type tag, in any spelling.
    #[must_use]
    pub fn coin_by_type(&self, coin_type: &str) -> Option<&CoinEntry> {
        let wanted = canonical_struct(coin_type);
        self.coins
            .iter()
            .find(|coin| coin.coin_type.as_deref() == Some(wanted.as_str()))
    }

    /// Finds the asset whose fungible asset metadata lives at `address`.
    #[must_use]
    pub fn coin_by_fa_address(&self, address: &str) -> Option<&CoinEntry> {
        let wanted = display_address(address)?;
        self.coins
            .iter()
            .find(|coin| coin.fa_address.as_deref() == Some(wanted.as_str()))
    }

    /// Finds coins whose symbol or name contains `text`, ignoring case.
    #[must_use]
    pub fn coins_matching_text(&self, text: &str) -> Vec<&CoinEntry> {
        let needle = text.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        self.coins
            .iter()
            .filter(|coin| {
                coin.symbol.to_lowercase().contains(&needle)
                    || coin.name.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Returns the well-known label of an address.
    #[must_use]
    pub fn label_for(&self, address: &str) -> Option<&str> {
        let wanted = display_address(address)?;
        self.labels
            .iter()
            .find(|(candidate, _)| *candidate == wanted)
            .map(|(_, label)| label.as_str())
    }

    /// Returns every (address, label) pair whose label contains `text`,
    /// ignoring case.
    #[must_use]
    pub fn labels_matching_text(&self, text: &str) -> Vec<(&str, &str)> {
        let needle = text.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        self.labels
            .iter()
            .filter(|(_, label)| label.to_lowercase().contains(&needle))
            .map(|(address, label)| (address.as_str(), label.as_str()))
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coin_by_type_ignores_spelling() {
        let data = ReferenceData::builtin();
        let apt = data.coin_by_type("0x0001::aptos_coin::AptosCoin").unwrap();
        assert_eq!(apt.symbol, "APT");
        assert!(data.coin_by_type("0x1::aptos_coin::Other").is_none());
    }

    #[test]
    fn test_coin_by_fa_address() {
        let data = ReferenceData::builtin();
        assert_eq!(data.coin_by_fa_address("0x000a").unwrap().symbol, "APT");
        assert_eq!(
            data.coin_by_fa_address(
                "0xBAE207659DB88BEA0CBEAD6DA0ED00AAC12EDCDDA169E591CD41C94180B46F3B"
            )
            .unwrap()
            .symbol,
            "USDC"
        );
        assert!(data.coin_by_fa_address("0x1").is_none());
    }

    #[test]
    fn test_coins_matching_text() {
        let data = ReferenceData::builtin();
        let symbols: Vec<_> = data
            .coins_matching_text("usdc")
            .iter()
            .map(|c| c.symbol.as_str())
            .collect();
        assert_eq!(symbols, vec!["USDC", "lzUSDC"]);
        assert!(data.coins_matching_text("  ").is_empty());
    }

    #[test]
    fn test_labels() {
        let data = ReferenceData::builtin();
        assert_eq!(data.label_for("0x01"), Some("Framework"));
        assert_eq!(data.label_for("0x2"), None);

        let matches = data.labels_matching_text("SWAP");
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].1, "Liquidswap");
    }

    #[test]
    fn test_invalid_label_addresses_are_skipped() {
        let data = ReferenceData::new(Vec::new(), vec![("not-an-address", "Nope"), ("0x1", "One")]);
        assert!(data.labels_matching_text("nope").is_empty());
        assert_eq!(data.label_for("0x1"), Some("One"));
    }
}
