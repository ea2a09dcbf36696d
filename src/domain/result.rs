//! Search result types.
//!
//! A [`SearchResult`] is either a clickable destination (`to` is set) or a
//! non-interactive row such as a group header or the "not found" sentinel.

use serde::{Deserialize, Serialize};

// ============================================================================
// Result Kind
// ============================================================================

/// The kind of entity a search result points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultKind {
    Transaction,
    Block,
    Account,
    Object,
    Module,
    Coin,
    FungibleAsset,
    EmojiCoin,
    Label,
    /// Non-interactive group header inserted by the aggregator.
    Header,
    /// Sentinel row shown when nothing matched.
    NotFound,
}

impl ResultKind {
    /// Returns the display group this kind belongs to.
    ///
    /// Headers and the sentinel have no category.
    #[must_use]
    pub const fn category(self) -> Option<Category> {
        match self {
            Self::Transaction | Self::Block => Some(Category::Exact),
            Self::Account | Self::Object | Self::Module => Some(Category::Accounts),
            Self::Coin | Self::FungibleAsset | Self::EmojiCoin => Some(Category::Assets),
            Self::Label => Some(Category::Labels),
            Self::Header | Self::NotFound => None,
        }
    }

    /// Whether results of this kind describe immutable chain history.
    #[must_use]
    pub const fn is_immutable(self) -> bool {
        matches!(self, Self::Transaction | Self::Block)
    }
}

// ============================================================================
// Category
// ============================================================================

/// Display groups, declared in the order they are listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Exact,
    Accounts,
    Assets,
    Labels,
}

impl Category {
    pub const ALL: [Self; 4] = [Self::Exact, Self::Accounts, Self::Assets, Self::Labels];

    /// Header text shown above the group.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Exact => "Transactions & Blocks",
            Self::Accounts => "Accounts",
            Self::Assets => "Coins & Assets",
            Self::Labels => "Known Labels",
        }
    }
}

// ============================================================================
// Search Result
// ============================================================================

/// A single row of the search result list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Text shown to the user.
    pub label: String,
    /// Internal navigation path, `None` for non-interactive rows.
    pub to: Option<String>,
    /// Optional icon URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub is_group_header: bool,
    pub kind: ResultKind,
}

impl SearchResult {
    /// Creates a clickable result.
    #[must_use]
    pub fn link(kind: ResultKind, label: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            to: Some(to.into()),
            image: None,
            is_group_header: false,
            kind,
        }
    }

    /// Attaches an icon URL.
    #[must_use]
    pub fn with_image(mut self, image: Option<String>) -> Self {
        self.image = image;
        self
    }

    /// Creates a group header row.
    #[must_use]
    pub fn header(category: Category) -> Self {
        Self {
            label: category.title().to_string(),
            to: None,
            image: None,
            is_group_header: true,
            kind: ResultKind::Header,
        }
    }

    /// Creates the sentinel shown when nothing matched.
    #[must_use]
    pub fn not_found() -> Self {
        Self {
            label: "No results found".to_string(),
            to: None,
            image: None,
            is_group_header: false,
            kind: ResultKind::NotFound,
        }
    }

    /// Whether the row can be navigated to.
    #[must_use]
    pub fn is_interactive(&self) -> bool {
        self.to.is_some() && !self.is_group_header
    }
}

// ============================================================================
// Routes
// ============================================================================

/// Builders for the internal navigation paths stored in [`SearchResult::to`].
pub mod route {
    pub fn account(address: &str) -> String {
        format!("/account/{address}")
    }

    pub fn object(address: &str) -> String {
        format!("/object/{address}")
    }

    pub fn fungible_asset(address: &str) -> String {
        format!("/fungible_asset/{address}")
    }

    pub fn transaction(hash_or_version: &str) -> String {
        format!("/txn/{hash_or_version}")
    }

    pub fn block(height: u64) -> String {
        format!("/block/{height}")
    }

    pub fn coin(coin_type: &str) -> String {
        format!("/coin/{coin_type}")
    }

    pub fn module(address: &str, module: &str) -> String {
        format!("/account/{address}/modules/code/{module}")
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_order_matches_listing_order() {
        let mut sorted = Category::ALL;
        sorted.sort();
        assert_eq!(sorted, Category::ALL);
    }

    #[test]
    fn test_kind_categories() {
        assert_eq!(ResultKind::Block.category(), Some(Category::Exact));
        assert_eq!(ResultKind::Object.category(), Some(Category::Accounts));
        assert_eq!(ResultKind::EmojiCoin.category(), Some(Category::Assets));
        assert_eq!(ResultKind::Label.category(), Some(Category::Labels));
        assert_eq!(ResultKind::Header.category(), None);
        assert_eq!(ResultKind::NotFound.category(), None);
    }

    #[test]
    fn test_non_interactive_rows() {
        assert!(!SearchResult::header(Category::Accounts).is_interactive());
        assert!(!SearchResult::not_found().is_interactive());
        assert!(SearchResult::link(ResultKind::Block, "Block 1", route::block(1)).is_interactive());
    }

    #[test]
    fn test_result_serialization_keeps_kind() {
        let result = SearchResult::link(ResultKind::Coin, "APT", route::coin("0x1::aptos_coin::AptosCoin"));
        let json = serde_json::to_string(&result).unwrap();
        let back: SearchResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
        assert!(json.contains("\"kind\":\"coin\""));
    }
}
