//! Result aggregation and cache TTL policy.
//!
//! Probe outputs are merged into the final list in a fixed category order:
//! exact matches (transactions and blocks), accounts, coins and assets, then
//! labels. Rows pointing at the same route are collapsed to the first one
//! seen, so probes that independently find the same entity produce a single
//! row.

use std::collections::HashSet;
use std::time::Duration;

use crate::domain::{Category, SearchResult};

/// TTL for result sets made only of transactions and blocks.
pub const LONG_TTL: Duration = Duration::from_secs(60 * 60);

/// TTL for everything else (account and asset state changes).
pub const SHORT_TTL: Duration = Duration::from_secs(5 * 60);

/// TTL pair applied by [`ttl_for`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlPolicy {
    pub long: Duration,
    pub short: Duration,
}

impl Default for TtlPolicy {
    fn default() -> Self {
        Self {
            long: LONG_TTL,
            short: SHORT_TTL,
        }
    }
}

/// Merges raw probe results into the displayed list.
///
/// Headers and sentinel rows in the input are discarded, so aggregating an
/// already aggregated list yields the same list.
#[must_use]
pub fn aggregate<I>(raw: I) -> Vec<SearchResult>
where
    I: IntoIterator<Item = SearchResult>,
{
    let mut seen_routes = HashSet::new();
    let mut grouped: Vec<(Category, Vec<SearchResult>)> = Category::ALL
        .iter()
        .map(|category| (*category, Vec::new()))
        .collect();

    for result in raw {
        let Some(category) = result.kind.category() else {
            continue;
        };
        if result.is_group_header || result.label.is_empty() {
            continue;
        }
        if let Some(to) = &result.to {
            if !seen_routes.insert(to.clone()) {
                continue;
            }
        }
        if let Some((_, bucket)) = grouped.iter_mut().find(|(c, _)| *c == category) {
            bucket.push(result);
        }
    }

    grouped.retain(|(_, bucket)| !bucket.is_empty());
    let with_headers = grouped.len() > 1;

    let mut results = Vec::new();
    for (category, bucket) in grouped {
        if with_headers {
            results.push(SearchResult::header(category));
        }
        results.extend(bucket);
    }

    if results.is_empty() {
        results.push(SearchResult::not_found());
    }
    results
}

/// Chooses how long an aggregated list may be served from cache.
///
/// Transactions and blocks never change once committed; anything that
/// includes accounts, assets, labels or the sentinel uses the short TTL.
#[must_use]
pub fn ttl_for(results: &[SearchResult], policy: TtlPolicy) -> Duration {
    let mut entries = results.iter().filter(|r| !r.is_group_header).peekable();
    let all_immutable = entries.peek().is_some() && entries.all(|r| r.kind.is_immutable());

    if all_immutable {
        policy.long
    } else {
        policy.short
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ResultKind, route};
    use crate::test_utils::ResultMother;
    use rstest::rstest;

    #[test]
    fn test_empty_input_yields_sentinel() {
        let results = aggregate(Vec::new());
        assert_eq!(results, vec![SearchResult::not_found()]);
    }

    #[test]
    fn test_single_category_has_no_header() {
        let results = aggregate(vec![
            ResultMother::account("0x1"),
            ResultMother::object("0xb"),
        ]);
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| !r.is_group_header));
    }

    #[test]
    fn test_categories_are_ordered_with_headers() {
        let results = aggregate(vec![
            ResultMother::label("0x4", "Digital Assets"),
            ResultMother::coin("0x1::aptos_coin::AptosCoin", "APT"),
            ResultMother::account("0x1"),
            ResultMother::block(7),
        ]);

        let labels: Vec<&str> = results.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Transactions & Blocks",
                "Block 7",
                "Accounts",
                "Account 0x1",
                "Coins & Assets",
                "APT",
                "Known Labels",
                "Digital Assets",
            ]
        );
        assert_eq!(results.iter().filter(|r| r.is_group_header).count(), 4);
    }

    #[test]
    fn test_duplicate_routes_keep_first_seen() {
        let first = SearchResult::link(
            ResultKind::Coin,
            "APT (registry)",
            route::coin("0x1::aptos_coin::AptosCoin"),
        );
        let second = SearchResult::link(
            ResultKind::Coin,
            "APT (on-chain)",
            route::coin("0x1::aptos_coin::AptosCoin"),
        );

        let results = aggregate(vec![first.clone(), second]);
        assert_eq!(results, vec![first]);
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let raw = vec![
            ResultMother::account("0x1"),
            ResultMother::transaction("0xabc"),
            ResultMother::coin("0x1::aptos_coin::AptosCoin", "APT"),
            ResultMother::account("0x1"),
        ];

        let once = aggregate(raw.clone());
        assert_eq!(aggregate(raw), once);
        assert_eq!(aggregate(once.clone()), once);
    }

    #[test]
    fn test_inputs_headers_and_sentinels_are_dropped() {
        let results = aggregate(vec![
            SearchResult::not_found(),
            SearchResult::header(Category::Accounts),
            ResultMother::account("0x1"),
        ]);
        assert_eq!(results, vec![ResultMother::account("0x1")]);
    }

    #[rstest]
    #[case::blocks_only(vec![ResultMother::block(1)], LONG_TTL)]
    #[case::txn_and_block(
        vec![ResultMother::block(1), ResultMother::transaction("0xabc")],
        LONG_TTL
    )]
    #[case::account(vec![ResultMother::account("0x1")], SHORT_TTL)]
    #[case::mixed(vec![ResultMother::block(1), ResultMother::account("0x1")], SHORT_TTL)]
    #[case::not_found(vec![], SHORT_TTL)]
    fn test_ttl_for(#[case] raw: Vec<SearchResult>, #[case] expected: Duration) {
        let results = aggregate(raw);
        assert_eq!(ttl_for(&results, TtlPolicy::default()), expected);
    }
}
