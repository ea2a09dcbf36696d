//! Plain-text rendering of search output for the terminal.

use crate::domain::SearchResult;
use crate::search::InputClassification;

/// Renders a result list, one row per line, headers underlined with `==`.
#[must_use]
pub fn render_results(results: &[SearchResult]) -> String {
    let mut lines = Vec::with_capacity(results.len());

    for result in results {
        if result.is_group_header {
            if !lines.is_empty() {
                lines.push(String::new());
            }
            lines.push(format!("== {} ==", result.label));
            continue;
        }

        match result.to.as_deref() {
            Some(to) if result.is_interactive() => {
                lines.push(format!("  {}  {to}", result.label));
            }
            _ => lines.push(result.label.clone()),
        }
    }

    lines.join("\n")
}

/// Renders the facets of a classified query.
#[must_use]
pub fn render_classification(query: &str, facets: &InputClassification) -> String {
    let names = [
        (facets.is_ans_name, "ans-name"),
        (facets.is_struct, "struct"),
        (facets.is_valid_block_height_or_version, "block-or-version"),
        (facets.is_32_byte_hex, "32-byte-hex"),
        (facets.is_valid_account_address, "account-address"),
        (facets.is_emoji, "emoji"),
        (facets.is_generic, "generic"),
    ];
    let set: Vec<&str> = names
        .iter()
        .filter(|(on, _)| *on)
        .map(|(_, name)| *name)
        .collect();

    let facets = if set.is_empty() {
        "(none)".to_string()
    } else {
        set.join(", ")
    };
    format!("query:  {query}\nfacets: {facets}")
}
