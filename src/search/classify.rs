//! Input classification.
//!
//! Maps raw search-box text to a set of shape facets. Facets are additive:
//! a 64-digit hex string is both a 32-byte hex value (possible transaction
//! hash) and a valid account address. The pipeline branches on facet
//! priority rather than on a single discriminant.

use crate::domain::address::{ADDRESS_HEX_LEN, hex_digits};

/// Suffix reserved by the name service.
pub const ANS_SUFFIX: &str = ".apt";

/// Wallet-issued subdomain suffix, normalized to `<name>.petra.apt`.
pub const PETRA_SUFFIX: &str = ".petra";

// ============================================================================
// Classification
// ============================================================================

/// Shape facets of a query, computed once per query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputClassification {
    pub is_ans_name: bool,
    pub is_struct: bool,
    pub is_valid_block_height_or_version: bool,
    pub is_32_byte_hex: bool,
    pub is_valid_account_address: bool,
    pub is_emoji: bool,
    /// Set only when no other facet holds.
    pub is_generic: bool,
}

impl InputClassification {
    /// True for empty input, where nothing should be looked up.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// True when an address-family probe applies.
    #[must_use]
    pub fn is_address_like(&self) -> bool {
        self.is_32_byte_hex || self.is_valid_account_address
    }
}

/// Classifies raw input. Pure and deterministic.
#[must_use]
pub fn classify(raw: &str) -> InputClassification {
    let text = raw.trim();
    if text.is_empty() {
        return InputClassification::default();
    }

    let mut facets = InputClassification {
        is_ans_name: ans_name(text).is_some(),
        is_struct: StructTag::parse(text).is_some(),
        is_valid_block_height_or_version: is_block_height_or_version(text),
        is_32_byte_hex: is_32_byte_hex(text),
        is_valid_account_address: is_account_address(text),
        is_emoji: is_emoji_sequence(text),
        is_generic: false,
    };
    facets.is_generic = facets.is_empty();
    facets
}

/// Produces the cache and in-flight key for a query.
///
/// Normalization never changes the classification of the text: hex is
/// lowercased and `0x`-prefixed but not padded, names are lowercased and
/// completed with their suffix, struct tags have their addresses
/// canonicalized, numbers lose leading zeros.
#[must_use]
pub fn normalize_query(raw: &str) -> String {
    let text = raw.trim();
    let facets = classify(text);

    if let Some(name) = ans_name(text) {
        return name;
    }
    if facets.is_struct {
        return crate::domain::address::canonical_struct(text);
    }
    if facets.is_valid_block_height_or_version {
        if let Ok(number) = text.parse::<u64>() {
            return number.to_string();
        }
    }
    if facets.is_address_like() {
        if let Some(digits) = hex_digits(text) {
            return format!("0x{}", digits.to_ascii_lowercase());
        }
    }
    if facets.is_emoji {
        return text.to_string();
    }

    text.to_lowercase()
}

// ============================================================================
// Facet Predicates
// ============================================================================

/// Exactly 64 hex digits, optional `0x` prefix.
#[must_use]
pub fn is_32_byte_hex(text: &str) -> bool {
    hex_digits(text).is_some_and(|digits| digits.len() == ADDRESS_HEX_LEN)
}

/// `0x` followed by 1 to 64 hex digits, or 64 bare hex digits.
///
/// Short bare hex such as `cafe` or `123` is not an address; it would make
/// every decimal number and many words ambiguous.
#[must_use]
pub fn is_account_address(text: &str) -> bool {
    let prefixed = text.starts_with("0x") || text.starts_with("0X");
    match hex_digits(text) {
        Some(_) if prefixed => true,
        Some(digits) => digits.len() == ADDRESS_HEX_LEN,
        None => false,
    }
}

/// One or more ASCII digits fitting in a `u64`.
#[must_use]
pub fn is_block_height_or_version(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) && text.parse::<u64>().is_ok()
}

/// Returns the normalized name (`alice.apt`, `bob.petra.apt`) if `text` is
/// a name-service name.
#[must_use]
pub fn ans_name(text: &str) -> Option<String> {
    let lowered = text.trim().to_lowercase();

    let body = if let Some(body) = lowered.strip_suffix(ANS_SUFFIX) {
        body.to_string()
    } else if lowered.ends_with(PETRA_SUFFIX) {
        lowered.clone()
    } else {
        return None;
    };

    let labels: Vec<&str> = body.split('.').collect();
    let valid = (1..=2).contains(&labels.len()) && labels.iter().all(|l| is_ans_label(l));

    valid.then(|| format!("{body}{ANS_SUFFIX}"))
}

fn is_ans_label(label: &str) -> bool {
    (3..=63).contains(&label.len())
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Every char is part of an emoji sequence and at least one is pictographic.
#[must_use]
pub fn is_emoji_sequence(text: &str) -> bool {
    let mut has_pictograph = false;
    for c in text.chars() {
        if is_pictographic(c) {
            has_pictograph = true;
        } else if !is_emoji_component(c) {
            return false;
        }
    }
    has_pictograph
}

fn is_pictographic(c: char) -> bool {
    matches!(
        u32::from(c),
        0x00A9
            | 0x00AE
            | 0x203C
            | 0x2049
            | 0x2122
            | 0x2139
            | 0x2194..=0x21AA
            | 0x231A..=0x23FF
            | 0x24C2
            | 0x25AA..=0x25FE
            | 0x2600..=0x27BF
            | 0x2934..=0x2935
            | 0x2B05..=0x2B55
            | 0x3030
            | 0x303D
            | 0x3297
            | 0x3299
            | 0x1F000..=0x1FAFF
    )
}

/// Joiners, variation selectors, keycap and tag characters.
fn is_emoji_component(c: char) -> bool {
    matches!(
        u32::from(c),
        0x200D | 0xFE0E | 0xFE0F | 0x20E3 | 0xE0020..=0xE007F
    )
}

// ============================================================================
// Struct Tags
// ============================================================================

/// A parsed `address::module::name<args>` type tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructTag<'a> {
    pub address: &'a str,
    pub module: &'a str,
    pub name: &'a str,
    /// Text between the outer angle brackets, if any.
    pub type_args: Option<&'a str>,
}

impl<'a> StructTag<'a> {
    /// Parses a struct tag. Generic arguments must be non-empty and balanced.
    #[must_use]
    pub fn parse(text: &'a str) -> Option<Self> {
        let text = text.trim();
        let (head, type_args) = match text.find('<') {
            Some(open) => {
                let inner = text[open + 1..].strip_suffix('>')?;
                if inner.trim().is_empty() || !is_balanced(inner) {
                    return None;
                }
                (&text[..open], Some(inner))
            }
            None => (text, None),
        };

        let mut parts = head.split("::");
        let (address, module, name) = (parts.next()?, parts.next()?, parts.next()?);
        if parts.next().is_some() {
            return None;
        }

        let valid = is_account_address(address) && is_identifier(module) && is_identifier(name);
        valid.then_some(Self {
            address,
            module,
            name,
            type_args,
        })
    }

    /// The coin type a query refers to.
    ///
    /// Store and info wrappers (`0x1::coin::CoinStore<T>`,
    /// `0x1::coin::CoinInfo<T>`) refer to their argument; any other tag
    /// refers to itself.
    #[must_use]
    pub fn coin_type(&self, original: &'a str) -> &'a str {
        let is_wrapper = crate::domain::address::display_address(self.address).as_deref()
            == Some("0x1")
            && self.module == "coin"
            && matches!(self.name, "CoinStore" | "CoinInfo");

        match (is_wrapper, self.type_args) {
            (true, Some(inner)) => inner.trim(),
            _ => original.trim(),
        }
    }
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn is_balanced(text: &str) -> bool {
    let mut depth: i32 = 0;
    for c in text.chars() {
        match c {
            '<' => depth += 1,
            '>' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

// ============================================================================
// Tests
// ============================================================================
