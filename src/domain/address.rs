//! Account address parsing and display.
//!
//! Addresses are 32 bytes written as hex. Special addresses (`0x0` through
//! `0xa`) are displayed in short form, every other address is displayed
//! zero-padded to 64 hex digits. All routes and lookup keys use the display
//! form so that `0x1`, `0x01` and the padded spelling collapse to one entity.

/// Number of hex digits in a full-length address.
pub const ADDRESS_HEX_LEN: usize = 64;

/// Returns the hex digits of `input` without the `0x` prefix, if `input` is
/// a hex string of 1 to 64 digits. Prefix is optional.
#[must_use]
pub fn hex_digits(input: &str) -> Option<&str> {
    let digits = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input);

    let valid = !digits.is_empty()
        && digits.len() <= ADDRESS_HEX_LEN
        && digits.chars().all(|c| c.is_ascii_hexdigit());

    valid.then_some(digits)
}

/// Pads an address to the full 64-digit lowercase form with `0x` prefix.
#[must_use]
pub fn long_address(input: &str) -> Option<String> {
    let digits = hex_digits(input)?;
    Some(format!(
        "0x{:0>width$}",
        digits.to_ascii_lowercase(),
        width = ADDRESS_HEX_LEN
    ))
}

/// Formats an address for display and routing.
///
/// Special addresses use the short form (`0x1`), all others the long form.
#[must_use]
pub fn display_address(input: &str) -> Option<String> {
    let digits = hex_digits(input)?;
    let trimmed = digits.trim_start_matches('0');

    if trimmed.is_empty() {
        return Some("0x0".to_string());
    }
    if trimmed.len() == 1 && u8::from_str_radix(trimmed, 16).is_ok_and(|v| v <= 0xa) {
        return Some(format!("0x{}", trimmed.to_ascii_lowercase()));
    }

    long_address(input)
}

/// Rewrites the address segments of a struct tag into display form and drops
/// whitespace, so equivalent spellings of a type compare equal.
///
/// An address segment is a word at the start of the tag or of a type
/// argument that is followed by `::`. Bare hex counts only at full length.
#[must_use]
pub fn canonical_struct(input: &str) -> String {
    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    let mut out = String::with_capacity(compact.len());
    let mut rest = compact.as_str();
    let mut address_position = true;

    while let Some(c) = rest.chars().next() {
        if !is_word_char(c) {
            out.push(c);
            address_position = matches!(c, '<' | ',');
            rest = &rest[c.len_utf8()..];
            continue;
        }

        let end = rest.find(|c: char| !is_word_char(c)).unwrap_or(rest.len());
        let (word, tail) = rest.split_at(end);
        let address = (address_position && tail.starts_with("::"))
            .then(|| struct_address(word))
            .flatten();
        match address {
            Some(address) => out.push_str(&address),
            None => out.push_str(word),
        }
        address_position = false;
        rest = tail;
    }

    out
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn struct_address(word: &str) -> Option<String> {
    let prefixed = word.starts_with("0x") || word.starts_with("0X");
    let digits = hex_digits(word)?;
    if !prefixed && digits.len() != ADDRESS_HEX_LEN {
        return None;
    }
    display_address(word)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("0x1", Some("1"))]
    #[case("0XaB", Some("aB"))]
    #[case("ab", Some("ab"))]
    #[case("0x", None)]
    #[case("0xg1", None)]
    #[case("", None)]
    fn test_hex_digits(#[case] input: &str, #[case] expected: Option<&str>) {
        assert_eq!(hex_digits(input), expected);
    }

    #[test]
    fn test_hex_digits_rejects_overlong() {
        let overlong = format!("0x{}", "1".repeat(65));
        assert_eq!(hex_digits(&overlong), None);
    }

    #[rstest]
    #[case("0x1", "0x1")]
    #[case("0x0000000000000000000000000000000000000000000000000000000000000001", "0x1")]
    #[case("0x00", "0x0")]
    #[case("0xA", "0xa")]
    #[case(
        "0xb",
        "0x000000000000000000000000000000000000000000000000000000000000000b"
    )]
    #[case(
        "0xBAE207659DB88BEA0CBEAD6DA0ED00AAC12EDCDDA169E591CD41C94180B46F3B",
        "0xbae207659db88bea0cbead6da0ed00aac12edcdda169e591cd41c94180b46f3b"
    )]
    fn test_display_address(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(display_address(input).as_deref(), Some(expected));
    }

    #[test]
    fn test_canonical_struct() {
        assert_eq!(
            canonical_struct("0x01::coin::CoinStore< 0x0001::aptos_coin::AptosCoin >"),
            "0x1::coin::CoinStore<0x1::aptos_coin::AptosCoin>"
        );
        assert_eq!(canonical_struct("0x1::m::T0x1"), "0x1::m::T0x1");
        assert_eq!(
            canonical_struct("0xABC::m::T"),
            "0x0000000000000000000000000000000000000000000000000000000000000abc::m::T"
        );
        assert_eq!(canonical_struct("vector<u8>"), "vector<u8>");
    }

    #[test]
    fn test_canonical_struct_accepts_bare_full_length_addresses() {
        let bare = "F22BEDE237A07E121B56D91A491EB7BCDFD1F5907926A9E58338F964A01B17FA";
        let prefixed = format!("0x{}", bare.to_ascii_lowercase());

        assert_eq!(
            canonical_struct(&format!("{bare}::asset::USDC")),
            format!("{prefixed}::asset::USDC")
        );
        assert_eq!(
            canonical_struct(&format!("0x1::coin::CoinInfo<{}::a::B>", "0".repeat(64))),
            "0x1::coin::CoinInfo<0x0::a::B>"
        );
        // Short bare hex is an identifier, not an address.
        assert_eq!(canonical_struct("abc::m::T"), "abc::m::T");
    }
}
