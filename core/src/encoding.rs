//! Percent-encoding for link components.
//!
//! Each path segment, query key/value, and fragment is encoded on its own
//! before assembly, so a space in a route's raw value ("edit portfolio")
//! travels as `edit%20portfolio` and decodes back losslessly.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Everything outside RFC 3986's unreserved set (ALPHA, DIGIT, `-`, `.`,
/// `_`, `~`) gets escaped.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Encode one link component.
///
/// Unreserved characters pass through; everything else, including spaces
/// and multi-byte UTF-8, becomes uppercase `%XX` escapes.
///
/// # Example
///
/// ```
/// use lodestar::encode_component;
///
/// assert_eq!(encode_component("edit portfolio"), "edit%20portfolio");
/// assert_eq!(encode_component("portfolio_curation"), "portfolio_curation");
/// ```
#[must_use]
pub fn encode_component(raw: &str) -> String {
    utf8_percent_encode(raw, COMPONENT).to_string()
}

/// Decode one link component.
///
/// Returns `None` on a truncated or non-hex escape, or if the decoded
/// bytes are not valid UTF-8. Never panics.
///
/// # Example
///
/// ```
/// use lodestar::decode_component;
///
/// assert_eq!(decode_component("edit%20portfolio").as_deref(), Some("edit portfolio"));
/// assert_eq!(decode_component("bad%2"), None);
/// ```
#[must_use]
pub fn decode_component(encoded: &str) -> Option<String> {
    // percent_decode passes malformed escapes through as literal bytes;
    // a bad escape here must be an error, not silent data.
    if !escapes_are_well_formed(encoded.as_bytes()) {
        return None;
    }
    percent_decode_str(encoded)
        .decode_utf8()
        .ok()
        .map(|decoded| decoded.into_owned())
}

fn escapes_are_well_formed(bytes: &[u8]) -> bool {
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = |offset: usize| {
                bytes
                    .get(i + offset)
                    .is_some_and(|b| b.is_ascii_hexdigit())
            };
            if !(hex(1) && hex(2)) {
                return false;
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreserved_passes_through() {
        assert_eq!(encode_component("portfolio_curation"), "portfolio_curation");
        assert_eq!(encode_component("a-b.c~d"), "a-b.c~d");
    }

    #[test]
    fn space_and_reserved_are_escaped() {
        assert_eq!(encode_component("edit portfolio"), "edit%20portfolio");
        assert_eq!(encode_component("a/b?c#d"), "a%2Fb%3Fc%23d");
        assert_eq!(encode_component("k=v&x"), "k%3Dv%26x");
    }

    #[test]
    fn multibyte_utf8_round_trips() {
        let raw = "übersicht 概要";
        let encoded = encode_component(raw);
        assert!(encoded.is_ascii());
        assert_eq!(decode_component(&encoded).as_deref(), Some(raw));
    }

    #[test]
    fn decode_rejects_bad_escapes() {
        assert_eq!(decode_component("%"), None);
        assert_eq!(decode_component("%2"), None);
        assert_eq!(decode_component("%zz"), None);
        assert_eq!(decode_component("ok%ffbad%fe"), None); // invalid UTF-8
    }

    #[test]
    fn decode_accepts_lowercase_hex() {
        assert_eq!(decode_component("edit%20portfolio").as_deref(), Some("edit portfolio"));
        assert_eq!(decode_component("a%2fb").as_deref(), Some("a/b"));
    }

    #[test]
    fn round_trip_everything_printable() {
        let raw: String = (' '..='~').collect();
        assert_eq!(decode_component(&encode_component(&raw)).as_deref(), Some(raw.as_str()));
    }
}
