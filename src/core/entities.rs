//! XML Entity Decoding
//!
//! Handles the five predefined escapes (`&lt; &gt; &amp; &quot; &apos;`) and
//! strips CDATA markers (`<![CDATA[`, `]]>`) in the same pass. Anything else,
//! including unknown or unterminated entity references, is copied through.
//!
//! Uses Cow for zero-copy when there is nothing to decode.

use memchr::{memchr3_iter, memmem};
use std::borrow::Cow;

const CDATA_OPEN: &str = "<![CDATA[";
const CDATA_CLOSE: &str = "]]>";

/// Decode text content
///
/// Returns Borrowed if the input holds no entity reference and no CDATA
/// marker, Owned otherwise. The output is never longer than the input.
#[inline]
pub fn decode_text(input: &str) -> Cow<'_, str> {
    // Fast path: SIMD scan for anything that could start a replacement
    if !needs_decoding(input.as_bytes()) {
        return Cow::Borrowed(input);
    }
    Cow::Owned(decode_all(input))
}

fn needs_decoding(bytes: &[u8]) -> bool {
    memchr::memchr(b'&', bytes).is_some()
        || memmem::find(bytes, CDATA_OPEN.as_bytes()).is_some()
        || memmem::find(bytes, CDATA_CLOSE.as_bytes()).is_some()
}

/// Single left-to-right pass over the candidate bytes
fn decode_all(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut result = String::with_capacity(input.len());
    let mut copied = 0;

    for at in memchr3_iter(b'&', b'<', b']', bytes) {
        // Candidate inside a span already consumed
        if at < copied {
            continue;
        }
        let rest = &input[at..];
        let (replacement, consumed) = if rest.starts_with(CDATA_OPEN) {
            ("", CDATA_OPEN.len())
        } else if rest.starts_with(CDATA_CLOSE) {
            ("", CDATA_CLOSE.len())
        } else if let Some((decoded, len)) = decode_entity(rest) {
            (decoded, len)
        } else {
            continue;
        };
        result.push_str(&input[copied..at]);
        result.push_str(replacement);
        copied = at + consumed;
    }

    result.push_str(&input[copied..]);
    result
}

/// Decode a predefined entity at the start of `rest` (which begins with `&`)
///
/// Returns the replacement and the number of bytes it stands for.
fn decode_entity(rest: &str) -> Option<(&'static str, usize)> {
    const ENTITIES: [(&str, &str); 5] = [
        ("&lt;", "<"),
        ("&gt;", ">"),
        ("&amp;", "&"),
        ("&quot;", "\""),
        ("&apos;", "'"),
    ];
    ENTITIES
        .iter()
        .find(|(entity, _)| rest.starts_with(entity))
        .map(|(entity, decoded)| (*decoded, entity.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_entities() {
        let result = decode_text("Hello, World!");
        assert!(matches!(result, Cow::Borrowed(_)));
        assert_eq!(result, "Hello, World!");
    }

    #[test]
    fn test_basic_entities() {
        let result = decode_text("&lt;hello&gt; &amp; &quot;world&quot; &apos;x&apos;");
        assert_eq!(result, "<hello> & \"world\" 'x'");
    }

    #[test]
    fn test_single_pass() {
        // `&amp;lt;` decodes once to `&lt;`, not to `<`
        assert_eq!(decode_text("&amp;lt;"), "&lt;");
    }

    #[test]
    fn test_unknown_entity_kept() {
        assert_eq!(decode_text("&unknown; &#65; & alone"), "&unknown; &#65; & alone");
    }

    #[test]
    fn test_cdata_markers_stripped() {
        assert_eq!(decode_text("<![CDATA[a < b]]>"), "a < b");
        assert_eq!(decode_text("x <![CDATA[y]]> &amp; z"), "x y & z");
    }

    #[test]
    fn test_lone_brackets_and_angles_kept() {
        let result = decode_text("a ] b < c ]] d");
        assert!(matches!(result, Cow::Borrowed(_)));
        assert_eq!(result, "a ] b < c ]] d");
    }

    #[test]
    fn test_never_longer() {
        for input in ["&amp;&amp;", "<![CDATA[]]>", "plain", "&lt"] {
            assert!(decode_text(input).len() <= input.len());
        }
    }

    #[test]
    fn test_multibyte_preserved() {
        assert_eq!(decode_text("caf\u{e9} &amp; th\u{e9}"), "caf\u{e9} & th\u{e9}");
    }
}
