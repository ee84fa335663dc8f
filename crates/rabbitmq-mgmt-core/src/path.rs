//! Percent-encoding of request path segments.
//!
//! Management API paths embed caller-supplied names (vhosts, queues,
//! exchanges, connections, users). The default vhost is literally `/`, so
//! every segment must be encoded before it is joined onto the `/api/` root —
//! otherwise `queues///foo` would be sent instead of `queues/%2F/foo`.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::borrow::Cow;

/// Characters left bare in a path segment: the unreserved set plus the marks
/// that `encodeURIComponent` leaves alone, which is what the management UI
/// itself produces. Everything else (including `/`, `%` and spaces) is encoded.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'!')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a single path segment.
#[must_use]
pub fn encode_segment(segment: &str) -> Cow<'_, str> {
    utf8_percent_encode(segment, SEGMENT).into()
}

#[cfg(test)]
mod tests {
    use super::encode_segment;
    use std::borrow::Cow;

    #[test]
    fn default_vhost_encodes_to_percent_2f() {
        assert_eq!(encode_segment("/"), "%2F");
    }

    #[test]
    fn plain_names_pass_through_borrowed() {
        let encoded = encode_segment("orders");
        assert!(matches!(encoded, Cow::Borrowed("orders")));
    }

    #[test]
    fn spaces_and_reserved_characters_are_encoded() {
        assert_eq!(encode_segment("my queue"), "my%20queue");
        assert_eq!(encode_segment("a/b"), "a%2Fb");
        assert_eq!(encode_segment("50%"), "50%25");
        assert_eq!(encode_segment("q?x=1"), "q%3Fx%3D1");
    }

    #[test]
    fn unreserved_marks_are_left_bare() {
        assert_eq!(encode_segment("queue-v1.2_final~(copy)!*'"), "queue-v1.2_final~(copy)!*'");
    }

    #[test]
    fn non_ascii_is_utf8_percent_encoded() {
        assert_eq!(encode_segment("caf\u{e9}"), "caf%C3%A9");
    }
}
