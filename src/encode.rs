//! RFC 3986 percent-encoding as OAuth 1.0 uses it (RFC 5849 §3.6).
//!
//! Only the unreserved set `A-Z a-z 0-9 - . _ ~` passes through; every other
//! byte of the UTF-8 input becomes `%XX` with uppercase hex. Space is `%20`,
//! never `+`, which is what sets this apart from form encoding.
//!
//! The encoder is not idempotent: a `%` in the input is itself encoded, so
//! encoding an already encoded string yields `%25XX` sequences.

use std::borrow::Cow;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode `input` for use in signatures, headers and URLs.
pub fn percent_encode(input: &str) -> String {
    utf8_percent_encode(input, OAUTH_ENCODE_SET).to_string()
}

/// Reverse [`percent_encode`]. Invalid UTF-8 is replaced lossily.
pub fn percent_decode(input: &str) -> Cow<'_, str> {
    percent_decode_str(input).decode_utf8_lossy()
}
