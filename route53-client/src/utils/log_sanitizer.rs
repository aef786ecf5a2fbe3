//! Log sanitization utilities
//!
//! Response bodies can be large (a full record set listing) and request
//! headers carry signatures, so neither is logged verbatim.

/// Maximum number of bytes of a body included in log output.
const TRUNCATE_LIMIT: usize = 256;

/// Headers whose values are replaced before logging.
const SENSITIVE_HEADERS: &[&str] = &["authorization", "x-amz-security-token"];

/// MSRV-compatible replacement for `str::floor_char_boundary` (stable since 1.91.0).
fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        s.len()
    } else {
        let mut i = index;
        while i > 0 && !s.is_char_boundary(i) {
            i -= 1;
        }
        i
    }
}

/// Truncate a string for safe logging.
///
/// Returns the original string if it's within the limit, otherwise the first
/// `TRUNCATE_LIMIT` bytes (on a character boundary) and the total length.
pub fn truncate_for_log(s: &str) -> String {
    if s.len() <= TRUNCATE_LIMIT {
        s.to_string()
    } else {
        format!(
            "{}... [truncated, total {} bytes]",
            &s[..floor_char_boundary(s, TRUNCATE_LIMIT)],
            s.len()
        )
    }
}

/// Lossy UTF-8 view of a raw body, truncated like [`truncate_for_log`].
pub fn body_for_log(body: &[u8]) -> String {
    truncate_for_log(&String::from_utf8_lossy(body))
}

/// Header value safe to log: sensitive headers are masked.
pub fn header_for_log<'a>(name: &str, value: &'a str) -> &'a str {
    if SENSITIVE_HEADERS
        .iter()
        .any(|h| h.eq_ignore_ascii_case(name))
    {
        "***"
    } else {
        value
    }
}
