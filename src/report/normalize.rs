//! Request path normalization.
//!
//! Identifier segments are replaced with fixed placeholders so that requests
//! hitting the same endpoint with different ids share a grouping key.

use regex::Regex;
use std::sync::LazyLock;

/// Placeholder for 22-character opaque tokens (short ids, encoded uuids).
pub const TOKEN_MASK: &str = "XXXXXXXXXXXXXXX";

/// Placeholder for canonical UUID segments, preserving hyphen positions.
pub const UUID_MASK: &str = "XXXXXXXX-XXXX-XXXX-XXXX-XXXXXXXXXXXX";

static TOKEN_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{22}$").expect("valid token regex"));

static UUID_SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("valid uuid regex")
});

/// Normalize a request target into its grouping key.
///
/// Drops the query string, then masks every `/`-separated segment that is
/// entirely a 22-character token or a canonical UUID.
pub fn normalize_path(request: &str) -> String {
    let path = request.split_once('?').map_or(request, |(path, _)| path);

    path.split('/')
        .map(mask_segment)
        .collect::<Vec<_>>()
        .join("/")
}

fn mask_segment(segment: &str) -> &str {
    if TOKEN_SEGMENT.is_match(segment) {
        TOKEN_MASK
    } else if UUID_SEGMENT.is_match(segment) {
        UUID_MASK
    } else {
        segment
    }
}
