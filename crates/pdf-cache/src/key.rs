//! Cache key derivation

/// Key used when the source has no usable trailing path segment
pub const FALLBACK_KEY: &str = "temp.pdf";

/// Derive the cache key for a source location.
///
/// The key is everything after the last `/`. Absent or empty sources, sources
/// without a `/`, and sources whose trailing segment is empty fall back to
/// [`FALLBACK_KEY`]. The relative components `.` and `..` would point at the
/// cache directory itself or its parent, so they fall back as well.
pub fn cache_key(source: Option<&str>) -> String {
    source
        .and_then(|s| s.rsplit_once('/'))
        .map(|(_, segment)| segment)
        .filter(|segment| !segment.is_empty() && *segment != "." && *segment != "..")
        .unwrap_or(FALLBACK_KEY)
        .to_string()
}
