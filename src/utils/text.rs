use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Normalize a station display name into the join key shared by the
/// daily aggregate and the municipal metadata: trim, lower-case, NFKD
/// decomposition, then drop combining marks and any remaining
/// non-ASCII. Idempotent, so already-normalized names pass through
/// unchanged.
pub fn normalize_station_name(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .filter(char::is_ascii)
        .collect()
}
