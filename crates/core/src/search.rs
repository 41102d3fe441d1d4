//! Pagination and search-term helpers shared by the read model.

/// Default page size for item listings.
pub const DEFAULT_ITEM_LIMIT: i64 = 100;

/// Maximum page size for item listings.
pub const MAX_ITEM_LIMIT: i64 = 1000;

/// Default page size for history listings.
pub const DEFAULT_HISTORY_LIMIT: i64 = 50;

/// Maximum page size for history listings.
pub const MAX_HISTORY_LIMIT: i64 = 500;

/// Maximum accepted length of a free-text search term.
pub const MAX_SEARCH_LENGTH: usize = 200;

/// Clamp a user-provided limit to `1..=max`, falling back to `default`.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).clamp(1, max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

/// Trim a search term; blank terms mean "no filter".
pub fn normalize_search(term: Option<&str>) -> Option<String> {
    let trimmed = term?.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.chars().take(MAX_SEARCH_LENGTH).collect())
}

/// Escape `%`, `_` and `\` so a term matches literally inside `ILIKE`.
pub fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
