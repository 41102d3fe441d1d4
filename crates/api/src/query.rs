//! Query-string parameters shared by several handlers.

use serde::Deserialize;

/// `?limit=&offset=`. Out-of-range values are clamped by the read model.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// `?location=`, matched exactly against the item's location.
#[derive(Debug, Default, Deserialize)]
pub struct LocationParams {
    pub location: Option<String>,
}
