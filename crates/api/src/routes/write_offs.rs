//! Route definitions for the `/write-offs` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::write_offs;
use crate::state::AppState;

/// Routes mounted at `/write-offs`.
///
/// ```text
/// GET    /        -> list_write_offs (?is_cancelled=&location=&date_written_off=)
/// GET    /{id}    -> get_write_off
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(write_offs::list_write_offs))
        .route("/{id}", get(write_offs::get_write_off))
}
