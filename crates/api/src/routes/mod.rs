pub mod health;
pub mod items;
pub mod write_offs;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /items                                   list, create
/// /items/confirm-queue                     items awaiting acceptance
/// /items/counters                          per-status counts
/// /items/{id}                              get, update
/// /items/{id}/history                      history page
/// /items/{id}/assign                       assign to location (POST)
/// /items/{id}/issue                        issue to brigade (POST)
/// /items/{id}/confirm                      accept / reject (POST)
/// /items/{id}/send-to-service              send to service (POST)
/// /items/{id}/confirm-repair               confirm repair start (POST)
/// /items/{id}/return-from-service          return from service (POST)
/// /items/{id}/write-off                    write off (POST), cancel (DELETE)
/// /items/{id}/lock                         lock (POST), unlock (DELETE)
///
/// /write-offs                              list
/// /write-offs/{id}                         get
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/items", items::router())
        .nest("/write-offs", write_offs::router())
}
