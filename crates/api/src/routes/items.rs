//! Route definitions for the `/items` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::items;
use crate::state::AppState;

/// Routes mounted at `/items`.
///
/// ```text
/// GET    /                          -> list_items (?search=&status=&limit=&offset=)
/// POST   /                          -> create_item
/// GET    /confirm-queue             -> confirm_queue (?location=)
/// GET    /counters                  -> status_counters
/// GET    /{id}                      -> get_item
/// PATCH  /{id}                      -> update_item
/// GET    /{id}/history              -> get_history (?limit=&offset=)
/// POST   /{id}/assign               -> assign_item
/// POST   /{id}/issue                -> issue_to_brigade
/// POST   /{id}/confirm              -> confirm
/// POST   /{id}/send-to-service      -> send_to_service
/// POST   /{id}/confirm-repair       -> confirm_repair
/// POST   /{id}/return-from-service  -> return_from_service
/// POST   /{id}/write-off            -> write_off
/// DELETE /{id}/write-off            -> cancel_write_off
/// POST   /{id}/lock                 -> lock
/// DELETE /{id}/lock                 -> unlock
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(items::list_items).post(items::create_item))
        .route("/confirm-queue", get(items::confirm_queue))
        .route("/counters", get(items::status_counters))
        .route("/{id}", get(items::get_item).patch(items::update_item))
        .route("/{id}/history", get(items::get_history))
        .route("/{id}/assign", post(items::assign_item))
        .route("/{id}/issue", post(items::issue_to_brigade))
        .route("/{id}/confirm", post(items::confirm))
        .route("/{id}/send-to-service", post(items::send_to_service))
        .route("/{id}/confirm-repair", post(items::confirm_repair))
        .route("/{id}/return-from-service", post(items::return_from_service))
        .route(
            "/{id}/write-off",
            post(items::write_off).delete(items::cancel_write_off),
        )
        .route("/{id}/lock", post(items::lock).delete(items::unlock))
}
