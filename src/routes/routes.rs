//! Defines routes for the addressing and identity API.
//!
//! ## Structure
//! - **Objects**
//!   - `GET    /objects/resolve?url=`                  resolve a public URL
//!   - `GET    /objects/exists?md5=&sha256=&domain=`   dedup check
//!   - `POST   /objects`                               admit an upload
//!   - `DELETE /objects?url=`                          soft-delete
//!   - `POST   /names`                                 generate a free name
//!   - `GET    /blacklist/{hash}`                      blacklist entry
//!
//! - **Users** (admin only)
//!   - `POST   /users`                                 provision
//!   - `GET    /users/{id}`                            look up by identity
//!   - `DELETE /users/{id}`                            revoke by identity or key
//!   - `PUT    /users/{id}/upload-limit`               set quota

use crate::{
    handlers::{
        health_handlers::{healthz, readyz},
        object_handlers::{
            admit_upload, delete_object, generate_name, get_blacklist_entry, object_exists,
            resolve_object,
        },
        user_handlers::{create_user, get_user, revoke_user, set_upload_limit},
    },
    state::AppState,
};
use axum::{
    Router,
    routing::{get, post, put},
};

/// Build and return the router for every endpoint.
///
/// The router carries shared state (`AppState`) to all handlers.
pub fn routes() -> Router<AppState> {
    Router::new()
        // health endpoints (mounted at root)
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Object addressing
        .route("/objects", post(admit_upload).delete(delete_object))
        .route("/objects/resolve", get(resolve_object))
        .route("/objects/exists", get(object_exists))
        .route("/names", post(generate_name))
        .route("/blacklist/{hash}", get(get_blacklist_entry))
        // Admin
        .route("/users", post(create_user))
        .route("/users/{id}", get(get_user).delete(revoke_user))
        .route("/users/{id}/upload-limit", put(set_upload_limit))
}
