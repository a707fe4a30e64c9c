use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
};
use storage::Database;

use super::handlers::{
    create_contact, delete_contact, export_contacts, get_contact, import_contacts,
    list_contacts, update_contact,
};
use crate::middleware::auth::{ApiKeys, require_auth};

pub fn routes(api_keys: ApiKeys, max_upload_bytes: usize) -> Router<Database> {
    Router::new()
        .route("/", get(list_contacts).post(create_contact))
        .route(
            "/import",
            post(import_contacts).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/export", get(export_contacts))
        .route(
            "/:id",
            get(get_contact).patch(update_contact).delete(delete_contact),
        )
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth))
}
