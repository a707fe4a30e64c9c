use std::time::Duration;

use axum::Router;
use storage::Database;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod config;
pub mod error;
pub mod features;
pub mod middleware;

use features::{contacts, health};
use middleware::auth::ApiKeys;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::live_health,
        contacts::handlers::list_contacts,
        contacts::handlers::get_contact,
        contacts::handlers::create_contact,
        contacts::handlers::update_contact,
        contacts::handlers::delete_contact,
        contacts::handlers::import_contacts,
        contacts::handlers::export_contacts,
    ),
    components(
        schemas(
            storage::dto::common::ResponseStatus,
            storage::dto::common::FailResponse,
            storage::dto::contact::ContactResponse,
            storage::dto::contact::ContactData,
            storage::dto::contact::ContactListData,
            storage::dto::contact::CreateContactRequest,
            storage::dto::contact::UpdateContactRequest,
            storage::dto::contact::ImportResultData,
            contacts::handlers::ImportUpload,
            health::HealthResponse,
        )
    ),
    tags(
        (name = "contacts", description = "Contact management and CSV import/export"),
        (name = "health", description = "Service health"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("API Key")
                        .build(),
                ),
            )
        }
    }
}

/// Builds the application router.
pub fn app(db: Database, api_keys: ApiKeys, max_upload_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(3600));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(health::routes())
        .nest(
            "/api/contacts",
            contacts::routes::routes(api_keys, max_upload_bytes),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(db)
}
