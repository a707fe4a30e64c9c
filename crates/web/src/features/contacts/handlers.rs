use axum::{
    Extension, Json,
    body::Bytes,
    extract::{
        Multipart, Path, State,
        multipart::{MultipartError, MultipartRejection},
        rejection::PathRejection,
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use importer::ImportOutcome;
use storage::{
    Database,
    dto::{
        common::{ApiResponse, FailResponse},
        contact::{
            ContactData, ContactListData, ContactResponse, CreateContactRequest,
            ImportResultData, UpdateContactRequest,
        },
    },
};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{error::WebError, middleware::auth::Owner};

use super::services;

/// Multipart field carrying the CSV upload
pub const UPLOAD_FIELD: &str = "file";

/// Multipart body of an import request
#[derive(Debug, ToSchema)]
pub struct ImportUpload {
    /// CSV with a header row; `email` is required, `firstName`, `lastName`,
    /// `company`, `tags` (comma-joined) and `notes` are optional
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

#[utoipa::path(
    get,
    path = "/api/contacts",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Contacts of the caller, newest first", body = ApiResponse<ContactListData>),
        (status = 401, description = "Unauthorized", body = FailResponse)
    ),
    tag = "contacts"
)]
pub async fn list_contacts(
    State(db): State<Database>,
    Extension(Owner(owner_id)): Extension<Owner>,
) -> Result<Response, WebError> {
    let contacts = services::list_contacts(db.pool(), owner_id).await?;

    let data = ContactListData {
        contacts: contacts.into_iter().map(ContactResponse::from).collect(),
    };

    Ok(Json(ApiResponse::success(data)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/contacts/{id}",
    params(
        ("id" = Uuid, Path, description = "Contact id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Contact found", body = ApiResponse<ContactData>),
        (status = 400, description = "Malformed contact id", body = FailResponse),
        (status = 401, description = "Unauthorized", body = FailResponse),
        (status = 404, description = "Contact not found", body = FailResponse)
    ),
    tag = "contacts"
)]
pub async fn get_contact(
    State(db): State<Database>,
    Extension(Owner(owner_id)): Extension<Owner>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Response, WebError> {
    let contact_id = parse_contact_id(path)?;
    let contact = services::get_contact(db.pool(), owner_id, contact_id).await?;

    let data = ContactData {
        contact: ContactResponse::from(contact),
    };

    Ok(Json(ApiResponse::success(data)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/contacts",
    request_body = CreateContactRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Contact created", body = ApiResponse<ContactData>),
        (status = 400, description = "Validation error", body = FailResponse),
        (status = 401, description = "Unauthorized", body = FailResponse),
        (status = 409, description = "A contact with this email already exists", body = FailResponse)
    ),
    tag = "contacts"
)]
pub async fn create_contact(
    State(db): State<Database>,
    Extension(Owner(owner_id)): Extension<Owner>,
    Json(req): Json<CreateContactRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let contact = services::create_contact(db.pool(), owner_id, &req).await?;

    let data = ContactData {
        contact: ContactResponse::from(contact),
    };

    Ok((StatusCode::CREATED, Json(ApiResponse::success(data))).into_response())
}

#[utoipa::path(
    patch,
    path = "/api/contacts/{id}",
    params(
        ("id" = Uuid, Path, description = "Contact id")
    ),
    request_body = UpdateContactRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Contact updated", body = ApiResponse<ContactData>),
        (status = 400, description = "Validation error", body = FailResponse),
        (status = 401, description = "Unauthorized", body = FailResponse),
        (status = 404, description = "Contact not found", body = FailResponse),
        (status = 409, description = "A contact with this email already exists", body = FailResponse)
    ),
    tag = "contacts"
)]
pub async fn update_contact(
    State(db): State<Database>,
    Extension(Owner(owner_id)): Extension<Owner>,
    path: Result<Path<Uuid>, PathRejection>,
    Json(update_req): Json<UpdateContactRequest>,
) -> Result<Response, WebError> {
    let contact_id = parse_contact_id(path)?;
    update_req.validate()?;

    let updated = services::update_contact(db.pool(), owner_id, contact_id, &update_req).await?;

    let data = ContactData {
        contact: ContactResponse::from(updated),
    };

    Ok(Json(ApiResponse::success(data)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/contacts/{id}",
    params(
        ("id" = Uuid, Path, description = "Contact id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Contact deleted"),
        (status = 400, description = "Malformed contact id", body = FailResponse),
        (status = 401, description = "Unauthorized", body = FailResponse),
        (status = 404, description = "Contact not found", body = FailResponse)
    ),
    tag = "contacts"
)]
pub async fn delete_contact(
    State(db): State<Database>,
    Extension(Owner(owner_id)): Extension<Owner>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Response, WebError> {
    let contact_id = parse_contact_id(path)?;
    services::delete_contact(db.pool(), owner_id, contact_id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    post,
    path = "/api/contacts/import",
    request_body(content = ImportUpload, content_type = "multipart/form-data"),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Every row imported", body = ApiResponse<ImportResultData>),
        (status = 207, description = "Some rows were invalid or duplicates", body = ApiResponse<ImportResultData>),
        (status = 400, description = "No file uploaded or the CSV could not be read", body = FailResponse),
        (status = 413, description = "Upload exceeds the size limit", body = FailResponse),
        (status = 401, description = "Unauthorized", body = FailResponse)
    ),
    tag = "contacts"
)]
pub async fn import_contacts(
    State(db): State<Database>,
    Extension(Owner(owner_id)): Extension<Owner>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, WebError> {
    let file = match multipart {
        Ok(multipart) => read_upload(multipart).await?,
        Err(rejection) => {
            tracing::debug!("Import request is not multipart: {}", rejection);
            None
        }
    };

    let report = services::import_contacts(&db, owner_id, file.as_deref()).await?;

    let (status, body) = match report.outcome() {
        ImportOutcome::Success => (
            StatusCode::OK,
            ApiResponse::success(ImportResultData::from(report)),
        ),
        ImportOutcome::Partial => (
            StatusCode::MULTI_STATUS,
            ApiResponse::partial(ImportResultData::from(report)),
        ),
    };

    Ok((status, Json(body)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/contacts/export",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Contacts as CSV in the import layout", content_type = "text/csv", body = String),
        (status = 401, description = "Unauthorized", body = FailResponse)
    ),
    tag = "contacts"
)]
pub async fn export_contacts(
    State(db): State<Database>,
    Extension(Owner(owner_id)): Extension<Owner>,
) -> Result<Response, WebError> {
    let csv = services::export_contacts(db.pool(), owner_id).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"contacts.csv\"",
            ),
        ],
        csv,
    )
        .into_response())
}

fn parse_contact_id(path: Result<Path<Uuid>, PathRejection>) -> Result<Uuid, WebError> {
    path.map(|Path(id)| id).map_err(|rejection| WebError::BadRequest(rejection.body_text()))
}

fn upload_failure(error: MultipartError) -> WebError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        WebError::PayloadTooLarge
    } else {
        WebError::BadRequest(error.body_text())
    }
}

/// Returns the bytes of the `file` field, if the form has one.
async fn read_upload(mut multipart: Multipart) -> Result<Option<Bytes>, WebError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(upload_failure)?
    {
        if field.name() == Some(UPLOAD_FIELD) {
            let bytes = field.bytes().await.map_err(upload_failure)?;
            return Ok(Some(bytes));
        }
    }

    Ok(None)
}
