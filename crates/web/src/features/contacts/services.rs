use sqlx::PgPool;
use storage::{
    Database,
    dto::contact::{CreateContactRequest, UpdateContactRequest},
    error::Result,
    models::Contact,
    repository::contact::ContactRepository,
};
use uuid::Uuid;

/// List an owner's contacts, newest first
pub async fn list_contacts(pool: &PgPool, owner_id: Uuid) -> Result<Vec<Contact>> {
    let repo = ContactRepository::new(pool);
    repo.list(owner_id).await
}

pub async fn get_contact(pool: &PgPool, owner_id: Uuid, contact_id: Uuid) -> Result<Contact> {
    let repo = ContactRepository::new(pool);
    repo.find(owner_id, contact_id).await
}

/// Create a contact from a validated request
pub async fn create_contact(
    pool: &PgPool,
    owner_id: Uuid,
    request: &CreateContactRequest,
) -> Result<Contact> {
    let repo = ContactRepository::new(pool);
    repo.create(owner_id, &request.to_new_contact()).await
}

pub async fn update_contact(
    pool: &PgPool,
    owner_id: Uuid,
    contact_id: Uuid,
    request: &UpdateContactRequest,
) -> Result<Contact> {
    let repo = ContactRepository::new(pool);
    repo.update(owner_id, contact_id, request).await
}

pub async fn delete_contact(pool: &PgPool, owner_id: Uuid, contact_id: Uuid) -> Result<()> {
    let repo = ContactRepository::new(pool);
    repo.delete(owner_id, contact_id).await
}

/// Run a CSV upload through the import pipeline
pub async fn import_contacts(
    db: &Database,
    owner_id: Uuid,
    file: Option<&[u8]>,
) -> importer::Result<importer::ImportReport> {
    importer::import_contacts(db, owner_id, file).await
}

/// Render an owner's contacts in the import CSV layout
pub async fn export_contacts(pool: &PgPool, owner_id: Uuid) -> importer::Result<Vec<u8>> {
    let contacts = list_contacts(pool, owner_id).await?;
    importer::contacts_to_csv(&contacts)
}
