use storage::{
    Database,
    error::Result,
    models::NewContact,
    repository::contact::{BulkInsertReport, ContactRepository},
};
use uuid::Uuid;

/// Destination of an import: a store that can write a batch of contacts for
/// one owner, continuing past rows rejected by the `(owner, email)` index.
#[async_trait::async_trait]
pub trait ContactStore: Send + Sync {
    async fn insert_many_unordered(
        &self,
        owner_id: Uuid,
        candidates: &[NewContact],
    ) -> Result<BulkInsertReport>;
}

#[async_trait::async_trait]
impl ContactStore for Database {
    async fn insert_many_unordered(
        &self,
        owner_id: Uuid,
        candidates: &[NewContact],
    ) -> Result<BulkInsertReport> {
        ContactRepository::new(self.pool())
            .insert_many_unordered(owner_id, candidates)
            .await
    }
}
