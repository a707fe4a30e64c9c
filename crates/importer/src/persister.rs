use storage::models::NewContact;
use tracing::warn;
use uuid::Uuid;

use crate::{ContactStore, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistSummary {
    /// Rows the store reports as written
    pub imported: u64,
    pub duplicate_errors: Vec<String>,
}

/// Writes `candidates` for `owner_id` in one unordered batch.
///
/// Rows rejected by the `(owner, email)` index become `Duplicate email`
/// errors. A store failure for the batch as a whole is returned as an error.
pub async fn persist_contacts<S>(
    store: &S,
    owner_id: Uuid,
    candidates: &[NewContact],
) -> Result<PersistSummary>
where
    S: ContactStore + ?Sized,
{
    if candidates.is_empty() {
        return Ok(PersistSummary::default());
    }

    let report = store.insert_many_unordered(owner_id, candidates).await?;

    let duplicate_errors = report
        .failures
        .iter()
        .map(|failure| {
            warn!(
                owner = %owner_id,
                row = failure.index,
                email = %failure.email,
                "Duplicate contact skipped"
            );
            format!("Duplicate email: {}", failure.email)
        })
        .collect();

    Ok(PersistSummary {
        imported: report.inserted_count(),
        duplicate_errors,
    })
}
