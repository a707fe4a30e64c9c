use storage::dto::contact::ImportResultData;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    CollectedRows, ContactStore, ImporterError, Result, collect_rows, persist_contacts,
    row::RawContactRow,
};

const EMAIL_COLUMN: &str = "email";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    /// Every row was imported
    Success,
    /// Some rows were rejected or collided with existing contacts
    Partial,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub imported: u64,
    /// Row validation errors first, then duplicate-key errors from the write
    pub errors: Vec<String>,
}

impl ImportReport {
    pub fn outcome(&self) -> ImportOutcome {
        if self.errors.is_empty() {
            ImportOutcome::Success
        } else {
            ImportOutcome::Partial
        }
    }
}

impl From<ImportReport> for ImportResultData {
    fn from(report: ImportReport) -> Self {
        Self {
            imported: report.imported,
            errors: report.errors,
        }
    }
}

/// Parses CSV bytes (header row first, blank lines skipped) and validates
/// every record. Nothing is written.
pub fn parse_contacts(file: &[u8]) -> Result<CollectedRows> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(file);

    let headers = reader.headers()?;
    if headers.is_empty() {
        debug!("Upload has no header row, nothing to import");
        return Ok(CollectedRows::default());
    }
    if !headers.iter().any(|header| header == EMAIL_COLUMN) {
        return Err(ImporterError::MissingEmailColumn);
    }

    collect_rows(reader.deserialize::<RawContactRow>())
}

/// Imports a CSV upload for `owner_id`.
///
/// Returns an error only when the upload is missing or unreadable, or when the
/// store fails outright. Rejected rows and duplicates are part of the report.
pub async fn import_contacts<S>(
    store: &S,
    owner_id: Uuid,
    file: Option<&[u8]>,
) -> Result<ImportReport>
where
    S: ContactStore + ?Sized,
{
    let file = file.ok_or(ImporterError::MissingFile)?;

    let CollectedRows {
        accepted,
        mut errors,
    } = parse_contacts(file)?;
    debug!(
        owner = %owner_id,
        accepted = accepted.len(),
        rejected = errors.len(),
        "Validated CSV rows"
    );

    let persisted = persist_contacts(store, owner_id, &accepted).await?;
    errors.extend(persisted.duplicate_errors);

    let report = ImportReport {
        imported: persisted.imported,
        errors,
    };

    info!(
        owner = %owner_id,
        imported = report.imported,
        errors = report.errors.len(),
        "Contact import finished"
    );

    Ok(report)
}
