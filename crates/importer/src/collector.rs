use storage::models::NewContact;

use crate::{ImporterError, Result, row::RawContactRow, validate_row};

/// Rows split into candidates ready for insert and the reasons the rest were
/// dropped, both in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectedRows {
    pub accepted: Vec<NewContact>,
    pub errors: Vec<String>,
}

impl CollectedRows {
    fn accept(mut self, contact: NewContact) -> Self {
        self.accepted.push(contact);
        self
    }

    fn reject(mut self, reason: String) -> Self {
        self.errors.push(reason);
        self
    }
}

/// Folds a parsed row sequence into [`CollectedRows`].
///
/// A bad row never stops the batch: invalid contacts and malformed records
/// are recorded as errors. Only a failure of the underlying reader aborts.
pub fn collect_rows<I>(rows: I) -> Result<CollectedRows>
where
    I: IntoIterator<Item = std::result::Result<RawContactRow, csv::Error>>,
{
    rows.into_iter()
        .try_fold(CollectedRows::default(), |collected, row| match row {
            Ok(raw) => Ok(match validate_row(&raw) {
                Ok(contact) => collected.accept(contact),
                Err(rejection) => collected.reject(rejection.reason()),
            }),
            Err(e) if e.is_io_error() => Err(ImporterError::CsvError(e)),
            Err(e) => Ok(collected.reject(format!("Error processing row: {e}"))),
        })
}
