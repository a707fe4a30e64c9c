use thiserror::Error;

pub type Result<T> = std::result::Result<T, ImporterError>;

#[derive(Error, Debug)]
pub enum ImporterError {
    #[error("Please upload a CSV file")]
    MissingFile,

    #[error("CSV header must include an email column")]
    MissingEmailColumn,

    #[error("Failed to parse CSV: {0}")]
    CsvError(#[from] csv::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    StorageError(#[from] storage::error::StorageError),
}

impl ImporterError {
    /// Whether the upload itself is at fault, as opposed to the store.
    pub fn is_invalid_upload(&self) -> bool {
        matches!(
            self,
            Self::MissingFile | Self::MissingEmailColumn | Self::CsvError(_)
        )
    }
}
