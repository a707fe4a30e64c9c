pub mod collector;
pub mod error;
pub mod exporter;
pub mod orchestrator;
pub mod persister;
pub mod row;
pub mod traits;

pub use collector::{CollectedRows, collect_rows};
pub use error::{ImporterError, Result};
pub use exporter::{contacts_to_csv, write_contacts_csv};
pub use orchestrator::{ImportOutcome, ImportReport, import_contacts, parse_contacts};
pub use persister::{PersistSummary, persist_contacts};
pub use row::{RawContactRow, RowRejection, validate_row};
pub use traits::ContactStore;
