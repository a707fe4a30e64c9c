mod contact;

pub use contact::{Contact, NewContact};
pub use sqlx::types::Json;
