use serde::Deserialize;
use storage::{
    models::NewContact,
    validation::{is_valid_email, normalize_email, split_tags},
};

/// One CSV record keyed by header. Columns other than these are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawContactRow {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowRejection {
    /// Carries the trimmed email as it appeared in the row, empty when absent
    InvalidEmail(String),
}

impl RowRejection {
    pub fn reason(&self) -> String {
        match self {
            Self::InvalidEmail(email) => format!("Invalid email: {email}"),
        }
    }
}

fn trimmed(value: Option<&str>) -> String {
    value.map(str::trim).unwrap_or_default().to_string()
}

/// Normalizes one record into a candidate contact, or rejects it.
pub fn validate_row(row: &RawContactRow) -> Result<NewContact, RowRejection> {
    let email = trimmed(row.email.as_deref());
    if !is_valid_email(&email) {
        return Err(RowRejection::InvalidEmail(email));
    }

    let tags = row
        .tags
        .as_deref()
        .map(split_tags)
        .unwrap_or_default();

    Ok(NewContact {
        email: normalize_email(&email),
        first_name: trimmed(row.first_name.as_deref()),
        last_name: trimmed(row.last_name.as_deref()),
        company: trimmed(row.company.as_deref()),
        tags,
        notes: trimmed(row.notes.as_deref()),
    })
}
