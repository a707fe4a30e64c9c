use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{Contact, NewContact};
use crate::validation::{normalize_email, normalize_tags, validate_email, validate_tags};

/// Contact as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactResponse {
    pub contact_id: Uuid,
    pub owner: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub tags: Vec<String>,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ContactData {
    pub contact: ContactResponse,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ContactListData {
    pub contacts: Vec<ContactResponse>,
}

/// Outcome of a CSV import: how many contacts were written and why the
/// remaining rows were not.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ImportResultData {
    pub imported: u64,
    pub errors: Vec<String>,
}

/// Request payload for creating a contact
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateContactRequest {
    #[validate(custom(function = "validate_email"))]
    #[validate(length(max = 320))]
    pub email: String,

    #[serde(default)]
    #[validate(length(max = 255))]
    pub first_name: String,

    #[serde(default)]
    #[validate(length(max = 255))]
    pub last_name: String,

    #[serde(default)]
    #[validate(length(max = 255))]
    pub company: String,

    #[serde(default)]
    #[validate(custom(function = "validate_tags"))]
    pub tags: Vec<String>,

    #[serde(default)]
    #[validate(length(max = 10000))]
    pub notes: String,
}

impl CreateContactRequest {
    pub fn to_new_contact(&self) -> NewContact {
        NewContact {
            email: normalize_email(&self.email),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            company: self.company.trim().to_string(),
            tags: normalize_tags(&self.tags),
            notes: self.notes.trim().to_string(),
        }
    }
}

/// Request payload for a partial contact update. Absent fields keep their value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContactRequest {
    #[validate(custom(function = "validate_email"))]
    #[validate(length(max = 320))]
    pub email: Option<String>,

    #[validate(length(max = 255))]
    pub first_name: Option<String>,

    #[validate(length(max = 255))]
    pub last_name: Option<String>,

    #[validate(length(max = 255))]
    pub company: Option<String>,

    #[validate(custom(function = "validate_tags"))]
    pub tags: Option<Vec<String>>,

    #[validate(length(max = 10000))]
    pub notes: Option<String>,
}

impl UpdateContactRequest {
    /// Applies the update on top of `existing`, normalizing the supplied fields.
    pub fn merge_into(&self, existing: &Contact) -> NewContact {
        NewContact {
            email: self
                .email
                .as_deref()
                .map(normalize_email)
                .unwrap_or_else(|| existing.email.clone()),
            first_name: trimmed_or(self.first_name.as_deref(), &existing.first_name),
            last_name: trimmed_or(self.last_name.as_deref(), &existing.last_name),
            company: trimmed_or(self.company.as_deref(), &existing.company),
            tags: self
                .tags
                .as_deref()
                .map(normalize_tags)
                .unwrap_or_else(|| existing.tags.0.clone()),
            notes: trimmed_or(self.notes.as_deref(), &existing.notes),
        }
    }
}

fn trimmed_or(value: Option<&str>, current: &str) -> String {
    value.map(str::trim).unwrap_or(current).to_string()
}

impl From<Contact> for ContactResponse {
    fn from(contact: Contact) -> Self {
        Self {
            contact_id: contact.contact_id,
            owner: contact.owner_id,
            email: contact.email,
            first_name: contact.first_name,
            last_name: contact.last_name,
            company: contact.company,
            tags: contact.tags.0,
            notes: contact.notes,
            created_at: contact.created_at,
            updated_at: contact.updated_at,
        }
    }
}
