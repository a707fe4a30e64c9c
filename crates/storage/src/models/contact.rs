use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub contact_id: Uuid,
    #[serde(rename = "owner")]
    pub owner_id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    #[schema(value_type = Vec<String>)]
    pub tags: sqlx::types::Json<Vec<String>>,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A normalized contact that has not been written yet. The owner is supplied
/// at insert time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewContact {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub tags: Vec<String>,
    pub notes: String,
}
