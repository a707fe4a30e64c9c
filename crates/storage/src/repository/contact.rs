use std::collections::HashSet;

use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use crate::dto::contact::UpdateContactRequest;
use crate::error::{Result, StorageError};
use crate::models::{Contact, NewContact};

pub const DUPLICATE_CONTACT_MESSAGE: &str = "A contact with this email already exists";

const CONTACT_COLUMNS: &str = "contact_id, owner_id, email, first_name, last_name, company, \
                               tags, notes, created_at, updated_at";

/// A candidate that the bulk insert did not write because the
/// `(owner_id, email)` unique index already held its email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteFailure {
    /// Position of the candidate in the submitted batch
    pub index: usize,
    pub email: String,
}

/// Per-item result of an unordered bulk insert.
#[derive(Debug, Clone, Default)]
pub struct BulkInsertReport {
    pub inserted: Vec<Contact>,
    pub failures: Vec<WriteFailure>,
}

impl BulkInsertReport {
    /// Matches the rows the store reports as written back to the submitted
    /// candidates. Emails are unique per owner, so the first candidate carrying
    /// a written email is the one that landed; every other candidate failed
    /// on the unique index.
    pub fn reconcile(candidates: &[NewContact], inserted: Vec<Contact>) -> Self {
        let mut written: HashSet<&str> = inserted.iter().map(|c| c.email.as_str()).collect();

        let failures = candidates
            .iter()
            .enumerate()
            .filter(|(_, candidate)| !written.remove(candidate.email.as_str()))
            .map(|(index, candidate)| WriteFailure {
                index,
                email: candidate.email.clone(),
            })
            .collect();

        Self { inserted, failures }
    }

    pub fn inserted_count(&self) -> u64 {
        self.inserted.len() as u64
    }
}

/// Repository for contact rows, always scoped to one owner
pub struct ContactRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ContactRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List an owner's contacts, newest first
    pub async fn list(&self, owner_id: Uuid) -> Result<Vec<Contact>> {
        let contacts = sqlx::query_as::<_, Contact>(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts WHERE owner_id = $1 ORDER BY created_at DESC"
        ))
        .bind(owner_id)
        .fetch_all(self.pool)
        .await?;

        Ok(contacts)
    }

    pub async fn find(&self, owner_id: Uuid, contact_id: Uuid) -> Result<Contact> {
        let contact = sqlx::query_as::<_, Contact>(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts WHERE contact_id = $1 AND owner_id = $2"
        ))
        .bind(contact_id)
        .bind(owner_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(contact)
    }

    /// Create a single contact
    pub async fn create(&self, owner_id: Uuid, contact: &NewContact) -> Result<Contact> {
        let created = sqlx::query_as::<_, Contact>(&format!(
            r#"
            INSERT INTO contacts (owner_id, email, first_name, last_name, company, tags, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {CONTACT_COLUMNS}
            "#
        ))
        .bind(owner_id)
        .bind(&contact.email)
        .bind(&contact.first_name)
        .bind(&contact.last_name)
        .bind(&contact.company)
        .bind(Json(&contact.tags))
        .bind(&contact.notes)
        .fetch_one(self.pool)
        .await
        .map_err(|e| StorageError::from(e).on_unique_violation(DUPLICATE_CONTACT_MESSAGE))?;

        Ok(created)
    }

    /// Update an existing contact, refreshing `updated_at`
    pub async fn update(
        &self,
        owner_id: Uuid,
        contact_id: Uuid,
        req: &UpdateContactRequest,
    ) -> Result<Contact> {
        let existing = self.find(owner_id, contact_id).await?;
        let merged = req.merge_into(&existing);

        let updated = sqlx::query_as::<_, Contact>(&format!(
            r#"
            UPDATE contacts
            SET email = $3,
                first_name = $4,
                last_name = $5,
                company = $6,
                tags = $7,
                notes = $8,
                updated_at = NOW()
            WHERE contact_id = $1 AND owner_id = $2
            RETURNING {CONTACT_COLUMNS}
            "#
        ))
        .bind(contact_id)
        .bind(owner_id)
        .bind(&merged.email)
        .bind(&merged.first_name)
        .bind(&merged.last_name)
        .bind(&merged.company)
        .bind(Json(&merged.tags))
        .bind(&merged.notes)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| StorageError::from(e).on_unique_violation(DUPLICATE_CONTACT_MESSAGE))?
        .ok_or(StorageError::NotFound)?;

        Ok(updated)
    }

    pub async fn delete(&self, owner_id: Uuid, contact_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM contacts WHERE contact_id = $1 AND owner_id = $2")
            .bind(contact_id)
            .bind(owner_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    /// Insert every candidate in one statement, skipping rows that collide
    /// with the `(owner_id, email)` index instead of aborting the batch.
    /// Within the batch the earliest candidate for an email wins.
    pub async fn insert_many_unordered(
        &self,
        owner_id: Uuid,
        candidates: &[NewContact],
    ) -> Result<BulkInsertReport> {
        if candidates.is_empty() {
            return Ok(BulkInsertReport::default());
        }

        let mut emails = Vec::with_capacity(candidates.len());
        let mut first_names = Vec::with_capacity(candidates.len());
        let mut last_names = Vec::with_capacity(candidates.len());
        let mut companies = Vec::with_capacity(candidates.len());
        let mut tags = Vec::with_capacity(candidates.len());
        let mut notes = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            emails.push(candidate.email.as_str());
            first_names.push(candidate.first_name.as_str());
            last_names.push(candidate.last_name.as_str());
            companies.push(candidate.company.as_str());
            tags.push(Json(candidate.tags.clone()));
            notes.push(candidate.notes.as_str());
        }

        let inserted = sqlx::query_as::<_, Contact>(&format!(
            r#"
            INSERT INTO contacts (owner_id, email, first_name, last_name, company, tags, notes)
            SELECT $1, batch.email, batch.first_name, batch.last_name, batch.company,
                   batch.tags, batch.notes
            FROM UNNEST($2::text[], $3::text[], $4::text[], $5::text[], $6::jsonb[], $7::text[])
                 WITH ORDINALITY
                 AS batch(email, first_name, last_name, company, tags, notes, position)
            ORDER BY batch.position
            ON CONFLICT (owner_id, email) DO NOTHING
            RETURNING {CONTACT_COLUMNS}
            "#
        ))
        .bind(owner_id)
        .bind(&emails)
        .bind(&first_names)
        .bind(&last_names)
        .bind(&companies)
        .bind(&tags)
        .bind(&notes)
        .fetch_all(self.pool)
        .await?;

        Ok(BulkInsertReport::reconcile(candidates, inserted))
    }
}
