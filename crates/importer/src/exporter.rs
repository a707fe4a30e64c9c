use std::io;

use serde::Serialize;
use storage::models::Contact;

use crate::Result;

/// Export record, in the same column layout the importer reads.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportRow<'a> {
    email: &'a str,
    first_name: &'a str,
    last_name: &'a str,
    company: &'a str,
    tags: String,
    notes: &'a str,
}

impl<'a> From<&'a Contact> for ExportRow<'a> {
    fn from(contact: &'a Contact) -> Self {
        Self {
            email: &contact.email,
            first_name: &contact.first_name,
            last_name: &contact.last_name,
            company: &contact.company,
            tags: contact.tags.0.join(","),
            notes: &contact.notes,
        }
    }
}

pub fn write_contacts_csv<W: io::Write>(contacts: &[Contact], writer: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);

    if contacts.is_empty() {
        writer.write_record(["email", "firstName", "lastName", "company", "tags", "notes"])?;
    }
    for contact in contacts {
        writer.serialize(ExportRow::from(contact))?;
    }

    writer.flush()?;
    Ok(())
}

pub fn contacts_to_csv(contacts: &[Contact]) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_contacts_csv(contacts, &mut buffer)?;
    Ok(buffer)
}
