//! Contact Messages
//! Mission: Persist messages sent through the public contact form

use crate::db::{decode_id, decode_timestamp, encode_timestamp, Database};
use crate::error::StoreError;
use crate::validation::{normalize_email, optional, required};
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

const LABEL: &str = "Contact";
pub const MIN_MESSAGE_LEN: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRecord {
    pub id: Uuid,
    #[serde(flatten)]
    pub contact: Contact,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn validate_message(value: Option<&str>) -> Result<String, StoreError> {
    let message = required(value, "Message is required")?;
    if message.chars().count() < MIN_MESSAGE_LEN {
        return Err(StoreError::validation(
            "Message should be at least 10 characters",
        ));
    }
    Ok(message)
}

fn validate_email(value: Option<&str>) -> Result<String, StoreError> {
    normalize_email(
        value,
        "Email is required",
        "Please provide a valid email address",
    )
}

impl Contact {
    pub fn from_payload(p: &ContactPayload) -> Result<Self, StoreError> {
        Ok(Contact {
            first_name: required(p.first_name.as_deref(), "First name is required")?,
            last_name: required(p.last_name.as_deref(), "Last name is required")?,
            email: validate_email(p.email.as_deref())?,
            phone: optional(p.phone.as_deref()),
            subject: required(p.subject.as_deref(), "Subject is required")?,
            message: validate_message(p.message.as_deref())?,
        })
    }

    /// Merge provided fields; every merged field is re-validated
    pub fn apply(&mut self, p: &ContactPayload) -> Result<(), StoreError> {
        if p.first_name.is_some() {
            self.first_name = required(p.first_name.as_deref(), "First name is required")?;
        }
        if p.last_name.is_some() {
            self.last_name = required(p.last_name.as_deref(), "Last name is required")?;
        }
        if p.email.is_some() {
            self.email = validate_email(p.email.as_deref())?;
        }
        if p.phone.is_some() {
            self.phone = optional(p.phone.as_deref());
        }
        if p.subject.is_some() {
            self.subject = required(p.subject.as_deref(), "Subject is required")?;
        }
        if p.message.is_some() {
            self.message = validate_message(p.message.as_deref())?;
        }
        Ok(())
    }
}

/// SQLite-backed contact message store
#[derive(Clone)]
pub struct ContactStore {
    db: Database,
}

impl ContactStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn create(&self, payload: &ContactPayload) -> Result<ContactRecord, StoreError> {
        let contact = Contact::from_payload(payload)?;
        let now = Utc::now();
        let record = ContactRecord {
            id: Uuid::new_v4(),
            contact,
            created_at: now,
            updated_at: now,
        };

        let conn = self.db.lock();
        conn.execute(
            "INSERT INTO contacts (id, body, created_at, updated_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                record.id.to_string(),
                serde_json::to_string(&record.contact)?,
                encode_timestamp(&record.created_at),
                encode_timestamp(&record.updated_at),
            ],
        )?;

        info!(id = %record.id, "📬 Contact message received");
        Ok(record)
    }

    /// Oldest first
    pub fn list(&self) -> Result<Vec<ContactRecord>, StoreError> {
        let conn = self.db.lock();
        let mut stmt = conn.prepare(
            "SELECT id, body, created_at, updated_at FROM contacts ORDER BY created_at ASC",
        )?;
        let rows = stmt
            .query_map([], raw_row)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(RawContact::decode).collect()
    }

    pub fn get(&self, id: &str) -> Result<ContactRecord, StoreError> {
        let id = parse_id(id)?;
        let conn = self.db.lock();
        let raw = conn
            .query_row(
                "SELECT id, body, created_at, updated_at FROM contacts WHERE id = ?1",
                params![id.to_string()],
                raw_row,
            )
            .optional()?;
        raw.map(RawContact::decode)
            .transpose()?
            .ok_or_else(|| StoreError::not_found(LABEL))
    }

    pub fn update(&self, id: &str, payload: &ContactPayload) -> Result<ContactRecord, StoreError> {
        let mut record = self.get(id)?;
        record.contact.apply(payload)?;
        record.updated_at = Utc::now();

        let conn = self.db.lock();
        let rows = conn.execute(
            "UPDATE contacts SET body = ?1, updated_at = ?2 WHERE id = ?3",
            params![
                serde_json::to_string(&record.contact)?,
                encode_timestamp(&record.updated_at),
                record.id.to_string(),
            ],
        )?;
        if rows == 0 {
            return Err(StoreError::not_found(LABEL));
        }

        info!(id = %record.id, "✏️  Contact message updated");
        Ok(record)
    }

    pub fn delete(&self, id: &str) -> Result<(), StoreError> {
        let id = parse_id(id)?;
        let conn = self.db.lock();
        let rows = conn.execute("DELETE FROM contacts WHERE id = ?1", params![id.to_string()])?;
        if rows == 0 {
            return Err(StoreError::not_found(LABEL));
        }
        info!(%id, "🗑️  Contact message deleted");
        Ok(())
    }

    pub fn delete_all(&self) -> Result<usize, StoreError> {
        let conn = self.db.lock();
        let rows = conn.execute("DELETE FROM contacts", [])?;
        info!(count = rows, "🗑️  All contact messages deleted");
        Ok(rows)
    }
}

fn parse_id(raw: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(raw.trim()).map_err(|_| StoreError::not_found(LABEL))
}

struct RawContact {
    id: Uuid,
    body: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl RawContact {
    fn decode(self) -> Result<ContactRecord, StoreError> {
        Ok(ContactRecord {
            id: self.id,
            contact: serde_json::from_str(&self.body)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn raw_row(row: &Row<'_>) -> rusqlite::Result<RawContact> {
    Ok(RawContact {
        id: decode_id(&row.get::<_, String>(0)?)?,
        body: row.get(1)?,
        created_at: decode_timestamp(&row.get::<_, String>(2)?)?,
        updated_at: decode_timestamp(&row.get::<_, String>(3)?)?,
    })
}
