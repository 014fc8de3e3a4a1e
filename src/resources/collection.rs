//! Ordered Resource Collections
//! Mission: CRUD over SQLite documents with a user-controlled display order
//!
//! Every collection stores its domain fields as a JSON `body` next to the
//! sortable `ord` and timestamp columns. Listing is always `ord ASC`, newest
//! first on ties. Reorder only touches the ids it is given; submitting a
//! partial listing can leave duplicate `order` values behind.

use crate::db::{decode_id, decode_timestamp, encode_timestamp, Database};
use crate::error::StoreError;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::marker::PhantomData;
use tracing::{debug, info};
use uuid::Uuid;

/// A document kind that lives in an ordered collection
pub trait OrderedResource: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Backing table
    const COLLECTION: &'static str;
    /// Singular label used in error messages ("Project not found")
    const LABEL: &'static str;

    /// Client-supplied fields; absent fields are `None`
    type Payload: DeserializeOwned + Send;

    /// Build a new document, enforcing required fields and defaults
    fn from_payload(payload: Self::Payload) -> Result<Self, StoreError>;

    /// Merge provided fields over an existing document
    fn apply(&mut self, payload: Self::Payload) -> Result<(), StoreError>;
}

/// A stored document with its identity, position and timestamps
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry<T> {
    pub id: Uuid,
    #[serde(flatten)]
    pub fields: T,
    pub order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create/update body: domain fields plus an optional explicit position
#[derive(Debug, Serialize, Deserialize)]
pub struct ResourcePayload<P> {
    #[serde(flatten)]
    pub fields: P,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

impl<P> ResourcePayload<P> {
    pub fn new(fields: P) -> Self {
        Self {
            fields,
            order: None,
        }
    }

    pub fn with_order(mut self, order: i64) -> Self {
        self.order = Some(order);
        self
    }
}

/// One `{id, order}` pair of a reorder request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderEntry {
    pub id: String,
    pub order: i64,
}

/// Typed handle over one ordered collection
pub struct OrderedCollection<T> {
    db: Database,
    _kind: PhantomData<T>,
}

impl<T> Clone for OrderedCollection<T> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            _kind: PhantomData,
        }
    }
}

impl<T: OrderedResource> OrderedCollection<T> {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            _kind: PhantomData,
        }
    }

    /// All documents, `order` ascending, newest first on ties
    pub fn list(&self) -> Result<Vec<Entry<T>>, StoreError> {
        let conn = self.db.lock();
        list_entries(&conn)
    }

    pub fn get(&self, id: &str) -> Result<Entry<T>, StoreError> {
        let id = parse_id::<T>(id)?;
        let conn = self.db.lock();
        find_entry(&conn, id)?.ok_or_else(|| StoreError::not_found(T::LABEL))
    }

    /// Validate and insert. Without an explicit order the document goes last.
    pub fn create(&self, payload: ResourcePayload<T::Payload>) -> Result<Entry<T>, StoreError> {
        let fields = T::from_payload(payload.fields)?;
        let body = serde_json::to_string(&fields)?;
        let now = Utc::now();

        let conn = self.db.lock();
        let order = match payload.order {
            Some(order) => order,
            None => next_order::<T>(&conn)?,
        };

        let entry = Entry {
            id: Uuid::new_v4(),
            fields,
            order,
            created_at: now,
            updated_at: now,
        };

        conn.execute(
            &format!(
                "INSERT INTO {} (id, ord, body, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5)",
                T::COLLECTION
            ),
            params![
                entry.id.to_string(),
                entry.order,
                body,
                encode_timestamp(&entry.created_at),
                encode_timestamp(&entry.updated_at),
            ],
        )?;

        info!(collection = T::COLLECTION, id = %entry.id, order = entry.order, "✅ Created document");
        Ok(entry)
    }

    /// Merge the payload over the stored document
    pub fn update(
        &self,
        id: &str,
        payload: ResourcePayload<T::Payload>,
    ) -> Result<Entry<T>, StoreError> {
        let id = parse_id::<T>(id)?;
        let conn = self.db.lock();
        let mut entry = find_entry::<T>(&conn, id)?.ok_or_else(|| StoreError::not_found(T::LABEL))?;

        entry.fields.apply(payload.fields)?;
        if let Some(order) = payload.order {
            entry.order = order;
        }
        entry.updated_at = Utc::now();

        write_entry(&conn, &entry)?;

        info!(collection = T::COLLECTION, id = %entry.id, "✏️  Updated document");
        Ok(entry)
    }

    pub fn delete(&self, id: &str) -> Result<(), StoreError> {
        let id = parse_id::<T>(id)?;
        let conn = self.db.lock();
        let rows = conn.execute(
            &format!("DELETE FROM {} WHERE id = ?1", T::COLLECTION),
            params![id.to_string()],
        )?;

        if rows == 0 {
            return Err(StoreError::not_found(T::LABEL));
        }

        info!(collection = T::COLLECTION, %id, "🗑️  Deleted document");
        Ok(())
    }

    /// Unconditional bulk delete; repeating it on an empty collection is fine
    pub fn delete_all(&self) -> Result<usize, StoreError> {
        let conn = self.db.lock();
        let rows = conn.execute(&format!("DELETE FROM {}", T::COLLECTION), [])?;
        info!(collection = T::COLLECTION, count = rows, "🗑️  Deleted all documents");
        Ok(rows)
    }

    /// Apply every `{id, order}` pair in one transaction, then return the
    /// freshly sorted listing. Unknown ids are skipped.
    pub fn reorder(&self, entries: &[ReorderEntry]) -> Result<Vec<Entry<T>>, StoreError> {
        if entries.is_empty() {
            return Err(StoreError::InvalidPayload(
                "Order payload must be a non-empty array".to_string(),
            ));
        }

        let now = encode_timestamp(&Utc::now());
        let mut conn = self.db.lock();
        let tx = conn.transaction()?;
        let mut applied = 0usize;
        {
            let mut stmt = tx.prepare(&format!(
                "UPDATE {} SET ord = ?1, updated_at = ?2 WHERE id = ?3",
                T::COLLECTION
            ))?;
            for entry in entries {
                let Ok(id) = Uuid::parse_str(entry.id.trim()) else {
                    debug!(collection = T::COLLECTION, id = %entry.id, "Skipping malformed id in reorder");
                    continue;
                };
                applied += stmt.execute(params![entry.order, now, id.to_string()])?;
            }
        }
        tx.commit()?;

        info!(
            collection = T::COLLECTION,
            requested = entries.len(),
            applied,
            "🔀 Reordered documents"
        );

        list_entries(&conn)
    }

    /// Update the first document matching `matches`, or create it at the end
    pub fn upsert_by<F>(
        &self,
        matches: F,
        payload: ResourcePayload<T::Payload>,
    ) -> Result<Entry<T>, StoreError>
    where
        F: Fn(&T) -> bool,
    {
        let existing = self.list()?.into_iter().find(|entry| matches(&entry.fields));
        match existing {
            Some(entry) => self.update(&entry.id.to_string(), payload),
            None => self.create(payload),
        }
    }
}

/// Malformed ids can never resolve, so they are reported as missing
fn parse_id<T: OrderedResource>(raw: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(raw.trim()).map_err(|_| StoreError::not_found(T::LABEL))
}

fn next_order<T: OrderedResource>(conn: &Connection) -> Result<i64, StoreError> {
    let max: Option<i64> = conn.query_row(
        &format!("SELECT MAX(ord) FROM {}", T::COLLECTION),
        [],
        |row| row.get(0),
    )?;
    match max {
        None => Ok(0),
        Some(m) => m.checked_add(1).ok_or_else(|| {
            StoreError::validation(format!(
                "{} order is at its maximum; reorder before adding more",
                T::LABEL
            ))
        }),
    }
}

fn list_entries<T: OrderedResource>(conn: &Connection) -> Result<Vec<Entry<T>>, StoreError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT id, ord, body, created_at, updated_at FROM {} ORDER BY ord ASC, created_at DESC",
        T::COLLECTION
    ))?;

    let rows = stmt
        .query_map([], raw_row)?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter().map(RawEntry::decode::<T>).collect()
}

fn find_entry<T: OrderedResource>(conn: &Connection, id: Uuid) -> Result<Option<Entry<T>>, StoreError> {
    let raw = conn
        .query_row(
            &format!(
                "SELECT id, ord, body, created_at, updated_at FROM {} WHERE id = ?1",
                T::COLLECTION
            ),
            params![id.to_string()],
            raw_row,
        )
        .optional()?;

    raw.map(RawEntry::decode::<T>).transpose()
}

fn write_entry<T: OrderedResource>(conn: &Connection, entry: &Entry<T>) -> Result<(), StoreError> {
    let body = serde_json::to_string(&entry.fields)?;
    let rows = conn.execute(
        &format!(
            "UPDATE {} SET ord = ?1, body = ?2, updated_at = ?3 WHERE id = ?4",
            T::COLLECTION
        ),
        params![
            entry.order,
            body,
            encode_timestamp(&entry.updated_at),
            entry.id.to_string()
        ],
    )?;

    if rows == 0 {
        return Err(StoreError::not_found(T::LABEL));
    }
    Ok(())
}

/// Row as read from SQLite, before the JSON body is decoded
struct RawEntry {
    id: Uuid,
    order: i64,
    body: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl RawEntry {
    fn decode<T: OrderedResource>(self) -> Result<Entry<T>, StoreError> {
        Ok(Entry {
            id: self.id,
            fields: serde_json::from_str(&self.body)?,
            order: self.order,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn raw_row(row: &Row<'_>) -> rusqlite::Result<RawEntry> {
    Ok(RawEntry {
        id: decode_id(&row.get::<_, String>(0)?)?,
        order: row.get(1)?,
        body: row.get(2)?,
        created_at: decode_timestamp(&row.get::<_, String>(3)?)?,
        updated_at: decode_timestamp(&row.get::<_, String>(4)?)?,
    })
}
