//! JSON document codec for whole collections.
//!
//! Document shape:
//!
//! ```json
//! {
//!   "format_version": 1,
//!   "id_policy": "renumber",
//!   "next_id": 3,
//!   "records": [
//!     { "id": 1, "created_at": "2026-10-19T08:00:00Z", "task": "Build", "completed": false }
//!   ]
//! }
//! ```

use super::{StoreError, StoreResult};
use crate::model::record::{Record, RecordId};
use crate::repo::collection::{IdPolicy, InMemoryCollection};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Current document format version.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
struct DocumentRef<'a> {
    format_version: u32,
    id_policy: IdPolicy,
    next_id: RecordId,
    records: &'a [Record],
}

#[derive(Deserialize)]
struct DocumentOwned {
    format_version: u32,
    #[serde(default)]
    id_policy: IdPolicy,
    #[serde(default)]
    next_id: Option<RecordId>,
    records: Vec<Record>,
}

/// Serializes `collection` into a pretty-printed JSON document.
pub fn encode_collection(collection: &InMemoryCollection) -> StoreResult<String> {
    let document = DocumentRef {
        format_version: FORMAT_VERSION,
        id_policy: collection.id_policy(),
        next_id: collection.next_id(),
        records: collection.records(),
    };
    serde_json::to_string_pretty(&document).map_err(StoreError::Encode)
}

/// Parses and validates a JSON document into a fresh collection.
///
/// # Errors
/// - `Malformed` when the text is not a collection document.
/// - `UnsupportedVersion` for unknown `format_version` values.
/// - `InvalidDocument` when records break field rules, id uniqueness, the
///   renumber contiguity rule, or `next_id` ordering.
pub fn decode_collection(text: &str) -> StoreResult<InMemoryCollection> {
    let document: DocumentOwned = serde_json::from_str(text).map_err(StoreError::Malformed)?;

    if document.format_version == 0 || document.format_version > FORMAT_VERSION {
        return Err(StoreError::UnsupportedVersion {
            found: document.format_version,
            supported: FORMAT_VERSION,
        });
    }

    let mut seen = HashSet::with_capacity(document.records.len());
    for record in &document.records {
        record.validate().map_err(|err| {
            StoreError::InvalidDocument(format!("record {}: {err}", record.id))
        })?;
        if record.id == 0 {
            return Err(StoreError::InvalidDocument(
                "record ids must be positive".to_string(),
            ));
        }
        if !seen.insert(record.id) {
            return Err(StoreError::InvalidDocument(format!(
                "duplicate record id {}",
                record.id
            )));
        }
    }

    let next_id = match document.id_policy {
        IdPolicy::Renumber => {
            for (index, record) in document.records.iter().enumerate() {
                let expected = index as RecordId + 1;
                if record.id != expected {
                    return Err(StoreError::InvalidDocument(format!(
                        "renumbered ids must be contiguous: expected {expected}, found {}",
                        record.id
                    )));
                }
            }
            document.records.len() as RecordId + 1
        }
        IdPolicy::Stable => {
            let max_id = document.records.iter().map(|record| record.id).max();
            match (document.next_id, max_id) {
                (Some(next), Some(max)) if next <= max => {
                    return Err(StoreError::InvalidDocument(format!(
                        "next_id {next} must be greater than every record id (max {max})"
                    )));
                }
                (Some(RecordId::MAX), _) => {
                    return Err(StoreError::InvalidDocument(format!(
                        "next_id {} leaves no id to assign",
                        RecordId::MAX
                    )));
                }
                (Some(next), _) => next.max(1),
                (None, Some(max)) => max.checked_add(1).ok_or_else(|| {
                    StoreError::InvalidDocument(format!(
                        "record id {max} leaves no id to assign"
                    ))
                })?,
                (None, None) => 1,
            }
        }
    };

    Ok(InMemoryCollection::from_parts(
        document.id_policy,
        next_id,
        document.records,
    ))
}
