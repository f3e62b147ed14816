//! Record domain model.
//!
//! # Responsibility
//! - Define the canonical entity stored in a collection (task, contact, book).
//! - Validate caller-supplied field bags before they reach a collection.
//!
//! # Invariants
//! - `id` is unique within its owning collection.
//! - `created_at` is captured once at creation and never changes.
//! - Field names are non-empty and never shadow `id` or `created_at`.
//! - Float field values are finite.

use crate::model::value::{FieldValue, Fields};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Collection-scoped record identifier.
pub type RecordId = u64;

/// Field names owned by the record envelope.
pub const RESERVED_FIELD_NAMES: &[&str] = &["id", "created_at"];

/// Invalid-input failures for record field bags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordValidationError {
    /// A field (top-level or nested) has an empty or blank name.
    EmptyFieldName,
    /// A top-level field tries to shadow an envelope field.
    ReservedFieldName(String),
    /// A float value is NaN or infinite.
    NonFiniteFloat { field: String },
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyFieldName => write!(f, "field name cannot be empty"),
            Self::ReservedFieldName(name) => {
                write!(f, "field name `{name}` is reserved for the record envelope")
            }
            Self::NonFiniteFloat { field } => {
                write!(f, "field `{field}` must hold a finite number")
            }
        }
    }
}

impl Error for RecordValidationError {}

/// One entity stored in a collection.
///
/// Caller fields are flattened next to the envelope when serialized:
/// `{"id": 1, "created_at": "...", "task": "Learn", "completed": false}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub fields: Fields,
}

impl Record {
    /// Creates a record stamped with the current time.
    ///
    /// # Errors
    /// - Returns `RecordValidationError` when `fields` fails `validate_fields`.
    pub fn new(id: RecordId, fields: Fields) -> Result<Self, RecordValidationError> {
        Self::with_created_at(id, Utc::now(), fields)
    }

    /// Creates a record with a caller-provided creation time.
    ///
    /// Used by import paths where the timestamp already exists.
    pub fn with_created_at(
        id: RecordId,
        created_at: DateTime<Utc>,
        fields: Fields,
    ) -> Result<Self, RecordValidationError> {
        validate_fields(&fields)?;
        Ok(Self {
            id,
            created_at,
            fields,
        })
    }

    /// Re-checks field invariants, e.g. after decoding a document.
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        validate_fields(&self.fields)
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Returns a text field, or `None` when missing or not text.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_text)
    }

    /// Returns a boolean status flag, or `None` when missing or not boolean.
    pub fn flag(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(FieldValue::as_bool)
    }

    /// Merges `changes` into this record, overwriting existing keys.
    ///
    /// Validation runs before any key is written, so a rejected merge leaves
    /// the record untouched.
    pub fn merge(&mut self, changes: Fields) -> Result<(), RecordValidationError> {
        validate_fields(&changes)?;
        self.fields.extend(changes);
        Ok(())
    }
}

/// Validates a top-level field bag.
///
/// # Errors
/// - `EmptyFieldName` for blank names at any depth.
/// - `ReservedFieldName` for `id`/`created_at` at the top level.
/// - `NonFiniteFloat` for NaN/infinite floats at any depth.
pub fn validate_fields(fields: &Fields) -> Result<(), RecordValidationError> {
    for name in fields.keys() {
        if RESERVED_FIELD_NAMES.contains(&name.as_str()) {
            return Err(RecordValidationError::ReservedFieldName(name.clone()));
        }
    }
    validate_nested(fields, "")
}

fn validate_nested(fields: &Fields, prefix: &str) -> Result<(), RecordValidationError> {
    for (name, value) in fields {
        if name.trim().is_empty() {
            return Err(RecordValidationError::EmptyFieldName);
        }
        let path = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{prefix}.{name}")
        };
        match value {
            FieldValue::Float(number) if !number.is_finite() => {
                return Err(RecordValidationError::NonFiniteFloat { field: path });
            }
            FieldValue::Record(nested) => validate_nested(nested, &path)?,
            _ => {}
        }
    }
    Ok(())
}
