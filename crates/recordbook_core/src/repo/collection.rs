//! Record repository contract and in-memory collection implementation.
//!
//! # Responsibility
//! - Provide create/find/update/delete/list over an ordered record sequence.
//! - Assign identifiers according to the configured `IdPolicy`.
//!
//! # Invariants
//! - Identifiers are unique at all times.
//! - Insertion order is listing order.
//! - `IdPolicy::Renumber`: after a delete, ids are `1..=len` in current order.
//!   Ids are positional ranks; callers must not cache them across a delete.
//! - `IdPolicy::Stable`: ids grow monotonically and are never reused.

use crate::model::record::{Record, RecordId, RecordValidationError};
use crate::model::value::{FieldValue, Fields};
use crate::store::{JsonFileStore, StoreResult};
use log::debug;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for record mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoError {
    Validation(RecordValidationError),
    NotFound(RecordId),
    /// The id after the last assignable one does not fit in `RecordId`.
    IdSpaceExhausted,
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::IdSpaceExhausted => write!(f, "no record ids left to assign"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) | Self::IdSpaceExhausted => None,
        }
    }
}

impl From<RecordValidationError> for RepoError {
    fn from(value: RecordValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Identifier assignment strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdPolicy {
    /// Ids are 1-based positions, reassigned after every delete.
    #[default]
    Renumber,
    /// Ids are permanent handles; position is exposed through `rank_of`.
    Stable,
}

impl IdPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Renumber => "renumber",
            Self::Stable => "stable",
        }
    }
}

/// Repository interface for record CRUD operations.
pub trait RecordRepository {
    /// Appends a record built from `fields` and returns its assigned id.
    fn add(&mut self, fields: Fields) -> RepoResult<RecordId>;

    /// Returns the first record matching `predicate`, in sequence order.
    fn find<P>(&self, predicate: P) -> Option<&Record>
    where
        P: FnMut(&Record) -> bool;

    /// Merges `changes` into the record with `id`.
    fn update(&mut self, id: RecordId, changes: Fields) -> RepoResult<()>;

    /// Removes the record with `id` and returns it.
    fn delete(&mut self, id: RecordId) -> RepoResult<Record>;

    /// Records in current sequence order.
    fn list(&self) -> std::slice::Iter<'_, Record>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, id: RecordId) -> Option<&Record> {
        self.find(|record| record.id == id)
    }

    /// Case-insensitive equality lookup on a text field.
    fn find_text_ignore_case(&self, field: &str, value: &str) -> Option<&Record> {
        let needle = value.to_lowercase();
        self.find(|record| {
            record
                .text(field)
                .is_some_and(|text| text.to_lowercase() == needle)
        })
    }

    /// Sets a boolean status field.
    fn set_flag(&mut self, id: RecordId, field: &str, value: bool) -> RepoResult<()> {
        let mut changes = Fields::new();
        changes.insert(field.to_string(), FieldValue::Bool(value));
        self.update(id, changes)
    }

    /// Flips a boolean status field and returns the new value.
    ///
    /// A missing or non-boolean field counts as `false`.
    fn toggle_flag(&mut self, id: RecordId, field: &str) -> RepoResult<bool> {
        let current = self
            .get(id)
            .ok_or(RepoError::NotFound(id))?
            .flag(field)
            .unwrap_or(false);
        self.set_flag(id, field, !current)?;
        Ok(!current)
    }

    /// Owned copy of the current sequence.
    fn snapshot(&self) -> Vec<Record> {
        self.list().cloned().collect()
    }
}

/// In-memory ordered record collection.
#[derive(Debug, Clone, PartialEq)]
pub struct InMemoryCollection {
    policy: IdPolicy,
    next_id: RecordId,
    records: Vec<Record>,
}

impl Default for InMemoryCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryCollection {
    /// Creates an empty collection with positional renumbering.
    pub fn new() -> Self {
        Self::with_policy(IdPolicy::default())
    }

    pub fn with_policy(policy: IdPolicy) -> Self {
        Self {
            policy,
            next_id: 1,
            records: Vec::new(),
        }
    }

    /// Rebuilds a collection from already-validated parts.
    pub(crate) fn from_parts(policy: IdPolicy, next_id: RecordId, records: Vec<Record>) -> Self {
        Self {
            policy,
            next_id,
            records,
        }
    }

    pub fn id_policy(&self) -> IdPolicy {
        self.policy
    }

    /// Id the next `add` will assign.
    pub fn next_id(&self) -> RecordId {
        self.next_id
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// 1-based display position of `id`.
    pub fn rank_of(&self, id: RecordId) -> Option<usize> {
        self.position(id).map(|index| index + 1)
    }

    /// Replaces the whole collection state with `other`.
    pub fn replace_with(&mut self, other: InMemoryCollection) {
        *self = other;
    }

    /// Writes the whole collection through `store`.
    pub fn save_to(&self, store: &JsonFileStore) -> StoreResult<()> {
        store.save(self)
    }

    /// Replaces this collection with the document read from `store`.
    ///
    /// On failure the in-memory state is left exactly as it was.
    pub fn load_from(&mut self, store: &JsonFileStore) -> StoreResult<()> {
        let loaded = store.load()?;
        self.replace_with(loaded);
        Ok(())
    }

    fn position(&self, id: RecordId) -> Option<usize> {
        self.records.iter().position(|record| record.id == id)
    }

    fn renumber(&mut self) {
        for (index, record) in self.records.iter_mut().enumerate() {
            record.id = index as RecordId + 1;
        }
        self.next_id = self.records.len() as RecordId + 1;
    }
}

impl RecordRepository for InMemoryCollection {
    fn add(&mut self, fields: Fields) -> RepoResult<RecordId> {
        let id = match self.policy {
            IdPolicy::Renumber => (self.records.len() as RecordId)
                .checked_add(1)
                .ok_or(RepoError::IdSpaceExhausted)?,
            IdPolicy::Stable => self.next_id,
        };
        let Some(following) = id.checked_add(1) else {
            debug!("event=record_add module=repo status=exhausted id={id}");
            return Err(RepoError::IdSpaceExhausted);
        };
        let record = Record::new(id, fields)?;
        self.records.push(record);
        self.next_id = following;

        debug!(
            "event=record_add module=repo status=ok id={} size={} policy={}",
            id,
            self.records.len(),
            self.policy.as_str()
        );
        Ok(id)
    }

    fn find<P>(&self, mut predicate: P) -> Option<&Record>
    where
        P: FnMut(&Record) -> bool,
    {
        self.records.iter().find(|record| predicate(*record))
    }

    fn update(&mut self, id: RecordId, changes: Fields) -> RepoResult<()> {
        let Some(index) = self.position(id) else {
            debug!("event=record_update module=repo status=not_found id={id}");
            return Err(RepoError::NotFound(id));
        };
        let changed = changes.len();
        self.records[index].merge(changes)?;

        debug!("event=record_update module=repo status=ok id={id} changed_fields={changed}");
        Ok(())
    }

    fn delete(&mut self, id: RecordId) -> RepoResult<Record> {
        let Some(index) = self.position(id) else {
            debug!("event=record_delete module=repo status=not_found id={id}");
            return Err(RepoError::NotFound(id));
        };
        let removed = self.records.remove(index);
        if self.policy == IdPolicy::Renumber {
            self.renumber();
        }

        debug!(
            "event=record_delete module=repo status=ok id={} size={} policy={}",
            id,
            self.records.len(),
            self.policy.as_str()
        );
        Ok(removed)
    }

    fn list(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}
