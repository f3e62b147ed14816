//! Contact book use-case service.
//!
//! # Responsibility
//! - Add, find, update, delete and list contacts addressed by name.
//! - Save and load the whole book through the JSON store.
//!
//! # Invariants
//! - Names are unique case-insensitively and lookups ignore case.
//! - Name and phone are never blank; email, when present, looks like an
//!   address.
//! - Update only touches the values the caller supplied.

use super::is_blank;
use crate::model::record::{Record, RecordId};
use crate::model::value::{fields, FieldValue, Fields};
use crate::repo::collection::{InMemoryCollection, RecordRepository, RepoError};
use crate::store::{JsonFileStore, StoreError};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const NAME_FIELD: &str = "name";
pub const PHONE_FIELD: &str = "phone";
pub const EMAIL_FIELD: &str = "email";

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

/// Service error for contact use-cases.
#[derive(Debug)]
pub enum ContactServiceError {
    EmptyName,
    EmptyPhone,
    InvalidEmail(String),
    DuplicateContact(String),
    ContactNotFound(String),
    MalformedContact(RecordId),
    Repo(RepoError),
    Store(StoreError),
}

impl Display for ContactServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "contact name cannot be empty"),
            Self::EmptyPhone => write!(f, "contact phone cannot be empty"),
            Self::InvalidEmail(value) => write!(f, "invalid email: `{value}`"),
            Self::DuplicateContact(name) => write!(f, "contact '{name}' already exists"),
            Self::ContactNotFound(name) => write!(f, "contact '{name}' not found"),
            Self::MalformedContact(id) => write!(f, "record {id} is not a contact"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ContactServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ContactServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<StoreError> for ContactServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Read model for one contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactView {
    pub id: RecordId,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
}

impl ContactView {
    fn from_record(record: &Record) -> Result<Self, ContactServiceError> {
        let malformed = || ContactServiceError::MalformedContact(record.id);
        let name = record.text(NAME_FIELD).ok_or_else(malformed)?;
        let phone = record.text(PHONE_FIELD).ok_or_else(malformed)?;
        let email = match record.get(EMAIL_FIELD) {
            None | Some(FieldValue::Null) => None,
            Some(FieldValue::Text(value)) => Some(value.clone()),
            Some(_) => return Err(malformed()),
        };
        Ok(Self {
            id: record.id,
            name: name.to_string(),
            phone: phone.to_string(),
            email,
        })
    }
}

impl Display for ContactView {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.name, self.phone)?;
        if let Some(email) = &self.email {
            write!(f, " <{email}>")?;
        }
        Ok(())
    }
}

/// Contact book facade over a record repository.
pub struct ContactService<R: RecordRepository> {
    repo: R,
}

impl<R: RecordRepository> ContactService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Adds a contact and returns its record id.
    pub fn add_contact(
        &mut self,
        name: &str,
        phone: &str,
        email: Option<&str>,
    ) -> Result<RecordId, ContactServiceError> {
        if is_blank(name) {
            return Err(ContactServiceError::EmptyName);
        }
        validate_phone(phone)?;
        let email = email.map(validate_email).transpose()?;
        let name = name.trim();
        if self.repo.find_text_ignore_case(NAME_FIELD, name).is_some() {
            return Err(ContactServiceError::DuplicateContact(name.to_string()));
        }

        let id = self.repo.add(fields([
            (NAME_FIELD, FieldValue::from(name)),
            (PHONE_FIELD, FieldValue::from(phone.trim())),
            (EMAIL_FIELD, FieldValue::from(email)),
        ]))?;
        Ok(id)
    }

    /// Finds a contact by case-insensitive name.
    pub fn find_contact(&self, name: &str) -> Result<Option<ContactView>, ContactServiceError> {
        self.repo
            .find_text_ignore_case(NAME_FIELD, name.trim())
            .map(ContactView::from_record)
            .transpose()
    }

    /// Updates phone and/or email; `None` keeps the current value.
    pub fn update_contact(
        &mut self,
        name: &str,
        phone: Option<&str>,
        email: Option<&str>,
    ) -> Result<ContactView, ContactServiceError> {
        let id = self.require_id(name)?;

        let mut changes = Fields::new();
        if let Some(phone) = phone {
            validate_phone(phone)?;
            changes.insert(PHONE_FIELD.to_string(), FieldValue::from(phone.trim()));
        }
        if let Some(email) = email {
            let email = validate_email(email)?;
            changes.insert(EMAIL_FIELD.to_string(), FieldValue::Text(email));
        }

        self.repo.update(id, changes)?;
        let record = self
            .repo
            .get(id)
            .ok_or_else(|| ContactServiceError::ContactNotFound(name.to_string()))?;
        ContactView::from_record(record)
    }

    /// Removes a contact by case-insensitive name.
    pub fn delete_contact(&mut self, name: &str) -> Result<ContactView, ContactServiceError> {
        let id = self.require_id(name)?;
        let removed = self.repo.delete(id)?;
        ContactView::from_record(&removed)
    }

    /// Lists contacts in insertion order.
    pub fn list_contacts(&self) -> Result<Vec<ContactView>, ContactServiceError> {
        self.repo.list().map(ContactView::from_record).collect()
    }

    fn require_id(&self, name: &str) -> Result<RecordId, ContactServiceError> {
        self.repo
            .find_text_ignore_case(NAME_FIELD, name.trim())
            .map(|record| record.id)
            .ok_or_else(|| ContactServiceError::ContactNotFound(name.to_string()))
    }
}

impl ContactService<InMemoryCollection> {
    /// Writes the whole book to `store`.
    pub fn save(&self, store: &JsonFileStore) -> Result<(), ContactServiceError> {
        self.repo.save_to(store)?;
        Ok(())
    }

    /// Replaces the book with the document in `store`.
    ///
    /// Every loaded record must have the contact shape and a name no other
    /// record shares ignoring case; otherwise the current book is kept.
    pub fn load(&mut self, store: &JsonFileStore) -> Result<(), ContactServiceError> {
        let loaded = store.load()?;
        let mut names = HashSet::new();
        for record in loaded.list() {
            let contact = ContactView::from_record(record)?;
            if !names.insert(contact.name.to_lowercase()) {
                return Err(ContactServiceError::DuplicateContact(contact.name));
            }
        }
        self.repo.replace_with(loaded);
        Ok(())
    }
}

fn validate_phone(phone: &str) -> Result<(), ContactServiceError> {
    if is_blank(phone) {
        return Err(ContactServiceError::EmptyPhone);
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<String, ContactServiceError> {
    let trimmed = email.trim();
    if !EMAIL_RE.is_match(trimmed) {
        return Err(ContactServiceError::InvalidEmail(email.to_string()));
    }
    Ok(trimmed.to_string())
}
