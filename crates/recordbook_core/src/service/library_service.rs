//! Library catalog use-case service.
//!
//! # Responsibility
//! - Catalog books and track their borrowed/available state.
//!
//! # Invariants
//! - Title and author are never blank.
//! - Title lookups ignore case; the first matching book wins.
//! - Borrowing a borrowed book or returning an available one is rejected
//!   without changing state.

use super::is_blank;
use crate::model::record::{Record, RecordId};
use crate::model::value::{fields, FieldValue};
use crate::repo::collection::{RecordRepository, RepoError};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const TITLE_FIELD: &str = "title";
pub const AUTHOR_FIELD: &str = "author";
pub const ISBN_FIELD: &str = "isbn";
pub const BORROWED_FIELD: &str = "is_borrowed";

/// Service error for library use-cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibraryServiceError {
    EmptyTitle,
    EmptyAuthor,
    BookNotFound(String),
    AlreadyBorrowed(String),
    NotBorrowed(String),
    MalformedBook(RecordId),
    Repo(RepoError),
}

impl Display for LibraryServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "book title cannot be empty"),
            Self::EmptyAuthor => write!(f, "book author cannot be empty"),
            Self::BookNotFound(title) => write!(f, "'{title}' not found in library"),
            Self::AlreadyBorrowed(title) => write!(f, "'{title}' is already borrowed"),
            Self::NotBorrowed(title) => write!(f, "'{title}' is not currently borrowed"),
            Self::MalformedBook(id) => write!(f, "record {id} is not a book"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for LibraryServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for LibraryServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Read model for one book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookView {
    pub id: RecordId,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub is_borrowed: bool,
}

impl BookView {
    fn from_record(record: &Record) -> Result<Self, LibraryServiceError> {
        let malformed = || LibraryServiceError::MalformedBook(record.id);
        Ok(Self {
            id: record.id,
            title: record.text(TITLE_FIELD).ok_or_else(malformed)?.to_string(),
            author: record.text(AUTHOR_FIELD).ok_or_else(malformed)?.to_string(),
            isbn: record.text(ISBN_FIELD).unwrap_or_default().to_string(),
            is_borrowed: record.flag(BORROWED_FIELD).unwrap_or(false),
        })
    }

    pub fn status(&self) -> &'static str {
        if self.is_borrowed {
            "Borrowed"
        } else {
            "Available"
        }
    }
}

impl Display for BookView {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "'{}' by {} - {}", self.title, self.author, self.status())
    }
}

/// Named library catalog over a record repository.
pub struct LibraryService<R: RecordRepository> {
    name: String,
    repo: R,
}

impl<R: RecordRepository> LibraryService<R> {
    pub fn new(name: impl Into<String>, repo: R) -> Self {
        Self {
            name: name.into(),
            repo,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_book(
        &mut self,
        title: &str,
        author: &str,
        isbn: &str,
    ) -> Result<RecordId, LibraryServiceError> {
        if is_blank(title) {
            return Err(LibraryServiceError::EmptyTitle);
        }
        if is_blank(author) {
            return Err(LibraryServiceError::EmptyAuthor);
        }
        let id = self.repo.add(fields([
            (TITLE_FIELD, FieldValue::from(title.trim())),
            (AUTHOR_FIELD, FieldValue::from(author.trim())),
            (ISBN_FIELD, FieldValue::from(isbn.trim())),
            (BORROWED_FIELD, FieldValue::Bool(false)),
        ]))?;
        Ok(id)
    }

    /// Finds a book by case-insensitive title.
    pub fn find_book(&self, title: &str) -> Result<Option<BookView>, LibraryServiceError> {
        self.repo
            .find_text_ignore_case(TITLE_FIELD, title.trim())
            .map(BookView::from_record)
            .transpose()
    }

    pub fn borrow_book(&mut self, title: &str) -> Result<BookView, LibraryServiceError> {
        let book = self.require_book(title)?;
        if book.is_borrowed {
            return Err(LibraryServiceError::AlreadyBorrowed(title.to_string()));
        }
        self.set_borrowed(book, true)
    }

    pub fn return_book(&mut self, title: &str) -> Result<BookView, LibraryServiceError> {
        let book = self.require_book(title)?;
        if !book.is_borrowed {
            return Err(LibraryServiceError::NotBorrowed(title.to_string()));
        }
        self.set_borrowed(book, false)
    }

    /// Lists books in catalog order.
    pub fn list_books(&self) -> Result<Vec<BookView>, LibraryServiceError> {
        self.repo.list().map(BookView::from_record).collect()
    }

    /// Books currently on the shelf.
    pub fn available_books(&self) -> Result<Vec<BookView>, LibraryServiceError> {
        Ok(self
            .list_books()?
            .into_iter()
            .filter(|book| !book.is_borrowed)
            .collect())
    }

    fn require_book(&self, title: &str) -> Result<BookView, LibraryServiceError> {
        self.find_book(title)?
            .ok_or_else(|| LibraryServiceError::BookNotFound(title.to_string()))
    }

    fn set_borrowed(
        &mut self,
        mut book: BookView,
        borrowed: bool,
    ) -> Result<BookView, LibraryServiceError> {
        self.repo.set_flag(book.id, BORROWED_FIELD, borrowed)?;
        book.is_borrowed = borrowed;
        info!(
            "event=book_status module=service status=ok library={} id={} borrowed={}",
            self.name, book.id, borrowed
        );
        Ok(book)
    }
}
