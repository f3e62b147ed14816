//! Core domain logic for recordbook.
//! In-memory record collections, their JSON persistence, and the to-do,
//! contact and library services built on them.

pub mod config;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use config::{ConfigError, CoreConfig, DEFAULT_DATA_FILE};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget, LoggingError};
pub use model::record::{Record, RecordId, RecordValidationError, RESERVED_FIELD_NAMES};
pub use model::value::{fields, FieldValue, Fields};
pub use repo::collection::{IdPolicy, InMemoryCollection, RecordRepository, RepoError, RepoResult};
pub use service::contact_service::{ContactService, ContactServiceError, ContactView};
pub use service::library_service::{BookView, LibraryService, LibraryServiceError};
pub use service::todo_service::{TaskView, TodoService, TodoServiceError};
pub use store::{
    decode_collection, encode_collection, JsonFileStore, StoreError, StoreResult, FORMAT_VERSION,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
