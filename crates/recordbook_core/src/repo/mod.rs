//! Repository layer: record collection contracts and the in-memory manager.
//!
//! # Responsibility
//! - Define the CRUD contract services are written against.
//! - Own identifier assignment and re-indexing policy.
//!
//! # Invariants
//! - Repository writes validate field bags before mutating anything.
//! - Not-found is a semantic `RepoError` value, never a panic.

pub mod collection;
