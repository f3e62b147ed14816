//! Domain use-case services over record collections.
//!
//! # Responsibility
//! - Give the to-do list, contact book and library catalog typed entry
//!   points on top of the generic record repository.
//! - Reject invalid input before it reaches the repository.
//!
//! # Invariants
//! - Services never bypass repository validation.
//! - Not-found outcomes surface as domain error values.

pub mod contact_service;
pub mod library_service;
pub mod todo_service;

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
