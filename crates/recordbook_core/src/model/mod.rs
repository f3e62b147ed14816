//! Record domain model shared by every collection projection.
//!
//! # Responsibility
//! - Define the loosely-typed field bag (`FieldValue`, `Fields`).
//! - Define the canonical `Record` stored by collections.
//!
//! # Invariants
//! - `id` and `created_at` live outside the field bag and are never
//!   overwritten by caller-supplied fields.
//! - Float values are always finite so every record stays serializable.

pub mod record;
pub mod value;
