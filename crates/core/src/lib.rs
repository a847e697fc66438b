//! `battstock-core`: shared building blocks for the battery-trading domain.
//!
//! Pure domain primitives only (no IO, no storage, no HTTP).

pub mod entity;
pub mod error;
pub mod id;
pub mod kind;
pub mod signed;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::RecordId;
pub use kind::EntityKind;
pub use signed::{accumulate, Direction, Signed, Total};
pub use value_object::ValueObject;
