//! `clubhub-core` — domain foundation building blocks.
//!
//! Pure domain primitives shared by every other crate: strongly-typed
//! identifiers, the `Entity` marker trait, and the domain error model.
//! No infrastructure concerns live here.

pub mod entity;
pub mod error;
pub mod id;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{ClubId, EventId, UserId};
