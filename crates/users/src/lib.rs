//! `clubhub-users` — user accounts and their club memberships.

pub mod user;

pub use user::{NewUser, User};
