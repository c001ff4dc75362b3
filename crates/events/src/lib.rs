//! `clubhub-events` — events hosted by clubs, and attendee registration.

pub mod event;

pub use event::{Event, EventCategory, EventPatch, EventStatus, NewEvent, Registration};
