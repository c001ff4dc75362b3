use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use clubhub_auth::EventRef;
use clubhub_core::{ClubId, DomainError, DomainResult, Entity, EventId, UserId};

/// Event category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    Technology,
    Sports,
    Arts,
    Academic,
    Social,
}

/// Lifecycle status of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    #[default]
    Upcoming,
    Ongoing,
    Completed,
}

/// One attendee registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub user_id: UserId,
    pub registered_at: DateTime<Utc>,
}

/// Attributes supplied when scheduling an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub club_id: ClubId,
    pub title: String,
    pub description: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub location: String,
    pub category: EventCategory,
    pub image_url: Option<String>,
    pub payment_required: bool,
}

/// Partial update of an event. The owning club can never change.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub category: Option<EventCategory>,
    pub image_url: Option<Option<String>>,
    pub status: Option<EventStatus>,
    pub payment_required: Option<bool>,
}

/// An event hosted by exactly one club.
///
/// # Invariants
/// - `club_id` is immutable after creation.
/// - `ends_at` is strictly after `starts_at`.
/// - A user appears in `attendees` at most once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub description: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub location: String,
    pub category: EventCategory,
    pub image_url: Option<String>,
    pub status: EventStatus,
    pub payment_required: bool,
    pub club_id: ClubId,
    pub creator_id: UserId,
    pub attendees: Vec<Registration>,
    pub created_at: DateTime<Utc>,
}

fn require(field: &str, value: &str) -> DomainResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DomainError::validation(format!("{field} cannot be empty")));
    }
    Ok(value.to_string())
}

fn check_window(starts_at: DateTime<Utc>, ends_at: DateTime<Utc>) -> DomainResult<()> {
    if ends_at <= starts_at {
        return Err(DomainError::validation("end date must be after start date"));
    }
    Ok(())
}

impl Event {
    pub fn new(
        id: EventId,
        creator_id: UserId,
        attrs: NewEvent,
        at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        check_window(attrs.starts_at, attrs.ends_at)?;

        Ok(Self {
            id,
            title: require("title", &attrs.title)?,
            description: require("description", &attrs.description)?,
            starts_at: attrs.starts_at,
            ends_at: attrs.ends_at,
            location: require("location", &attrs.location)?,
            category: attrs.category,
            image_url: attrs.image_url,
            status: EventStatus::Upcoming,
            payment_required: attrs.payment_required,
            club_id: attrs.club_id,
            creator_id,
            attendees: Vec::new(),
            created_at: at,
        })
    }

    /// The slice of this event the authorization engine needs.
    pub fn auth_ref(&self) -> EventRef {
        EventRef {
            event_id: self.id,
            club_id: self.club_id,
            creator_id: self.creator_id,
        }
    }

    pub fn apply_patch(&mut self, patch: EventPatch) -> DomainResult<()> {
        let starts_at = patch.starts_at.unwrap_or(self.starts_at);
        let ends_at = patch.ends_at.unwrap_or(self.ends_at);
        check_window(starts_at, ends_at)?;

        if let Some(title) = &patch.title {
            self.title = require("title", title)?;
        }
        if let Some(description) = &patch.description {
            self.description = require("description", description)?;
        }
        if let Some(location) = &patch.location {
            self.location = require("location", location)?;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(image_url) = patch.image_url {
            self.image_url = image_url;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(payment_required) = patch.payment_required {
            self.payment_required = payment_required;
        }
        self.starts_at = starts_at;
        self.ends_at = ends_at;
        Ok(())
    }

    pub fn is_registered(&self, user_id: UserId) -> bool {
        self.attendees.iter().any(|r| r.user_id == user_id)
    }

    /// Register an attendee. A second registration for the same user is a
    /// Conflict and leaves the existing registration untouched.
    pub fn register_attendee(&mut self, user_id: UserId, at: DateTime<Utc>) -> DomainResult<()> {
        if self.is_registered(user_id) {
            return Err(DomainError::conflict("already registered for this event"));
        }

        self.attendees.push(Registration {
            user_id,
            registered_at: at,
        });
        Ok(())
    }
}

impl Entity for Event {
    type Id = EventId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
