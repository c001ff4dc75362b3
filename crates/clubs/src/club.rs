use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use clubhub_auth::ClubRef;
use clubhub_core::{ClubId, DomainError, DomainResult, Entity, EventId, UserId};

const MAX_NAME_LEN: usize = 100;
const MAX_DESCRIPTION_LEN: usize = 1000;

/// Club category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClubCategory {
    Technology,
    Sports,
    Arts,
    Academic,
    Social,
}

/// Brand colors shown on the club page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ClubColors {
    pub primary: Option<String>,
    pub secondary: Option<String>,
}

/// Public social profiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SocialLinks {
    pub website: Option<String>,
    pub instagram: Option<String>,
    pub facebook: Option<String>,
    pub twitter: Option<String>,
}

/// Contact information for a club.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Attributes supplied when founding a club.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClub {
    pub name: String,
    pub description: String,
    pub category: ClubCategory,
    pub logo: Option<String>,
    pub banner: Option<String>,
    pub colors: ClubColors,
    pub social_links: SocialLinks,
    pub contact: ContactInfo,
}

/// Partial update of a club's descriptive attributes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClubPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<ClubCategory>,
    pub logo: Option<Option<String>>,
    pub banner: Option<Option<String>>,
    pub colors: Option<ClubColors>,
    pub social_links: Option<SocialLinks>,
    pub contact: Option<ContactInfo>,
}

/// A club.
///
/// # Invariants
/// - The president is always present in `members`.
/// - An event id appears in `events` at most once.
/// - `followers` holds each user at most once; followers have no role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Club {
    pub id: ClubId,
    pub name: String,
    pub description: String,
    pub category: ClubCategory,
    pub logo: Option<String>,
    pub banner: Option<String>,
    pub colors: ClubColors,
    pub social_links: SocialLinks,
    pub contact: ContactInfo,
    pub president_id: UserId,
    pub members: Vec<UserId>,
    pub followers: Vec<UserId>,
    pub events: Vec<EventId>,
    pub created_at: DateTime<Utc>,
}

fn validate_name(name: &str) -> DomainResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DomainError::validation("name cannot be empty"));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(DomainError::validation("name exceeds 100 characters"));
    }
    Ok(name.to_string())
}

fn validate_description(description: &str) -> DomainResult<String> {
    let description = description.trim();
    if description.is_empty() {
        return Err(DomainError::validation("description cannot be empty"));
    }
    if description.len() > MAX_DESCRIPTION_LEN {
        return Err(DomainError::validation("description exceeds 1000 characters"));
    }
    Ok(description.to_string())
}

impl Club {
    /// Found a club. The founder becomes president and the sole member.
    pub fn new(
        id: ClubId,
        president_id: UserId,
        attrs: NewClub,
        at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        Ok(Self {
            id,
            name: validate_name(&attrs.name)?,
            description: validate_description(&attrs.description)?,
            category: attrs.category,
            logo: attrs.logo,
            banner: attrs.banner,
            colors: attrs.colors,
            social_links: attrs.social_links,
            contact: attrs.contact,
            president_id,
            members: vec![president_id],
            followers: Vec::new(),
            events: Vec::new(),
            created_at: at,
        })
    }

    pub fn is_president(&self, user_id: UserId) -> bool {
        self.president_id == user_id
    }

    pub fn is_member(&self, user_id: UserId) -> bool {
        self.members.contains(&user_id)
    }

    /// The slice of this club the authorization engine needs.
    pub fn auth_ref(&self) -> ClubRef {
        ClubRef {
            club_id: self.id,
            president_id: self.president_id,
        }
    }

    pub fn apply_patch(&mut self, patch: ClubPatch) -> DomainResult<()> {
        if let Some(name) = &patch.name {
            self.name = validate_name(name)?;
        }
        if let Some(description) = &patch.description {
            self.description = validate_description(description)?;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(logo) = patch.logo {
            self.logo = logo;
        }
        if let Some(banner) = patch.banner {
            self.banner = banner;
        }
        if let Some(colors) = patch.colors {
            self.colors = colors;
        }
        if let Some(social_links) = patch.social_links {
            self.social_links = social_links;
        }
        if let Some(contact) = patch.contact {
            self.contact = contact;
        }
        Ok(())
    }

    pub fn add_member(&mut self, user_id: UserId) -> DomainResult<()> {
        if self.is_member(user_id) {
            return Err(DomainError::conflict("user is already a member"));
        }
        self.members.push(user_id);
        Ok(())
    }

    pub fn remove_member(&mut self, user_id: UserId) -> DomainResult<()> {
        if self.is_president(user_id) {
            return Err(DomainError::invariant("the club president cannot be removed"));
        }
        if !self.is_member(user_id) {
            return Err(DomainError::not_found());
        }
        self.members.retain(|m| *m != user_id);
        Ok(())
    }

    pub fn add_follower(&mut self, user_id: UserId) -> DomainResult<()> {
        if self.followers.contains(&user_id) {
            return Err(DomainError::conflict("already following this club"));
        }
        self.followers.push(user_id);
        Ok(())
    }

    pub fn remove_follower(&mut self, user_id: UserId) -> DomainResult<()> {
        if !self.followers.contains(&user_id) {
            return Err(DomainError::not_found());
        }
        self.followers.retain(|f| *f != user_id);
        Ok(())
    }

    /// Record an event as owned by this club.
    pub fn link_event(&mut self, event_id: EventId) -> DomainResult<()> {
        if self.events.contains(&event_id) {
            return Err(DomainError::conflict("event is already linked to this club"));
        }
        self.events.push(event_id);
        Ok(())
    }

    /// Drop an event reference (the event itself lives elsewhere).
    pub fn unlink_event(&mut self, event_id: EventId) -> DomainResult<()> {
        if !self.events.contains(&event_id) {
            return Err(DomainError::not_found());
        }
        self.events.retain(|e| *e != event_id);
        Ok(())
    }
}

impl Entity for Club {
    type Id = ClubId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
