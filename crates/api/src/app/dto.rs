use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use clubhub_auth::{ClubRole, Membership, PlatformRole};
use clubhub_clubs::{ClubCategory, ClubColors, ClubPatch, ContactInfo, SocialLinks};
use clubhub_core::UserId;
use clubhub_events::{EventCategory, EventPatch, EventStatus};
use clubhub_users::User;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub fullname: String,
    pub email: String,
    pub password: String,
    pub avatar: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateClubRequest {
    pub name: String,
    pub description: String,
    pub category: ClubCategory,
    pub logo: Option<String>,
    pub banner: Option<String>,
    pub colors: Option<ClubColors>,
    pub social_links: Option<SocialLinks>,
    pub contact: Option<ContactInfo>,
}

/// Absent fields are left untouched. Setting a field to `null` is not
/// distinguished from omitting it; media fields can be replaced but not
/// cleared through this endpoint.
#[derive(Debug, Deserialize)]
pub struct UpdateClubRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<ClubCategory>,
    pub logo: Option<String>,
    pub banner: Option<String>,
    pub colors: Option<ClubColors>,
    pub social_links: Option<SocialLinks>,
    pub contact: Option<ContactInfo>,
}

impl From<UpdateClubRequest> for ClubPatch {
    fn from(value: UpdateClubRequest) -> Self {
        ClubPatch {
            name: value.name,
            description: value.description,
            category: value.category,
            logo: value.logo.map(Some),
            banner: value.banner.map(Some),
            colors: value.colors,
            social_links: value.social_links,
            contact: value.contact,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct InviteMemberRequest {
    pub user_id: String,
    pub role: ClubRole,
}

#[derive(Debug, Deserialize)]
pub struct ChangeRoleRequest {
    pub role: ClubRole,
}

#[derive(Debug, Deserialize)]
pub struct CreateEventRequest {
    pub club_id: String,
    pub title: String,
    pub description: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub location: String,
    pub category: EventCategory,
    pub image_url: Option<String>,
    pub payment_required: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub category: Option<EventCategory>,
    pub image_url: Option<String>,
    pub status: Option<EventStatus>,
    pub payment_required: Option<bool>,
}

impl From<UpdateEventRequest> for EventPatch {
    fn from(value: UpdateEventRequest) -> Self {
        EventPatch {
            title: value.title,
            description: value.description,
            starts_at: value.starts_at,
            ends_at: value.ends_at,
            location: value.location,
            category: value.category,
            image_url: value.image_url.map(Some),
            status: value.status,
            payment_required: value.payment_required,
        }
    }
}

// -------------------------
// Response DTOs
// -------------------------

/// Public view of a user. Never exposes the password hash.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: UserId,
    pub fullname: String,
    pub email: String,
    pub avatar: Option<String>,
    pub platform_role: PlatformRole,
    pub clubs: Vec<Membership>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            fullname: user.fullname,
            email: user.email,
            avatar: user.avatar,
            platform_role: user.platform_role,
            clubs: user.memberships,
        }
    }
}
