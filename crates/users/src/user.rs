use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use clubhub_auth::{ClubRole, Membership, PlatformRole, resolve_membership};
use clubhub_core::{ClubId, DomainError, DomainResult, Entity, UserId};

/// Attributes supplied at signup.
///
/// The password arrives already hashed; this crate never sees a plaintext
/// credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub fullname: String,
    pub email: String,
    pub password_hash: String,
    pub avatar: Option<String>,
}

/// A user account.
///
/// # Invariants
/// - At most one membership per distinct club id.
/// - Any user holding a membership has `platform_role = ClubMember`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub fullname: String,
    pub email: String,
    pub password_hash: String,
    pub avatar: Option<String>,
    pub platform_role: PlatformRole,
    pub memberships: Vec<Membership>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn register(id: UserId, new: NewUser, at: DateTime<Utc>) -> DomainResult<Self> {
        let fullname = new.fullname.trim();
        if fullname.is_empty() {
            return Err(DomainError::validation("fullname cannot be empty"));
        }

        let email = new.email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(DomainError::validation("invalid email format"));
        }

        if new.password_hash.is_empty() {
            return Err(DomainError::validation("password hash cannot be empty"));
        }

        Ok(Self {
            id,
            fullname: fullname.to_string(),
            email,
            password_hash: new.password_hash,
            avatar: new.avatar,
            platform_role: PlatformRole::Student,
            memberships: Vec::new(),
            created_at: at,
        })
    }

    /// The user's membership in `club_id`, if any.
    pub fn membership_in(&self, club_id: ClubId) -> Option<&Membership> {
        resolve_membership(&self.memberships, club_id)
    }

    /// Record membership in a club.
    ///
    /// Joining also lifts the platform role: a member of any club is no
    /// longer a plain student.
    pub fn join_club(&mut self, club_id: ClubId, role: ClubRole) -> DomainResult<()> {
        if self.membership_in(club_id).is_some() {
            return Err(DomainError::conflict("already a member of this club"));
        }

        self.memberships.push(Membership::new(club_id, role));
        self.platform_role = PlatformRole::ClubMember;
        Ok(())
    }

    pub fn leave_club(&mut self, club_id: ClubId) -> DomainResult<()> {
        if self.membership_in(club_id).is_none() {
            return Err(DomainError::not_found());
        }

        self.memberships.retain(|m| m.club_id != club_id);
        Ok(())
    }

    pub fn change_club_role(&mut self, club_id: ClubId, role: ClubRole) -> DomainResult<()> {
        let membership = self
            .memberships
            .iter_mut()
            .find(|m| m.club_id == club_id)
            .ok_or_else(DomainError::not_found)?;

        membership.role = role;
        Ok(())
    }
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
