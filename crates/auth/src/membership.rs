use serde::{Deserialize, Serialize};

use clubhub_core::ClubId;

use crate::ClubRole;

/// A user's role assignment within one specific club.
///
/// This is an authorization boundary object: it states *which club* the user
/// is acting within and which role is granted there. Users hold at most one
/// membership per distinct club id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub club_id: ClubId,
    pub role: ClubRole,
}

impl Membership {
    pub fn new(club_id: ClubId, role: ClubRole) -> Self {
        Self { club_id, role }
    }
}

/// Find the membership matching `club_id` in a user's membership list.
///
/// Identifiers are compared by canonical value (typed UUID equality), never
/// by string rendering. Absence is a normal, expected outcome: the caller
/// maps it to a "not a club member" denial, which is distinct from "club
/// does not exist".
pub fn resolve_membership(memberships: &[Membership], club_id: ClubId) -> Option<&Membership> {
    memberships.iter().find(|m| m.club_id == club_id)
}
