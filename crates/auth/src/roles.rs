use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A user's role within one specific club.
///
/// The role set is closed: capabilities are resolved through a
/// [`RolePermissionTable`](crate::RolePermissionTable), and a role the table
/// does not know yields no capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClubRole {
    Admin,
    Moderator,
    Editor,
    Contributor,
}

impl ClubRole {
    pub const ALL: [ClubRole; 4] = [
        ClubRole::Admin,
        ClubRole::Moderator,
        ClubRole::Editor,
        ClubRole::Contributor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClubRole::Admin => "admin",
            ClubRole::Moderator => "moderator",
            ClubRole::Editor => "editor",
            ClubRole::Contributor => "contributor",
        }
    }
}

impl core::fmt::Display for ClubRole {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown club role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for ClubRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(ClubRole::Admin),
            "moderator" => Ok(ClubRole::Moderator),
            "editor" => Ok(ClubRole::Editor),
            "contributor" => Ok(ClubRole::Contributor),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// Platform-level role, distinct from any per-club role.
///
/// A `Student` has never joined a club and is denied every club-scoped
/// capability before the role table is even consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlatformRole {
    #[default]
    Student,
    ClubMember,
}

impl core::fmt::Display for PlatformRole {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PlatformRole::Student => f.write_str("student"),
            PlatformRole::ClubMember => f.write_str("club_member"),
        }
    }
}
