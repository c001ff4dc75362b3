use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::ClubRole;

/// A named permission flag, interpreted per club role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Capability {
    DeleteClub,
    ManageRoles,
    InviteMembers,
    RemoveMembers,
    CreateEvents,
    EditAllEvents,
    DeleteAllEvents,
    ManageClubSettings,
    ViewAnalytics,
}

impl Capability {
    pub const ALL: [Capability; 9] = [
        Capability::DeleteClub,
        Capability::ManageRoles,
        Capability::InviteMembers,
        Capability::RemoveMembers,
        Capability::CreateEvents,
        Capability::EditAllEvents,
        Capability::DeleteAllEvents,
        Capability::ManageClubSettings,
        Capability::ViewAnalytics,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::DeleteClub => "deleteClub",
            Capability::ManageRoles => "manageRoles",
            Capability::InviteMembers => "inviteMembers",
            Capability::RemoveMembers => "removeMembers",
            Capability::CreateEvents => "createEvents",
            Capability::EditAllEvents => "editAllEvents",
            Capability::DeleteAllEvents => "deleteAllEvents",
            Capability::ManageClubSettings => "manageClubSettings",
            Capability::ViewAnalytics => "viewAnalytics",
        }
    }
}

impl core::fmt::Display for Capability {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable mapping from club role to granted capabilities.
///
/// The table is plain injected configuration: construct it once, hand it to
/// the decision engine, never mutate it. A role absent from the table grants
/// nothing (deny-by-default), so a misconfigured or partial table can only
/// ever deny more, not allow more.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolePermissionTable {
    grants: HashMap<ClubRole, HashSet<Capability>>,
    // Borrowed empty set for roles the table does not know.
    none: HashSet<Capability>,
}

impl RolePermissionTable {
    pub fn new(grants: HashMap<ClubRole, HashSet<Capability>>) -> Self {
        Self {
            grants,
            none: HashSet::new(),
        }
    }

    /// A table that grants nothing to anyone.
    pub fn deny_all() -> Self {
        Self::new(HashMap::new())
    }

    /// The production table.
    pub fn standard() -> Self {
        use Capability::*;

        let mut grants = HashMap::new();
        grants.insert(
            ClubRole::Admin,
            HashSet::from([
                DeleteClub,
                ManageRoles,
                InviteMembers,
                RemoveMembers,
                CreateEvents,
                EditAllEvents,
                DeleteAllEvents,
                ManageClubSettings,
                ViewAnalytics,
            ]),
        );
        grants.insert(
            ClubRole::Moderator,
            HashSet::from([
                InviteMembers,
                RemoveMembers,
                CreateEvents,
                EditAllEvents,
                DeleteAllEvents,
                ViewAnalytics,
            ]),
        );
        grants.insert(
            ClubRole::Editor,
            HashSet::from([CreateEvents, EditAllEvents]),
        );
        grants.insert(ClubRole::Contributor, HashSet::from([CreateEvents]));

        Self::new(grants)
    }

    /// Pure, constant lookup of a role's capability set.
    pub fn capabilities_for(&self, role: ClubRole) -> &HashSet<Capability> {
        self.grants.get(&role).unwrap_or(&self.none)
    }

    pub fn allows(&self, role: ClubRole, capability: Capability) -> bool {
        self.capabilities_for(role).contains(&capability)
    }
}

impl Default for RolePermissionTable {
    fn default() -> Self {
        Self::standard()
    }
}
