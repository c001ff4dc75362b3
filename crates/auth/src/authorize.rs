//! Authorization decision engine.
//!
//! Combines the acting user's resolved membership, the role-permission
//! table, and resource ownership into a single allow/deny decision. Denial
//! is a first-class return value carrying a reason code; no error path is
//! involved in a normal "no".
//!
//! The policy is an explicit two-clause union per action:
//! `is_owner(resource, user) OR role_grants_capability(action)`. Ownership
//! is checked first; the capability table is consulted only for callers who
//! do not own the resource. Club deletion is the one exception: only the
//! club's president may delete it, never a capability alone.

use serde::Serialize;

use clubhub_core::{ClubId, EventId, UserId};

use crate::{Capability, Membership, PlatformRole, RolePermissionTable, resolve_membership};

/// The acting user, as seen by the decision engine.
///
/// Memberships must be read fresh from the user's current record for every
/// decision; the engine never caches them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor<'a> {
    pub user_id: UserId,
    pub platform_role: PlatformRole,
    pub memberships: &'a [Membership],
}

/// The slice of a club the engine needs to decide about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClubRef {
    pub club_id: ClubId,
    pub president_id: UserId,
}

/// The slice of an event the engine needs to decide about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventRef {
    pub event_id: EventId,
    pub club_id: ClubId,
    pub creator_id: UserId,
}

/// Club-scoped actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClubAction {
    UpdateSettings,
    Delete,
    ManageRoles,
    InviteMembers,
    RemoveMembers,
    ViewAnalytics,
}

/// Actions on an existing event. Creation targets a club instead, since no
/// event exists yet; see [`authorize_event_creation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    Edit,
    Delete,
}

/// Which clause of the policy granted access (for structured logs/audit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AllowBasis {
    President,
    Creator,
    RoleCapability,
}

/// Why a request was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    NotAMember,
    InsufficientRole,
    NotOwner,
    ResourceNotFound,
}

impl DenyReason {
    pub fn code(&self) -> &'static str {
        match self {
            DenyReason::NotAMember => "not_a_member",
            DenyReason::InsufficientRole => "insufficient_role",
            DenyReason::NotOwner => "not_owner",
            DenyReason::ResourceNotFound => "resource_not_found",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            DenyReason::NotAMember => "not a member of this club",
            DenyReason::InsufficientRole => "club role does not grant this capability",
            DenyReason::NotOwner => "only the club president may do this",
            DenyReason::ResourceNotFound => "target resource does not exist",
        }
    }
}

impl core::fmt::Display for DenyReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.message())
    }
}

/// Outcome of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Allow(AllowBasis),
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow(_))
    }

    pub fn deny_reason(&self) -> Option<DenyReason> {
        match self {
            Decision::Allow(_) => None,
            Decision::Deny(reason) => Some(*reason),
        }
    }
}

/// Authorize a club-scoped action.
///
/// - `Delete` requires president identity; a capability never suffices.
/// - `UpdateSettings` accepts the president or `ManageClubSettings`.
/// - Remaining actions accept the president or the mapped capability.
pub fn authorize_club(
    actor: &Actor<'_>,
    club: &ClubRef,
    action: ClubAction,
    table: &RolePermissionTable,
) -> Decision {
    if actor.user_id == club.president_id {
        return Decision::Allow(AllowBasis::President);
    }

    let capability = match action {
        // President-only: a granted capability does not make a non-president
        // an owner.
        ClubAction::Delete => {
            return match membership_capability(actor, club.club_id, Capability::DeleteClub, table)
            {
                Ok(_) | Err(DenyReason::InsufficientRole) => Decision::Deny(DenyReason::NotOwner),
                Err(reason) => Decision::Deny(reason),
            };
        }
        ClubAction::UpdateSettings => Capability::ManageClubSettings,
        ClubAction::ManageRoles => Capability::ManageRoles,
        ClubAction::InviteMembers => Capability::InviteMembers,
        ClubAction::RemoveMembers => Capability::RemoveMembers,
        ClubAction::ViewAnalytics => Capability::ViewAnalytics,
    };

    match membership_capability(actor, club.club_id, capability, table) {
        Ok(basis) => Decision::Allow(basis),
        Err(reason) => Decision::Deny(reason),
    }
}

/// Authorize an event-scoped action.
///
/// Editing or deleting one's own event is granted by authorship alone; the
/// `EditAllEvents`/`DeleteAllEvents` capabilities are consulted only when
/// the caller is not the creator.
pub fn authorize_event(
    actor: &Actor<'_>,
    event: &EventRef,
    action: EventAction,
    table: &RolePermissionTable,
) -> Decision {
    if actor.user_id == event.creator_id {
        return Decision::Allow(AllowBasis::Creator);
    }

    let capability = match action {
        EventAction::Edit => Capability::EditAllEvents,
        EventAction::Delete => Capability::DeleteAllEvents,
    };

    match membership_capability(actor, event.club_id, capability, table) {
        Ok(basis) => Decision::Allow(basis),
        Err(reason) => Decision::Deny(reason),
    }
}

/// Authorize scheduling a new event under a club.
pub fn authorize_event_creation(
    actor: &Actor<'_>,
    club: &ClubRef,
    table: &RolePermissionTable,
) -> Decision {
    match membership_capability(actor, club.club_id, Capability::CreateEvents, table) {
        Ok(basis) => Decision::Allow(basis),
        Err(reason) => Decision::Deny(reason),
    }
}

/// The role-capability clause shared by every action.
///
/// Students are cut off before the table is consulted: a user who never
/// joined a club holds no club-scoped capability even if the table were
/// misconfigured to grant one.
fn membership_capability(
    actor: &Actor<'_>,
    club_id: ClubId,
    capability: Capability,
    table: &RolePermissionTable,
) -> Result<AllowBasis, DenyReason> {
    if actor.platform_role == PlatformRole::Student {
        return Err(DenyReason::NotAMember);
    }

    let membership =
        resolve_membership(actor.memberships, club_id).ok_or(DenyReason::NotAMember)?;

    if table.allows(membership.role, capability) {
        Ok(AllowBasis::RoleCapability)
    } else {
        Err(DenyReason::InsufficientRole)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClubRole;

    struct Fixture {
        table: RolePermissionTable,
        club: ClubRef,
        president: UserId,
    }

    impl Fixture {
        fn new() -> Self {
            let president = UserId::new();
            Self {
                table: RolePermissionTable::standard(),
                club: ClubRef {
                    club_id: ClubId::new(),
                    president_id: president,
                },
                president,
            }
        }

        fn member(&self, role: ClubRole) -> (UserId, Vec<Membership>) {
            let user_id = UserId::new();
            (user_id, vec![Membership::new(self.club.club_id, role)])
        }

        fn event_by(&self, creator_id: UserId) -> EventRef {
            EventRef {
                event_id: EventId::new(),
                club_id: self.club.club_id,
                creator_id,
            }
        }
    }

    fn actor<'a>(
        user_id: UserId,
        platform_role: PlatformRole,
        memberships: &'a [Membership],
    ) -> Actor<'a> {
        Actor {
            user_id,
            platform_role,
            memberships,
        }
    }

    #[test]
    fn student_is_denied_event_mutation_even_with_permissive_table() {
        let fx = Fixture::new();
        let student = actor(UserId::new(), PlatformRole::Student, &[]);
        let event = fx.event_by(UserId::new());

        let decision = authorize_event(&student, &event, EventAction::Edit, &fx.table);
        assert_eq!(decision, Decision::Deny(DenyReason::NotAMember));
    }

    #[test]
    fn non_member_is_denied_with_not_a_member() {
        let fx = Fixture::new();
        let elsewhere = vec![Membership::new(ClubId::new(), ClubRole::Admin)];
        let outsider = actor(UserId::new(), PlatformRole::ClubMember, &elsewhere);
        let event = fx.event_by(UserId::new());

        let decision = authorize_event(&outsider, &event, EventAction::Delete, &fx.table);
        assert_eq!(decision, Decision::Deny(DenyReason::NotAMember));
    }

    #[test]
    fn contributor_can_edit_and_delete_own_event() {
        let fx = Fixture::new();
        let (user_id, memberships) = fx.member(ClubRole::Contributor);
        let contributor = actor(user_id, PlatformRole::ClubMember, &memberships);
        let own_event = fx.event_by(user_id);

        for action in [EventAction::Edit, EventAction::Delete] {
            let decision = authorize_event(&contributor, &own_event, action, &fx.table);
            assert_eq!(decision, Decision::Allow(AllowBasis::Creator));
        }
    }

    #[test]
    fn contributor_cannot_edit_someone_elses_event() {
        let fx = Fixture::new();
        let (user_id, memberships) = fx.member(ClubRole::Contributor);
        let contributor = actor(user_id, PlatformRole::ClubMember, &memberships);
        let other_event = fx.event_by(UserId::new());

        let decision = authorize_event(&contributor, &other_event, EventAction::Edit, &fx.table);
        assert_eq!(decision, Decision::Deny(DenyReason::InsufficientRole));
    }

    #[test]
    fn admin_membership_can_delete_any_event_in_its_club() {
        let fx = Fixture::new();
        let (user_id, memberships) = fx.member(ClubRole::Admin);
        let admin = actor(user_id, PlatformRole::ClubMember, &memberships);
        let other_event = fx.event_by(UserId::new());

        let decision = authorize_event(&admin, &other_event, EventAction::Delete, &fx.table);
        assert_eq!(decision, Decision::Allow(AllowBasis::RoleCapability));
    }

    #[test]
    fn creator_override_survives_an_empty_table() {
        let fx = Fixture::new();
        let deny_all = RolePermissionTable::deny_all();
        let (user_id, memberships) = fx.member(ClubRole::Contributor);
        let contributor = actor(user_id, PlatformRole::ClubMember, &memberships);
        let own_event = fx.event_by(user_id);

        let decision = authorize_event(&contributor, &own_event, EventAction::Edit, &deny_all);
        assert_eq!(decision, Decision::Allow(AllowBasis::Creator));
    }

    #[test]
    fn event_creation_requires_membership_capability() {
        let fx = Fixture::new();
        let (user_id, memberships) = fx.member(ClubRole::Contributor);
        let contributor = actor(user_id, PlatformRole::ClubMember, &memberships);

        let decision = authorize_event_creation(&contributor, &fx.club, &fx.table);
        assert_eq!(decision, Decision::Allow(AllowBasis::RoleCapability));

        let deny_all = RolePermissionTable::deny_all();
        let decision = authorize_event_creation(&contributor, &fx.club, &deny_all);
        assert_eq!(decision, Decision::Deny(DenyReason::InsufficientRole));

        let student = actor(UserId::new(), PlatformRole::Student, &[]);
        let decision = authorize_event_creation(&student, &fx.club, &fx.table);
        assert_eq!(decision, Decision::Deny(DenyReason::NotAMember));
    }

    #[test]
    fn only_president_may_delete_the_club() {
        let fx = Fixture::new();
        let president_memberships = vec![Membership::new(fx.club.club_id, ClubRole::Admin)];
        let president = actor(fx.president, PlatformRole::ClubMember, &president_memberships);

        let decision = authorize_club(&president, &fx.club, ClubAction::Delete, &fx.table);
        assert_eq!(decision, Decision::Allow(AllowBasis::President));

        // An admin member who is not president holds deleteClub in the table,
        // yet must still be denied.
        let (user_id, memberships) = fx.member(ClubRole::Admin);
        let admin = actor(user_id, PlatformRole::ClubMember, &memberships);
        let decision = authorize_club(&admin, &fx.club, ClubAction::Delete, &fx.table);
        assert_eq!(decision, Decision::Deny(DenyReason::NotOwner));
    }

    #[test]
    fn club_delete_by_outsider_reports_not_a_member() {
        let fx = Fixture::new();
        let outsider = actor(UserId::new(), PlatformRole::ClubMember, &[]);

        let decision = authorize_club(&outsider, &fx.club, ClubAction::Delete, &fx.table);
        assert_eq!(decision, Decision::Deny(DenyReason::NotAMember));
    }

    #[test]
    fn settings_update_accepts_president_or_capability() {
        let fx = Fixture::new();

        let president = actor(fx.president, PlatformRole::ClubMember, &[]);
        let decision = authorize_club(&president, &fx.club, ClubAction::UpdateSettings, &fx.table);
        assert_eq!(decision, Decision::Allow(AllowBasis::President));

        let (user_id, memberships) = fx.member(ClubRole::Admin);
        let admin = actor(user_id, PlatformRole::ClubMember, &memberships);
        let decision = authorize_club(&admin, &fx.club, ClubAction::UpdateSettings, &fx.table);
        assert_eq!(decision, Decision::Allow(AllowBasis::RoleCapability));

        let (user_id, memberships) = fx.member(ClubRole::Moderator);
        let moderator = actor(user_id, PlatformRole::ClubMember, &memberships);
        let decision = authorize_club(&moderator, &fx.club, ClubAction::UpdateSettings, &fx.table);
        assert_eq!(decision, Decision::Deny(DenyReason::InsufficientRole));
    }

    #[test]
    fn moderator_may_invite_and_remove_but_not_manage_roles() {
        let fx = Fixture::new();
        let (user_id, memberships) = fx.member(ClubRole::Moderator);
        let moderator = actor(user_id, PlatformRole::ClubMember, &memberships);

        for action in [ClubAction::InviteMembers, ClubAction::RemoveMembers] {
            let decision = authorize_club(&moderator, &fx.club, action, &fx.table);
            assert_eq!(decision, Decision::Allow(AllowBasis::RoleCapability));
        }

        let decision = authorize_club(&moderator, &fx.club, ClubAction::ManageRoles, &fx.table);
        assert_eq!(decision, Decision::Deny(DenyReason::InsufficientRole));
    }

    #[test]
    fn deny_reason_codes_are_stable() {
        assert_eq!(DenyReason::NotAMember.code(), "not_a_member");
        assert_eq!(DenyReason::InsufficientRole.code(), "insufficient_role");
        assert_eq!(DenyReason::NotOwner.code(), "not_owner");
        assert_eq!(DenyReason::ResourceNotFound.code(), "resource_not_found");
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;
        use uuid::Uuid;

        fn arb_user_id() -> impl Strategy<Value = UserId> {
            any::<u128>().prop_map(|v| UserId::from_uuid(Uuid::from_u128(v)))
        }

        fn arb_club_id() -> impl Strategy<Value = ClubId> {
            any::<u128>().prop_map(|v| ClubId::from_uuid(Uuid::from_u128(v)))
        }

        fn arb_role() -> impl Strategy<Value = ClubRole> {
            prop::sample::select(ClubRole::ALL.to_vec())
        }

        proptest! {
            /// Same inputs always produce the same decision.
            #[test]
            fn decisions_are_deterministic(
                user in arb_user_id(),
                creator in arb_user_id(),
                club_id in arb_club_id(),
                role in arb_role(),
            ) {
                let table = RolePermissionTable::standard();
                let memberships = vec![Membership::new(club_id, role)];
                let actor = Actor {
                    user_id: user,
                    platform_role: PlatformRole::ClubMember,
                    memberships: &memberships,
                };
                let event = EventRef {
                    event_id: EventId::new(),
                    club_id,
                    creator_id: creator,
                };

                let first = authorize_event(&actor, &event, EventAction::Edit, &table);
                let second = authorize_event(&actor, &event, EventAction::Edit, &table);
                prop_assert_eq!(first, second);
            }

            /// The creator of an event may always edit it, whatever the table
            /// or their role says.
            #[test]
            fn creator_is_never_denied_edit(
                creator in arb_user_id(),
                club_id in arb_club_id(),
                role in arb_role(),
            ) {
                for table in [RolePermissionTable::standard(), RolePermissionTable::deny_all()] {
                    let memberships = vec![Membership::new(club_id, role)];
                    let actor = Actor {
                        user_id: creator,
                        platform_role: PlatformRole::ClubMember,
                        memberships: &memberships,
                    };
                    let event = EventRef {
                        event_id: EventId::new(),
                        club_id,
                        creator_id: creator,
                    };

                    let decision = authorize_event(&actor, &event, EventAction::Edit, &table);
                    prop_assert_eq!(decision, Decision::Allow(AllowBasis::Creator));
                }
            }

            /// A student who did not create the event is always denied,
            /// whatever memberships their record claims.
            #[test]
            fn student_is_always_denied_non_owned_events(
                user in arb_user_id(),
                creator in arb_user_id(),
                club_id in arb_club_id(),
                role in arb_role(),
            ) {
                prop_assume!(user != creator);

                let table = RolePermissionTable::standard();
                let memberships = vec![Membership::new(club_id, role)];
                let actor = Actor {
                    user_id: user,
                    platform_role: PlatformRole::Student,
                    memberships: &memberships,
                };
                let event = EventRef {
                    event_id: EventId::new(),
                    club_id,
                    creator_id: creator,
                };

                let decision = authorize_event(&actor, &event, EventAction::Delete, &table);
                prop_assert_eq!(decision, Decision::Deny(DenyReason::NotAMember));
            }
        }
    }
}
