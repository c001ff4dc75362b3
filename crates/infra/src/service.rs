//! Authorized mutation orchestration.
//!
//! Every operation follows the same pipeline: read the acting user fresh,
//! resolve the target, ask the decision engine, then mutate inside a single
//! store transaction. Authorization runs inside the transaction too, so the
//! membership it sees cannot go stale between check and write.

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;

use clubhub_auth::{
    Actor, ClubAction, ClubRole, Decision, DenyReason, EventAction, RolePermissionTable,
    authorize_club, authorize_event, authorize_event_creation,
};
use clubhub_clubs::{Club, ClubPatch, NewClub};
use clubhub_core::{ClubId, DomainError, EventId, UserId};
use clubhub_events::{Event, EventPatch, NewEvent};
use clubhub_users::{NewUser, User};

use crate::consistency::{ReferenceViolation, scan};
use crate::store::{StoreError, StoreState, TransactionalStore};

/// What kind of resource a lookup failed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    User,
    Club,
    Event,
    Membership,
}

impl core::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            ResourceKind::User => "user",
            ResourceKind::Club => "club",
            ResourceKind::Event => "event",
            ResourceKind::Membership => "membership",
        };
        f.write_str(s)
    }
}

/// Orchestration failure.
///
/// Authorization denial is an expected outcome and carries its reason code;
/// `Consistency` means a dual-write was found half-applied and is the only
/// variant that indicates the system itself is broken.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("forbidden: {}", .reason.message())]
    Denied { reason: DenyReason },

    #[error("{kind} not found: {id}")]
    NotFound { kind: ResourceKind, id: String },

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("invariant violated: {0}")]
    Invariant(String),

    #[error("consistency violation: {0}")]
    Consistency(String),

    #[error("store error: {0}")]
    Store(String),
}

impl ServiceError {
    fn not_found(kind: ResourceKind, id: impl core::fmt::Display) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value.to_string())
    }
}

impl From<DomainError> for ServiceError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) => Self::Validation(msg),
            DomainError::InvalidId(msg) => Self::Validation(msg),
            DomainError::InvariantViolation(msg) => Self::Invariant(msg),
            DomainError::Conflict(msg) => Self::Conflict(msg),
            // Operations resolve every entity before mutating it, so a
            // domain-level NotFound surfacing mid-transaction means a
            // reference pointed at nothing.
            DomainError::NotFound => Self::Consistency("dangling entity reference".to_string()),
        }
    }
}

type ServiceResult<T> = Result<T, ServiceError>;

/// Caller-facing view of one membership: role plus effective capabilities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MembershipSummary {
    pub club_id: ClubId,
    pub is_president: bool,
    pub role: Option<ClubRole>,
    pub capabilities: Vec<clubhub_auth::Capability>,
}

/// The application service: authorized CRUD over users, clubs and events.
///
/// The role-permission table is injected at construction; production wiring
/// passes [`RolePermissionTable::standard`], tests may substitute another.
pub struct AppService<S> {
    store: S,
    table: RolePermissionTable,
}

impl<S: TransactionalStore> AppService<S> {
    pub fn new(store: S, table: RolePermissionTable) -> Self {
        Self { store, table }
    }

    // ── users ────────────────────────────────────────────────────────────

    pub fn register_user(&self, new: NewUser) -> ServiceResult<User> {
        let now = Utc::now();
        self.store.transact(move |state| {
            let user = User::register(UserId::new(), new, now)?;

            if state.users.values().any(|u| u.email == user.email) {
                return Err(ServiceError::Conflict("email already registered".to_string()));
            }

            state.users.insert(user.id, user.clone());
            tracing::info!(user_id = %user.id, "user registered");
            Ok(user)
        })
    }

    pub fn get_user(&self, user_id: UserId) -> ServiceResult<User> {
        self.store.read(|state| {
            state
                .users
                .get(&user_id)
                .cloned()
                .ok_or_else(|| ServiceError::not_found(ResourceKind::User, user_id))
        })
    }

    pub fn user_by_email(&self, email: &str) -> ServiceResult<Option<User>> {
        let email = email.trim().to_lowercase();
        self.store
            .read(|state| Ok(state.users.values().find(|u| u.email == email).cloned()))
    }

    // ── clubs ────────────────────────────────────────────────────────────

    pub fn list_clubs(&self) -> ServiceResult<Vec<Club>> {
        self.store.read(|state| {
            let mut clubs: Vec<Club> = state.clubs.values().cloned().collect();
            clubs.sort_by_key(|c| c.created_at);
            Ok(clubs)
        })
    }

    pub fn get_club(&self, club_id: ClubId) -> ServiceResult<Club> {
        self.store.read(|state| {
            state
                .clubs
                .get(&club_id)
                .cloned()
                .ok_or_else(|| ServiceError::not_found(ResourceKind::Club, club_id))
        })
    }

    /// Found a club. The founder becomes president, sole member, and admin;
    /// both the club record and the founder's membership land in one
    /// transaction.
    pub fn create_club(&self, actor: UserId, attrs: NewClub) -> ServiceResult<Club> {
        let now = Utc::now();
        self.store.transact(move |state| {
            let founder = state
                .users
                .get_mut(&actor)
                .ok_or_else(|| ServiceError::not_found(ResourceKind::User, actor))?;

            let club = Club::new(ClubId::new(), actor, attrs, now)?;
            founder.join_club(club.id, ClubRole::Admin)?;
            state.clubs.insert(club.id, club.clone());

            tracing::info!(club_id = %club.id, president = %actor, "club created");
            Ok(club)
        })
    }

    pub fn update_club(
        &self,
        actor: UserId,
        club_id: ClubId,
        patch: ClubPatch,
    ) -> ServiceResult<Club> {
        self.store.transact(move |state| {
            let club = state
                .clubs
                .get(&club_id)
                .ok_or_else(|| ServiceError::not_found(ResourceKind::Club, club_id))?;
            self.check_club(state, actor, club, ClubAction::UpdateSettings)?;

            let club = state
                .clubs
                .get_mut(&club_id)
                .ok_or_else(|| ServiceError::not_found(ResourceKind::Club, club_id))?;
            club.apply_patch(patch)?;
            Ok(club.clone())
        })
    }

    /// Delete a club and cascade: its events are removed and every member's
    /// membership record is stripped, all in one transaction, so no dangling
    /// `club_id` survives.
    pub fn delete_club(&self, actor: UserId, club_id: ClubId) -> ServiceResult<()> {
        self.store.transact(move |state| {
            let club = state
                .clubs
                .get(&club_id)
                .ok_or_else(|| ServiceError::not_found(ResourceKind::Club, club_id))?
                .clone();
            self.check_club(state, actor, &club, ClubAction::Delete)?;

            for event_id in &club.events {
                state.events.remove(event_id);
            }
            for member_id in &club.members {
                if let Some(member) = state.users.get_mut(member_id)
                    && member.membership_in(club_id).is_some()
                {
                    member.leave_club(club_id)?;
                }
            }
            state.clubs.remove(&club_id);

            tracing::info!(
                %club_id,
                cascaded_events = club.events.len(),
                members = club.members.len(),
                "club deleted"
            );
            Ok(())
        })
    }

    // ── membership ───────────────────────────────────────────────────────

    pub fn invite_member(
        &self,
        actor: UserId,
        club_id: ClubId,
        user_id: UserId,
        role: ClubRole,
    ) -> ServiceResult<()> {
        self.store.transact(move |state| {
            let club = state
                .clubs
                .get(&club_id)
                .ok_or_else(|| ServiceError::not_found(ResourceKind::Club, club_id))?;
            self.check_club(state, actor, club, ClubAction::InviteMembers)?;

            let invitee = state
                .users
                .get_mut(&user_id)
                .ok_or_else(|| ServiceError::not_found(ResourceKind::User, user_id))?;
            invitee.join_club(club_id, role)?;

            let club = state
                .clubs
                .get_mut(&club_id)
                .ok_or_else(|| ServiceError::not_found(ResourceKind::Club, club_id))?;
            club.add_member(user_id)?;

            tracing::info!(%club_id, member = %user_id, role = %role, "member invited");
            Ok(())
        })
    }

    pub fn remove_member(
        &self,
        actor: UserId,
        club_id: ClubId,
        user_id: UserId,
    ) -> ServiceResult<()> {
        self.store.transact(move |state| {
            let club = state
                .clubs
                .get(&club_id)
                .ok_or_else(|| ServiceError::not_found(ResourceKind::Club, club_id))?;
            self.check_club(state, actor, club, ClubAction::RemoveMembers)?;

            if !club.is_member(user_id) {
                return Err(ServiceError::not_found(ResourceKind::Membership, user_id));
            }

            let member = state.users.get_mut(&user_id).ok_or_else(|| {
                ServiceError::Consistency(format!(
                    "club {club_id} lists member {user_id} with no user record"
                ))
            })?;
            member.leave_club(club_id).map_err(|_| {
                ServiceError::Consistency(format!(
                    "club {club_id} lists member {user_id} with no membership record"
                ))
            })?;

            let club = state
                .clubs
                .get_mut(&club_id)
                .ok_or_else(|| ServiceError::not_found(ResourceKind::Club, club_id))?;
            club.remove_member(user_id)?;

            tracing::info!(%club_id, member = %user_id, "member removed");
            Ok(())
        })
    }

    /// Self-service exit. The president cannot leave their own club.
    pub fn leave_club(&self, actor: UserId, club_id: ClubId) -> ServiceResult<()> {
        self.store.transact(move |state| {
            let club = state
                .clubs
                .get_mut(&club_id)
                .ok_or_else(|| ServiceError::not_found(ResourceKind::Club, club_id))?;

            if !club.is_member(actor) {
                return Err(ServiceError::not_found(ResourceKind::Membership, actor));
            }
            club.remove_member(actor)?;

            let user = state
                .users
                .get_mut(&actor)
                .ok_or_else(|| ServiceError::not_found(ResourceKind::User, actor))?;
            user.leave_club(club_id).map_err(|_| {
                ServiceError::Consistency(format!(
                    "club {club_id} lists member {actor} with no membership record"
                ))
            })?;

            Ok(())
        })
    }

    pub fn change_member_role(
        &self,
        actor: UserId,
        club_id: ClubId,
        user_id: UserId,
        role: ClubRole,
    ) -> ServiceResult<()> {
        self.store.transact(move |state| {
            let club = state
                .clubs
                .get(&club_id)
                .ok_or_else(|| ServiceError::not_found(ResourceKind::Club, club_id))?;
            self.check_club(state, actor, club, ClubAction::ManageRoles)?;

            if !club.is_member(user_id) {
                return Err(ServiceError::not_found(ResourceKind::Membership, user_id));
            }

            let member = state
                .users
                .get_mut(&user_id)
                .ok_or_else(|| ServiceError::not_found(ResourceKind::User, user_id))?;
            member.change_club_role(club_id, role).map_err(|_| {
                ServiceError::Consistency(format!(
                    "club {club_id} lists member {user_id} with no membership record"
                ))
            })?;

            tracing::info!(%club_id, member = %user_id, role = %role, "member role changed");
            Ok(())
        })
    }

    pub fn follow_club(&self, actor: UserId, club_id: ClubId) -> ServiceResult<()> {
        self.store.transact(move |state| {
            if !state.users.contains_key(&actor) {
                return Err(ServiceError::not_found(ResourceKind::User, actor));
            }
            let club = state
                .clubs
                .get_mut(&club_id)
                .ok_or_else(|| ServiceError::not_found(ResourceKind::Club, club_id))?;
            club.add_follower(actor)?;
            Ok(())
        })
    }

    pub fn unfollow_club(&self, actor: UserId, club_id: ClubId) -> ServiceResult<()> {
        self.store.transact(move |state| {
            let club = state
                .clubs
                .get_mut(&club_id)
                .ok_or_else(|| ServiceError::not_found(ResourceKind::Club, club_id))?;
            if !club.followers.contains(&actor) {
                return Err(ServiceError::Conflict("not following this club".to_string()));
            }
            club.remove_follower(actor)?;
            Ok(())
        })
    }

    /// The caller's standing in a club: role, presidency, and the capability
    /// set their role grants.
    pub fn membership_summary(
        &self,
        actor: UserId,
        club_id: ClubId,
    ) -> ServiceResult<MembershipSummary> {
        self.store.read(|state| {
            let user = state
                .users
                .get(&actor)
                .ok_or_else(|| ServiceError::not_found(ResourceKind::User, actor))?;
            let club = state
                .clubs
                .get(&club_id)
                .ok_or_else(|| ServiceError::not_found(ResourceKind::Club, club_id))?;

            let role = user.membership_in(club_id).map(|m| m.role);
            let mut capabilities: Vec<_> = role
                .map(|r| self.table.capabilities_for(r).iter().copied().collect())
                .unwrap_or_default();
            capabilities.sort_by_key(|c| c.as_str());

            Ok(MembershipSummary {
                club_id,
                is_president: club.is_president(actor),
                role,
                capabilities,
            })
        })
    }

    // ── events ───────────────────────────────────────────────────────────

    pub fn list_events(&self) -> ServiceResult<Vec<Event>> {
        self.store.read(|state| {
            let mut events: Vec<Event> = state.events.values().cloned().collect();
            events.sort_by_key(|e| e.starts_at);
            Ok(events)
        })
    }

    pub fn get_event(&self, event_id: EventId) -> ServiceResult<Event> {
        self.store.read(|state| {
            state
                .events
                .get(&event_id)
                .cloned()
                .ok_or_else(|| ServiceError::not_found(ResourceKind::Event, event_id))
        })
    }

    /// Schedule an event under a club. The event record and the club's
    /// event-list entry land in one transaction.
    pub fn create_event(&self, actor: UserId, attrs: NewEvent) -> ServiceResult<Event> {
        let now = Utc::now();
        self.store.transact(move |state| {
            let club_id = attrs.club_id;
            let club = state
                .clubs
                .get(&club_id)
                .ok_or_else(|| ServiceError::not_found(ResourceKind::Club, club_id))?;

            let actor_user = state
                .users
                .get(&actor)
                .ok_or_else(|| ServiceError::not_found(ResourceKind::User, actor))?;
            let decision = authorize_event_creation(
                &Self::actor_view(actor_user),
                &club.auth_ref(),
                &self.table,
            );
            Self::require_allowed(decision, actor, "event.create")?;

            let event = Event::new(EventId::new(), actor, attrs, now)?;

            let club = state
                .clubs
                .get_mut(&club_id)
                .ok_or_else(|| ServiceError::not_found(ResourceKind::Club, club_id))?;
            club.link_event(event.id)?;
            state.events.insert(event.id, event.clone());

            tracing::info!(event_id = %event.id, %club_id, creator = %actor, "event created");
            Ok(event)
        })
    }

    pub fn update_event(
        &self,
        actor: UserId,
        event_id: EventId,
        patch: EventPatch,
    ) -> ServiceResult<Event> {
        self.store.transact(move |state| {
            let event = state
                .events
                .get(&event_id)
                .ok_or_else(|| ServiceError::not_found(ResourceKind::Event, event_id))?;
            self.check_event(state, actor, event, EventAction::Edit)?;

            let event = state
                .events
                .get_mut(&event_id)
                .ok_or_else(|| ServiceError::not_found(ResourceKind::Event, event_id))?;
            event.apply_patch(patch)?;
            Ok(event.clone())
        })
    }

    /// Delete an event and unlink it from the owning club in one
    /// transaction. A missing owning club is reported as a consistency
    /// failure rather than leaving the dangling reference in place silently.
    pub fn delete_event(&self, actor: UserId, event_id: EventId) -> ServiceResult<()> {
        self.store.transact(move |state| {
            let event = state
                .events
                .get(&event_id)
                .ok_or_else(|| ServiceError::not_found(ResourceKind::Event, event_id))?
                .clone();
            self.check_event(state, actor, &event, EventAction::Delete)?;

            let club = state.clubs.get_mut(&event.club_id).ok_or_else(|| {
                ServiceError::Consistency(format!(
                    "event {event_id} is owned by missing club {}",
                    event.club_id
                ))
            })?;
            club.unlink_event(event_id)?;
            state.events.remove(&event_id);

            tracing::info!(%event_id, club_id = %event.club_id, "event deleted");
            Ok(())
        })
    }

    pub fn register_for_event(&self, actor: UserId, event_id: EventId) -> ServiceResult<Event> {
        let now = Utc::now();
        self.store.transact(move |state| {
            if !state.users.contains_key(&actor) {
                return Err(ServiceError::not_found(ResourceKind::User, actor));
            }
            let event = state
                .events
                .get_mut(&event_id)
                .ok_or_else(|| ServiceError::not_found(ResourceKind::Event, event_id))?;
            event.register_attendee(actor, now)?;
            Ok(event.clone())
        })
    }

    /// Events the user has registered for, soonest first.
    pub fn my_registrations(&self, actor: UserId) -> ServiceResult<Vec<Event>> {
        self.store.read(|state| {
            if !state.users.contains_key(&actor) {
                return Err(ServiceError::not_found(ResourceKind::User, actor));
            }
            let mut events: Vec<Event> = state
                .events
                .values()
                .filter(|e| e.is_registered(actor))
                .cloned()
                .collect();
            events.sort_by_key(|e| e.starts_at);
            Ok(events)
        })
    }

    // ── maintenance ──────────────────────────────────────────────────────

    /// Scan the store for broken cross-entity references.
    pub fn verify_consistency(&self) -> ServiceResult<Vec<ReferenceViolation>> {
        self.store.read(|state| {
            let violations = scan(state);
            if !violations.is_empty() {
                tracing::error!(count = violations.len(), "reference violations detected");
            }
            Ok::<_, ServiceError>(violations)
        })
    }

    // ── internals ────────────────────────────────────────────────────────

    fn actor_view(user: &User) -> Actor<'_> {
        Actor {
            user_id: user.id,
            platform_role: user.platform_role,
            memberships: &user.memberships,
        }
    }

    fn require_allowed(decision: Decision, actor: UserId, action: &str) -> ServiceResult<()> {
        match decision {
            Decision::Allow(_) => Ok(()),
            Decision::Deny(reason) => {
                tracing::warn!(user = %actor, action, reason = reason.code(), "authorization denied");
                Err(ServiceError::Denied { reason })
            }
        }
    }

    fn check_club(
        &self,
        state: &StoreState,
        actor: UserId,
        club: &Club,
        action: ClubAction,
    ) -> ServiceResult<()> {
        let user = state
            .users
            .get(&actor)
            .ok_or_else(|| ServiceError::not_found(ResourceKind::User, actor))?;
        let decision = authorize_club(&Self::actor_view(user), &club.auth_ref(), action, &self.table);
        Self::require_allowed(decision, actor, "club")
    }

    fn check_event(
        &self,
        state: &StoreState,
        actor: UserId,
        event: &Event,
        action: EventAction,
    ) -> ServiceResult<()> {
        let user = state
            .users
            .get(&actor)
            .ok_or_else(|| ServiceError::not_found(ResourceKind::User, actor))?;
        let decision =
            authorize_event(&Self::actor_view(user), &event.auth_ref(), action, &self.table);
        Self::require_allowed(decision, actor, "event")
    }
}
