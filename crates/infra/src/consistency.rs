//! Cross-entity reference checking.
//!
//! The club↔event and user↔club back-references are maintained inside single
//! transactions, but a buggy backend or an operator edit can still break
//! them. This scan makes such breakage detectable and reportable instead of
//! silent.

use serde::Serialize;
use thiserror::Error;

use clubhub_core::{ClubId, EventId, UserId};

use crate::store::StoreState;

/// One broken reference between two entities.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReferenceViolation {
    #[error("club {club_id} lists event {event_id}, which does not exist")]
    ClubEventMissing { club_id: ClubId, event_id: EventId },

    #[error("event {event_id} is owned by club {club_id}, which does not exist")]
    EventClubMissing { event_id: EventId, club_id: ClubId },

    #[error("event {event_id} is missing from the event list of club {club_id}")]
    EventNotLinked { event_id: EventId, club_id: ClubId },

    #[error("user {user_id} holds a membership in club {club_id}, which does not exist")]
    MembershipClubMissing { user_id: UserId, club_id: ClubId },

    #[error("user {user_id} holds a membership in club {club_id} but is not in its member list")]
    MembershipNotInMembers { user_id: UserId, club_id: ClubId },

    #[error("club {club_id} lists member {user_id} without a matching membership record")]
    MemberWithoutMembership { club_id: ClubId, user_id: UserId },

    #[error("president of club {club_id} is not in its member list")]
    PresidentNotMember { club_id: ClubId },
}

/// Scan the whole store for broken references.
pub fn scan(state: &StoreState) -> Vec<ReferenceViolation> {
    let mut violations = Vec::new();

    for club in state.clubs.values() {
        if !club.members.contains(&club.president_id) {
            violations.push(ReferenceViolation::PresidentNotMember { club_id: club.id });
        }

        for event_id in &club.events {
            if !state.events.contains_key(event_id) {
                violations.push(ReferenceViolation::ClubEventMissing {
                    club_id: club.id,
                    event_id: *event_id,
                });
            }
        }

        for member_id in &club.members {
            let has_membership = state
                .users
                .get(member_id)
                .is_some_and(|u| u.membership_in(club.id).is_some());
            if !has_membership {
                violations.push(ReferenceViolation::MemberWithoutMembership {
                    club_id: club.id,
                    user_id: *member_id,
                });
            }
        }
    }

    for event in state.events.values() {
        match state.clubs.get(&event.club_id) {
            None => violations.push(ReferenceViolation::EventClubMissing {
                event_id: event.id,
                club_id: event.club_id,
            }),
            Some(club) if !club.events.contains(&event.id) => {
                violations.push(ReferenceViolation::EventNotLinked {
                    event_id: event.id,
                    club_id: event.club_id,
                });
            }
            Some(_) => {}
        }
    }

    for user in state.users.values() {
        for membership in &user.memberships {
            match state.clubs.get(&membership.club_id) {
                None => violations.push(ReferenceViolation::MembershipClubMissing {
                    user_id: user.id,
                    club_id: membership.club_id,
                }),
                Some(club) if !club.is_member(user.id) => {
                    violations.push(ReferenceViolation::MembershipNotInMembers {
                        user_id: user.id,
                        club_id: membership.club_id,
                    });
                }
                Some(_) => {}
            }
        }
    }

    violations
}
