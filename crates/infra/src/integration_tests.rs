//! Service-level tests exercising the full authorize → transact pipeline
//! against the in-memory store.

use chrono::{Duration, Utc};

use clubhub_auth::{Capability, ClubRole, DenyReason, RolePermissionTable};
use clubhub_clubs::{ClubCategory, ClubColors, ClubPatch, ContactInfo, NewClub, SocialLinks};
use clubhub_core::{ClubId, UserId};
use clubhub_events::{EventCategory, EventPatch, NewEvent};
use clubhub_users::{NewUser, User};

use crate::service::{AppService, ResourceKind, ServiceError};
use crate::store::InMemoryStore;

fn service() -> AppService<InMemoryStore> {
    AppService::new(InMemoryStore::new(), RolePermissionTable::standard())
}

fn signup(svc: &AppService<InMemoryStore>, name: &str, email: &str) -> User {
    svc.register_user(NewUser {
        fullname: name.to_string(),
        email: email.to_string(),
        password_hash: "$argon2id$stub".to_string(),
        avatar: None,
    })
    .unwrap()
}

fn club_attrs(name: &str) -> NewClub {
    NewClub {
        name: name.to_string(),
        description: "A club for testing".to_string(),
        category: ClubCategory::Academic,
        logo: None,
        banner: None,
        colors: ClubColors::default(),
        social_links: SocialLinks::default(),
        contact: ContactInfo::default(),
    }
}

fn event_attrs(club_id: ClubId, title: &str) -> NewEvent {
    let starts_at = Utc::now() + Duration::days(3);
    NewEvent {
        club_id,
        title: title.to_string(),
        description: "An event for testing".to_string(),
        starts_at,
        ends_at: starts_at + Duration::hours(2),
        location: "Main Hall".to_string(),
        category: EventCategory::Social,
        image_url: None,
        payment_required: false,
    }
}

/// founder + a second member with the given role, in one club.
fn club_with_member(
    svc: &AppService<InMemoryStore>,
    role: ClubRole,
) -> (UserId, UserId, ClubId) {
    let founder = signup(svc, "Founder", "founder@example.com");
    let member = signup(svc, "Member", "member@example.com");
    let club = svc.create_club(founder.id, club_attrs("Chess Club")).unwrap();
    svc.invite_member(founder.id, club.id, member.id, role).unwrap();
    (founder.id, member.id, club.id)
}

// ── club creation ────────────────────────────────────────────────────────

#[test]
fn create_club_grants_founder_presidency_membership_and_admin() {
    let svc = service();
    let founder = signup(&svc, "Alice", "alice@example.com");

    let club = svc.create_club(founder.id, club_attrs("Chess Club")).unwrap();

    assert_eq!(club.president_id, founder.id);
    assert_eq!(club.members, vec![founder.id]);

    let founder = svc.get_user(founder.id).unwrap();
    let membership = founder.membership_in(club.id).unwrap();
    assert_eq!(membership.role, ClubRole::Admin);
    assert_eq!(
        founder.platform_role,
        clubhub_auth::PlatformRole::ClubMember
    );
}

#[test]
fn create_club_with_missing_founder_is_not_found() {
    let svc = service();
    let err = svc.create_club(UserId::new(), club_attrs("Ghost Club")).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::NotFound {
            kind: ResourceKind::User,
            ..
        }
    ));
}

#[test]
fn create_club_validation_failure_leaves_founder_untouched() {
    let svc = service();
    let founder = signup(&svc, "Alice", "alice@example.com");

    let err = svc.create_club(founder.id, club_attrs("  ")).unwrap_err();

    assert!(matches!(err, ServiceError::Validation(_)));
    let founder = svc.get_user(founder.id).unwrap();
    assert!(founder.memberships.is_empty());
    assert!(svc.list_clubs().unwrap().is_empty());
}

#[test]
fn duplicate_signup_email_is_a_conflict() {
    let svc = service();
    signup(&svc, "Alice", "alice@example.com");

    let err = svc
        .register_user(NewUser {
            fullname: "Other Alice".to_string(),
            email: "Alice@Example.com".to_string(),
            password_hash: "hash".to_string(),
            avatar: None,
        })
        .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));
}

// ── club mutation authorization ──────────────────────────────────────────

#[test]
fn club_settings_update_denied_for_non_members() {
    let svc = service();
    let founder = signup(&svc, "Alice", "alice@example.com");
    let outsider = signup(&svc, "Bob", "bob@example.com");
    let club = svc.create_club(founder.id, club_attrs("Chess Club")).unwrap();

    let err = svc
        .update_club(outsider.id, club.id, ClubPatch::default())
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Denied {
            reason: DenyReason::NotAMember
        }
    ));
}

#[test]
fn club_settings_update_allowed_for_president() {
    let svc = service();
    let founder = signup(&svc, "Alice", "alice@example.com");
    let club = svc.create_club(founder.id, club_attrs("Chess Club")).unwrap();

    let updated = svc
        .update_club(
            founder.id,
            club.id,
            ClubPatch {
                description: Some("Now with blitz nights".to_string()),
                ..ClubPatch::default()
            },
        )
        .unwrap();
    assert_eq!(updated.description, "Now with blitz nights");
}

#[test]
fn non_president_admin_cannot_delete_the_club() {
    let svc = service();
    let (_founder, admin, club_id) = club_with_member(&svc, ClubRole::Admin);

    let err = svc.delete_club(admin, club_id).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Denied {
            reason: DenyReason::NotOwner
        }
    ));
    assert!(svc.get_club(club_id).is_ok());
}

#[test]
fn president_deletes_club_with_full_cascade() {
    let svc = service();
    let (founder, member, club_id) = club_with_member(&svc, ClubRole::Editor);
    let event = svc.create_event(founder, event_attrs(club_id, "Tournament")).unwrap();

    svc.delete_club(founder, club_id).unwrap();

    assert!(matches!(
        svc.get_club(club_id).unwrap_err(),
        ServiceError::NotFound { .. }
    ));
    assert!(matches!(
        svc.get_event(event.id).unwrap_err(),
        ServiceError::NotFound { .. }
    ));
    for user_id in [founder, member] {
        let user = svc.get_user(user_id).unwrap();
        assert!(user.membership_in(club_id).is_none());
    }
    assert!(svc.verify_consistency().unwrap().is_empty());
}

// ── membership orchestration ─────────────────────────────────────────────

#[test]
fn invite_updates_both_club_and_user() {
    let svc = service();
    let (_founder, member, club_id) = club_with_member(&svc, ClubRole::Contributor);

    let club = svc.get_club(club_id).unwrap();
    assert!(club.is_member(member));

    let user = svc.get_user(member).unwrap();
    assert_eq!(user.membership_in(club_id).unwrap().role, ClubRole::Contributor);
    assert!(svc.verify_consistency().unwrap().is_empty());
}

#[test]
fn editor_cannot_invite_members() {
    let svc = service();
    let (_founder, editor, club_id) = club_with_member(&svc, ClubRole::Editor);
    let guest = signup(&svc, "Guest", "guest@example.com");

    let err = svc
        .invite_member(editor, club_id, guest.id, ClubRole::Contributor)
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Denied {
            reason: DenyReason::InsufficientRole
        }
    ));
}

#[test]
fn moderator_can_remove_a_member() {
    let svc = service();
    let (founder, moderator, club_id) = club_with_member(&svc, ClubRole::Moderator);
    let third = signup(&svc, "Third", "third@example.com");
    svc.invite_member(founder, club_id, third.id, ClubRole::Contributor)
        .unwrap();

    svc.remove_member(moderator, club_id, third.id).unwrap();

    assert!(!svc.get_club(club_id).unwrap().is_member(third.id));
    assert!(svc.get_user(third.id).unwrap().membership_in(club_id).is_none());
}

#[test]
fn president_cannot_be_removed_or_leave() {
    let svc = service();
    let (founder, admin, club_id) = club_with_member(&svc, ClubRole::Admin);

    let err = svc.remove_member(admin, club_id, founder).unwrap_err();
    assert!(matches!(err, ServiceError::Invariant(_)));

    let err = svc.leave_club(founder, club_id).unwrap_err();
    assert!(matches!(err, ServiceError::Invariant(_)));
}

#[test]
fn member_can_leave_and_both_sides_update() {
    let svc = service();
    let (_founder, member, club_id) = club_with_member(&svc, ClubRole::Contributor);

    svc.leave_club(member, club_id).unwrap();

    assert!(!svc.get_club(club_id).unwrap().is_member(member));
    assert!(svc.get_user(member).unwrap().membership_in(club_id).is_none());
    assert!(svc.verify_consistency().unwrap().is_empty());
}

#[test]
fn role_changes_require_manage_roles() {
    let svc = service();
    let (founder, moderator, club_id) = club_with_member(&svc, ClubRole::Moderator);

    let err = svc
        .change_member_role(moderator, club_id, moderator, ClubRole::Admin)
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Denied {
            reason: DenyReason::InsufficientRole
        }
    ));

    svc.change_member_role(founder, club_id, moderator, ClubRole::Editor)
        .unwrap();
    assert_eq!(
        svc.get_user(moderator).unwrap().membership_in(club_id).unwrap().role,
        ClubRole::Editor
    );
}

#[test]
fn follow_twice_conflicts_and_unfollow_requires_following() {
    let svc = service();
    let founder = signup(&svc, "Alice", "alice@example.com");
    let fan = signup(&svc, "Fan", "fan@example.com");
    let club = svc.create_club(founder.id, club_attrs("Chess Club")).unwrap();

    svc.follow_club(fan.id, club.id).unwrap();
    assert!(matches!(
        svc.follow_club(fan.id, club.id).unwrap_err(),
        ServiceError::Conflict(_)
    ));

    svc.unfollow_club(fan.id, club.id).unwrap();
    assert!(matches!(
        svc.unfollow_club(fan.id, club.id).unwrap_err(),
        ServiceError::Conflict(_)
    ));
}

#[test]
fn membership_summary_reports_role_and_capabilities() {
    let svc = service();
    let (founder, contributor, club_id) = club_with_member(&svc, ClubRole::Contributor);

    let summary = svc.membership_summary(contributor, club_id).unwrap();
    assert!(!summary.is_president);
    assert_eq!(summary.role, Some(ClubRole::Contributor));
    assert_eq!(summary.capabilities, vec![Capability::CreateEvents]);

    let summary = svc.membership_summary(founder, club_id).unwrap();
    assert!(summary.is_president);
    assert_eq!(summary.capabilities.len(), 9);

    let outsider = signup(&svc, "Out", "out@example.com");
    let summary = svc.membership_summary(outsider.id, club_id).unwrap();
    assert_eq!(summary.role, None);
    assert!(summary.capabilities.is_empty());
}

// ── event orchestration ──────────────────────────────────────────────────

#[test]
fn contributor_can_create_and_mutate_own_event_only() {
    let svc = service();
    let (founder, contributor, club_id) = club_with_member(&svc, ClubRole::Contributor);

    let own = svc
        .create_event(contributor, event_attrs(club_id, "Study Jam"))
        .unwrap();
    let theirs = svc
        .create_event(founder, event_attrs(club_id, "Board Meeting"))
        .unwrap();

    // Own event: edit and delete are granted by authorship.
    svc.update_event(
        contributor,
        own.id,
        EventPatch {
            title: Some("Evening Study Jam".to_string()),
            ..EventPatch::default()
        },
    )
    .unwrap();

    // Someone else's event: contributor lacks editAllEvents/deleteAllEvents.
    let err = svc
        .update_event(contributor, theirs.id, EventPatch::default())
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Denied {
            reason: DenyReason::InsufficientRole
        }
    ));
    let err = svc.delete_event(contributor, theirs.id).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Denied {
            reason: DenyReason::InsufficientRole
        }
    ));

    svc.delete_event(contributor, own.id).unwrap();
}

#[test]
fn admin_can_delete_any_event_in_their_club() {
    let svc = service();
    let (founder, admin, club_id) = club_with_member(&svc, ClubRole::Admin);
    let event = svc.create_event(founder, event_attrs(club_id, "Gala")).unwrap();

    svc.delete_event(admin, event.id).unwrap();
    assert!(matches!(
        svc.get_event(event.id).unwrap_err(),
        ServiceError::NotFound { .. }
    ));
}

#[test]
fn non_member_cannot_create_or_edit_events() {
    let svc = service();
    let founder = signup(&svc, "Alice", "alice@example.com");
    let outsider = signup(&svc, "Bob", "bob@example.com");
    let club = svc.create_club(founder.id, club_attrs("Chess Club")).unwrap();
    let event = svc
        .create_event(founder.id, event_attrs(club.id, "Open Day"))
        .unwrap();

    let err = svc
        .create_event(outsider.id, event_attrs(club.id, "Crash"))
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Denied {
            reason: DenyReason::NotAMember
        }
    ));

    let err = svc
        .update_event(outsider.id, event.id, EventPatch::default())
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Denied {
            reason: DenyReason::NotAMember
        }
    ));
}

#[test]
fn create_then_delete_event_leaves_no_orphan_reference() {
    let svc = service();
    let founder = signup(&svc, "Alice", "alice@example.com");
    let club = svc.create_club(founder.id, club_attrs("Chess Club")).unwrap();

    let event = svc
        .create_event(founder.id, event_attrs(club.id, "Blitz Night"))
        .unwrap();
    assert!(svc.get_club(club.id).unwrap().events.contains(&event.id));

    svc.delete_event(founder.id, event.id).unwrap();

    assert!(matches!(
        svc.get_event(event.id).unwrap_err(),
        ServiceError::NotFound { .. }
    ));
    assert!(!svc.get_club(club.id).unwrap().events.contains(&event.id));
    assert!(svc.verify_consistency().unwrap().is_empty());
}

#[test]
fn failed_event_creation_writes_nothing() {
    let svc = service();
    let founder = signup(&svc, "Alice", "alice@example.com");
    let club = svc.create_club(founder.id, club_attrs("Chess Club")).unwrap();

    let mut attrs = event_attrs(club.id, "Broken");
    attrs.title = "  ".to_string();
    let err = svc.create_event(founder.id, attrs).unwrap_err();

    assert!(matches!(err, ServiceError::Validation(_)));
    assert!(svc.list_events().unwrap().is_empty());
    assert!(svc.get_club(club.id).unwrap().events.is_empty());
}

#[test]
fn event_creation_for_missing_club_is_not_found() {
    let svc = service();
    let founder = signup(&svc, "Alice", "alice@example.com");

    let err = svc
        .create_event(founder.id, event_attrs(ClubId::new(), "Nowhere"))
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::NotFound {
            kind: ResourceKind::Club,
            ..
        }
    ));
}

#[test]
fn duplicate_registration_conflicts_and_keeps_one_entry() {
    let svc = service();
    let founder = signup(&svc, "Alice", "alice@example.com");
    let student = signup(&svc, "Sam", "sam@example.com");
    let club = svc.create_club(founder.id, club_attrs("Chess Club")).unwrap();
    let event = svc
        .create_event(founder.id, event_attrs(club.id, "Open Day"))
        .unwrap();

    svc.register_for_event(student.id, event.id).unwrap();
    let err = svc.register_for_event(student.id, event.id).unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));

    let event = svc.get_event(event.id).unwrap();
    assert_eq!(
        event
            .attendees
            .iter()
            .filter(|r| r.user_id == student.id)
            .count(),
        1
    );

    let mine = svc.my_registrations(student.id).unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].id, event.id);
}

// ── table injection ──────────────────────────────────────────────────────

#[test]
fn substituted_table_still_honors_creator_and_president_clauses() {
    let svc = AppService::new(InMemoryStore::new(), RolePermissionTable::deny_all());
    let founder = signup(&svc, "Alice", "alice@example.com");
    let club = svc.create_club(founder.id, club_attrs("Chess Club")).unwrap();

    // Role capabilities are gone, so even the admin founder cannot create
    // events...
    let err = svc
        .create_event(founder.id, event_attrs(club.id, "Nope"))
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Denied {
            reason: DenyReason::InsufficientRole
        }
    ));

    // ...but president identity still authorizes settings changes.
    svc.update_club(founder.id, club.id, ClubPatch::default()).unwrap();
}
