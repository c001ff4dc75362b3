//! `clubhub-auth` — pure authorization boundary.
//!
//! This crate answers one question: does user U have capability C in club K?
//! It is intentionally decoupled from HTTP and storage; callers hand it the
//! acting user's fresh membership list and a reference to the target
//! resource, and get back a first-class `Decision`.

pub mod authorize;
pub mod capability;
pub mod claims;
pub mod membership;
pub mod roles;

pub use authorize::{
    Actor, AllowBasis, ClubAction, ClubRef, Decision, DenyReason, EventAction, EventRef,
    authorize_club, authorize_event, authorize_event_creation,
};
pub use capability::{Capability, RolePermissionTable};
pub use claims::{Hs256JwtValidator, JwtClaims, JwtValidator, TokenError, validate_claims};
pub use membership::{Membership, resolve_membership};
pub use roles::{ClubRole, PlatformRole, UnknownRole};
