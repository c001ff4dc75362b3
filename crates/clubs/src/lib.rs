//! `clubhub-clubs` — clubs and their member/follower/event reference sets.

pub mod club;

pub use club::{Club, ClubCategory, ClubColors, ClubPatch, ContactInfo, NewClub, SocialLinks};
