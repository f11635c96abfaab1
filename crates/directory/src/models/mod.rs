//! Domain types.
//!
//! These are the normalized, display-ready shapes handed to the presentation
//! layer, separate from the raw wire types in [`crate::backend`].

pub mod identity;
pub mod member;

pub use identity::{Identity, PREF_CLUB_ID};
pub use member::{MemberRecord, PLACEHOLDER_IMAGE_URL};
