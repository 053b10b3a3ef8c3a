//! API middleware.
//!
//! Request extractors that authenticate callers.

pub mod identity;

pub use identity::{CurrentMember, VerifiedCaller};
