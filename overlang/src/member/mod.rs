//! Member identity reconciliation.
//!
//! Maps a verified external identity to exactly one local member row.

pub mod service;

pub use service::{MemberService, ReconcileOutcome, resolve_display_name};
