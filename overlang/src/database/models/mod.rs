//! Database models for overlang.
//!
//! These models map directly to the database schema.

pub mod job;
pub mod member;
pub mod project;
pub mod segment;

pub use job::*;
pub use member::*;
pub use project::*;
pub use segment::*;
