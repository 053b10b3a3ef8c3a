//! Repository layer for database access.
//!
//! Each repository is an `async_trait` so services depend on the trait and
//! tests can substitute in-memory implementations.

pub mod job;
pub mod member;
pub mod project;
pub mod segment;

pub use job::*;
pub use member::*;
pub use project::*;
pub use segment::*;
