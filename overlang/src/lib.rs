//! overlang backend library crate.
//!
//! Exposes the service layers so the binary and integration tests share them.

pub mod api;
pub mod database;
pub mod error;
pub mod identity;
pub mod logging;
pub mod member;
pub mod utils;

pub use error::{Error, Result};
