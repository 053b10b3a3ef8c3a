//! REST API server module.
//!
//! Provides the HTTP boundary: member authentication, health and the
//! project/job/segment resources, all wrapped in a uniform response envelope.

pub mod error;
pub mod middleware;
pub mod models;
pub mod openapi;
pub mod response;
pub mod routes;
pub mod server;

pub use server::{ApiServer, ApiServerConfig, AppState};
