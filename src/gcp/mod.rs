//! GCP API surface
//!
//! Authentication, HTTP plumbing, and the project listing. Everything here
//! is read-only.

pub mod auth;
pub mod client;
pub mod http;
pub mod projects;
