//! # Boardflow Shared Library
//!
//! Shared domain logic for the Boardflow Kanban backend: database models,
//! board access control, positional ordering, and notification dispatch.
//!
//! ## Module Organization
//!
//! - `models`: database models and their CRUD operations
//! - `auth`: bearer token verification and board access control
//! - `ordering`: dense zero-based position maintenance for columns/tasks
//! - `notify`: fire-and-forget notification dispatch
//! - `db`: connection pool and migration utilities

pub mod auth;
pub mod db;
pub mod models;
pub mod notify;
pub mod ordering;

/// Current version of the Boardflow shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
