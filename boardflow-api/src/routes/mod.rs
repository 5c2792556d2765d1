/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: health check endpoint
/// - `boards`: board CRUD, star toggle, nested detail view
/// - `columns`: column CRUD and reorder
/// - `tasks`: task CRUD, move, assignees, tags, comments, attachments
/// - `members`: board membership management
/// - `notifications`: per-recipient notification feed

pub mod boards;
pub mod columns;
pub mod health;
pub mod members;
pub mod notifications;
pub mod tasks;
