/// Database models for Boardflow
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `profile`: read-only mirror of the identity service's users
/// - `board`: top-level workspaces, plus the nested detail view
/// - `member`: board membership with per-board roles
/// - `column`: ordered lanes within a board
/// - `task`: cards within a column, with assignee and tag relations
/// - `comment`: append-only task comments
/// - `attachment`: task attachment metadata (bytes live externally)
/// - `notification`: per-recipient event records

pub mod attachment;
pub mod board;
pub mod column;
pub mod comment;
pub mod member;
pub mod notification;
pub mod profile;
pub mod task;
