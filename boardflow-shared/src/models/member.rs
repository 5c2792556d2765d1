/// Board membership model and database operations
///
/// Implements the many-to-many relationship between users and boards with
/// per-board roles. Every board-scoped permission check resolves through
/// this table.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE board_role AS ENUM ('owner', 'admin', 'member');
///
/// CREATE TABLE board_members (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     board_id UUID NOT NULL REFERENCES boards(id) ON DELETE CASCADE,
///     user_id UUID NOT NULL REFERENCES profiles(id) ON DELETE CASCADE,
///     role board_role NOT NULL DEFAULT 'member',
///     joined_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     UNIQUE (board_id, user_id)
/// );
/// ```
///
/// # Roles
///
/// - **owner**: delete the board, change roles, remove members, everything below
/// - **admin**: manage columns, tasks, and member additions
/// - **member**: create tasks, comment, attach, star
///
/// The role set is deliberately not a strict ladder: task updates also
/// admit the task's assignees regardless of role, and member removal is
/// owner-only even though admins may add members. Operations therefore
/// authorize against explicit role sets rather than a ranking.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Per-board role of a member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "board_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BoardRole {
    /// Full control, including board deletion and role management
    Owner,

    /// Can manage columns, tasks, and add members
    Admin,

    /// Can create tasks, comment, and attach files
    Member,
}

impl BoardRole {
    /// Converts role to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            BoardRole::Owner => "owner",
            BoardRole::Admin => "admin",
            BoardRole::Member => "member",
        }
    }
}

/// Role set for operations restricted to the board owner
pub const OWNER_ONLY: &[BoardRole] = &[BoardRole::Owner];

/// Role set for board/column/task management operations
pub const MANAGERS: &[BoardRole] = &[BoardRole::Owner, BoardRole::Admin];

/// Role set admitting every member of the board
pub const ANY_MEMBER: &[BoardRole] = &[BoardRole::Owner, BoardRole::Admin, BoardRole::Member];

/// Membership row linking a user to a board with a role
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BoardMember {
    /// Membership row ID
    pub id: Uuid,

    /// Board this membership belongs to
    pub board_id: Uuid,

    /// Member's user ID
    pub user_id: Uuid,

    /// Role within the board
    pub role: BoardRole,

    /// When the user joined the board
    pub joined_at: DateTime<Utc>,
}

/// Membership row joined with the member's profile, for member listings
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct BoardMemberProfile {
    /// Membership row ID
    pub id: Uuid,

    /// Member's user ID
    pub user_id: Uuid,

    /// Role within the board
    pub role: BoardRole,

    /// When the user joined the board
    pub joined_at: DateTime<Utc>,

    /// Display name from the profile store
    pub full_name: Option<String>,

    /// Email from the profile store
    pub email: String,

    /// Avatar URL from the profile store
    pub avatar_url: Option<String>,
}

impl BoardMember {
    /// Adds a user to a board with the given role
    ///
    /// # Errors
    ///
    /// Returns a unique-constraint violation if the user is already a
    /// member, or a foreign-key violation if board or user do not exist.
    pub async fn create(
        pool: &PgPool,
        board_id: Uuid,
        user_id: Uuid,
        role: BoardRole,
    ) -> Result<Self, sqlx::Error> {
        let member = sqlx::query_as::<_, BoardMember>(
            r#"
            INSERT INTO board_members (board_id, user_id, role)
            VALUES ($1, $2, $3)
            RETURNING id, board_id, user_id, role, joined_at
            "#,
        )
        .bind(board_id)
        .bind(user_id)
        .bind(role)
        .fetch_one(pool)
        .await?;

        Ok(member)
    }

    /// Finds a specific membership by board and user
    pub async fn find(
        pool: &PgPool,
        board_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let member = sqlx::query_as::<_, BoardMember>(
            r#"
            SELECT id, board_id, user_id, role, joined_at
            FROM board_members
            WHERE board_id = $1 AND user_id = $2
            "#,
        )
        .bind(board_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(member)
    }

    /// Gets a user's role on a board, if they are a member
    pub async fn get_role(
        pool: &PgPool,
        board_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<BoardRole>, sqlx::Error> {
        let role: Option<BoardRole> = sqlx::query_scalar(
            r#"
            SELECT role FROM board_members
            WHERE board_id = $1 AND user_id = $2
            "#,
        )
        .bind(board_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(role)
    }

    /// Checks if a user belongs to a board (any role)
    pub async fn is_member(
        pool: &PgPool,
        board_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM board_members
                WHERE board_id = $1 AND user_id = $2
            )
            "#,
        )
        .bind(board_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    /// Updates a member's role
    ///
    /// Returns the updated membership, or `None` if no such membership
    /// exists.
    pub async fn update_role(
        pool: &PgPool,
        board_id: Uuid,
        user_id: Uuid,
        role: BoardRole,
    ) -> Result<Option<Self>, sqlx::Error> {
        let member = sqlx::query_as::<_, BoardMember>(
            r#"
            UPDATE board_members
            SET role = $3
            WHERE board_id = $1 AND user_id = $2
            RETURNING id, board_id, user_id, role, joined_at
            "#,
        )
        .bind(board_id)
        .bind(user_id)
        .bind(role)
        .fetch_optional(pool)
        .await?;

        Ok(member)
    }

    /// Removes a user from a board
    ///
    /// Returns true if a membership row was deleted.
    pub async fn delete(pool: &PgPool, board_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM board_members WHERE board_id = $1 AND user_id = $2")
            .bind(board_id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists all members of a board with their profiles
    pub async fn list_with_profiles(
        pool: &PgPool,
        board_id: Uuid,
    ) -> Result<Vec<BoardMemberProfile>, sqlx::Error> {
        let members = sqlx::query_as::<_, BoardMemberProfile>(
            r#"
            SELECT m.id, m.user_id, m.role, m.joined_at,
                   p.full_name, p.email, p.avatar_url
            FROM board_members m
            JOIN profiles p ON p.id = m.user_id
            WHERE m.board_id = $1
            ORDER BY m.joined_at ASC
            "#,
        )
        .bind(board_id)
        .fetch_all(pool)
        .await?;

        Ok(members)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_role_as_str() {
        assert_eq!(BoardRole::Owner.as_str(), "owner");
        assert_eq!(BoardRole::Admin.as_str(), "admin");
        assert_eq!(BoardRole::Member.as_str(), "member");
    }

    #[test]
    fn test_role_sets() {
        assert!(OWNER_ONLY.contains(&BoardRole::Owner));
        assert!(!OWNER_ONLY.contains(&BoardRole::Admin));

        assert!(MANAGERS.contains(&BoardRole::Admin));
        assert!(!MANAGERS.contains(&BoardRole::Member));

        assert!(ANY_MEMBER.contains(&BoardRole::Member));
    }

    #[test]
    fn test_role_serde_lowercase() {
        let json = serde_json::to_string(&BoardRole::Admin).unwrap();
        assert_eq!(json, "\"admin\"");

        let role: BoardRole = serde_json::from_str("\"owner\"").unwrap();
        assert_eq!(role, BoardRole::Owner);
    }
}
