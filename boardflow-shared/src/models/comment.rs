/// Task comment model
///
/// Comments are append-only children of a task. Deletion is restricted to
/// the comment author or a board owner/admin; that check happens in the
/// handler against the author ID stored here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Comment row on a task
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskComment {
    /// Unique comment ID
    pub id: Uuid,

    /// Task the comment belongs to
    pub task_id: Uuid,

    /// Comment author
    pub user_id: Uuid,

    /// Comment text
    pub content: String,

    /// When the comment was written
    pub created_at: DateTime<Utc>,
}

/// Comment joined with the author's profile, for detail views
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CommentWithAuthor {
    /// Unique comment ID
    pub id: Uuid,

    /// Comment author
    pub user_id: Uuid,

    /// Comment text
    pub content: String,

    /// When the comment was written
    pub created_at: DateTime<Utc>,

    /// Author display name
    pub full_name: Option<String>,

    /// Author avatar URL
    pub avatar_url: Option<String>,
}

impl TaskComment {
    /// Adds a comment to a task
    pub async fn create(
        pool: &PgPool,
        task_id: Uuid,
        user_id: Uuid,
        content: &str,
    ) -> Result<Self, sqlx::Error> {
        let comment = sqlx::query_as::<_, TaskComment>(
            r#"
            INSERT INTO task_comments (task_id, user_id, content)
            VALUES ($1, $2, $3)
            RETURNING id, task_id, user_id, content, created_at
            "#,
        )
        .bind(task_id)
        .bind(user_id)
        .bind(content)
        .fetch_one(pool)
        .await?;

        Ok(comment)
    }

    /// Finds a comment by ID, scoped to its task
    pub async fn find(
        pool: &PgPool,
        task_id: Uuid,
        comment_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let comment = sqlx::query_as::<_, TaskComment>(
            r#"
            SELECT id, task_id, user_id, content, created_at
            FROM task_comments
            WHERE id = $1 AND task_id = $2
            "#,
        )
        .bind(comment_id)
        .bind(task_id)
        .fetch_optional(pool)
        .await?;

        Ok(comment)
    }

    /// Lists a task's comments with author profiles, oldest first
    pub async fn list_with_authors(
        pool: &PgPool,
        task_id: Uuid,
    ) -> Result<Vec<CommentWithAuthor>, sqlx::Error> {
        let comments = sqlx::query_as::<_, CommentWithAuthor>(
            r#"
            SELECT c.id, c.user_id, c.content, c.created_at,
                   p.full_name, p.avatar_url
            FROM task_comments c
            JOIN profiles p ON p.id = c.user_id
            WHERE c.task_id = $1
            ORDER BY c.created_at ASC
            "#,
        )
        .bind(task_id)
        .fetch_all(pool)
        .await?;

        Ok(comments)
    }

    /// Deletes a comment
    pub async fn delete(pool: &PgPool, comment_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM task_comments WHERE id = $1")
            .bind(comment_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
