/// Notification model and database operations
///
/// Notifications are system-generated records describing events that
/// happened on a board (assignment, completion, comments, membership
/// changes). They are written by the dispatcher as a fire-and-forget side
/// effect and read back only by their recipient, who may mark them read
/// or delete them.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE notifications (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES profiles(id) ON DELETE CASCADE,
///     board_id UUID NOT NULL REFERENCES boards(id) ON DELETE CASCADE,
///     title VARCHAR(255) NOT NULL,
///     message TEXT NOT NULL,
///     type VARCHAR(32) NOT NULL DEFAULT 'info',
///     action_url VARCHAR(1024),
///     read BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Notification row delivered to a single recipient
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Notification {
    /// Unique notification ID
    pub id: Uuid,

    /// Recipient user ID
    pub user_id: Uuid,

    /// Board the event happened on
    pub board_id: Uuid,

    /// Short headline
    pub title: String,

    /// Human-readable message
    pub message: String,

    /// Display kind ("info", "success", ...)
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: String,

    /// Deep link into the frontend
    pub action_url: Option<String>,

    /// Whether the recipient has read it
    pub read: bool,

    /// When the notification was created
    pub created_at: DateTime<Utc>,
}

/// Notification joined with its board title, for the feed listing
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct NotificationFeedItem {
    /// Unique notification ID
    pub id: Uuid,

    /// Recipient user ID
    pub user_id: Uuid,

    /// Board the event happened on
    pub board_id: Uuid,

    /// Short headline
    pub title: String,

    /// Human-readable message
    pub message: String,

    /// Display kind ("info", "success", ...)
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: String,

    /// Deep link into the frontend
    pub action_url: Option<String>,

    /// Whether the recipient has read it
    pub read: bool,

    /// When the notification was created
    pub created_at: DateTime<Utc>,

    /// Title of the board the event happened on
    pub board_title: String,
}

/// Input for persisting a new notification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewNotification {
    /// Recipient user ID
    pub user_id: Uuid,

    /// Board the event happened on
    pub board_id: Uuid,

    /// Short headline
    pub title: String,

    /// Human-readable message
    pub message: String,

    /// Display kind ("info", "success", ...)
    pub kind: String,

    /// Deep link into the frontend
    pub action_url: Option<String>,
}

impl Notification {
    /// Persists a batch of notifications
    ///
    /// Used by the dispatcher; a single event can fan out to several
    /// recipients.
    pub async fn insert_many(
        pool: &PgPool,
        notifications: &[NewNotification],
    ) -> Result<(), sqlx::Error> {
        for n in notifications {
            sqlx::query(
                r#"
                INSERT INTO notifications (user_id, board_id, title, message, type, action_url)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(n.user_id)
            .bind(n.board_id)
            .bind(&n.title)
            .bind(&n.message)
            .bind(&n.kind)
            .bind(&n.action_url)
            .execute(pool)
            .await?;
        }

        Ok(())
    }

    /// Lists a user's notifications, newest first, with board titles
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: Uuid,
    ) -> Result<Vec<NotificationFeedItem>, sqlx::Error> {
        let notifications = sqlx::query_as::<_, NotificationFeedItem>(
            r#"
            SELECT n.id, n.user_id, n.board_id, n.title, n.message, n.type,
                   n.action_url, n.read, n.created_at, b.title AS board_title
            FROM notifications n
            JOIN boards b ON b.id = n.board_id
            WHERE n.user_id = $1
            ORDER BY n.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(notifications)
    }

    /// Marks one notification read, scoped to its recipient
    ///
    /// Returns `None` if the notification does not exist or belongs to
    /// someone else; both cases read the same from outside.
    pub async fn mark_read(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let notification = sqlx::query_as::<_, Notification>(
            r#"
            UPDATE notifications
            SET read = TRUE
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, board_id, title, message, type, action_url, read, created_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(notification)
    }

    /// Marks every notification of a user as read
    pub async fn mark_all_read(pool: &PgPool, user_id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("UPDATE notifications SET read = TRUE WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Deletes one notification, scoped to its recipient
    pub async fn delete(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
