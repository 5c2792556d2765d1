/// Task attachment model
///
/// Attachment rows store metadata only; the file bytes live in external
/// blob storage referenced by `file_url`. Deletion is restricted to the
/// uploader or a board owner/admin, checked in the handler against the
/// uploader ID stored here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Attachment metadata row on a task
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskAttachment {
    /// Unique attachment ID
    pub id: Uuid,

    /// Task the attachment belongs to
    pub task_id: Uuid,

    /// Original file name
    pub file_name: String,

    /// Location of the bytes in external storage
    pub file_url: String,

    /// File size in bytes, if known
    pub file_size: Option<i64>,

    /// MIME type, if known
    pub file_type: Option<String>,

    /// User who uploaded the file
    pub uploaded_by: Uuid,

    /// When the attachment was recorded
    pub uploaded_at: DateTime<Utc>,
}

/// Input for recording a new attachment
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAttachment {
    /// Original file name
    pub file_name: String,

    /// Location of the bytes in external storage
    pub file_url: String,

    /// File size in bytes, if known
    pub file_size: Option<i64>,

    /// MIME type, if known
    pub file_type: Option<String>,
}

impl TaskAttachment {
    /// Records attachment metadata on a task
    pub async fn create(
        pool: &PgPool,
        task_id: Uuid,
        data: CreateAttachment,
        uploaded_by: Uuid,
    ) -> Result<Self, sqlx::Error> {
        let attachment = sqlx::query_as::<_, TaskAttachment>(
            r#"
            INSERT INTO task_attachments (task_id, file_name, file_url, file_size, file_type, uploaded_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, task_id, file_name, file_url, file_size, file_type,
                      uploaded_by, uploaded_at
            "#,
        )
        .bind(task_id)
        .bind(data.file_name)
        .bind(data.file_url)
        .bind(data.file_size)
        .bind(data.file_type)
        .bind(uploaded_by)
        .fetch_one(pool)
        .await?;

        Ok(attachment)
    }

    /// Finds an attachment by ID, scoped to its task
    pub async fn find(
        pool: &PgPool,
        task_id: Uuid,
        attachment_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let attachment = sqlx::query_as::<_, TaskAttachment>(
            r#"
            SELECT id, task_id, file_name, file_url, file_size, file_type,
                   uploaded_by, uploaded_at
            FROM task_attachments
            WHERE id = $1 AND task_id = $2
            "#,
        )
        .bind(attachment_id)
        .bind(task_id)
        .fetch_optional(pool)
        .await?;

        Ok(attachment)
    }

    /// Lists a task's attachments, oldest first
    pub async fn list_by_task(pool: &PgPool, task_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let attachments = sqlx::query_as::<_, TaskAttachment>(
            r#"
            SELECT id, task_id, file_name, file_url, file_size, file_type,
                   uploaded_by, uploaded_at
            FROM task_attachments
            WHERE task_id = $1
            ORDER BY uploaded_at ASC
            "#,
        )
        .bind(task_id)
        .fetch_all(pool)
        .await?;

        Ok(attachments)
    }

    /// Deletes an attachment row; external bytes are not touched here
    pub async fn delete(pool: &PgPool, attachment_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM task_attachments WHERE id = $1")
            .bind(attachment_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
