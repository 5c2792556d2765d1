/// Column model and database operations
///
/// Columns are the ordered lanes of a board. Their `position` field is
/// dense and zero-based per board; the ordering module owns every write
/// that changes it (append, re-sequence, reorder). Board membership
/// checks resolve through `board_id`, which child tasks reach
/// transitively via [`Column::board_id_of`].
///
/// # Schema
///
/// ```sql
/// CREATE TABLE columns (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     board_id UUID NOT NULL REFERENCES boards(id) ON DELETE CASCADE,
///     title VARCHAR(255) NOT NULL,
///     color VARCHAR(32) NOT NULL DEFAULT '#6B7280',
///     position INTEGER NOT NULL DEFAULT 0,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Default lane color when the caller does not pick one
pub const DEFAULT_COLUMN_COLOR: &str = "#6B7280";

/// Column model representing one lane of a board
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Column {
    /// Unique column ID
    pub id: Uuid,

    /// Board this column belongs to
    pub board_id: Uuid,

    /// Column title
    pub title: String,

    /// Display color (hex)
    pub color: String,

    /// Zero-based rank among the board's columns
    pub position: i32,

    /// When the column was created
    pub created_at: DateTime<Utc>,

    /// When the column was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new column
#[derive(Debug, Clone, Deserialize)]
pub struct CreateColumn {
    /// Board to create the column on
    pub board_id: Uuid,

    /// Column title
    pub title: String,

    /// Optional display color; defaults to [`DEFAULT_COLUMN_COLOR`]
    pub color: Option<String>,
}

/// Partial update of a column; only provided fields change
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateColumn {
    /// New title
    pub title: Option<String>,

    /// New display color
    pub color: Option<String>,
}

impl Column {
    /// Creates a column at the given position
    ///
    /// The position is computed by the caller; append = current sibling
    /// count.
    pub async fn create(
        pool: &PgPool,
        data: CreateColumn,
        position: i32,
    ) -> Result<Self, sqlx::Error> {
        let column = sqlx::query_as::<_, Column>(
            r#"
            INSERT INTO columns (board_id, title, color, position)
            VALUES ($1, $2, $3, $4)
            RETURNING id, board_id, title, color, position, created_at, updated_at
            "#,
        )
        .bind(data.board_id)
        .bind(data.title)
        .bind(data.color.unwrap_or_else(|| DEFAULT_COLUMN_COLOR.to_string()))
        .bind(position)
        .fetch_one(pool)
        .await?;

        Ok(column)
    }

    /// Finds a column by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let column = sqlx::query_as::<_, Column>(
            r#"
            SELECT id, board_id, title, color, position, created_at, updated_at
            FROM columns
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(column)
    }

    /// Resolves the board a column belongs to
    ///
    /// Tasks resolve their effective board through their parent column
    /// with this lookup before any permission check.
    pub async fn board_id_of(pool: &PgPool, column_id: Uuid) -> Result<Option<Uuid>, sqlx::Error> {
        let board_id: Option<Uuid> =
            sqlx::query_scalar("SELECT board_id FROM columns WHERE id = $1")
                .bind(column_id)
                .fetch_optional(pool)
                .await?;

        Ok(board_id)
    }

    /// Lists a board's columns in position order
    pub async fn list_by_board(pool: &PgPool, board_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let columns = sqlx::query_as::<_, Column>(
            r#"
            SELECT id, board_id, title, color, position, created_at, updated_at
            FROM columns
            WHERE board_id = $1
            ORDER BY position ASC
            "#,
        )
        .bind(board_id)
        .fetch_all(pool)
        .await?;

        Ok(columns)
    }

    /// Applies a partial update; only provided fields change
    ///
    /// Returns the updated column, or `None` if it no longer exists.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateColumn,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE columns SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.color.is_some() {
            bind_count += 1;
            query.push_str(&format!(", color = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, board_id, title, color, position, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Column>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(color) = data.color {
            q = q.bind(color);
        }

        let column = q.fetch_optional(pool).await?;

        Ok(column)
    }

    /// Deletes a column; tasks cascade at the database level
    ///
    /// The caller re-sequences the board's remaining columns afterwards.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM columns WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
