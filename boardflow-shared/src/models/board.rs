/// Board model and database operations
///
/// Boards are the top-level workspace entity. Creating a board also
/// creates the owner membership for the creator in the same transaction,
/// so a board can never exist without exactly one owner.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE boards (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     color VARCHAR(32) NOT NULL DEFAULT '#3B82F6',
///     priority VARCHAR(32) NOT NULL DEFAULT 'medium',
///     is_starred BOOLEAN NOT NULL DEFAULT FALSE,
///     created_by UUID NOT NULL REFERENCES profiles(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::column::Column;
use super::member::{BoardMember, BoardMemberProfile, BoardRole};
use super::task::{Task, TaskAssignee};

/// Default board color when the caller does not pick one
pub const DEFAULT_BOARD_COLOR: &str = "#3B82F6";

/// Board model representing a workspace of columns and tasks
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Board {
    /// Unique board ID
    pub id: Uuid,

    /// Board title
    pub title: String,

    /// Longer description
    pub description: Option<String>,

    /// Display color (hex)
    pub color: String,

    /// Priority label (free text, defaults to "medium")
    pub priority: String,

    /// Starred flag, toggled by members
    pub is_starred: bool,

    /// User who created the board (the owner)
    pub created_by: Uuid,

    /// When the board was created
    pub created_at: DateTime<Utc>,

    /// When the board was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new board
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBoard {
    /// Board title
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Optional display color; defaults to [`DEFAULT_BOARD_COLOR`]
    pub color: Option<String>,

    /// Optional priority; defaults to "medium"
    pub priority: Option<String>,
}

/// Partial update of a board; only provided fields change
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBoard {
    /// New title
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New display color
    pub color: Option<String>,

    /// New priority label
    pub priority: Option<String>,

    /// New starred flag
    pub is_starred: Option<bool>,
}

/// Board annotated with the requesting user's membership, for listings
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct BoardSummary {
    /// Unique board ID
    pub id: Uuid,

    /// Board title
    pub title: String,

    /// Longer description
    pub description: Option<String>,

    /// Display color (hex)
    pub color: String,

    /// Priority label
    pub priority: String,

    /// Starred flag
    pub is_starred: bool,

    /// User who created the board
    pub created_by: Uuid,

    /// When the board was created
    pub created_at: DateTime<Utc>,

    /// When the board was last updated
    pub updated_at: DateTime<Utc>,

    /// The requesting user's role on this board
    pub role: BoardRole,

    /// When the requesting user joined this board
    pub joined_at: DateTime<Utc>,
}

/// Task with its assignees and tags, nested inside a board detail view
#[derive(Debug, Clone, Serialize)]
pub struct TaskCard {
    /// The task row
    #[serde(flatten)]
    pub task: Task,

    /// Current assignees
    pub assignees: Vec<TaskAssignee>,

    /// Attached tags
    pub tags: Vec<String>,
}

/// Column with its tasks, nested inside a board detail view
#[derive(Debug, Clone, Serialize)]
pub struct ColumnDetail {
    /// The column row
    #[serde(flatten)]
    pub column: Column,

    /// Tasks in position order
    pub tasks: Vec<TaskCard>,
}

/// Fully nested board view: columns with tasks, members with profiles
#[derive(Debug, Clone, Serialize)]
pub struct BoardDetail {
    /// The board row
    #[serde(flatten)]
    pub board: Board,

    /// Columns in position order, each with its tasks
    pub columns: Vec<ColumnDetail>,

    /// Members with joined profiles
    pub members: Vec<BoardMemberProfile>,
}

impl Board {
    /// Creates a board and its owner membership in one transaction
    pub async fn create(
        pool: &PgPool,
        data: CreateBoard,
        created_by: Uuid,
    ) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let board = sqlx::query_as::<_, Board>(
            r#"
            INSERT INTO boards (title, description, color, priority, created_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, description, color, priority, is_starred,
                      created_by, created_at, updated_at
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(data.color.unwrap_or_else(|| DEFAULT_BOARD_COLOR.to_string()))
        .bind(data.priority.unwrap_or_else(|| "medium".to_string()))
        .bind(created_by)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO board_members (board_id, user_id, role) VALUES ($1, $2, $3)")
            .bind(board.id)
            .bind(created_by)
            .bind(BoardRole::Owner)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(board)
    }

    /// Finds a board by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let board = sqlx::query_as::<_, Board>(
            r#"
            SELECT id, title, description, color, priority, is_starred,
                   created_by, created_at, updated_at
            FROM boards
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(board)
    }

    /// Lists every board the user is a member of, with their role
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: Uuid,
    ) -> Result<Vec<BoardSummary>, sqlx::Error> {
        let boards = sqlx::query_as::<_, BoardSummary>(
            r#"
            SELECT b.id, b.title, b.description, b.color, b.priority, b.is_starred,
                   b.created_by, b.created_at, b.updated_at, m.role, m.joined_at
            FROM boards b
            JOIN board_members m ON m.board_id = b.id
            WHERE m.user_id = $1
            ORDER BY b.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(boards)
    }

    /// Applies a partial update; only provided fields change
    ///
    /// Returns the updated board, or `None` if it no longer exists.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateBoard,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE boards SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.color.is_some() {
            bind_count += 1;
            query.push_str(&format!(", color = ${}", bind_count));
        }
        if data.priority.is_some() {
            bind_count += 1;
            query.push_str(&format!(", priority = ${}", bind_count));
        }
        if data.is_starred.is_some() {
            bind_count += 1;
            query.push_str(&format!(", is_starred = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, title, description, color, priority, is_starred, \
             created_by, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Board>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(color) = data.color {
            q = q.bind(color);
        }
        if let Some(priority) = data.priority {
            q = q.bind(priority);
        }
        if let Some(is_starred) = data.is_starred {
            q = q.bind(is_starred);
        }

        let board = q.fetch_optional(pool).await?;

        Ok(board)
    }

    /// Deletes a board; members, columns, and tasks cascade
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM boards WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Flips the starred flag and returns the updated board
    pub async fn toggle_star(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let board = sqlx::query_as::<_, Board>(
            r#"
            UPDATE boards
            SET is_starred = NOT is_starred,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, description, color, priority, is_starred,
                      created_by, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(board)
    }

    /// Assembles the fully nested detail view
    ///
    /// Columns and tasks come back in position order; assignees and tags
    /// are batch-fetched for all tasks in two round trips rather than one
    /// query per task.
    pub async fn fetch_detail(pool: &PgPool, id: Uuid) -> Result<Option<BoardDetail>, sqlx::Error> {
        let Some(board) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };

        let columns = Column::list_by_board(pool, id).await?;
        let column_ids: Vec<Uuid> = columns.iter().map(|c| c.id).collect();

        let tasks: Vec<Task> = if column_ids.is_empty() {
            Vec::new()
        } else {
            sqlx::query_as::<_, Task>(
                r#"
                SELECT id, column_id, title, description, priority, status, due_date,
                       created_by, position, created_at, updated_at
                FROM tasks
                WHERE column_id = ANY($1)
                ORDER BY position ASC
                "#,
            )
            .bind(&column_ids)
            .fetch_all(pool)
            .await?
        };

        let task_ids: Vec<Uuid> = tasks.iter().map(|t| t.id).collect();

        let assignees = Task::assignees_for_tasks(pool, &task_ids).await?;
        let tags = Task::tags_for_tasks(pool, &task_ids).await?;

        let cards: Vec<TaskCard> = tasks
            .into_iter()
            .map(|task| {
                let task_assignees = assignees
                    .iter()
                    .filter(|a| a.task_id == task.id)
                    .cloned()
                    .collect();
                let task_tags = tags
                    .iter()
                    .filter(|t| t.task_id == task.id)
                    .map(|t| t.tag.clone())
                    .collect();
                TaskCard {
                    task,
                    assignees: task_assignees,
                    tags: task_tags,
                }
            })
            .collect();

        let columns = columns
            .into_iter()
            .map(|column| {
                let tasks = cards
                    .iter()
                    .filter(|card| card.task.column_id == column.id)
                    .cloned()
                    .collect();
                ColumnDetail { column, tasks }
            })
            .collect();

        let members = BoardMember::list_with_profiles(pool, id).await?;

        Ok(Some(BoardDetail {
            board,
            columns,
            members,
        }))
    }
}
