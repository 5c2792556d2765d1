/// Task model and database operations
///
/// Tasks are the cards of a column. `position` is dense and zero-based
/// per column and is owned by the ordering module. The `status` column is
/// deliberately free-form text: any string may be written, only the
/// literal value `"completed"` carries special meaning (it triggers a
/// notification to the creator when set by someone else). No state
/// machine is enforced and completed is not terminal.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     column_id UUID NOT NULL REFERENCES columns(id) ON DELETE CASCADE,
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     priority VARCHAR(32) NOT NULL DEFAULT 'medium',
///     status VARCHAR(64) NOT NULL DEFAULT 'active',
///     due_date TIMESTAMPTZ,
///     created_by UUID NOT NULL REFERENCES profiles(id) ON DELETE CASCADE,
///     position INTEGER NOT NULL DEFAULT 0,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// Assignees and tags live in side tables (`task_assignees`, `task_tags`)
/// and are managed through the relation helpers below. An assignee must
/// already be a member of the task's board; that rule is enforced by the
/// handlers before insertion.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Status value written on task creation
pub const STATUS_ACTIVE: &str = "active";

/// The only status value with special behavior
pub const STATUS_COMPLETED: &str = "completed";

/// Task model representing a card within a column
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Column this task belongs to
    pub column_id: Uuid,

    /// Task title
    pub title: String,

    /// Longer description
    pub description: Option<String>,

    /// Priority label (free text, defaults to "medium")
    pub priority: String,

    /// Status label (free text; see module docs)
    pub status: String,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,

    /// User who created the task
    pub created_by: Uuid,

    /// Zero-based rank within the column
    pub position: i32,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTask {
    /// Column to create the task in
    pub column_id: Uuid,

    /// Task title
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Optional priority; defaults to "medium"
    pub priority: Option<String>,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,
}

/// Partial update of a task; only provided fields change
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTask {
    /// New title
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New priority label
    pub priority: Option<String>,

    /// New status label
    pub status: Option<String>,

    /// New due date
    pub due_date: Option<DateTime<Utc>>,
}

/// Assignee relation row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskAssignee {
    /// Task the user is assigned to
    pub task_id: Uuid,

    /// Assigned user
    pub user_id: Uuid,

    /// When the assignment was made
    pub assigned_at: DateTime<Utc>,
}

/// Assignee joined with profile data, for detail views
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AssigneeProfile {
    /// Assigned user
    pub user_id: Uuid,

    /// When the assignment was made
    pub assigned_at: DateTime<Utc>,

    /// Display name from the profile store
    pub full_name: Option<String>,

    /// Email from the profile store
    pub email: String,

    /// Avatar URL from the profile store
    pub avatar_url: Option<String>,
}

/// Tag row paired with its task, for batch fetches across many tasks
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct TaskTagRow {
    /// Task the tag belongs to
    pub task_id: Uuid,

    /// Tag value
    pub tag: String,
}

/// Task annotated with its board and relation data, for the cross-board
/// "my tasks" listing
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct TaskOverview {
    /// Unique task ID
    pub id: Uuid,

    /// Column this task belongs to
    pub column_id: Uuid,

    /// Board resolved through the column
    pub board_id: Uuid,

    /// Task title
    pub title: String,

    /// Longer description
    pub description: Option<String>,

    /// Priority label
    pub priority: String,

    /// Status label
    pub status: String,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,

    /// User who created the task
    pub created_by: Uuid,

    /// Zero-based rank within the column
    pub position: i32,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a task at the given position with status "active"
    pub async fn create(
        pool: &PgPool,
        data: CreateTask,
        created_by: Uuid,
        position: i32,
    ) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (column_id, title, description, priority, status, due_date, created_by, position)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, column_id, title, description, priority, status, due_date,
                      created_by, position, created_at, updated_at
            "#,
        )
        .bind(data.column_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.priority.unwrap_or_else(|| "medium".to_string()))
        .bind(STATUS_ACTIVE)
        .bind(data.due_date)
        .bind(created_by)
        .bind(position)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, column_id, title, description, priority, status, due_date,
                   created_by, position, created_at, updated_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists a column's tasks in position order
    pub async fn list_by_column(pool: &PgPool, column_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, column_id, title, description, priority, status, due_date,
                   created_by, position, created_at, updated_at
            FROM tasks
            WHERE column_id = $1
            ORDER BY position ASC
            "#,
        )
        .bind(column_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Lists every task the user created or is assigned to, across boards
    ///
    /// This is the cross-board overview query, distinct from per-column
    /// listing. Each row carries the board ID resolved through the
    /// column join.
    pub async fn list_for_actor(
        pool: &PgPool,
        user_id: Uuid,
    ) -> Result<Vec<TaskOverview>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, TaskOverview>(
            r#"
            SELECT t.id, t.column_id, c.board_id, t.title, t.description, t.priority,
                   t.status, t.due_date, t.created_by, t.position, t.created_at, t.updated_at
            FROM tasks t
            JOIN columns c ON c.id = t.column_id
            WHERE t.created_by = $1
               OR t.id IN (SELECT task_id FROM task_assignees WHERE user_id = $1)
            ORDER BY t.position ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Applies a partial update; only provided fields change
    ///
    /// Returns the updated task, or `None` if it no longer exists.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE tasks SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.priority.is_some() {
            bind_count += 1;
            query.push_str(&format!(", priority = ${}", bind_count));
        }
        if data.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(", status = ${}", bind_count));
        }
        if data.due_date.is_some() {
            bind_count += 1;
            query.push_str(&format!(", due_date = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, column_id, title, description, priority, status, \
             due_date, created_by, position, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(priority) = data.priority {
            q = q.bind(priority);
        }
        if let Some(status) = data.status {
            q = q.bind(status);
        }
        if let Some(due_date) = data.due_date {
            q = q.bind(due_date);
        }

        let task = q.fetch_optional(pool).await?;

        Ok(task)
    }

    /// Deletes a task; children cascade at the database level
    ///
    /// The caller re-sequences the column's remaining tasks afterwards.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // --- assignee relation ---

    /// Assigns a user to a task
    ///
    /// Returns `None` if the user was already assigned; the relation is
    /// never duplicated and callers skip the notification in that case.
    pub async fn add_assignee(
        pool: &PgPool,
        task_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<TaskAssignee>, sqlx::Error> {
        let assignee = sqlx::query_as::<_, TaskAssignee>(
            r#"
            INSERT INTO task_assignees (task_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (task_id, user_id) DO NOTHING
            RETURNING task_id, user_id, assigned_at
            "#,
        )
        .bind(task_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(assignee)
    }

    /// Removes an assignee; returns false if the user was not assigned
    pub async fn remove_assignee(
        pool: &PgPool,
        task_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM task_assignees WHERE task_id = $1 AND user_id = $2")
                .bind(task_id)
                .bind(user_id)
                .execute(pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Checks whether a user is currently assigned to a task
    pub async fn is_assignee(
        pool: &PgPool,
        task_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM task_assignees
                WHERE task_id = $1 AND user_id = $2
            )
            "#,
        )
        .bind(task_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    /// Lists assignee user IDs for a task
    pub async fn assignee_ids(pool: &PgPool, task_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
        let ids: Vec<Uuid> = sqlx::query_scalar(
            "SELECT user_id FROM task_assignees WHERE task_id = $1 ORDER BY assigned_at ASC",
        )
        .bind(task_id)
        .fetch_all(pool)
        .await?;

        Ok(ids)
    }

    /// Lists assignees with their profiles, for detail views
    pub async fn assignees_with_profiles(
        pool: &PgPool,
        task_id: Uuid,
    ) -> Result<Vec<AssigneeProfile>, sqlx::Error> {
        let assignees = sqlx::query_as::<_, AssigneeProfile>(
            r#"
            SELECT a.user_id, a.assigned_at, p.full_name, p.email, p.avatar_url
            FROM task_assignees a
            JOIN profiles p ON p.id = a.user_id
            WHERE a.task_id = $1
            ORDER BY a.assigned_at ASC
            "#,
        )
        .bind(task_id)
        .fetch_all(pool)
        .await?;

        Ok(assignees)
    }

    /// Replaces the full assignee set: delete everything, insert the new
    /// list
    ///
    /// This mirrors the update contract where a provided assignees array
    /// is a full replacement, not a diff.
    pub async fn replace_assignees(
        pool: &PgPool,
        task_id: Uuid,
        user_ids: &[Uuid],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM task_assignees WHERE task_id = $1")
            .bind(task_id)
            .execute(pool)
            .await?;

        for user_id in user_ids {
            sqlx::query(
                r#"
                INSERT INTO task_assignees (task_id, user_id)
                VALUES ($1, $2)
                ON CONFLICT (task_id, user_id) DO NOTHING
                "#,
            )
            .bind(task_id)
            .bind(user_id)
            .execute(pool)
            .await?;
        }

        Ok(())
    }

    /// Batch-fetches assignee rows for a set of tasks in one round trip
    pub async fn assignees_for_tasks(
        pool: &PgPool,
        task_ids: &[Uuid],
    ) -> Result<Vec<TaskAssignee>, sqlx::Error> {
        if task_ids.is_empty() {
            return Ok(Vec::new());
        }

        let assignees = sqlx::query_as::<_, TaskAssignee>(
            r#"
            SELECT task_id, user_id, assigned_at
            FROM task_assignees
            WHERE task_id = ANY($1)
            ORDER BY assigned_at ASC
            "#,
        )
        .bind(task_ids)
        .fetch_all(pool)
        .await?;

        Ok(assignees)
    }

    /// Batch-fetches tag rows for a set of tasks in one round trip
    pub async fn tags_for_tasks(
        pool: &PgPool,
        task_ids: &[Uuid],
    ) -> Result<Vec<TaskTagRow>, sqlx::Error> {
        if task_ids.is_empty() {
            return Ok(Vec::new());
        }

        let tags = sqlx::query_as::<_, TaskTagRow>(
            "SELECT task_id, tag FROM task_tags WHERE task_id = ANY($1)",
        )
        .bind(task_ids)
        .fetch_all(pool)
        .await?;

        Ok(tags)
    }

    // --- tag relation ---

    /// Adds a free-form tag; duplicates are allowed at this layer
    pub async fn add_tag(pool: &PgPool, task_id: Uuid, tag: &str) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO task_tags (task_id, tag) VALUES ($1, $2)")
            .bind(task_id)
            .bind(tag)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Removes every row carrying the tag value; returns false if none
    /// existed
    pub async fn remove_tag(pool: &PgPool, task_id: Uuid, tag: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM task_tags WHERE task_id = $1 AND tag = $2")
            .bind(task_id)
            .bind(tag)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists a task's tags
    pub async fn list_tags(pool: &PgPool, task_id: Uuid) -> Result<Vec<String>, sqlx::Error> {
        let tags: Vec<String> = sqlx::query_scalar("SELECT tag FROM task_tags WHERE task_id = $1")
            .bind(task_id)
            .fetch_all(pool)
            .await?;

        Ok(tags)
    }

    /// Replaces the full tag set: delete everything, insert the new list
    pub async fn replace_tags(
        pool: &PgPool,
        task_id: Uuid,
        tags: &[String],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM task_tags WHERE task_id = $1")
            .bind(task_id)
            .execute(pool)
            .await?;

        for tag in tags {
            sqlx::query("INSERT INTO task_tags (task_id, tag) VALUES ($1, $2)")
                .bind(task_id)
                .bind(tag)
                .execute(pool)
                .await?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_constants() {
        assert_eq!(STATUS_ACTIVE, "active");
        assert_eq!(STATUS_COMPLETED, "completed");
    }

    #[test]
    fn test_update_task_default_is_empty_patch() {
        let patch = UpdateTask::default();
        assert!(patch.title.is_none());
        assert!(patch.description.is_none());
        assert!(patch.priority.is_none());
        assert!(patch.status.is_none());
        assert!(patch.due_date.is_none());
    }
}
