/// Notification dispatch
///
/// State-changing events (membership, assignment, completion, comments)
/// fan out notification records to the affected users. Dispatch is
/// fire-and-forget: the insert runs on a detached task, a failure is
/// logged and never reaches the caller, and the triggering mutation is
/// reported successful regardless of dispatch outcome.
///
/// # Example
///
/// ```no_run
/// use boardflow_shared::notify::{dispatch, NotificationEvent};
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # fn example(pool: &PgPool, user_id: Uuid, board_id: Uuid, task_id: Uuid) {
/// dispatch(pool, NotificationEvent::TaskAssigned {
///     user_ids: vec![user_id],
///     board_id,
///     task_id,
///     task_title: "Ship the release".to_string(),
/// });
/// # }
/// ```

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::member::BoardRole;
use crate::models::notification::{NewNotification, Notification};

/// A state change worth telling someone about
///
/// Recipient lists arrive pre-filtered by the caller: the acting user is
/// excluded (nobody is notified about their own action) and duplicates
/// are collapsed.
#[derive(Debug, Clone)]
pub enum NotificationEvent {
    /// A user was added to a board
    MemberAdded {
        /// The new member
        user_id: Uuid,
        /// Board they were added to
        board_id: Uuid,
        /// Board title for the message text
        board_title: String,
        /// Role they were given
        role: BoardRole,
    },

    /// Users were assigned to a task
    TaskAssigned {
        /// The assigned users
        user_ids: Vec<Uuid>,
        /// Board the task lives on
        board_id: Uuid,
        /// The task
        task_id: Uuid,
        /// Task title for the message text
        task_title: String,
    },

    /// A task was marked completed by someone other than its creator
    TaskCompleted {
        /// The task's creator
        user_id: Uuid,
        /// Board the task lives on
        board_id: Uuid,
        /// The task
        task_id: Uuid,
        /// Task title for the message text
        task_title: String,
    },

    /// A comment was added to a task
    CommentAdded {
        /// Assignees and creator, minus the commenter
        user_ids: Vec<Uuid>,
        /// Board the task lives on
        board_id: Uuid,
        /// The task
        task_id: Uuid,
        /// Task title for the message text
        task_title: String,
    },
}

impl NotificationEvent {
    /// Renders the event into per-recipient notification rows
    pub fn to_rows(&self) -> Vec<NewNotification> {
        match self {
            NotificationEvent::MemberAdded {
                user_id,
                board_id,
                board_title,
                role,
            } => vec![NewNotification {
                user_id: *user_id,
                board_id: *board_id,
                title: "Added to Board".to_string(),
                message: format!("You were added to \"{}\" as a {}", board_title, role.as_str()),
                kind: "info".to_string(),
                action_url: Some(format!("/boards/{}", board_id)),
            }],

            NotificationEvent::TaskAssigned {
                user_ids,
                board_id,
                task_id,
                task_title,
            } => user_ids
                .iter()
                .map(|user_id| NewNotification {
                    user_id: *user_id,
                    board_id: *board_id,
                    title: "Task Assigned".to_string(),
                    message: format!("You were assigned to \"{}\"", task_title),
                    kind: "info".to_string(),
                    action_url: Some(format!("/boards/{}/tasks/{}", board_id, task_id)),
                })
                .collect(),

            NotificationEvent::TaskCompleted {
                user_id,
                board_id,
                task_id,
                task_title,
            } => vec![NewNotification {
                user_id: *user_id,
                board_id: *board_id,
                title: "Task Completed".to_string(),
                message: format!("\"{}\" has been marked as completed", task_title),
                kind: "success".to_string(),
                action_url: Some(format!("/boards/{}/tasks/{}", board_id, task_id)),
            }],

            NotificationEvent::CommentAdded {
                user_ids,
                board_id,
                task_id,
                task_title,
            } => user_ids
                .iter()
                .map(|user_id| NewNotification {
                    user_id: *user_id,
                    board_id: *board_id,
                    title: "New Comment".to_string(),
                    message: format!("A new comment was added to \"{}\"", task_title),
                    kind: "info".to_string(),
                    action_url: Some(format!("/boards/{}/tasks/{}", board_id, task_id)),
                })
                .collect(),
        }
    }
}

/// Fires an event without waiting for persistence
///
/// The insert runs on a detached tokio task. Failures are logged at warn
/// and never propagate; an event with no recipients is skipped entirely.
pub fn dispatch(pool: &PgPool, event: NotificationEvent) {
    let rows = event.to_rows();
    if rows.is_empty() {
        return;
    }

    let pool = pool.clone();
    tokio::spawn(async move {
        if let Err(e) = Notification::insert_many(&pool, &rows).await {
            tracing::warn!(error = %e, count = rows.len(), "Failed to persist notifications");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_added_rendering() {
        let user_id = Uuid::new_v4();
        let board_id = Uuid::new_v4();

        let rows = NotificationEvent::MemberAdded {
            user_id,
            board_id,
            board_title: "Sprint 1".to_string(),
            role: BoardRole::Member,
        }
        .to_rows();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].user_id, user_id);
        assert_eq!(rows[0].title, "Added to Board");
        assert_eq!(rows[0].message, "You were added to \"Sprint 1\" as a member");
        assert_eq!(rows[0].kind, "info");
        assert_eq!(rows[0].action_url.as_deref(), Some(format!("/boards/{}", board_id).as_str()));
    }

    #[test]
    fn test_task_assigned_fans_out_per_recipient() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let board_id = Uuid::new_v4();
        let task_id = Uuid::new_v4();

        let rows = NotificationEvent::TaskAssigned {
            user_ids: vec![a, b],
            board_id,
            task_id,
            task_title: "Fix login".to_string(),
        }
        .to_rows();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].user_id, a);
        assert_eq!(rows[1].user_id, b);
        for row in &rows {
            assert_eq!(row.message, "You were assigned to \"Fix login\"");
            assert_eq!(
                row.action_url.as_deref(),
                Some(format!("/boards/{}/tasks/{}", board_id, task_id).as_str())
            );
        }
    }

    #[test]
    fn test_task_completed_rendering() {
        let rows = NotificationEvent::TaskCompleted {
            user_id: Uuid::new_v4(),
            board_id: Uuid::new_v4(),
            task_id: Uuid::new_v4(),
            task_title: "Write docs".to_string(),
        }
        .to_rows();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "Task Completed");
        assert_eq!(rows[0].message, "\"Write docs\" has been marked as completed");
        assert_eq!(rows[0].kind, "success");
    }

    #[test]
    fn test_comment_added_empty_recipients_renders_nothing() {
        let rows = NotificationEvent::CommentAdded {
            user_ids: vec![],
            board_id: Uuid::new_v4(),
            task_id: Uuid::new_v4(),
            task_title: "Anything".to_string(),
        }
        .to_rows();

        assert!(rows.is_empty());
    }
}
