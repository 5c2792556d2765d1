/// Task endpoints
///
/// Tasks are the cards of a column. Every operation resolves the
/// effective board through the task's parent column before authorizing.
/// Creation appends at the end of the column's ordering; deletion and
/// moves re-sequence the affected columns.
///
/// # Endpoints
///
/// - `POST   /api/tasks` - create (any member; optional assignees/tags)
/// - `GET    /api/tasks/all` - cross-board list: created by or assigned to the actor
/// - `GET    /api/tasks/column/:column_id` - list in position order (members)
/// - `GET    /api/tasks/details/:id` - full detail with profiles (members)
/// - `PUT    /api/tasks/:id` - partial update (owner/admin or assignee)
/// - `DELETE /api/tasks/:id` - delete and re-sequence (owner/admin)
/// - `POST   /api/tasks/move` - relocate across/within columns (members)
/// - `POST   /api/tasks/:id/assignees` - assign a board member
/// - `DELETE /api/tasks/:id/assignees/:user_id` - unassign
/// - `POST   /api/tasks/:id/tags` - add a free-form tag
/// - `DELETE /api/tasks/:id/tags/:tag` - remove a tag value
/// - `POST   /api/tasks/:id/comments` - comment (notifies watchers)
/// - `DELETE /api/tasks/:id/comments/:comment_id` - delete (author or admin)
/// - `POST   /api/tasks/:id/attachments` - record attachment metadata
/// - `DELETE /api/tasks/:id/attachments/:attachment_id` - delete (uploader or admin)

use crate::app::AppState;
use crate::error::{read_denied, write_denied, ApiError, ApiResult};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use boardflow_shared::auth::access::{require_member, require_role, resolve_role};
use boardflow_shared::auth::token::Actor;
use boardflow_shared::models::attachment::{CreateAttachment, TaskAttachment};
use boardflow_shared::models::column::Column;
use boardflow_shared::models::comment::{CommentWithAuthor, TaskComment};
use boardflow_shared::models::member::{BoardMember, MANAGERS};
use boardflow_shared::models::task::{
    AssigneeProfile, CreateTask, Task, TaskAssignee, TaskOverview, UpdateTask, STATUS_COMPLETED,
};
use boardflow_shared::notify::{dispatch, NotificationEvent};
use boardflow_shared::ordering;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Create task request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Column to create the task in
    pub column_id: Uuid,

    /// Task title
    #[validate(length(min = 1, max = 255, message = "Title is required"))]
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Optional priority label
    pub priority: Option<String>,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,

    /// Initial assignees; each must already be a board member
    #[serde(default)]
    pub assignees: Vec<Uuid>,

    /// Initial free-form tags
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Partial task update request
///
/// A provided `assignees` or `tags` array fully replaces the existing
/// set; omitting it leaves the set untouched.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    /// New title
    #[validate(length(min = 1, max = 255, message = "Title must not be empty"))]
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New priority label
    pub priority: Option<String>,

    /// New status label; only "completed" has special behavior
    pub status: Option<String>,

    /// New due date
    pub due_date: Option<DateTime<Utc>>,

    /// Full replacement assignee set
    pub assignees: Option<Vec<Uuid>>,

    /// Full replacement tag set
    pub tags: Option<Vec<String>>,
}

/// Move task request
#[derive(Debug, Deserialize)]
pub struct MoveTaskRequest {
    /// Task to move
    pub task_id: Uuid,

    /// Column to move it into (may be its current column)
    pub target_column_id: Uuid,

    /// Requested index in the target column; clamped into range
    pub new_position: i32,
}

/// Add assignee request
#[derive(Debug, Deserialize)]
pub struct AddAssigneeRequest {
    /// User to assign; must be a member of the task's board
    pub user_id: Uuid,
}

/// Add tag request
#[derive(Debug, Deserialize, Validate)]
pub struct AddTagRequest {
    /// Tag value
    #[validate(length(min = 1, max = 64, message = "Tag is required"))]
    pub tag: String,
}

/// Add comment request
#[derive(Debug, Deserialize, Validate)]
pub struct AddCommentRequest {
    /// Comment text
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
}

/// Add attachment request (metadata only)
#[derive(Debug, Deserialize, Validate)]
pub struct AddAttachmentRequest {
    /// Original file name
    #[validate(length(min = 1, max = 255, message = "File name is required"))]
    pub file_name: String,

    /// Location of the bytes in external storage
    #[validate(length(min = 1, message = "File URL is required"))]
    pub file_url: String,

    /// File size in bytes, if known
    pub file_size: Option<i64>,

    /// MIME type, if known
    pub file_type: Option<String>,
}

/// Task with its assignee ids and tags
#[derive(Debug, Serialize)]
pub struct TaskWithRelations {
    /// The task row
    #[serde(flatten)]
    pub task: Task,

    /// Assignee user ids
    pub assignees: Vec<Uuid>,

    /// Attached tags
    pub tags: Vec<String>,
}

/// Cross-board overview entry with assignee ids and tags
#[derive(Debug, Serialize)]
pub struct TaskOverviewWithRelations {
    /// The task row with its board id
    #[serde(flatten)]
    pub task: TaskOverview,

    /// Assignee user ids
    pub assignees: Vec<Uuid>,

    /// Attached tags
    pub tags: Vec<String>,
}

/// Full task detail with profile joins
#[derive(Debug, Serialize)]
pub struct TaskDetail {
    /// The task row
    #[serde(flatten)]
    pub task: Task,

    /// Assignees with profiles
    pub assignees: Vec<AssigneeProfile>,

    /// Attached tags
    pub tags: Vec<String>,

    /// Comments with author profiles, oldest first
    pub comments: Vec<CommentWithAuthor>,

    /// Attachment metadata
    pub attachments: Vec<TaskAttachment>,
}

/// Response carrying a single task
#[derive(Debug, Serialize)]
pub struct TaskResponse {
    /// Outcome description
    pub message: String,

    /// The task
    pub task: Task,
}

/// Response carrying a column's tasks
#[derive(Debug, Serialize)]
pub struct TaskListResponse {
    /// Outcome description
    pub message: String,

    /// Tasks in position order with relations
    pub tasks: Vec<TaskWithRelations>,
}

/// Response carrying the actor's cross-board task list
#[derive(Debug, Serialize)]
pub struct TaskOverviewResponse {
    /// Outcome description
    pub message: String,

    /// Tasks the actor created or is assigned to
    pub tasks: Vec<TaskOverviewWithRelations>,
}

/// Response carrying the full task detail
#[derive(Debug, Serialize)]
pub struct TaskDetailResponse {
    /// Outcome description
    pub message: String,

    /// The detail view
    pub task: TaskDetail,
}

/// Response carrying a new assignee row
#[derive(Debug, Serialize)]
pub struct AssigneeResponse {
    /// Outcome description
    pub message: String,

    /// The assignment
    pub assignee: TaskAssignee,
}

/// Response carrying a new tag value
#[derive(Debug, Serialize)]
pub struct TagResponse {
    /// Outcome description
    pub message: String,

    /// The tag value
    pub tag: String,
}

/// Response carrying a new comment
#[derive(Debug, Serialize)]
pub struct CommentResponse {
    /// Outcome description
    pub message: String,

    /// The comment
    pub comment: TaskComment,
}

/// Response carrying a new attachment
#[derive(Debug, Serialize)]
pub struct AttachmentResponse {
    /// Outcome description
    pub message: String,

    /// The attachment metadata
    pub attachment: TaskAttachment,
}

/// Response for operations without an entity payload
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Outcome description
    pub message: String,
}

/// Resolves the board a task belongs to through its parent column
async fn board_of_task(state: &AppState, task: &Task) -> ApiResult<Uuid> {
    Column::board_id_of(&state.db, task.column_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Column not found".to_string()))
}

/// Loads a task or reports NotFound
async fn load_task(state: &AppState, id: Uuid) -> ApiResult<Task> {
    Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))
}

/// Checks that the actor may update this task: board owner/admin or a
/// current assignee
async fn can_update_task(state: &AppState, board_id: Uuid, task_id: Uuid, user_id: Uuid) -> ApiResult<bool> {
    let role = resolve_role(&state.db, board_id, user_id).await?;
    if role.map(|r| MANAGERS.contains(&r)).unwrap_or(false) {
        return Ok(true);
    }

    Ok(Task::is_assignee(&state.db, task_id, user_id).await?)
}

/// Creates a task at the end of its column (any board member)
///
/// Initial assignees must already be board members; they are notified
/// unless they assigned themselves. Failures after the task row is
/// committed (assignee or tag inserts) surface as errors without rolling
/// back the task.
pub async fn create_task(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(request): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<TaskResponse>)> {
    request.validate()?;

    let board_id = Column::board_id_of(&state.db, request.column_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Column not found".to_string()))?;

    require_member(&state.db, board_id, actor.user_id)
        .await
        .map_err(|e| write_denied(e, "Access denied"))?;

    // Assignees are validated before the task row is written.
    for user_id in &request.assignees {
        if !BoardMember::is_member(&state.db, board_id, *user_id).await? {
            return Err(ApiError::BadRequest("User is not a board member".to_string()));
        }
    }

    let position = ordering::next_task_position(&state.db, request.column_id).await?;

    let task = Task::create(
        &state.db,
        CreateTask {
            column_id: request.column_id,
            title: request.title,
            description: request.description,
            priority: request.priority,
            due_date: request.due_date,
        },
        actor.user_id,
        position,
    )
    .await?;

    tracing::info!(task_id = %task.id, board_id = %board_id, user_id = %actor.user_id, "Task created");

    for user_id in &request.assignees {
        let _ = Task::add_assignee(&state.db, task.id, *user_id).await?;
    }

    let recipients: Vec<Uuid> = request
        .assignees
        .iter()
        .copied()
        .filter(|user_id| *user_id != actor.user_id)
        .collect();
    dispatch(
        &state.db,
        NotificationEvent::TaskAssigned {
            user_ids: recipients,
            board_id,
            task_id: task.id,
            task_title: task.title.clone(),
        },
    );

    for tag in &request.tags {
        Task::add_tag(&state.db, task.id, tag).await?;
    }

    Ok((
        StatusCode::CREATED,
        Json(TaskResponse {
            message: "Task created successfully".to_string(),
            task,
        }),
    ))
}

/// Lists every task the actor created or is assigned to, across boards
pub async fn get_all_tasks(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Json<TaskOverviewResponse>> {
    let tasks = Task::list_for_actor(&state.db, actor.user_id).await?;

    let task_ids: Vec<Uuid> = tasks.iter().map(|t| t.id).collect();
    let assignees = Task::assignees_for_tasks(&state.db, &task_ids).await?;
    let tags = Task::tags_for_tasks(&state.db, &task_ids).await?;

    let tasks = tasks
        .into_iter()
        .map(|task| {
            let task_assignees = assignees
                .iter()
                .filter(|a| a.task_id == task.id)
                .map(|a| a.user_id)
                .collect();
            let task_tags = tags
                .iter()
                .filter(|t| t.task_id == task.id)
                .map(|t| t.tag.clone())
                .collect();
            TaskOverviewWithRelations {
                task,
                assignees: task_assignees,
                tags: task_tags,
            }
        })
        .collect();

    Ok(Json(TaskOverviewResponse {
        message: "Tasks retrieved successfully".to_string(),
        tasks,
    }))
}

/// Lists a column's tasks in position order (members only)
pub async fn get_tasks_by_column(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(column_id): Path<Uuid>,
) -> ApiResult<Json<TaskListResponse>> {
    let board_id = Column::board_id_of(&state.db, column_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Column not found".to_string()))?;

    require_member(&state.db, board_id, actor.user_id)
        .await
        .map_err(|e| read_denied(e, "Column not found or access denied"))?;

    let tasks = Task::list_by_column(&state.db, column_id).await?;

    let task_ids: Vec<Uuid> = tasks.iter().map(|t| t.id).collect();
    let assignees = Task::assignees_for_tasks(&state.db, &task_ids).await?;
    let tags = Task::tags_for_tasks(&state.db, &task_ids).await?;

    let tasks = tasks
        .into_iter()
        .map(|task| {
            let task_assignees = assignees
                .iter()
                .filter(|a| a.task_id == task.id)
                .map(|a| a.user_id)
                .collect();
            let task_tags = tags
                .iter()
                .filter(|t| t.task_id == task.id)
                .map(|t| t.tag.clone())
                .collect();
            TaskWithRelations {
                task,
                assignees: task_assignees,
                tags: task_tags,
            }
        })
        .collect();

    Ok(Json(TaskListResponse {
        message: "Tasks retrieved successfully".to_string(),
        tasks,
    }))
}

/// Returns the full task detail with profile joins (members only)
pub async fn get_task_detail(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<TaskDetailResponse>> {
    let task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found or access denied".to_string()))?;

    let board_id = board_of_task(&state, &task).await?;

    require_member(&state.db, board_id, actor.user_id)
        .await
        .map_err(|e| read_denied(e, "Task not found or access denied"))?;

    let assignees = Task::assignees_with_profiles(&state.db, id).await?;
    let tags = Task::list_tags(&state.db, id).await?;
    let comments = TaskComment::list_with_authors(&state.db, id).await?;
    let attachments = TaskAttachment::list_by_task(&state.db, id).await?;

    Ok(Json(TaskDetailResponse {
        message: "Task".to_string(),
        task: TaskDetail {
            task,
            assignees,
            tags,
            comments,
            attachments,
        },
    }))
}

/// Applies a partial update (board owner/admin or a current assignee)
///
/// Provided `assignees`/`tags` arrays fully replace the existing sets.
/// Setting status to "completed" notifies the creator unless they did it
/// themselves.
pub async fn update_task(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateTaskRequest>,
) -> ApiResult<Json<TaskResponse>> {
    request.validate()?;

    let task = load_task(&state, id).await?;
    let board_id = board_of_task(&state, &task).await?;

    if !can_update_task(&state, board_id, id, actor.user_id).await? {
        return Err(ApiError::Forbidden(
            "Only owners, admins, or assignees can update tasks".to_string(),
        ));
    }

    let completing = request.status.as_deref() == Some(STATUS_COMPLETED);

    let updated = Task::update(
        &state.db,
        id,
        UpdateTask {
            title: request.title,
            description: request.description,
            priority: request.priority,
            status: request.status,
            due_date: request.due_date,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    if let Some(assignees) = request.assignees {
        for user_id in &assignees {
            if !BoardMember::is_member(&state.db, board_id, *user_id).await? {
                return Err(ApiError::BadRequest("User is not a board member".to_string()));
            }
        }
        Task::replace_assignees(&state.db, id, &assignees).await?;
    }

    if let Some(tags) = request.tags {
        Task::replace_tags(&state.db, id, &tags).await?;
    }

    if completing && task.created_by != actor.user_id {
        dispatch(
            &state.db,
            NotificationEvent::TaskCompleted {
                user_id: task.created_by,
                board_id,
                task_id: id,
                task_title: updated.title.clone(),
            },
        );
    }

    Ok(Json(TaskResponse {
        message: "Task updated successfully".to_string(),
        task: updated,
    }))
}

/// Deletes a task and re-sequences its column (owner/admin)
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    let task = load_task(&state, id).await?;
    let board_id = board_of_task(&state, &task).await?;

    require_role(&state.db, board_id, actor.user_id, MANAGERS)
        .await
        .map_err(|e| write_denied(e, "Only owners or admins can delete tasks"))?;

    Task::delete(&state.db, id).await?;

    ordering::resequence_tasks(&state.db, task.column_id).await?;

    Ok(Json(MessageResponse {
        message: "Task deleted successfully".to_string(),
    }))
}

/// Moves a task within or across columns of its board (any member)
///
/// The task lands at the requested index in the target column (clamped),
/// and both affected columns end up densely numbered.
pub async fn move_task(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(request): Json<MoveTaskRequest>,
) -> ApiResult<Json<TaskResponse>> {
    let task = load_task(&state, request.task_id).await?;
    let board_id = board_of_task(&state, &task).await?;

    require_member(&state.db, board_id, actor.user_id)
        .await
        .map_err(|e| write_denied(e, "Access denied"))?;

    let target_board_id = Column::board_id_of(&state.db, request.target_column_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Column not found".to_string()))?;

    if target_board_id != board_id {
        return Err(ApiError::BadRequest(
            "Target column belongs to a different board".to_string(),
        ));
    }

    ordering::insert_task_at(
        &state.db,
        request.task_id,
        request.target_column_id,
        request.new_position,
    )
    .await?;

    if task.column_id != request.target_column_id {
        ordering::resequence_tasks(&state.db, task.column_id).await?;
    }

    let task = load_task(&state, request.task_id).await?;

    Ok(Json(TaskResponse {
        message: "Task moved successfully".to_string(),
        task,
    }))
}

/// Assigns a board member to a task (any member)
///
/// Re-assigning an already-assigned user is a Conflict and never
/// duplicates the relation or its notification.
pub async fn add_assignee(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(request): Json<AddAssigneeRequest>,
) -> ApiResult<(StatusCode, Json<AssigneeResponse>)> {
    let task = load_task(&state, id).await?;
    let board_id = board_of_task(&state, &task).await?;

    require_member(&state.db, board_id, actor.user_id)
        .await
        .map_err(|e| write_denied(e, "Access denied"))?;

    if !BoardMember::is_member(&state.db, board_id, request.user_id).await? {
        return Err(ApiError::BadRequest("User is not a board member".to_string()));
    }

    let assignee = Task::add_assignee(&state.db, id, request.user_id)
        .await?
        .ok_or_else(|| {
            ApiError::Conflict("User is already assigned to this task".to_string())
        })?;

    if request.user_id != actor.user_id {
        dispatch(
            &state.db,
            NotificationEvent::TaskAssigned {
                user_ids: vec![request.user_id],
                board_id,
                task_id: id,
                task_title: task.title.clone(),
            },
        );
    }

    Ok((
        StatusCode::CREATED,
        Json(AssigneeResponse {
            message: "Assignee added successfully".to_string(),
            assignee,
        }),
    ))
}

/// Removes an assignee from a task (any member)
///
/// Removing a user who is not assigned reports NotFound.
pub async fn remove_assignee(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path((id, user_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<MessageResponse>> {
    let task = load_task(&state, id).await?;
    let board_id = board_of_task(&state, &task).await?;

    require_member(&state.db, board_id, actor.user_id)
        .await
        .map_err(|e| write_denied(e, "Access denied"))?;

    let removed = Task::remove_assignee(&state.db, id, user_id).await?;
    if !removed {
        return Err(ApiError::NotFound("Assignee not found".to_string()));
    }

    Ok(Json(MessageResponse {
        message: "Assignee removed successfully".to_string(),
    }))
}

/// Adds a free-form tag to a task (any member)
pub async fn add_tag(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(request): Json<AddTagRequest>,
) -> ApiResult<(StatusCode, Json<TagResponse>)> {
    request.validate()?;

    let task = load_task(&state, id).await?;
    let board_id = board_of_task(&state, &task).await?;

    require_member(&state.db, board_id, actor.user_id)
        .await
        .map_err(|e| write_denied(e, "Access denied"))?;

    Task::add_tag(&state.db, id, &request.tag).await?;

    Ok((
        StatusCode::CREATED,
        Json(TagResponse {
            message: "Tag added successfully".to_string(),
            tag: request.tag,
        }),
    ))
}

/// Removes every occurrence of a tag value from a task (any member)
pub async fn remove_tag(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path((id, tag)): Path<(Uuid, String)>,
) -> ApiResult<Json<MessageResponse>> {
    let task = load_task(&state, id).await?;
    let board_id = board_of_task(&state, &task).await?;

    require_member(&state.db, board_id, actor.user_id)
        .await
        .map_err(|e| write_denied(e, "Access denied"))?;

    Task::remove_tag(&state.db, id, &tag).await?;

    Ok(Json(MessageResponse {
        message: "Tag removed successfully".to_string(),
    }))
}

/// Adds a comment to a task (any member)
///
/// Current assignees and the task's creator are notified, minus the
/// commenter and any duplicates.
pub async fn add_comment(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(request): Json<AddCommentRequest>,
) -> ApiResult<(StatusCode, Json<CommentResponse>)> {
    request.validate()?;

    let task = load_task(&state, id).await?;
    let board_id = board_of_task(&state, &task).await?;

    require_member(&state.db, board_id, actor.user_id)
        .await
        .map_err(|e| write_denied(e, "Access denied"))?;

    let comment = TaskComment::create(&state.db, id, actor.user_id, &request.content).await?;

    let mut recipients = Task::assignee_ids(&state.db, id).await?;
    recipients.push(task.created_by);
    recipients.sort_unstable();
    recipients.dedup();
    recipients.retain(|user_id| *user_id != actor.user_id);

    dispatch(
        &state.db,
        NotificationEvent::CommentAdded {
            user_ids: recipients,
            board_id,
            task_id: id,
            task_title: task.title.clone(),
        },
    );

    Ok((
        StatusCode::CREATED,
        Json(CommentResponse {
            message: "Comment added successfully".to_string(),
            comment,
        }),
    ))
}

/// Deletes a comment (its author, or a board owner/admin)
pub async fn delete_comment(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path((id, comment_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<MessageResponse>> {
    let comment = TaskComment::find(&state.db, id, comment_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Comment not found".to_string()))?;

    let task = load_task(&state, id).await?;
    let board_id = board_of_task(&state, &task).await?;

    let role = require_member(&state.db, board_id, actor.user_id)
        .await
        .map_err(|e| write_denied(e, "Access denied"))?;

    if comment.user_id != actor.user_id && !MANAGERS.contains(&role) {
        return Err(ApiError::Forbidden(
            "Only comment author or admins can delete comments".to_string(),
        ));
    }

    TaskComment::delete(&state.db, comment_id).await?;

    Ok(Json(MessageResponse {
        message: "Comment deleted successfully".to_string(),
    }))
}

/// Records attachment metadata on a task (any member)
pub async fn add_attachment(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(request): Json<AddAttachmentRequest>,
) -> ApiResult<(StatusCode, Json<AttachmentResponse>)> {
    request.validate()?;

    let task = load_task(&state, id).await?;
    let board_id = board_of_task(&state, &task).await?;

    require_member(&state.db, board_id, actor.user_id)
        .await
        .map_err(|e| write_denied(e, "Access denied"))?;

    let attachment = TaskAttachment::create(
        &state.db,
        id,
        CreateAttachment {
            file_name: request.file_name,
            file_url: request.file_url,
            file_size: request.file_size,
            file_type: request.file_type,
        },
        actor.user_id,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(AttachmentResponse {
            message: "Attachment added successfully".to_string(),
            attachment,
        }),
    ))
}

/// Deletes an attachment (its uploader, or a board owner/admin)
pub async fn delete_attachment(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path((id, attachment_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<MessageResponse>> {
    let attachment = TaskAttachment::find(&state.db, id, attachment_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Attachment not found".to_string()))?;

    let task = load_task(&state, id).await?;
    let board_id = board_of_task(&state, &task).await?;

    let role = require_member(&state.db, board_id, actor.user_id)
        .await
        .map_err(|e| write_denied(e, "Access denied"))?;

    if attachment.uploaded_by != actor.user_id && !MANAGERS.contains(&role) {
        return Err(ApiError::Forbidden(
            "Only uploader or admins can delete attachments".to_string(),
        ));
    }

    TaskAttachment::delete(&state.db, attachment_id).await?;

    Ok(Json(MessageResponse {
        message: "Attachment deleted successfully".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_task_request_requires_title() {
        let valid = CreateTaskRequest {
            column_id: Uuid::new_v4(),
            title: "Fix login".to_string(),
            description: None,
            priority: None,
            due_date: None,
            assignees: vec![],
            tags: vec![],
        };
        assert!(valid.validate().is_ok());

        let empty_title = CreateTaskRequest {
            column_id: Uuid::new_v4(),
            title: "".to_string(),
            description: None,
            priority: None,
            due_date: None,
            assignees: vec![],
            tags: vec![],
        };
        assert!(empty_title.validate().is_err());
    }

    #[test]
    fn test_create_task_request_defaults_relations_to_empty() {
        let json = format!(r#"{{"column_id":"{}","title":"A task"}}"#, Uuid::new_v4());
        let request: CreateTaskRequest = serde_json::from_str(&json).unwrap();
        assert!(request.assignees.is_empty());
        assert!(request.tags.is_empty());
    }

    #[test]
    fn test_update_task_request_distinguishes_missing_and_empty_sets() {
        let untouched: UpdateTaskRequest = serde_json::from_str("{}").unwrap();
        assert!(untouched.assignees.is_none());

        let cleared: UpdateTaskRequest = serde_json::from_str(r#"{"assignees":[]}"#).unwrap();
        assert_eq!(cleared.assignees, Some(vec![]));
    }

    #[test]
    fn test_add_tag_request_rejects_empty_tag() {
        let request = AddTagRequest { tag: "".to_string() };
        assert!(request.validate().is_err());

        let request = AddTagRequest {
            tag: "backend".to_string(),
        };
        assert!(request.validate().is_ok());
    }
}
