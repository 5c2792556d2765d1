/// Board endpoints
///
/// Boards are the top-level workspace. Creation makes the actor the
/// owner in the same transaction as the board row. The detail view nests
/// columns, tasks, task relations, and members with profiles.
///
/// # Endpoints
///
/// - `POST   /api/boards` - create a board (actor becomes owner)
/// - `GET    /api/boards` - list boards the actor belongs to
/// - `GET    /api/boards/:id` - nested detail view (members only)
/// - `PUT    /api/boards/:id` - partial update (owner/admin)
/// - `DELETE /api/boards/:id` - delete (owner only, cascades)
/// - `POST   /api/boards/:id/star` - toggle the starred flag (any member)

use crate::app::AppState;
use crate::error::{read_denied, write_denied, ApiError, ApiResult};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use boardflow_shared::auth::access::{require_member, require_role};
use boardflow_shared::auth::token::Actor;
use boardflow_shared::models::board::{
    Board, BoardDetail, BoardSummary, CreateBoard, UpdateBoard,
};
use boardflow_shared::models::member::{MANAGERS, OWNER_ONLY};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Create board request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBoardRequest {
    /// Board title
    #[validate(length(min = 1, max = 255, message = "Title is required"))]
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Optional display color
    pub color: Option<String>,

    /// Optional priority label
    pub priority: Option<String>,
}

/// Partial board update request
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateBoardRequest {
    /// New title
    #[validate(length(min = 1, max = 255, message = "Title must not be empty"))]
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

/// Response carrying a single board
#[derive(Debug, Serialize)]
pub struct BoardResponse {
    /// Outcome description
    pub message: String,

    /// The board
    pub board: Board,
}

/// Response carrying the actor's board list
#[derive(Debug, Serialize)]
pub struct BoardListResponse {
    /// Outcome description
    pub message: String,

    /// Boards with the actor's membership
    pub boards: Vec<BoardSummary>,
}

/// Response carrying the nested board detail
#[derive(Debug, Serialize)]
pub struct BoardDetailResponse {
    /// Outcome description
    pub message: String,

    /// Board with columns, tasks, and members
    pub board: BoardDetail,
}

/// Response for operations without an entity payload
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Outcome description
    pub message: String,
}

/// Creates a board; the actor becomes its owner
pub async fn create_board(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(request): Json<CreateBoardRequest>,
) -> ApiResult<(StatusCode, Json<BoardResponse>)> {
    request.validate()?;

    let board = Board::create(
        &state.db,
        CreateBoard {
            title: request.title,
            description: request.description,
            color: request.color,
            priority: request.priority,
        },
        actor.user_id,
    )
    .await?;

    tracing::info!(board_id = %board.id, user_id = %actor.user_id, "Board created");

    Ok((
        StatusCode::CREATED,
        Json(BoardResponse {
            message: "Board created successfully".to_string(),
            board,
        }),
    ))
}

/// Lists every board the actor is a member of
pub async fn list_boards(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Json<BoardListResponse>> {
    let boards = Board::list_for_user(&state.db, actor.user_id).await?;

    Ok(Json(BoardListResponse {
        message: "Boards retrieved successfully".to_string(),
        boards,
    }))
}

/// Returns the nested detail view of one board
///
/// Non-members get the same NotFound as a nonexistent board.
pub async fn get_board(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<BoardDetailResponse>> {
    require_member(&state.db, id, actor.user_id)
        .await
        .map_err(|e| read_denied(e, "Board not found or access denied"))?;

    let board = Board::fetch_detail(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Board not found or access denied".to_string()))?;

    Ok(Json(BoardDetailResponse {
        message: "Board retrieved successfully".to_string(),
        board,
    }))
}

/// Applies a partial update to a board (owner/admin only)
pub async fn update_board(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateBoardRequest>,
) -> ApiResult<Json<BoardResponse>> {
    request.validate()?;

    require_role(&state.db, id, actor.user_id, MANAGERS)
        .await
        .map_err(|e| write_denied(e, "Only owners or admins can update boards"))?;

    let board = Board::update(
        &state.db,
        id,
        UpdateBoard {
            title: request.title,
            description: request.description,
            color: request.color,
            priority: request.priority,
            is_starred: request.is_starred,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Board not found".to_string()))?;

    Ok(Json(BoardResponse {
        message: "Board updated successfully".to_string(),
        board,
    }))
}

/// Deletes a board (owner only); columns, tasks, and members cascade
pub async fn delete_board(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    require_role(&state.db, id, actor.user_id, OWNER_ONLY)
        .await
        .map_err(|e| write_denied(e, "Only owners can delete boards"))?;

    let deleted = Board::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Board not found".to_string()));
    }

    tracing::info!(board_id = %id, user_id = %actor.user_id, "Board deleted");

    Ok(Json(MessageResponse {
        message: "Board deleted successfully".to_string(),
    }))
}

/// Toggles the starred flag (any member)
pub async fn star_board(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<BoardResponse>> {
    if Board::find_by_id(&state.db, id).await?.is_none() {
        return Err(ApiError::NotFound("Board not found".to_string()));
    }

    require_member(&state.db, id, actor.user_id)
        .await
        .map_err(|e| write_denied(e, "Access denied"))?;

    let board = Board::toggle_star(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Board not found".to_string()))?;

    Ok(Json(BoardResponse {
        message: "Board star status updated successfully".to_string(),
        board,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_board_request_requires_title() {
        let valid = CreateBoardRequest {
            title: "Sprint 1".to_string(),
            description: None,
            color: None,
            priority: None,
        };
        assert!(valid.validate().is_ok());

        let empty_title = CreateBoardRequest {
            title: "".to_string(),
            description: None,
            color: None,
            priority: None,
        };
        assert!(empty_title.validate().is_err());
    }

    #[test]
    fn test_update_board_request_allows_empty_patch() {
        let patch = UpdateBoardRequest::default();
        assert!(patch.validate().is_ok());
    }
}
