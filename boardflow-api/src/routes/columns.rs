/// Column endpoints
///
/// Columns are the ordered lanes of a board. Creation appends at the end
/// of the board's ordering; deletion re-sequences the survivors; reorder
/// bulk-assigns positions from an explicit id list.
///
/// # Endpoints
///
/// - `POST   /api/columns` - create a column (owner/admin, appended)
/// - `GET    /api/columns/board/:board_id` - list in position order (members)
/// - `PUT    /api/columns/:id` - partial update (owner/admin)
/// - `DELETE /api/columns/:id` - delete and re-sequence (owner/admin)
/// - `POST   /api/columns/reorder` - bulk position assignment (owner/admin)

use crate::app::AppState;
use crate::error::{read_denied, write_denied, ApiError, ApiResult};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use boardflow_shared::auth::access::{require_member, require_role};
use boardflow_shared::auth::token::Actor;
use boardflow_shared::models::column::{Column, CreateColumn, UpdateColumn};
use boardflow_shared::models::member::MANAGERS;
use boardflow_shared::ordering;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Create column request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateColumnRequest {
    /// Board to create the column on
    pub board_id: Uuid,

    /// Column title
    #[validate(length(min = 1, max = 255, message = "Title is required"))]
    pub title: String,

    /// Optional display color
    pub color: Option<String>,
}

/// Partial column update request
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateColumnRequest {
    /// New title
    #[validate(length(min = 1, max = 255, message = "Title must not be empty"))]
    pub title: Option<String>,

    /// New display color
    pub color: Option<String>,
}

/// Reorder request: the board's columns in their new order
#[derive(Debug, Deserialize)]
pub struct ReorderColumnsRequest {
    /// Board the columns belong to
    pub board_id: Uuid,

    /// Column ids in display order; positions are assigned by index
    pub column_ids: Vec<Uuid>,
}

/// Response carrying a single column
#[derive(Debug, Serialize)]
pub struct ColumnResponse {
    /// Outcome description
    pub message: String,

    /// The column
    pub column: Column,
}

/// Response carrying a board's columns
#[derive(Debug, Serialize)]
pub struct ColumnListResponse {
    /// Outcome description
    pub message: String,

    /// Columns in position order
    pub columns: Vec<Column>,
}

/// Response for operations without an entity payload
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Outcome description
    pub message: String,
}

/// Creates a column at the end of the board's ordering (owner/admin)
pub async fn create_column(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(request): Json<CreateColumnRequest>,
) -> ApiResult<(StatusCode, Json<ColumnResponse>)> {
    request.validate()?;

    require_role(&state.db, request.board_id, actor.user_id, MANAGERS)
        .await
        .map_err(|e| write_denied(e, "Only owners or admins can create columns"))?;

    let position = ordering::next_column_position(&state.db, request.board_id).await?;

    let column = Column::create(
        &state.db,
        CreateColumn {
            board_id: request.board_id,
            title: request.title,
            color: request.color,
        },
        position,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ColumnResponse {
            message: "Column created successfully".to_string(),
            column,
        }),
    ))
}

/// Lists a board's columns in position order (members only)
pub async fn list_columns(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(board_id): Path<Uuid>,
) -> ApiResult<Json<ColumnListResponse>> {
    require_member(&state.db, board_id, actor.user_id)
        .await
        .map_err(|e| read_denied(e, "Board not found or access denied"))?;

    let columns = Column::list_by_board(&state.db, board_id).await?;

    Ok(Json(ColumnListResponse {
        message: "Columns retrieved successfully".to_string(),
        columns,
    }))
}

/// Applies a partial update to a column (owner/admin)
pub async fn update_column(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateColumnRequest>,
) -> ApiResult<Json<ColumnResponse>> {
    request.validate()?;

    let column = Column::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Column not found".to_string()))?;

    require_role(&state.db, column.board_id, actor.user_id, MANAGERS)
        .await
        .map_err(|e| write_denied(e, "Only owners or admins can update columns"))?;

    let column = Column::update(
        &state.db,
        id,
        UpdateColumn {
            title: request.title,
            color: request.color,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Column not found".to_string()))?;

    Ok(Json(ColumnResponse {
        message: "Column updated successfully".to_string(),
        column,
    }))
}

/// Deletes a column and re-sequences the board's remaining columns
/// (owner/admin)
pub async fn delete_column(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    let column = Column::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Column not found".to_string()))?;

    require_role(&state.db, column.board_id, actor.user_id, MANAGERS)
        .await
        .map_err(|e| write_denied(e, "Only owners or admins can delete columns"))?;

    Column::delete(&state.db, id).await?;

    ordering::resequence_columns(&state.db, column.board_id).await?;

    Ok(Json(MessageResponse {
        message: "Column deleted successfully".to_string(),
    }))
}

/// Bulk-assigns column positions from an explicit ordered id list
/// (owner/admin)
pub async fn reorder_columns(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(request): Json<ReorderColumnsRequest>,
) -> ApiResult<Json<MessageResponse>> {
    require_role(&state.db, request.board_id, actor.user_id, MANAGERS)
        .await
        .map_err(|e| write_denied(e, "Only owners or admins can reorder columns"))?;

    ordering::reorder_columns(&state.db, request.board_id, &request.column_ids).await?;

    Ok(Json(MessageResponse {
        message: "Columns reordered successfully".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_column_request_requires_title() {
        let valid = CreateColumnRequest {
            board_id: Uuid::new_v4(),
            title: "In Progress".to_string(),
            color: None,
        };
        assert!(valid.validate().is_ok());

        let empty_title = CreateColumnRequest {
            board_id: Uuid::new_v4(),
            title: "".to_string(),
            color: None,
        };
        assert!(empty_title.validate().is_err());
    }
}
