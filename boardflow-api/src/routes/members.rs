/// Board member endpoints
///
/// Membership gates every board-scoped operation. Owners and admins may
/// add members (resolved by email through the profile store); role
/// changes and removals are owner-only.
///
/// # Endpoints
///
/// - `POST   /api/members/:board_id` - add a member by email (owner/admin)
/// - `GET    /api/members/:board_id` - list members with profiles (members)
/// - `PUT    /api/members/:board_id/:user_id` - change a role (owner)
/// - `DELETE /api/members/:board_id/:user_id` - remove a member (owner)

use crate::app::AppState;
use crate::error::{read_denied, write_denied, ApiError, ApiResult};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use boardflow_shared::auth::access::{require_member, require_role};
use boardflow_shared::auth::token::Actor;
use boardflow_shared::models::board::Board;
use boardflow_shared::models::member::{
    BoardMember, BoardMemberProfile, BoardRole, MANAGERS, OWNER_ONLY,
};
use boardflow_shared::models::profile::Profile;
use boardflow_shared::notify::{dispatch, NotificationEvent};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Add member request
#[derive(Debug, Deserialize, Validate)]
pub struct AddMemberRequest {
    /// Email of the user to add, resolved through the profile store
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Role to grant; defaults to member
    pub role: Option<BoardRole>,
}

/// Change role request
#[derive(Debug, Deserialize)]
pub struct UpdateMemberRoleRequest {
    /// The new role
    pub role: BoardRole,
}

/// Response carrying a single membership
#[derive(Debug, Serialize)]
pub struct MemberResponse {
    /// Outcome description
    pub message: String,

    /// The membership
    pub member: BoardMember,
}

/// Response carrying a board's member list
#[derive(Debug, Serialize)]
pub struct MemberListResponse {
    /// Outcome description
    pub message: String,

    /// Members with joined profiles
    pub members: Vec<BoardMemberProfile>,
}

/// Response for operations without an entity payload
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Outcome description
    pub message: String,
}

/// Adds a user to a board by email (owner/admin)
///
/// The new member is notified. Adding an existing member is a Conflict.
pub async fn add_member(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(board_id): Path<Uuid>,
    Json(request): Json<AddMemberRequest>,
) -> ApiResult<(StatusCode, Json<MemberResponse>)> {
    request.validate()?;

    require_role(&state.db, board_id, actor.user_id, MANAGERS)
        .await
        .map_err(|e| write_denied(e, "Only owners or admins can add members"))?;

    let profile = Profile::find_by_email(&state.db, &request.email)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    if BoardMember::find(&state.db, board_id, profile.id).await?.is_some() {
        return Err(ApiError::Conflict("User is already a member".to_string()));
    }

    let role = request.role.unwrap_or(BoardRole::Member);
    let member = BoardMember::create(&state.db, board_id, profile.id, role).await?;

    tracing::info!(board_id = %board_id, user_id = %profile.id, role = role.as_str(), "Member added");

    if let Some(board) = Board::find_by_id(&state.db, board_id).await? {
        dispatch(
            &state.db,
            NotificationEvent::MemberAdded {
                user_id: profile.id,
                board_id,
                board_title: board.title,
                role,
            },
        );
    }

    Ok((
        StatusCode::CREATED,
        Json(MemberResponse {
            message: "Member added successfully".to_string(),
            member,
        }),
    ))
}

/// Lists a board's members with profiles (members only)
pub async fn get_members(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(board_id): Path<Uuid>,
) -> ApiResult<Json<MemberListResponse>> {
    require_member(&state.db, board_id, actor.user_id)
        .await
        .map_err(|e| read_denied(e, "Board not found or access denied"))?;

    let members = BoardMember::list_with_profiles(&state.db, board_id).await?;

    Ok(Json(MemberListResponse {
        message: "Members retrieved successfully".to_string(),
        members,
    }))
}

/// Changes a member's role (owner only)
pub async fn update_member_role(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path((board_id, user_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<UpdateMemberRoleRequest>,
) -> ApiResult<Json<MemberResponse>> {
    require_role(&state.db, board_id, actor.user_id, OWNER_ONLY)
        .await
        .map_err(|e| write_denied(e, "Only owners can update member roles"))?;

    let member = BoardMember::update_role(&state.db, board_id, user_id, request.role)
        .await?
        .ok_or_else(|| ApiError::NotFound("Member not found".to_string()))?;

    Ok(Json(MemberResponse {
        message: "Member role updated successfully".to_string(),
        member,
    }))
}

/// Removes a member from a board (owner only)
///
/// Removing a member never deletes the board or the member's tasks.
pub async fn remove_member(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path((board_id, user_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<MessageResponse>> {
    require_role(&state.db, board_id, actor.user_id, OWNER_ONLY)
        .await
        .map_err(|e| write_denied(e, "Only owners can remove members"))?;

    let removed = BoardMember::delete(&state.db, board_id, user_id).await?;
    if !removed {
        return Err(ApiError::NotFound("Member not found".to_string()));
    }

    Ok(Json(MessageResponse {
        message: "Member removed successfully".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_member_request_validates_email() {
        let valid = AddMemberRequest {
            email: "user@example.com".to_string(),
            role: None,
        };
        assert!(valid.validate().is_ok());

        let invalid = AddMemberRequest {
            email: "not-an-email".to_string(),
            role: None,
        };
        assert!(invalid.validate().is_err());
    }

    #[test]
    fn test_add_member_role_defaults_to_member() {
        let request: AddMemberRequest =
            serde_json::from_str(r#"{"email":"user@example.com"}"#).unwrap();
        assert_eq!(request.role.unwrap_or(BoardRole::Member), BoardRole::Member);
    }
}
