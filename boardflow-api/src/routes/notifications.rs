/// Notification endpoints
///
/// The per-recipient feed of system-generated events. Notifications are
/// created by the dispatcher as mutations happen; these endpoints only
/// let the recipient read, acknowledge, and discard their own.
///
/// # Endpoints
///
/// - `GET    /api/notifications` - the actor's feed, newest first
/// - `PUT    /api/notifications/:id/read` - mark one as read
/// - `PUT    /api/notifications/read-all` - mark everything read
/// - `DELETE /api/notifications/:id` - delete one

use crate::app::AppState;
use crate::error::{ApiError, ApiResult};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use boardflow_shared::auth::token::Actor;
use boardflow_shared::models::notification::{Notification, NotificationFeedItem};
use serde::Serialize;
use uuid::Uuid;

/// Response carrying the actor's notification feed
#[derive(Debug, Serialize)]
pub struct NotificationListResponse {
    /// Outcome description
    pub message: String,

    /// Notifications, newest first, with board titles
    pub notifications: Vec<NotificationFeedItem>,
}

/// Response carrying one notification
#[derive(Debug, Serialize)]
pub struct NotificationResponse {
    /// Outcome description
    pub message: String,

    /// The notification
    pub notification: Notification,
}

/// Response for operations without an entity payload
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Outcome description
    pub message: String,
}

/// Lists the actor's notifications, newest first
pub async fn list_notifications(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Json<NotificationListResponse>> {
    let notifications = Notification::list_for_user(&state.db, actor.user_id).await?;

    Ok(Json(NotificationListResponse {
        message: "Notifications retrieved successfully".to_string(),
        notifications,
    }))
}

/// Marks one notification read
///
/// Someone else's notification reads the same as a nonexistent one.
pub async fn mark_read(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<NotificationResponse>> {
    let notification = Notification::mark_read(&state.db, id, actor.user_id)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound("Notification not found or access denied".to_string())
        })?;

    Ok(Json(NotificationResponse {
        message: "Notification marked as read".to_string(),
        notification,
    }))
}

/// Marks every notification of the actor as read
pub async fn mark_all_read(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Json<MessageResponse>> {
    Notification::mark_all_read(&state.db, actor.user_id).await?;

    Ok(Json(MessageResponse {
        message: "All notifications marked as read".to_string(),
    }))
}

/// Deletes one of the actor's notifications
pub async fn delete_notification(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    Notification::delete(&state.db, id, actor.user_id).await?;

    Ok(Json(MessageResponse {
        message: "Notification deleted successfully".to_string(),
    }))
}
