/// Error handling for the API server
///
/// This module provides a unified error type that maps to HTTP responses.
/// All handlers return `Result<T, ApiError>` which converts into the wire
/// contract used by every endpoint:
///
/// ```json
/// { "message": "Only owners can delete boards", "statusCode": 403 }
/// ```
///
/// Board-scoped **read** paths deliberately collapse "no such row" and
/// "row exists but the caller is not a member" into the same NotFound
/// response so that existence is never leaked to non-members. Write paths
/// distinguish the two: absent rows are NotFound, insufficient roles are
/// Forbidden. The helpers at the bottom encode that policy.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use boardflow_shared::auth::{AccessError, TokenError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400) - missing or malformed fields
    BadRequest(String),

    /// Unauthorized (401) - missing or invalid bearer token
    Unauthorized(String),

    /// Forbidden (403) - actor resolved but role insufficient
    Forbidden(String),

    /// Not found (404) - absent row, or board-scoped read by a non-member
    NotFound(String),

    /// Conflict (409) - e.g. duplicate membership or assignment
    Conflict(String),

    /// Unprocessable entity (422) - field-level validation errors
    Validation(Vec<ValidationErrorDetail>),

    /// Internal server error (500) - unclassified persistence failure
    Internal(String),
}

/// Validation error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response wire format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub message: String,

    /// HTTP status code, duplicated in the body
    #[serde(rename = "statusCode")]
    pub status_code: u16,

    /// Field-level validation errors, when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ValidationErrorDetail>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::Validation(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, None),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg, None),
            ApiError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::Internal(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            message,
            status_code: status.as_u16(),
            errors,
        });

        (status, body).into_response()
    }
}

/// Convert sqlx errors to API errors
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                if db_err.constraint().is_some() {
                    return ApiError::Conflict("Resource already exists".to_string());
                }
                ApiError::Internal(format!("Database error: {}", db_err))
            }
            _ => ApiError::Internal(format!("Database error: {}", err)),
        }
    }
}

/// Convert token errors to API errors
impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => ApiError::Unauthorized("Token expired".to_string()),
            TokenError::Invalid(_) => ApiError::Unauthorized("Invalid token".to_string()),
        }
    }
}

/// Convert validator errors into the field-level validation response
impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        let errors: Vec<ValidationErrorDetail> = err
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| ValidationErrorDetail {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                })
            })
            .collect();

        ApiError::Validation(errors)
    }
}

/// Maps an access failure on a **write** path
///
/// Absent membership and insufficient role both become Forbidden with the
/// operation-specific message; database failures stay Internal.
pub fn write_denied(err: AccessError, message: &str) -> ApiError {
    match err {
        AccessError::Db(e) => e.into(),
        AccessError::NotMember(_) | AccessError::RoleDenied { .. } => {
            ApiError::Forbidden(message.to_string())
        }
    }
}

/// Maps an access failure on a **read** path
///
/// Collapses "not a member" into NotFound so reads never reveal whether a
/// board-scoped resource exists; database failures stay Internal.
pub fn read_denied(err: AccessError, message: &str) -> ApiError {
    match err {
        AccessError::Db(e) => e.into(),
        AccessError::NotMember(_) | AccessError::RoleDenied { .. } => {
            ApiError::NotFound(message.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("Title is required".to_string());
        assert_eq!(err.to_string(), "Bad request: Title is required");

        let err = ApiError::NotFound("Board not found".to_string());
        assert_eq!(err.to_string(), "Not found: Board not found");
    }

    #[test]
    fn test_error_response_carries_status_code() {
        let body = ErrorResponse {
            message: "Only owners can delete boards".to_string(),
            status_code: 403,
            errors: None,
        };

        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("\"statusCode\":403"));
        assert!(!json.contains("errors"));
    }

    #[test]
    fn test_write_denied_maps_to_forbidden() {
        let err = write_denied(
            AccessError::NotMember(Uuid::new_v4()),
            "Only owners or admins can update boards",
        );
        assert!(matches!(err, ApiError::Forbidden(_)));
    }

    #[test]
    fn test_read_denied_collapses_to_not_found() {
        let err = read_denied(
            AccessError::NotMember(Uuid::new_v4()),
            "Board not found or access denied",
        );
        assert!(matches!(err, ApiError::NotFound(msg) if msg.contains("access denied")));
    }

    #[test]
    fn test_sqlx_row_not_found_maps_to_not_found() {
        let err: ApiError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
