/// Board access control
///
/// Every board-scoped operation authorizes here instead of re-deriving
/// membership queries in each handler. The caller resolves the effective
/// board ID first (columns through their board, tasks through their
/// parent column), then checks the actor's role against the explicit set
/// of roles the operation admits.
///
/// Role sets rather than a ranking: the permission model is not a strict
/// ladder. Owners and admins manage boards, columns, and tasks, but
/// member removal and role changes are owner-only, and task updates also
/// admit the task's assignees regardless of role. See the constants in
/// [`crate::models::member`].
///
/// # Example
///
/// ```no_run
/// use boardflow_shared::auth::access::require_role;
/// use boardflow_shared::models::member::MANAGERS;
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, board_id: Uuid, user_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// // Only owners and admins may delete columns
/// require_role(&pool, board_id, user_id, MANAGERS).await?;
/// # Ok(())
/// # }
/// ```

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::member::{BoardMember, BoardRole, ANY_MEMBER};

/// Error type for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    /// Actor has no membership on the board
    #[error("Not a member of board {0}")]
    NotMember(Uuid),

    /// Actor is a member but the role is not in the admitted set
    #[error("Role {actual:?} may not perform this operation")]
    RoleDenied {
        /// The actor's actual role
        actual: BoardRole,
    },

    /// Database error while resolving the membership
    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),
}

/// Checks a resolved role against an admitted role set
///
/// The pure core of every authorization decision, separated from the
/// membership lookup so it can be tested without a database.
pub fn check_role(
    board_id: Uuid,
    found: Option<BoardRole>,
    allowed: &[BoardRole],
) -> Result<BoardRole, AccessError> {
    match found {
        None => Err(AccessError::NotMember(board_id)),
        Some(role) if allowed.contains(&role) => Ok(role),
        Some(role) => Err(AccessError::RoleDenied { actual: role }),
    }
}

/// Resolves a user's role on a board, if any
pub async fn resolve_role(
    pool: &PgPool,
    board_id: Uuid,
    user_id: Uuid,
) -> Result<Option<BoardRole>, sqlx::Error> {
    BoardMember::get_role(pool, board_id, user_id).await
}

/// Requires the actor to hold one of the admitted roles on the board
///
/// Returns the actor's role on success.
///
/// # Errors
///
/// `AccessError::NotMember` if the actor has no membership,
/// `AccessError::RoleDenied` if the role is outside the admitted set.
pub async fn require_role(
    pool: &PgPool,
    board_id: Uuid,
    user_id: Uuid,
    allowed: &[BoardRole],
) -> Result<BoardRole, AccessError> {
    let found = resolve_role(pool, board_id, user_id).await?;
    check_role(board_id, found, allowed)
}

/// Requires any membership on the board
pub async fn require_member(
    pool: &PgPool,
    board_id: Uuid,
    user_id: Uuid,
) -> Result<BoardRole, AccessError> {
    require_role(pool, board_id, user_id, ANY_MEMBER).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::member::{MANAGERS, OWNER_ONLY};

    #[test]
    fn test_check_role_non_member_always_denied() {
        let board_id = Uuid::new_v4();

        for allowed in [OWNER_ONLY, MANAGERS, ANY_MEMBER] {
            let result = check_role(board_id, None, allowed);
            assert!(matches!(result, Err(AccessError::NotMember(id)) if id == board_id));
        }
    }

    #[test]
    fn test_check_role_owner_only() {
        let board_id = Uuid::new_v4();

        assert!(check_role(board_id, Some(BoardRole::Owner), OWNER_ONLY).is_ok());
        assert!(matches!(
            check_role(board_id, Some(BoardRole::Admin), OWNER_ONLY),
            Err(AccessError::RoleDenied {
                actual: BoardRole::Admin
            })
        ));
        assert!(check_role(board_id, Some(BoardRole::Member), OWNER_ONLY).is_err());
    }

    #[test]
    fn test_check_role_managers() {
        let board_id = Uuid::new_v4();

        assert!(check_role(board_id, Some(BoardRole::Owner), MANAGERS).is_ok());
        assert!(check_role(board_id, Some(BoardRole::Admin), MANAGERS).is_ok());
        assert!(matches!(
            check_role(board_id, Some(BoardRole::Member), MANAGERS),
            Err(AccessError::RoleDenied {
                actual: BoardRole::Member
            })
        ));
    }

    #[test]
    fn test_check_role_any_member() {
        let board_id = Uuid::new_v4();

        assert!(check_role(board_id, Some(BoardRole::Owner), ANY_MEMBER).is_ok());
        assert!(check_role(board_id, Some(BoardRole::Admin), ANY_MEMBER).is_ok());
        assert!(check_role(board_id, Some(BoardRole::Member), ANY_MEMBER).is_ok());
    }

    #[test]
    fn test_check_role_returns_the_actual_role() {
        let board_id = Uuid::new_v4();

        let role = check_role(board_id, Some(BoardRole::Admin), MANAGERS).unwrap();
        assert_eq!(role, BoardRole::Admin);
    }
}
