/// Profile model
///
/// Profiles mirror the users of the external identity service. This core
/// never creates or authenticates them; it only reads the table to
/// resolve emails when adding members and to join display data into
/// member, assignee, and comment views.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Profile row populated by the identity service
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Profile {
    /// User ID, identical to the identity provider's subject
    pub id: Uuid,

    /// Display name
    pub full_name: Option<String>,

    /// Email address, unique
    pub email: String,

    /// Avatar URL
    pub avatar_url: Option<String>,

    /// When the profile was created
    pub created_at: DateTime<Utc>,
}

impl Profile {
    /// Finds a profile by user ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            SELECT id, full_name, email, avatar_url, created_at
            FROM profiles
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(profile)
    }

    /// Finds a profile by email
    ///
    /// Used by member addition, where the caller supplies an email rather
    /// than a user ID.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            SELECT id, full_name, email, avatar_url, created_at
            FROM profiles
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(profile)
    }

    /// Fetches profiles for a set of user IDs in one round trip
    pub async fn list_by_ids(pool: &PgPool, ids: &[Uuid]) -> Result<Vec<Self>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let profiles = sqlx::query_as::<_, Profile>(
            r#"
            SELECT id, full_name, email, avatar_url, created_at
            FROM profiles
            WHERE id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(pool)
        .await?;

        Ok(profiles)
    }
}
