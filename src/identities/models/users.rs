use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// An account as persisted in the `"user"` table.
#[derive(Clone, Debug, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[sqlx(rename = "password")]
    pub password_hash: String,
    /// Whether the account has been activated. Password flows are refused for
    /// accounts that have not been.
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}
