use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{database::PostgresConnection, identities::models::users::User, passwords};

pub type DynUserRepo = Arc<dyn UserRepo + Send + Sync>;

/// The account store.
#[async_trait]
pub trait UserRepo {
    /// Find the account owning an email address.
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;

    /// Find an account by its ID.
    async fn find_by_id(&self, user_id: Uuid) -> anyhow::Result<Option<User>>;

    /// Replace an account's stored password hash.
    ///
    /// # Returns
    ///
    /// An [`anyhow::Result`] containing `true` if an account was updated or
    /// `false` if no account has the provided ID.
    async fn update_password(&self, user_id: Uuid, hash: &passwords::Hash)
        -> anyhow::Result<bool>;
}

#[async_trait]
impl UserRepo for PostgresConnection {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password, verified, created_at
            FROM "user"
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&**self)
        .await?;

        Ok(user)
    }

    async fn find_by_id(&self, user_id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password, verified, created_at
            FROM "user"
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&**self)
        .await?;

        Ok(user)
    }

    async fn update_password(
        &self,
        user_id: Uuid,
        hash: &passwords::Hash,
    ) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE "user"
            SET password = $1
            WHERE id = $2
            "#,
        )
        .bind(hash.as_str())
        .bind(user_id)
        .execute(&**self)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
