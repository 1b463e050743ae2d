use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    database::PostgresConnection,
    identities::{
        domain::verifications::VerificationPurpose,
        models::verifications::{NewVerification, Verification, VerificationRow},
    },
};

pub type DynVerificationRepo = Arc<dyn VerificationRepo + Send + Sync>;

/// The token store.
///
/// Each operation is a single statement, so callers combining them get no
/// transactional guarantees.
#[async_trait]
pub trait VerificationRepo {
    /// Find the outstanding token issued to a user for a purpose.
    async fn find_for_user(
        &self,
        user_id: Uuid,
        purpose: VerificationPurpose,
    ) -> anyhow::Result<Option<Verification>>;

    /// Find a token by its value, scoped to a purpose.
    async fn find_by_token(
        &self,
        token: &str,
        purpose: VerificationPurpose,
    ) -> anyhow::Result<Option<Verification>>;

    /// Persist a new token.
    ///
    /// # Returns
    ///
    /// An [`anyhow::Result`] containing the stored record, including its
    /// store-assigned creation time.
    async fn insert(&self, verification: &NewVerification) -> anyhow::Result<Verification>;

    /// Delete a token by its ID.
    ///
    /// # Returns
    ///
    /// An [`anyhow::Result`] containing `true` if a record was deleted.
    async fn delete(&self, verification_id: Uuid) -> anyhow::Result<bool>;

    /// Delete every token issued to a user for a purpose.
    ///
    /// # Returns
    ///
    /// An [`anyhow::Result`] containing the number of records deleted.
    async fn delete_for_user(
        &self,
        user_id: Uuid,
        purpose: VerificationPurpose,
    ) -> anyhow::Result<u64>;
}

#[async_trait]
impl VerificationRepo for PostgresConnection {
    async fn find_for_user(
        &self,
        user_id: Uuid,
        purpose: VerificationPurpose,
    ) -> anyhow::Result<Option<Verification>> {
        let row = sqlx::query_as::<_, VerificationRow>(
            r#"
            SELECT id, token, user_id, purpose, created_at
            FROM verification
            WHERE user_id = $1 AND purpose = $2
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(purpose.as_str())
        .fetch_optional(&**self)
        .await?;

        row.map(Verification::try_from).transpose()
    }

    async fn find_by_token(
        &self,
        token: &str,
        purpose: VerificationPurpose,
    ) -> anyhow::Result<Option<Verification>> {
        let row = sqlx::query_as::<_, VerificationRow>(
            r#"
            SELECT id, token, user_id, purpose, created_at
            FROM verification
            WHERE token = $1 AND purpose = $2
            "#,
        )
        .bind(token)
        .bind(purpose.as_str())
        .fetch_optional(&**self)
        .await?;

        row.map(Verification::try_from).transpose()
    }

    async fn insert(&self, verification: &NewVerification) -> anyhow::Result<Verification> {
        let row = sqlx::query_as::<_, VerificationRow>(
            r#"
            INSERT INTO verification (id, token, user_id, purpose)
            VALUES ($1, $2, $3, $4)
            RETURNING id, token, user_id, purpose, created_at
            "#,
        )
        .bind(verification.id)
        .bind(&verification.token)
        .bind(verification.user_id)
        .bind(verification.purpose.as_str())
        .fetch_one(&**self)
        .await?;

        row.try_into()
    }

    async fn delete(&self, verification_id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM verification
            WHERE id = $1
            "#,
        )
        .bind(verification_id)
        .execute(&**self)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_for_user(
        &self,
        user_id: Uuid,
        purpose: VerificationPurpose,
    ) -> anyhow::Result<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM verification
            WHERE user_id = $1 AND purpose = $2
            "#,
        )
        .bind(user_id)
        .bind(purpose.as_str())
        .execute(&**self)
        .await?;

        Ok(result.rows_affected())
    }
}
