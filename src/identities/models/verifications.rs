use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use crate::identities::domain::verifications::{VerificationPurpose, VerificationToken};

/// A verification record as persisted in the `verification` table.
#[derive(Clone, Debug, FromRow)]
pub struct VerificationRow {
    pub id: Uuid,
    pub token: String,
    pub user_id: Uuid,
    pub purpose: String,
    pub created_at: DateTime<Utc>,
}

/// An outstanding single-use verification token.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Verification {
    pub id: Uuid,
    pub token: String,
    pub user_id: Uuid,
    pub purpose: VerificationPurpose,
    pub created_at: DateTime<Utc>,
}

impl Verification {
    /// Determine if the token is older than the provided time to live.
    pub fn is_expired(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        self.created_at + ttl <= now
    }
}

impl TryFrom<VerificationRow> for Verification {
    type Error = anyhow::Error;

    fn try_from(row: VerificationRow) -> Result<Self> {
        let purpose = row
            .purpose
            .parse::<VerificationPurpose>()
            .with_context(|| format!("Verification {} has an invalid purpose.", row.id))?;

        Ok(Self {
            id: row.id,
            token: row.token,
            user_id: row.user_id,
            purpose,
            created_at: row.created_at,
        })
    }
}

/// A verification that can be inserted into the store.
#[derive(Debug)]
pub struct NewVerification {
    pub id: Uuid,
    pub token: String,
    pub user_id: Uuid,
    pub purpose: VerificationPurpose,
}

impl NewVerification {
    /// Create a verification for a user with a freshly generated token.
    ///
    /// # Arguments
    ///
    /// * `user_id` - The ID of the user the token is issued to.
    /// * `purpose` - What the token may be redeemed for.
    pub fn for_user(user_id: Uuid, purpose: VerificationPurpose) -> Self {
        Self {
            id: Uuid::new_v4(),
            token: VerificationToken::generate().into_value(),
            user_id,
            purpose,
        }
    }
}
