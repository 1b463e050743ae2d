use anyhow::Context;
use chrono::{Duration, Utc};
use semval::ValidatedFrom;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    passwords,
    repos::{DynUserRepo, DynVerificationRepo},
};

use super::{
    domain::{
        password_resets::{
            NewPasswordReset, NewPasswordResetData, PasswordReset, PasswordResetData,
            ResetInvalidity,
        },
        verifications::VerificationPurpose,
    },
    models::verifications::{NewVerification, Verification},
};

const RESET_PURPOSE: VerificationPurpose = VerificationPurpose::PasswordReset;

#[derive(Debug, Error)]
pub enum PasswordResetError {
    /// The request is missing required information.
    #[error("invalid password reset request: {0:?}")]
    Invalid(semval::context::Context<ResetInvalidity>),

    /// No account matches the request.
    #[error("user not found")]
    UserNotFound,

    /// The token does not exist, has already been used or superseded, or has
    /// expired.
    #[error("invalid password reset token")]
    InvalidToken,

    /// The account exists but has not been activated yet.
    #[error("account is not activated")]
    AccountNotActivated,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// A service object issuing and redeeming password reset tokens.
#[derive(Clone)]
pub struct PasswordResetService {
    token_ttl: Option<Duration>,
    user_repo: DynUserRepo,
    verification_repo: DynVerificationRepo,
}

impl PasswordResetService {
    /// Create a new password reset service.
    ///
    /// # Arguments
    ///
    /// * `user_repo` - The repository used to query and update accounts.
    /// * `verification_repo` - The repository used to persist and query
    ///   verification tokens.
    /// * `token_ttl` - How long a reset token may be redeemed after it is
    ///   issued. Tokens never expire if this is [`None`].
    pub fn new(
        user_repo: DynUserRepo,
        verification_repo: DynVerificationRepo,
        token_ttl: Option<Duration>,
    ) -> Self {
        Self {
            token_ttl,
            user_repo,
            verification_repo,
        }
    }

    /// Issue a password reset token for the account owning an email address.
    ///
    /// Every token previously issued to the account for resetting its
    /// password is superseded. Removing the old token is best-effort; failing to do so
    /// does not prevent the new token from being issued.
    ///
    /// # Returns
    ///
    /// The newly stored verification. Delivering the token to the user is the
    /// caller's responsibility.
    pub async fn issue_reset_token(
        &self,
        data: NewPasswordResetData,
    ) -> Result<Verification, PasswordResetError> {
        let reset = NewPasswordReset::validated_from(data)
            .map_err(|(_, context)| PasswordResetError::Invalid(context))?;

        let user = self
            .user_repo
            .find_by_email(reset.email().address())
            .await
            .context("Failed to find user by email.")?
            .ok_or(PasswordResetError::UserNotFound)?;

        if !user.verified {
            debug!(user_id = %user.id, "Refusing password reset for inactive account.");

            return Err(PasswordResetError::AccountNotActivated);
        }

        let previous = self
            .verification_repo
            .find_for_user(user.id, RESET_PURPOSE)
            .await
            .context("Failed to query for previous password reset token.")?;

        // Also clears tokens left behind by concurrent issues.
        if let Some(previous) = previous {
            match self
                .verification_repo
                .delete_for_user(user.id, RESET_PURPOSE)
                .await
            {
                Ok(deleted) => {
                    debug!(user_id = %user.id, verification_id = %previous.id, deleted, "Deleted superseded password reset tokens.")
                }
                Err(error) => {
                    warn!(?error, user_id = %user.id, verification_id = %previous.id, "Failed to delete superseded password reset tokens.")
                }
            }
        }

        let verification = self
            .verification_repo
            .insert(&NewVerification::for_user(user.id, RESET_PURPOSE))
            .await
            .context("Failed to save password reset token.")?;

        info!(user_id = %user.id, verification_id = %verification.id, "Issued password reset token.");

        Ok(verification)
    }

    /// Redeem a password reset token, replacing the owning account's password.
    ///
    /// The token is only deleted once the new password has been stored, so a
    /// failed update leaves the token usable for another attempt.
    pub async fn redeem_reset_token(
        &self,
        data: PasswordResetData,
    ) -> Result<(), PasswordResetError> {
        let reset = PasswordReset::validated_from(data)
            .map_err(|(_, context)| PasswordResetError::Invalid(context))?;

        let verification = self
            .verification_repo
            .find_by_token(reset.token().value(), RESET_PURPOSE)
            .await
            .context("Failed to query for password reset token.")?
            .ok_or(PasswordResetError::InvalidToken)?;

        if let Some(ttl) = self.token_ttl {
            if verification.is_expired(ttl, Utc::now()) {
                debug!(verification_id = %verification.id, "Rejected expired password reset token.");

                return Err(PasswordResetError::InvalidToken);
            }
        }

        let user = match self
            .user_repo
            .find_by_id(verification.user_id)
            .await
            .context("Failed to find user by ID.")?
        {
            Some(user) => user,
            None => {
                warn!(user_id = %verification.user_id, verification_id = %verification.id, "Password reset token belongs to a missing user.");

                return Err(PasswordResetError::UserNotFound);
            }
        };

        if !user.verified {
            debug!(user_id = %user.id, "Refusing password reset for inactive account.");

            return Err(PasswordResetError::AccountNotActivated);
        }

        let hash = passwords::Hash::generate(reset.password()).context("Failed to hash password.")?;

        let updated = self
            .user_repo
            .update_password(user.id, &hash)
            .await
            .context("Failed to update user's password.")?;

        if !updated {
            warn!(user_id = %user.id, "User disappeared before their password could be updated.");

            return Err(PasswordResetError::UserNotFound);
        }

        debug!(user_id = %user.id, "Changed user's password using reset token.");

        self.verification_repo
            .delete(verification.id)
            .await
            .context("Failed to delete redeemed password reset token.")?;

        debug!(user_id = %user.id, "Deleted password reset token.");
        info!(user_id = %user.id, "Reset user's password.");

        Ok(())
    }
}
