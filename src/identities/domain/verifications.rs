use std::str::FromStr;

use rand::{distributions::Alphanumeric, thread_rng, Rng};
use serde::Serialize;
use thiserror::Error;

const VERIFICATION_TOKEN_LENGTH: usize = 64;

/// What a verification token may be used for.
///
/// Tokens for different purposes share a store, so every lookup must be
/// scoped to a purpose.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum VerificationPurpose {
    /// Activating a newly registered account.
    AccountActivation,
    /// Resetting a forgotten password.
    PasswordReset,
}

impl VerificationPurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AccountActivation => "account-activation",
            Self::PasswordReset => "password-reset",
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown verification purpose: {0:?}")]
pub struct UnknownPurpose(String);

impl FromStr for VerificationPurpose {
    type Err = UnknownPurpose;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "account-activation" => Ok(Self::AccountActivation),
            "password-reset" => Ok(Self::PasswordReset),
            other => Err(UnknownPurpose(other.to_owned())),
        }
    }
}

/// A freshly generated, not yet persisted, verification token value.
#[derive(Debug)]
pub struct VerificationToken(String);

impl VerificationToken {
    /// Generate a new random token.
    ///
    /// Uniqueness across the store is enforced by the store, not by the
    /// generator.
    pub fn generate() -> Self {
        let token: String = thread_rng()
            .sample_iter(&Alphanumeric)
            .take(VERIFICATION_TOKEN_LENGTH)
            .map(char::from)
            .collect();

        Self(token)
    }

    pub fn into_value(self) -> String {
        self.0
    }
}
