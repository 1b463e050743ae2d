use semval::prelude::*;

use crate::passwords::{Password, PasswordInvalidity};

use super::email::{Email, EmailInvalidity};

/// Everything that can be wrong with a password reset request.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ResetInvalidity {
    Email(EmailInvalidity),
    Token(TokenInvalidity),
    Password(PasswordInvalidity),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TokenInvalidity {
    /// No token was provided, or the token is only whitespace.
    Missing,
}

/// A reset token as supplied by a client.
#[derive(Debug)]
pub struct ProvidedToken(String);

impl ProvidedToken {
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl Validate for ProvidedToken {
    type Invalidity = TokenInvalidity;

    fn validate(&self) -> ValidationResult<Self::Invalidity> {
        ValidationContext::new()
            .invalidate_if(self.0.trim().is_empty(), TokenInvalidity::Missing)
            .into()
    }
}

/// Raw input for requesting a password reset token.
#[derive(Clone, Debug, Default)]
pub struct NewPasswordResetData {
    pub email: String,
}

/// A validated request for a password reset token.
#[derive(Debug)]
pub struct NewPasswordReset {
    email: Email,
}

impl NewPasswordReset {
    pub fn email(&self) -> &Email {
        &self.email
    }
}

impl Validate for NewPasswordReset {
    type Invalidity = ResetInvalidity;

    fn validate(&self) -> ValidationResult<Self::Invalidity> {
        ValidationContext::new()
            .validate_with(&self.email, ResetInvalidity::Email)
            .into()
    }
}

impl ValidatedFrom<NewPasswordResetData> for NewPasswordReset {
    fn validated_from(from: NewPasswordResetData) -> ValidatedResult<Self> {
        let into = Self {
            email: Email::unvalidated(from.email),
        };

        match into.validate() {
            Ok(()) => Ok(into),
            Err(context) => Err((into, context)),
        }
    }
}

/// Raw input for redeeming a password reset token.
#[derive(Clone, Default)]
pub struct PasswordResetData {
    pub token: String,
    pub password: String,
}

/// A validated token redemption carrying the new password.
#[derive(Debug)]
pub struct PasswordReset {
    token: ProvidedToken,
    password: Password,
}

impl PasswordReset {
    pub fn token(&self) -> &ProvidedToken {
        &self.token
    }

    pub fn password(&self) -> &Password {
        &self.password
    }
}

impl Validate for PasswordReset {
    type Invalidity = ResetInvalidity;

    fn validate(&self) -> ValidationResult<Self::Invalidity> {
        ValidationContext::new()
            .validate_with(&self.token, ResetInvalidity::Token)
            .validate_with(&self.password, ResetInvalidity::Password)
            .into()
    }
}

impl ValidatedFrom<PasswordResetData> for PasswordReset {
    fn validated_from(from: PasswordResetData) -> ValidatedResult<Self> {
        let into = Self {
            token: ProvidedToken(from.token),
            password: Password::unvalidated(from.password),
        };

        match into.validate() {
            Ok(()) => Ok(into),
            Err(context) => Err((into, context)),
        }
    }
}
