use semval::context::Context as ValidationContext;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::{
    http_err::ValidationMessage,
    identities::{
        domain::{
            email::EmailInvalidity,
            password_resets::{
                NewPasswordResetData, PasswordResetData, ResetInvalidity, TokenInvalidity,
            },
        },
        models::verifications::Verification,
    },
    passwords::PasswordInvalidity,
};

/// Read a text field, treating `null` or a value of any other JSON type as
/// empty so that only that field fails validation.
fn text_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(text),
        _ => Ok(String::new()),
    }
}

/// Body of a forgot password request. Absent or non-text fields deserialize
/// as empty so they are reported by validation.
#[derive(Default, Deserialize)]
#[serde(default)]
pub struct ForgotPasswordRequest {
    #[serde(deserialize_with = "text_or_empty")]
    pub email: String,
}

impl From<ForgotPasswordRequest> for NewPasswordResetData {
    fn from(rep: ForgotPasswordRequest) -> Self {
        Self { email: rep.email }
    }
}

#[derive(Serialize)]
pub struct ForgotPasswordResponse {
    pub verification: Verification,
}

#[derive(Default, Deserialize)]
#[serde(default)]
pub struct ResetPasswordRequest {
    #[serde(deserialize_with = "text_or_empty")]
    pub token: String,
    #[serde(deserialize_with = "text_or_empty")]
    pub password: String,
}

impl From<ResetPasswordRequest> for PasswordResetData {
    fn from(rep: ResetPasswordRequest) -> Self {
        Self {
            token: rep.token,
            password: rep.password,
        }
    }
}

pub fn validation_messages(
    validation: ValidationContext<ResetInvalidity>,
) -> Vec<ValidationMessage> {
    validation
        .into_iter()
        .map(|invalidity| match invalidity {
            ResetInvalidity::Email(EmailInvalidity::Missing) => {
                ValidationMessage::new("Email is required")
            }
            ResetInvalidity::Token(TokenInvalidity::Missing) => {
                ValidationMessage::new("Token is required")
            }
            ResetInvalidity::Password(PasswordInvalidity::Missing) => {
                ValidationMessage::new("Password is required")
            }
            ResetInvalidity::Password(PasswordInvalidity::MaxLength(max)) => {
                ValidationMessage::new(format!("Passwords may not be longer than {} bytes", max))
            }
        })
        .collect()
}
