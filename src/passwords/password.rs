use std::fmt;

use semval::prelude::*;

/// Longest accepted password, in bytes. Hashing cost grows with input size.
pub const MAX_PASSWORD_BYTES: usize = 512;

/// A plaintext password as received from a client.
pub struct Password(String);

impl Password {
    /// Wrap a raw value without checking it.
    ///
    /// The containing request is expected to be validated as a whole before
    /// the password is hashed.
    pub fn unvalidated(raw: String) -> Self {
        Self(raw)
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PasswordInvalidity {
    /// The password is empty.
    Missing,
    /// The password is longer than the contained number of bytes.
    MaxLength(usize),
}

impl Validate for Password {
    type Invalidity = PasswordInvalidity;

    fn validate(&self) -> ValidationResult<Self::Invalidity> {
        ValidationContext::new()
            .invalidate_if(self.0.is_empty(), PasswordInvalidity::Missing)
            .invalidate_if(
                self.0.len() > MAX_PASSWORD_BYTES,
                PasswordInvalidity::MaxLength(MAX_PASSWORD_BYTES),
            )
            .into()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}
