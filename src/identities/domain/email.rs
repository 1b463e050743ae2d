use semval::prelude::*;

/// The address a password reset is requested for.
///
/// Only presence is checked. Whether the address belongs to an account is
/// decided by looking it up.
#[derive(Debug, Eq, PartialEq)]
pub struct Email(String);

impl Email {
    pub fn unvalidated(address: String) -> Self {
        Self(address)
    }

    pub fn address(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EmailInvalidity {
    /// Empty or whitespace only.
    Missing,
}

impl Validate for Email {
    type Invalidity = EmailInvalidity;

    fn validate(&self) -> ValidationResult<Self::Invalidity> {
        let blank = self.0.chars().all(char::is_whitespace);

        ValidationContext::new()
            .invalidate_if(blank, EmailInvalidity::Missing)
            .into()
    }
}
