use anyhow::Result;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use password_hash::SaltString;
use rand_core::OsRng;

use super::Password;

/// A salted argon2 password hash in PHC string format, as stored in the
/// `password` column of the `"user"` table.
#[derive(Clone, Debug)]
pub struct Hash(String);

impl Hash {
    /// Hash a password using a freshly generated random salt.
    pub fn generate(password: &Password) -> Result<Self> {
        let salt = SaltString::generate(&mut OsRng);
        let phc = Argon2::default()
            .hash_password(password.as_bytes(), salt.as_ref())?
            .to_string();

        Ok(Self(phc))
    }

    /// Load a hash that was previously persisted.
    ///
    /// # Returns
    ///
    /// An [`Err`] if `stored` is not a well-formed PHC string.
    pub fn parse(stored: &str) -> Result<Self> {
        PasswordHash::new(stored)?;

        Ok(Self(stored.to_owned()))
    }

    /// Check a plaintext password against the hash.
    ///
    /// A mismatch is `Ok(false)`; only malformed hashes or hasher failures
    /// produce an [`Err`].
    pub fn verify(&self, candidate: &str) -> Result<bool> {
        let parsed = PasswordHash::new(&self.0)?;

        match Argon2::default().verify_password(candidate.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(other) => Err(other.into()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
