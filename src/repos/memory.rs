//! In-memory account and token stores for tests.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex,
    },
};

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    identities::{
        domain::verifications::VerificationPurpose,
        models::{
            users::User,
            verifications::{NewVerification, Verification},
        },
    },
    passwords::{self, Password},
};

use super::{users::UserRepo, verifications::VerificationRepo};

#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<HashMap<Uuid, User>>,
    verifications: Mutex<Vec<Verification>>,
    fail_password_updates: AtomicBool,
    fail_verification_deletes: AtomicBool,
}

impl MemoryStore {
    /// Add an account with the provided plaintext password.
    pub fn add_user(&self, email: &str, password: &str, verified: bool) -> User {
        let hash = passwords::Hash::generate(&Password::unvalidated(password.to_owned()))
            .expect("test password should hash");
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_owned(),
            password_hash: hash.as_str().to_owned(),
            verified,
            created_at: Utc::now(),
        };

        self.users
            .lock()
            .unwrap()
            .insert(user.id, user.clone());

        user
    }

    pub fn remove_user(&self, user_id: Uuid) {
        self.users.lock().unwrap().remove(&user_id);
    }

    pub fn set_verified(&self, user_id: Uuid, verified: bool) {
        if let Some(user) = self.users.lock().unwrap().get_mut(&user_id) {
            user.verified = verified;
        }
    }

    pub fn user(&self, user_id: Uuid) -> Option<User> {
        self.users.lock().unwrap().get(&user_id).cloned()
    }

    /// Determine if the stored hash for a user matches a plaintext password.
    pub fn password_matches(&self, user_id: Uuid, password: &str) -> bool {
        let user = self.user(user_id).expect("user should exist");

        passwords::Hash::parse(&user.password_hash)
            .expect("stored hash should parse")
            .verify(password)
            .expect("comparison should not error")
    }

    /// Insert a token directly, bypassing the issuing flow.
    pub fn add_verification(
        &self,
        user_id: Uuid,
        token: &str,
        purpose: VerificationPurpose,
        created_at: DateTime<Utc>,
    ) -> Verification {
        let verification = Verification {
            id: Uuid::new_v4(),
            token: token.to_owned(),
            user_id,
            purpose,
            created_at,
        };

        self.verifications
            .lock()
            .unwrap()
            .push(verification.clone());

        verification
    }

    pub fn verifications_for(&self, user_id: Uuid) -> Vec<Verification> {
        self.verifications
            .lock()
            .unwrap()
            .iter()
            .filter(|v| v.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn fail_password_updates(&self, fail: bool) {
        self.fail_password_updates.store(fail, Ordering::SeqCst);
    }

    pub fn fail_verification_deletes(&self, fail: bool) {
        self.fail_verification_deletes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn find_by_id(&self, user_id: Uuid) -> anyhow::Result<Option<User>> {
        Ok(self.user(user_id))
    }

    async fn update_password(
        &self,
        user_id: Uuid,
        hash: &passwords::Hash,
    ) -> anyhow::Result<bool> {
        if self.fail_password_updates.load(Ordering::SeqCst) {
            return Err(anyhow!("simulated password update failure"));
        }

        match self.users.lock().unwrap().get_mut(&user_id) {
            Some(user) => {
                user.password_hash = hash.as_str().to_owned();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl VerificationRepo for MemoryStore {
    async fn find_for_user(
        &self,
        user_id: Uuid,
        purpose: VerificationPurpose,
    ) -> anyhow::Result<Option<Verification>> {
        Ok(self
            .verifications
            .lock()
            .unwrap()
            .iter()
            .filter(|v| v.user_id == user_id && v.purpose == purpose)
            .max_by_key(|v| v.created_at)
            .cloned())
    }

    async fn find_by_token(
        &self,
        token: &str,
        purpose: VerificationPurpose,
    ) -> anyhow::Result<Option<Verification>> {
        Ok(self
            .verifications
            .lock()
            .unwrap()
            .iter()
            .find(|v| v.token == token && v.purpose == purpose)
            .cloned())
    }

    async fn insert(&self, verification: &NewVerification) -> anyhow::Result<Verification> {
        let mut verifications = self.verifications.lock().unwrap();

        if verifications.iter().any(|v| v.token == verification.token) {
            return Err(anyhow!("duplicate verification token"));
        }

        let stored = Verification {
            id: verification.id,
            token: verification.token.clone(),
            user_id: verification.user_id,
            purpose: verification.purpose,
            created_at: Utc::now(),
        };
        verifications.push(stored.clone());

        Ok(stored)
    }

    async fn delete(&self, verification_id: Uuid) -> anyhow::Result<bool> {
        if self.fail_verification_deletes.load(Ordering::SeqCst) {
            return Err(anyhow!("simulated verification delete failure"));
        }

        let mut verifications = self.verifications.lock().unwrap();
        let before = verifications.len();
        verifications.retain(|v| v.id != verification_id);

        Ok(verifications.len() < before)
    }

    async fn delete_for_user(
        &self,
        user_id: Uuid,
        purpose: VerificationPurpose,
    ) -> anyhow::Result<u64> {
        if self.fail_verification_deletes.load(Ordering::SeqCst) {
            return Err(anyhow!("simulated verification delete failure"));
        }

        let mut verifications = self.verifications.lock().unwrap();
        let before = verifications.len();
        verifications.retain(|v| !(v.user_id == user_id && v.purpose == purpose));

        Ok((before - verifications.len()) as u64)
    }
}
