//! Argon2id password hashing for account signup and login.

use std::sync::OnceLock;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use yatube_core::ports::{AuthError, PasswordService};

/// Plain text hashed once to give unknown-user logins something to verify against.
const DUMMY_PASSWORD: &str = "yatube-unknown-user";

/// Hashes account passwords into PHC strings (`$argon2id$...`) stored on the user row.
pub struct Argon2PasswordService {
    argon2: Argon2<'static>,
    dummy_hash: OnceLock<Option<String>>,
}

impl Argon2PasswordService {
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
            dummy_hash: OnceLock::new(),
        }
    }

    /// Hash used for logins that name no account, computed on first use.
    fn dummy_hash(&self) -> Option<&str> {
        self.dummy_hash
            .get_or_init(|| match self.hash(DUMMY_PASSWORD) {
                Ok(hash) => Some(hash),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to prepare dummy password hash");
                    None
                }
            })
            .as_deref()
    }
}

impl Default for Argon2PasswordService {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordService for Argon2PasswordService {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::HashingError(e.to_string()))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let stored = PasswordHash::new(hash).map_err(|e| {
            tracing::warn!(error = %e, "Stored password hash is not a PHC string");
            AuthError::HashingError(e.to_string())
        })?;

        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &stored)
            .is_ok())
    }

    fn verify_unknown_user(&self, password: &str) {
        if let Some(hash) = self.dummy_hash() {
            // Result discarded.
            let _ = self.verify(password, hash);
        }
    }
}
