//! Account signup and login.

use std::sync::Arc;

use crate::domain::User;
use crate::error::{DomainError, FieldErrors, RepoError};
use crate::ports::{PasswordService, TokenService, UserRepository};

use super::post::REQUIRED;

const MAX_NAME_LEN: usize = 150;
const MIN_PASSWORD_LEN: usize = 8;
const USERNAME_TAKEN: &str = "A user with that username already exists.";

/// Usernames that would shadow fixed routes.
const RESERVED_USERNAMES: &[&str] = &["new", "follow", "group", "auth", "health"];

#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// An authenticated session.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    pub token: String,
    pub expires_in: i64,
}

#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
    tokens: Arc<dyn TokenService>,
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            passwords,
            tokens,
        }
    }

    /// Register a user and open a session for them.
    pub async fn signup(&self, form: SignupForm) -> Result<Session, DomainError> {
        let mut errors = validate_signup(&form);

        let username = form.username.trim();
        if !errors.contains("username") && self.users.find_by_username(username).await?.is_some() {
            errors.add("username", USERNAME_TAKEN);
        }
        errors.into_result()?;

        let password_hash = self
            .passwords
            .hash(&form.password)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let user = User::new(
            username.to_string(),
            form.first_name.trim().to_string(),
            form.last_name.trim().to_string(),
            password_hash,
        );

        let user = match self.users.save(user).await {
            Ok(user) => user,
            Err(RepoError::Constraint(_)) => {
                return Err(DomainError::Validation(FieldErrors::single(
                    "username",
                    USERNAME_TAKEN,
                )));
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!(user_id = user.id, "User signed up");
        self.open_session(user)
    }

    /// Check credentials and open a session.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, DomainError> {
        let Some(user) = self.users.find_by_username(username.trim()).await? else {
            self.passwords.verify_unknown_user(password);
            tracing::debug!("Rejected login for unknown username");
            return Err(DomainError::Unauthorized);
        };

        let valid = self
            .passwords
            .verify(password, &user.password_hash)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        if !valid {
            tracing::debug!(user_id = user.id, "Rejected login with wrong password");
            return Err(DomainError::Unauthorized);
        }

        self.open_session(user)
    }

    fn open_session(&self, user: User) -> Result<Session, DomainError> {
        let token = self
            .tokens
            .generate_token(user.id, &user.username)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        Ok(Session {
            user,
            token,
            expires_in: self.tokens.expiration_seconds(),
        })
    }
}

fn validate_signup(form: &SignupForm) -> FieldErrors {
    let mut errors = FieldErrors::new();
    let username = form.username.trim();

    if username.is_empty() {
        errors.add("username", REQUIRED);
    } else if username.chars().count() > MAX_NAME_LEN
        || !username
            .chars()
            .all(|c| c.is_alphanumeric() || "@.+-_".contains(c))
    {
        errors.add(
            "username",
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
        );
    } else if RESERVED_USERNAMES.contains(&username.to_lowercase().as_str()) {
        errors.add("username", "This username is reserved.");
    }

    if form.password.is_empty() {
        errors.add("password", REQUIRED);
    } else if form.password.chars().count() < MIN_PASSWORD_LEN {
        errors.add(
            "password",
            "This password is too short. It must contain at least 8 characters.",
        );
    }

    for (field, value) in [("first_name", &form.first_name), ("last_name", &form.last_name)] {
        if value.chars().count() > MAX_NAME_LEN {
            errors.add(field, "Ensure this value has at most 150 characters.");
        }
    }

    errors
}
