//! Session store: the signed-in identity.
//!
//! Authentication is mocked. Credentials are only checked for shape
//! (non-empty fields, minimum password length) and nothing is hashed or
//! verified against stored accounts. The resulting [`User`] is persisted
//! under the configured session key so it survives restarts.

use std::sync::Arc;

use serde::Serialize;

use crate::clock::Clock;
use crate::config::{AuthConfig, Config, LatencyConfig, StorageConfig};
use crate::error::{AuthError, Result};
use crate::model::User;
use crate::storage::{self, Decoded, KeyValueStore};

/// Id given to every account that signs in through `login`
pub const LOGIN_USER_ID: &str = "1";

/// Snapshot of the authentication state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuthState {
    pub user: Option<User>,
    pub authenticated: bool,
}

impl AuthState {
    pub fn signed_in(user: User) -> Self {
        Self {
            user: Some(user),
            authenticated: true,
        }
    }

    pub fn signed_out() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone)]
pub struct SessionStore {
    backend: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    storage: StorageConfig,
    auth: AuthConfig,
    latency: LatencyConfig,
    state: AuthState,
}

impl SessionStore {
    /// Create a signed-out store; call [`SessionStore::restore`] to pick up
    /// a persisted session.
    pub fn new(backend: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>, config: &Config) -> Self {
        Self {
            backend,
            clock,
            storage: config.storage.clone(),
            auth: config.auth.clone(),
            latency: config.latency.clone(),
            state: AuthState::signed_out(),
        }
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn user(&self) -> Option<&User> {
        self.state.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.authenticated
    }

    /// Load the persisted session.
    ///
    /// A stored value that does not parse as a user is deleted and the
    /// store stays signed out.
    pub fn restore(&mut self) -> Result<AuthState> {
        let key = &self.storage.session_key;
        self.state = match storage::read_json::<User>(self.backend.as_ref(), key)? {
            Decoded::Valid(user) => {
                tracing::debug!(user_id = %user.id, "restored session");
                AuthState::signed_in(user)
            }
            Decoded::Missing => AuthState::signed_out(),
            Decoded::Corrupt(err) => {
                tracing::warn!(key = %key, error = %err, "discarding corrupt session");
                self.backend.remove(key)?;
                AuthState::signed_out()
            }
        };
        Ok(self.state.clone())
    }

    /// Sign in with any non-empty email and a long-enough password.
    ///
    /// The user's name is the email's local-part.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<User> {
        self.clock.sleep(self.latency.login()).await;

        if email.is_empty() || !self.password_ok(password) {
            tracing::debug!("login rejected");
            return Err(AuthError::InvalidCredentials.into());
        }

        let user = User {
            id: LOGIN_USER_ID.to_string(),
            email: email.to_string(),
            name: self.name_from_email(email),
        };
        self.persist(user)
    }

    /// Create an account from a name, email and long-enough password.
    ///
    /// The id is the current time in milliseconds since the epoch.
    pub async fn signup(&mut self, name: &str, email: &str, password: &str) -> Result<User> {
        self.clock.sleep(self.latency.signup()).await;

        if name.is_empty() || email.is_empty() || !self.password_ok(password) {
            tracing::debug!("signup rejected");
            return Err(AuthError::InvalidFields.into());
        }

        let user = User {
            id: self.clock.now().timestamp_millis().to_string(),
            email: email.to_string(),
            name: name.to_string(),
        };
        self.persist(user)
    }

    /// Sign out.
    ///
    /// This also deletes the signed-in user's task collection from storage.
    /// Tasks do not survive a logout. The owner is the current user, else
    /// the persisted one; when neither is known every per-user collection
    /// is deleted.
    pub fn logout(&mut self) -> Result<()> {
        let user_id = match &self.state.user {
            Some(user) => Some(user.id.clone()),
            None => self.persisted_user_id()?,
        };

        self.backend.remove(&self.storage.session_key)?;
        for key in self.owned_task_keys(user_id.as_deref())? {
            self.backend.remove(&key)?;
            tracing::debug!(tasks_key = %key, "removed tasks");
        }
        tracing::debug!(user_id = ?user_id, "logged out");
        self.state = AuthState::signed_out();
        Ok(())
    }

    fn persisted_user_id(&self) -> Result<Option<String>> {
        let stored = storage::read_json::<User>(self.backend.as_ref(), &self.storage.session_key)?;
        Ok(stored.valid().map(|user| user.id))
    }

    fn owned_task_keys(&self, user_id: Option<&str>) -> Result<Vec<String>> {
        if !self.storage.partition_by_user {
            return Ok(vec![self.storage.tasks_key.clone()]);
        }
        match user_id {
            Some(id) => Ok(vec![self.storage.tasks_key_for(id)]),
            None => self
                .backend
                .keys_with_prefix(&format!("{}:", self.storage.tasks_key)),
        }
    }

    fn password_ok(&self, password: &str) -> bool {
        password.chars().count() >= self.auth.min_password_len
    }

    fn name_from_email(&self, email: &str) -> String {
        match email.split('@').next() {
            Some(local) if !local.is_empty() => local.to_string(),
            _ => self.auth.fallback_name.clone(),
        }
    }

    fn persist(&mut self, user: User) -> Result<User> {
        storage::write_json(self.backend.as_ref(), &self.storage.session_key, &user)?;
        tracing::debug!(user_id = %user.id, "session persisted");
        self.state = AuthState::signed_in(user.clone());
        Ok(user)
    }
}
