//! Wiring of the session and task stores over one backend.
//!
//! The task collection follows the session: it is reloaded whenever the
//! signed-in user changes and emptied on logout.

use std::sync::Arc;

use crate::clock::Clock;
use crate::config::Config;
use crate::error::Result;
use crate::model::User;
use crate::session::{AuthState, SessionStore};
use crate::storage::KeyValueStore;
use crate::task::TaskStore;

#[derive(Debug, Clone)]
pub struct App {
    session: SessionStore,
    tasks: TaskStore,
}

impl App {
    pub fn new(backend: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>, config: &Config) -> Self {
        Self {
            session: SessionStore::new(backend.clone(), clock.clone(), config),
            tasks: TaskStore::new(backend, clock, config),
        }
    }

    /// Restore the persisted session and load its tasks
    pub fn start(&mut self) -> Result<AuthState> {
        let state = self.session.restore()?;
        self.tasks.load(state.user.as_ref())?;
        Ok(state)
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<User> {
        let user = self.session.login(email, password).await?;
        self.tasks.load(Some(&user))?;
        Ok(user)
    }

    pub async fn signup(&mut self, name: &str, email: &str, password: &str) -> Result<User> {
        let user = self.session.signup(name, email, password).await?;
        self.tasks.load(Some(&user))?;
        Ok(user)
    }

    /// Sign out and drop the user's stored tasks (see [`SessionStore::logout`])
    pub fn logout(&mut self) -> Result<()> {
        self.session.logout()?;
        self.tasks.load(None)?;
        Ok(())
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn tasks(&self) -> &TaskStore {
        &self.tasks
    }

    pub fn tasks_mut(&mut self) -> &mut TaskStore {
        &mut self.tasks
    }
}
