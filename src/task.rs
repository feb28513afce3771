//! Task management for todoapp.
//!
//! The collection for the signed-in user is kept in memory, newest first,
//! and every mutation rewrites the whole collection as a single JSON array
//! under the user's task key.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;

use crate::clock::Clock;
use crate::config::{Config, LatencyConfig, StorageConfig};
use crate::error::{Error, Result};
use crate::filter::{self, TaskFilters};
use crate::model::{self, NewTask, Task, TaskPatch, TaskPriority, TaskStatus, User};
use crate::storage::{self, Decoded, KeyValueStore};

/// Counters shown above the task list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    /// High priority tasks that are still pending
    pub high_priority: usize,
}

impl TaskStats {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        tasks.iter().fold(Self::default(), |mut stats, task| {
            stats.total += 1;
            match task.status {
                TaskStatus::Done => stats.completed += 1,
                TaskStatus::Pending => {
                    stats.pending += 1;
                    if task.priority == TaskPriority::High {
                        stats.high_priority += 1;
                    }
                }
            }
            stats
        })
    }
}

#[derive(Debug, Clone)]
pub struct TaskStore {
    backend: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    storage: StorageConfig,
    latency: LatencyConfig,
    user: Option<User>,
    tasks: Vec<Task>,
}

impl TaskStore {
    /// Create an empty store with nobody signed in
    pub fn new(backend: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>, config: &Config) -> Self {
        Self {
            backend,
            clock,
            storage: config.storage.clone(),
            latency: config.latency.clone(),
            user: None,
            tasks: Vec::new(),
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Tasks in collection order (newest additions first)
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Storage key of the loaded user's collection
    pub fn storage_key(&self) -> Option<String> {
        self.user
            .as_ref()
            .map(|user| self.storage.tasks_key_for(&user.id))
    }

    /// Load the collection for `user`.
    ///
    /// With no user the in-memory collection is emptied. A user without a
    /// stored collection gets the demo tasks, which are persisted. A stored
    /// collection that fails to parse is replaced by the demo tasks in memory
    /// only; the next mutation overwrites it.
    pub fn load(&mut self, user: Option<&User>) -> Result<&[Task]> {
        self.user = user.cloned();
        let Some(user) = user else {
            self.tasks.clear();
            return Ok(&self.tasks);
        };

        let key = self.storage.tasks_key_for(&user.id);
        self.tasks = match storage::read_json::<Vec<Task>>(self.backend.as_ref(), &key)? {
            Decoded::Valid(tasks) => {
                tracing::debug!(key = %key, count = tasks.len(), "loaded tasks");
                tasks
            }
            Decoded::Missing => {
                let seed = demo_tasks(&user.id);
                storage::write_json(self.backend.as_ref(), &key, &seed)?;
                tracing::debug!(key = %key, count = seed.len(), "seeded demo tasks");
                seed
            }
            Decoded::Corrupt(err) => {
                tracing::warn!(key = %key, error = %err, "stored tasks are corrupt; using demo tasks");
                demo_tasks(&user.id)
            }
        };
        Ok(&self.tasks)
    }

    /// Create a task for the signed-in user and put it at the front.
    ///
    /// Returns `None` without doing anything when nobody is signed in.
    pub async fn add(&mut self, new: NewTask) -> Result<Option<Task>> {
        let Some(user_id) = self.user.as_ref().map(|user| user.id.clone()) else {
            tracing::debug!("add ignored: not signed in");
            return Ok(None);
        };

        self.clock.sleep(self.latency.add()).await;

        let now = self.clock.now();
        let task = Task::from_new(new, model::new_task_id(now), user_id, now);
        self.tasks.insert(0, task.clone());
        self.persist()?;
        tracing::debug!(task_id = %task.id, "task added");
        Ok(Some(task))
    }

    /// Merge `patch` into the task with `id`.
    ///
    /// Returns the updated task, or `None` when no task has that id. The
    /// collection is written back either way.
    pub async fn update(&mut self, id: &str, patch: TaskPatch) -> Result<Option<Task>> {
        self.clock.sleep(self.latency.update()).await;

        let now = self.clock.now();
        let updated = self.tasks.iter_mut().find(|task| task.id == id).map(|task| {
            task.apply(&patch, now);
            task.clone()
        });
        self.persist()?;
        if updated.is_none() {
            tracing::debug!(task_id = %id, "update ignored: unknown task");
        }
        Ok(updated)
    }

    pub async fn set_status(&mut self, id: &str, status: TaskStatus) -> Result<Option<Task>> {
        self.update(id, TaskPatch::status(status)).await
    }

    /// Flip a task between pending and done
    pub async fn toggle_status(&mut self, id: &str) -> Result<Option<Task>> {
        let Some(current) = self.get(id).map(|task| task.status) else {
            return Ok(None);
        };
        self.set_status(id, current.toggled()).await
    }

    /// Delete the task with `id`; returns whether one was removed
    pub async fn remove(&mut self, id: &str) -> Result<bool> {
        self.clock.sleep(self.latency.remove()).await;

        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        self.persist()?;
        Ok(self.tasks.len() != before)
    }

    /// Tasks passing `filters`, evaluated lazily over the current collection
    pub fn filter<'a>(&'a self, filters: &'a TaskFilters) -> impl Iterator<Item = &'a Task> + 'a {
        filter::filter_tasks(&self.tasks, filters)
    }

    pub fn stats(&self) -> TaskStats {
        TaskStats::from_tasks(&self.tasks)
    }

    /// Resolve a full id or a unique id prefix (case-insensitive)
    pub fn resolve_id(&self, input: &str) -> Result<String> {
        let needle = input.trim().to_ascii_lowercase();
        if needle.is_empty() {
            return Err(Error::InvalidArgument("task id cannot be empty".to_string()));
        }

        if let Some(task) = self.tasks.iter().find(|task| task.id.eq_ignore_ascii_case(&needle)) {
            return Ok(task.id.clone());
        }

        let mut matches: Vec<String> = self
            .tasks
            .iter()
            .filter(|task| task.id.to_ascii_lowercase().starts_with(&needle))
            .map(|task| task.id.clone())
            .collect();

        match matches.len() {
            0 => Err(Error::TaskNotFound(input.trim().to_string())),
            1 => Ok(matches.swap_remove(0)),
            _ => Err(Error::AmbiguousTask {
                input: input.trim().to_string(),
                matches,
            }),
        }
    }

    fn persist(&self) -> Result<()> {
        let Some(key) = self.storage_key() else {
            return Ok(());
        };
        storage::write_json(self.backend.as_ref(), &key, &self.tasks)?;
        tracing::debug!(key = %key, count = self.tasks.len(), "tasks persisted");
        Ok(())
    }
}

fn seed_date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Example tasks given to a user with no stored collection
pub fn demo_tasks(user_id: &str) -> Vec<Task> {
    vec![
        Task {
            id: "1".to_string(),
            title: "Finalize the application design".to_string(),
            description: "Produce the final mockups and sign off on the UX".to_string(),
            status: TaskStatus::Pending,
            priority: TaskPriority::High,
            user_id: user_id.to_string(),
            created_at: seed_date(2024, 1, 15),
            updated_at: seed_date(2024, 1, 15),
        },
        Task {
            id: "2".to_string(),
            title: "Implement authentication".to_string(),
            description: "Build the login and signup flow".to_string(),
            status: TaskStatus::Done,
            priority: TaskPriority::High,
            user_id: user_id.to_string(),
            created_at: seed_date(2024, 1, 14),
            updated_at: seed_date(2024, 1, 16),
        },
        Task {
            id: "3".to_string(),
            title: "Optimize performance".to_string(),
            description: "Profile and reduce loading times".to_string(),
            status: TaskStatus::Pending,
            priority: TaskPriority::Medium,
            user_id: user_id.to_string(),
            created_at: seed_date(2024, 1, 13),
            updated_at: seed_date(2024, 1, 13),
        },
    ]
}
