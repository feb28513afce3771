//! Task filtering by status, priority and free text.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::model::{Task, TaskPriority, TaskStatus};

/// One filter dimension: either everything, or one specific value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice<T> {
    All,
    Only(T),
}

impl<T: PartialEq> Choice<T> {
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Choice::All => true,
            Choice::Only(expected) => expected == value,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Choice<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Choice::All => f.write_str("all"),
            Choice::Only(value) => value.fmt(f),
        }
    }
}

impl<T: FromStr<Err = Error>> FromStr for Choice<T> {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        if value.trim().eq_ignore_ascii_case("all") {
            return Ok(Choice::All);
        }
        value.parse().map(Choice::Only)
    }
}

/// Filter criteria held by the caller; never persisted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilters {
    pub status: Option<Choice<TaskStatus>>,
    pub priority: Option<Choice<TaskPriority>>,
    pub search: Option<String>,
}

impl TaskFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: Choice<TaskStatus>) -> Self {
        self.status = Some(status);
        self
    }

    pub fn priority(mut self, priority: Choice<TaskPriority>) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Whether no criterion narrows the result
    pub fn is_empty(&self) -> bool {
        !matches!(self.status, Some(Choice::Only(_)))
            && !matches!(self.priority, Some(Choice::Only(_)))
            && self.search.as_deref().map_or(true, str::is_empty)
    }

    /// Decide whether `task` passes.
    ///
    /// Status and priority are checked first and reject on mismatch. A
    /// non-empty search then decides the outcome on its own: a title or
    /// description containing the needle (case-insensitively) is included.
    pub fn matches(&self, task: &Task) -> bool {
        if let Some(status) = &self.status {
            if !status.admits(&task.status) {
                return false;
            }
        }
        if let Some(priority) = &self.priority {
            if !priority.admits(&task.priority) {
                return false;
            }
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            return task.title.to_lowercase().contains(&needle)
                || task.description.to_lowercase().contains(&needle);
        }
        true
    }
}

/// Lazily yield the tasks that pass `filters`, in collection order
pub fn filter_tasks<'a>(
    tasks: &'a [Task],
    filters: &'a TaskFilters,
) -> impl Iterator<Item = &'a Task> + 'a {
    tasks.iter().filter(move |task| filters.matches(task))
}
