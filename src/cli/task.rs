//! todo task command implementation

use serde::Serialize;

use crate::cli::Context;
use crate::error::{Error, Result};
use crate::filter::{Choice, TaskFilters};
use crate::model::{self, NewTask, Task, TaskPatch, TaskPriority, TaskStatus};
use crate::output::{print_success, Report};
use crate::task::TaskStats;

/// Options for `todo task add`
pub struct AddOptions {
    pub title: String,
    pub description: String,
    pub priority: TaskPriority,
    pub status: TaskStatus,
}

/// Options for `todo task edit`
pub struct EditOptions {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<TaskPriority>,
    pub status: Option<TaskStatus>,
}

/// Options for `todo task list`
pub struct ListOptions {
    pub status: Option<Choice<TaskStatus>>,
    pub priority: Option<Choice<TaskPriority>>,
    pub search: Option<String>,
}

#[derive(Serialize)]
struct TaskReport {
    task: Task,
}

#[derive(Serialize)]
struct RemoveReport {
    id: String,
    removed: bool,
}

#[derive(Serialize)]
struct ListReport {
    total: usize,
    matched: usize,
    tasks: Vec<Task>,
}

pub async fn run_add(ctx: &Context, options: AddOptions) -> Result<()> {
    let title = model::validate_title(&options.title)?;
    let mut app = ctx.open_signed_in()?;

    let new = NewTask::new(title)
        .description(options.description)
        .priority(options.priority)
        .status(options.status);
    let task = app
        .tasks_mut()
        .add(new)
        .await?
        .ok_or(Error::NotAuthenticated)?;

    let mut report = Report::new(format!("Task created: {}", task.id));
    report.task_fields(&task);
    print_success(ctx.output, "task add", &TaskReport { task }, &report)
}

pub async fn run_edit(ctx: &Context, options: EditOptions) -> Result<()> {
    let patch = TaskPatch {
        title: options
            .title
            .as_deref()
            .map(model::validate_title)
            .transpose()?
            .map(str::to_string),
        description: options.description,
        status: options.status,
        priority: options.priority,
    };
    if patch.is_empty() {
        return Err(Error::InvalidArgument(
            "nothing to change; pass --title, --description, --priority or --status".to_string(),
        ));
    }

    let mut app = ctx.open_signed_in()?;
    let id = app.tasks().resolve_id(&options.id)?;
    let task = app
        .tasks_mut()
        .update(&id, patch)
        .await?
        .ok_or_else(|| Error::TaskNotFound(id.clone()))?;

    let mut report = Report::new(format!("Task updated: {}", task.id));
    report.task_fields(&task);
    print_success(ctx.output, "task edit", &TaskReport { task }, &report)
}

/// Set a status explicitly, or flip it when `status` is `None`
pub async fn run_set_status(ctx: &Context, id: &str, status: Option<TaskStatus>) -> Result<()> {
    let mut app = ctx.open_signed_in()?;
    let id = app.tasks().resolve_id(id)?;
    let store = app.tasks_mut();
    let updated = match status {
        Some(status) => store.set_status(&id, status).await?,
        None => store.toggle_status(&id).await?,
    };
    let task = updated.ok_or_else(|| Error::TaskNotFound(id.clone()))?;

    let header = match task.status {
        TaskStatus::Done => format!("Task completed: {}", task.title),
        TaskStatus::Pending => format!("Task reopened: {}", task.title),
    };
    let mut report = Report::new(header);
    report.task_row(&task);
    let command = match status {
        Some(TaskStatus::Done) => "task done",
        Some(TaskStatus::Pending) => "task reopen",
        None => "task toggle",
    };
    print_success(ctx.output, command, &TaskReport { task }, &report)
}

pub async fn run_rm(ctx: &Context, id: &str) -> Result<()> {
    let mut app = ctx.open_signed_in()?;
    let id = app.tasks().resolve_id(id)?;
    let removed = app.tasks_mut().remove(&id).await?;
    if !removed {
        return Err(Error::TaskNotFound(id));
    }

    let report = Report::new(format!("Task deleted: {id}"));
    print_success(ctx.output, "task rm", &RemoveReport { id, removed }, &report)
}

pub fn run_list(ctx: &Context, options: ListOptions) -> Result<()> {
    let app = ctx.open_signed_in()?;
    let filters = TaskFilters {
        status: options.status,
        priority: options.priority,
        search: options.search,
    };
    let store = app.tasks();
    let tasks: Vec<Task> = store.filter(&filters).cloned().collect();
    let total = store.tasks().len();

    let mut report = Report::new(format!("{} of {} task(s)", tasks.len(), total));
    for task in &tasks {
        report.task_row(task);
    }
    if tasks.is_empty() {
        if total == 0 {
            report.hint("todo task add <title>");
        } else {
            report.warn("no task matches these filters");
        }
    }

    let body = ListReport {
        total,
        matched: tasks.len(),
        tasks,
    };
    print_success(ctx.output, "task list", &body, &report)
}

pub fn run_stats(ctx: &Context) -> Result<()> {
    let app = ctx.open_signed_in()?;
    let stats: TaskStats = app.tasks().stats();

    let mut report = Report::new("Task stats");
    report.field("total", stats.total);
    report.field("completed", stats.completed);
    report.field("pending", stats.pending);
    report.field("high priority", stats.high_priority);

    print_success(ctx.output, "task stats", &stats, &report)
}
