//! What `todo` prints.
//!
//! With `--json` every command writes one envelope to stdout:
//! `{"schema_version": "todo.v1", "command": ..., "status": "success", "data": ...}`
//! or, on failure, `"status": "error"` with an `error` object. Otherwise a
//! [`Report`] is rendered as a short text block: a title line, aligned
//! fields, task rows, then warnings and a hint.

use serde::Serialize;

use crate::error::{exit_codes, AuthError, Error, JsonError, Result};
use crate::model::{Task, TaskStatus};

pub const SCHEMA_VERSION: &str = "todo.v1";

#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    pub json: bool,
    pub quiet: bool,
}

/// Text rendering of one command result
#[derive(Debug, Clone, Default)]
pub struct Report {
    title: String,
    fields: Vec<(&'static str, String)>,
    rows: Vec<String>,
    warnings: Vec<String>,
    hint: Option<String>,
}

impl Report {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn field(&mut self, name: &'static str, value: impl ToString) {
        self.fields.push((name, value.to_string()));
    }

    /// Title, description, status and priority of `task`
    pub fn task_fields(&mut self, task: &Task) {
        self.field("title", &task.title);
        if !task.description.is_empty() {
            self.field("description", &task.description);
        }
        self.field("status", task.status);
        self.field("priority", task.priority);
    }

    pub fn task_row(&mut self, task: &Task) {
        self.rows.push(task_row(task));
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Command worth running next; the last call wins
    pub fn hint(&mut self, command: impl Into<String>) {
        self.hint = Some(command.into());
    }

    pub fn render(&self) -> String {
        let mut out = self.title.clone();

        let width = self.fields.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
        for (name, value) in &self.fields {
            out.push_str(&format!("\n  {name:<width$}  {value}"));
        }

        if !self.rows.is_empty() {
            out.push('\n');
            for row in &self.rows {
                out.push_str(&format!("\n  {row}"));
            }
        }

        for warning in &self.warnings {
            out.push_str(&format!("\nwarning: {warning}"));
        }
        if let Some(hint) = &self.hint {
            out.push_str(&format!("\nnext: {hint}"));
        }
        out
    }
}

/// One-line listing form: `[x] <id> (<priority>) <title> - <description>`
pub fn task_row(task: &Task) -> String {
    let mark = match task.status {
        TaskStatus::Done => 'x',
        TaskStatus::Pending => ' ',
    };
    let mut row = format!("[{mark}] {} ({}) {}", task.id, task.priority, task.title);
    if !task.description.is_empty() {
        row.push_str(" - ");
        row.push_str(&task.description);
    }
    row
}

#[derive(Serialize)]
struct Success<'a, T: Serialize> {
    schema_version: &'static str,
    command: &'a str,
    status: &'static str,
    data: &'a T,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<String>,
}

#[derive(Serialize)]
struct Failure<'a> {
    schema_version: &'static str,
    command: &'a str,
    status: &'static str,
    error: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
    #[serde(flatten)]
    error: JsonError,
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    hint: Option<&'static str>,
}

/// Print a command result: `data` as JSON, or `report` as text unless quiet
pub fn print_success<T: Serialize>(
    options: OutputOptions,
    command: &str,
    data: &T,
    report: &Report,
) -> Result<()> {
    if options.json {
        let envelope = Success {
            schema_version: SCHEMA_VERSION,
            command,
            status: "success",
            data,
            warnings: report.warnings.clone(),
        };
        println!("{}", serde_json::to_string_pretty(&envelope)?);
    } else if !options.quiet {
        println!("{}", report.render());
    }
    Ok(())
}

/// Print a failure: the JSON error envelope on stdout, or text on stderr
pub fn print_error(command: &str, err: &Error, json: bool) -> Result<()> {
    let hint = error_hint(err);
    if json {
        let envelope = Failure {
            schema_version: SCHEMA_VERSION,
            command,
            status: "error",
            error: ErrorBody {
                error: JsonError::from(err),
                kind: error_kind(err),
                hint,
            },
        };
        println!("{}", serde_json::to_string_pretty(&envelope)?);
        return Ok(());
    }

    eprintln!("error: {err}");
    if let Some(hint) = hint {
        eprintln!("next: {hint}");
    }
    Ok(())
}

fn error_kind(err: &Error) -> &'static str {
    match err.exit_code() {
        exit_codes::USER_ERROR => "user_error",
        exit_codes::AUTH_FAILED => "auth_failed",
        _ => "operation_failed",
    }
}

fn error_hint(err: &Error) -> Option<&'static str> {
    let hint = match err {
        Error::NotAuthenticated => "todo login <email>",
        Error::Auth(AuthError::InvalidCredentials) => {
            "use a non-empty email and a password of at least 6 characters"
        }
        Error::Auth(AuthError::InvalidFields) => "todo signup <name> <email> --password <password>",
        Error::TaskNotFound(_) => "todo task list",
        Error::AmbiguousTask { .. } => "use more characters of the task id",
        Error::InvalidConfig(_) => "fix todo.toml then retry",
        Error::LockFailed(_) => "retry once the other todo process finishes",
        _ => return None,
    };
    Some(hint)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NewTask, TaskPriority};
    use chrono::Utc;

    fn task(status: TaskStatus, description: &str) -> Task {
        Task::from_new(
            NewTask::new("Ship release")
                .description(description)
                .status(status)
                .priority(TaskPriority::High),
            "abc".to_string(),
            "1".to_string(),
            Utc::now(),
        )
    }

    #[test]
    fn task_row_marks_done_and_appends_description() {
        assert_eq!(
            task_row(&task(TaskStatus::Done, "tag v1.2")),
            "[x] abc (high) Ship release - tag v1.2"
        );
        assert_eq!(task_row(&task(TaskStatus::Pending, "")), "[ ] abc (high) Ship release");
    }

    #[test]
    fn report_aligns_fields_then_rows_warnings_hint() {
        let mut report = Report::new("Task stats");
        report.field("total", 3);
        report.field("high priority", 1);
        report.task_row(&task(TaskStatus::Pending, ""));
        report.warn("nothing done yet");
        report.hint("todo task list");

        assert_eq!(
            report.render(),
            "Task stats\n  total          3\n  high priority  1\n\n  [ ] abc (high) Ship release\nwarning: nothing done yet\nnext: todo task list"
        );
    }

    #[test]
    fn error_kinds_follow_exit_codes() {
        assert_eq!(error_kind(&Error::NotAuthenticated), "auth_failed");
        assert_eq!(error_kind(&Error::TaskNotFound("x".into())), "user_error");
        assert_eq!(
            error_kind(&Error::LockFailed(std::path::PathBuf::from("a.lock"))),
            "operation_failed"
        );
        assert_eq!(error_hint(&Error::NotAuthenticated), Some("todo login <email>"));
        assert_eq!(error_hint(&Error::Io(std::io::Error::new(std::io::ErrorKind::Other, "x"))), None);
    }
}
