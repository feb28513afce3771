//! Command-line interface for todo
//!
//! This module defines the CLI structure using clap derive macros.
//! Each command group is implemented in its own submodule.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::app::App;
use crate::clock::SystemClock;
use crate::config::{self, Config};
use crate::error::{Error, Result};
use crate::filter::Choice;
use crate::model::{TaskPriority, TaskStatus};
use crate::output::OutputOptions;
use crate::storage::FileStore;

mod auth;
mod task;

/// todo - a to-do list kept in a local data directory
///
/// Sign in with any email and a password of at least six characters, then
/// add, edit, complete and filter tasks.
#[derive(Parser, Debug)]
#[command(name = "todo")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding the store and todo.toml
    #[arg(long, global = true, env = "TODO_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in (any email, password of at least 6 characters)
    Login {
        /// Email address; its local-part becomes the display name
        email: String,

        /// Password
        #[arg(long, env = "TODO_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create an account and sign in
    Signup {
        /// Display name
        name: String,

        /// Email address
        email: String,

        /// Password
        #[arg(long, env = "TODO_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Sign out (deletes your locally stored tasks)
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Task management
    #[command(subcommand)]
    Task(TaskCommands),
}

/// Task subcommands
#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Create a task
    Add {
        /// Task title
        title: String,

        /// Longer description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Priority: low, medium, high
        #[arg(short, long, default_value = "medium")]
        priority: TaskPriority,

        /// Status: pending, done
        #[arg(short, long, default_value = "pending")]
        status: TaskStatus,
    },

    /// Change fields of a task
    Edit {
        /// Task id (or unique prefix)
        id: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New description
        #[arg(short, long)]
        description: Option<String>,

        /// New priority: low, medium, high
        #[arg(short, long)]
        priority: Option<TaskPriority>,

        /// New status: pending, done
        #[arg(short, long)]
        status: Option<TaskStatus>,
    },

    /// Mark a task done
    Done {
        /// Task id (or unique prefix)
        id: String,
    },

    /// Mark a task pending again
    Reopen {
        /// Task id (or unique prefix)
        id: String,
    },

    /// Flip a task between pending and done
    Toggle {
        /// Task id (or unique prefix)
        id: String,
    },

    /// Delete a task
    Rm {
        /// Task id (or unique prefix)
        id: String,
    },

    /// List tasks, optionally filtered
    List {
        /// Status filter: all, pending, done
        #[arg(short, long)]
        status: Option<Choice<TaskStatus>>,

        /// Priority filter: all, low, medium, high
        #[arg(short, long)]
        priority: Option<Choice<TaskPriority>>,

        /// Case-insensitive text to find in title or description
        #[arg(long)]
        search: Option<String>,
    },

    /// Show task counters
    Stats,
}

/// Resolved environment shared by all commands
pub(crate) struct Context {
    pub data_dir: PathBuf,
    pub config: Config,
    pub output: OutputOptions,
}

impl Context {
    fn new(data_dir: Option<PathBuf>, json: bool, quiet: bool) -> Self {
        let data_dir = config::resolve_data_dir(data_dir.as_deref());
        let config = Config::load_from_dir(&data_dir);
        Self {
            data_dir,
            config,
            output: OutputOptions { json, quiet },
        }
    }

    /// Open the stores over the file backend and restore the session
    pub fn open_app(&self) -> Result<App> {
        let backend = Arc::new(FileStore::for_data_dir(&self.data_dir));
        let mut app = App::new(backend, Arc::new(SystemClock), &self.config);
        let state = app.start()?;
        tracing::debug!(
            data_dir = %self.data_dir.display(),
            authenticated = state.authenticated,
            "opened store"
        );
        Ok(app)
    }

    /// Like [`Context::open_app`], but fails unless someone is signed in
    pub fn open_signed_in(&self) -> Result<App> {
        let app = self.open_app()?;
        if !app.session().is_authenticated() {
            return Err(Error::NotAuthenticated);
        }
        Ok(app)
    }
}

impl Cli {
    /// Name reported in the JSON envelope, e.g. `"login"` or `"task list"`
    pub fn command_name(&self) -> &'static str {
        match &self.command {
            Commands::Login { .. } => "login",
            Commands::Signup { .. } => "signup",
            Commands::Logout => "logout",
            Commands::Whoami => "whoami",
            Commands::Task(cmd) => match cmd {
                TaskCommands::Add { .. } => "task add",
                TaskCommands::Edit { .. } => "task edit",
                TaskCommands::Done { .. } => "task done",
                TaskCommands::Reopen { .. } => "task reopen",
                TaskCommands::Toggle { .. } => "task toggle",
                TaskCommands::Rm { .. } => "task rm",
                TaskCommands::List { .. } => "task list",
                TaskCommands::Stats => "task stats",
            },
        }
    }

    /// Run the parsed command on a single-threaded runtime
    pub fn run(self) -> Result<()> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(self.dispatch())
    }

    async fn dispatch(self) -> Result<()> {
        let ctx = Context::new(self.data_dir, self.json, self.quiet);

        match self.command {
            Commands::Login { email, password } => auth::run_login(&ctx, &email, &password).await,
            Commands::Signup {
                name,
                email,
                password,
            } => auth::run_signup(&ctx, &name, &email, &password).await,
            Commands::Logout => auth::run_logout(&ctx),
            Commands::Whoami => auth::run_whoami(&ctx),
            Commands::Task(cmd) => match cmd {
                TaskCommands::Add {
                    title,
                    description,
                    priority,
                    status,
                } => {
                    task::run_add(
                        &ctx,
                        task::AddOptions {
                            title,
                            description,
                            priority,
                            status,
                        },
                    )
                    .await
                }
                TaskCommands::Edit {
                    id,
                    title,
                    description,
                    priority,
                    status,
                } => {
                    task::run_edit(
                        &ctx,
                        task::EditOptions {
                            id,
                            title,
                            description,
                            priority,
                            status,
                        },
                    )
                    .await
                }
                TaskCommands::Done { id } => {
                    task::run_set_status(&ctx, &id, Some(TaskStatus::Done)).await
                }
                TaskCommands::Reopen { id } => {
                    task::run_set_status(&ctx, &id, Some(TaskStatus::Pending)).await
                }
                TaskCommands::Toggle { id } => task::run_set_status(&ctx, &id, None).await,
                TaskCommands::Rm { id } => task::run_rm(&ctx, &id).await,
                TaskCommands::List {
                    status,
                    priority,
                    search,
                } => task::run_list(
                    &ctx,
                    task::ListOptions {
                        status,
                        priority,
                        search,
                    },
                ),
                TaskCommands::Stats => task::run_stats(&ctx),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_name_ignores_flag_values() {
        let cli = Cli::try_parse_from(["todo", "--data-dir", "/x", "--json", "task", "list"]).unwrap();
        assert_eq!(cli.command_name(), "task list");
        assert_eq!(cli.data_dir.as_deref(), Some(std::path::Path::new("/x")));

        let cli = Cli::try_parse_from(["todo", "login", "a@b.c", "--password", "secret1"]).unwrap();
        assert_eq!(cli.command_name(), "login");
    }

    #[test]
    fn list_filters_parse_all_and_values() {
        let cli = Cli::try_parse_from(["todo", "task", "list", "-s", "all", "-p", "HIGH"]).unwrap();
        match cli.command {
            Commands::Task(TaskCommands::List { status, priority, .. }) => {
                assert_eq!(status, Some(Choice::All));
                assert_eq!(priority, Some(Choice::Only(TaskPriority::High)));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
