//! todoapp - single-user to-do list library
//!
//! This library provides the stores behind the `todo` CLI: a mocked
//! account session and a task list persisted in a local key-value store.
//!
//! # Core Concepts
//!
//! - **Session**: the signed-in user, persisted until logout
//! - **Tasks**: the signed-in user's to-do items, newest first
//! - **Filters**: status/priority/text criteria narrowing the task list
//! - **Backend**: string-keyed blob storage (in memory or one file per key)
//!
//! # Module Organization
//!
//! - `app`: session and task stores wired over one backend
//! - `cli`: Command-line interface using clap
//! - `clock`: injectable time source and simulated latency
//! - `config`: Configuration loading from `todo.toml`
//! - `error`: Error types and result aliases
//! - `filter`: Task filter evaluation
//! - `lock`: File locking and atomic writes
//! - `model`: Users, tasks and their edit payloads
//! - `output`: Human and JSON output for CLI commands
//! - `session`: Mocked login/signup/logout
//! - `storage`: Key-value backends and JSON helpers
//! - `task`: Task store and statistics

pub mod app;
pub mod cli;
pub mod clock;
pub mod config;
pub mod error;
pub mod filter;
pub mod lock;
pub mod model;
pub mod output;
pub mod session;
pub mod storage;
pub mod task;

pub use app::App;
pub use error::{AuthError, Error, Result};
