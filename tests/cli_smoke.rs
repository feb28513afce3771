mod support;

use predicates::str::contains;

use support::todo_cmd;

#[test]
fn todo_help_works() {
    todo_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("to-do list"));
}

#[test]
fn subcommand_help_works() {
    for cmd in ["login", "signup", "logout", "whoami", "task"] {
        todo_cmd()
            .args([cmd, "--help"])
            .assert()
            .success()
            .stdout(contains("Usage"));
    }
}

#[test]
fn task_subcommand_help_works() {
    for cmd in ["add", "edit", "done", "reopen", "toggle", "rm", "list", "stats"] {
        todo_cmd()
            .args(["task", cmd, "--help"])
            .assert()
            .success()
            .stdout(contains("Usage"));
    }
}

#[test]
fn invalid_priority_is_a_usage_error() {
    todo_cmd()
        .args(["task", "add", "x", "--priority", "urgent"])
        .assert()
        .failure()
        .stderr(contains("unknown priority"));
}
