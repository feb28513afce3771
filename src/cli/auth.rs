//! todo login/signup/logout/whoami implementation

use serde::Serialize;

use crate::cli::Context;
use crate::error::Result;
use crate::model::User;
use crate::output::{print_success, Report};
use crate::task::TaskStats;

#[derive(Serialize)]
struct SessionReport {
    user: User,
    tasks: TaskStats,
}

#[derive(Serialize)]
struct LogoutReport {
    was_signed_in: bool,
}

#[derive(Serialize)]
struct WhoamiReport {
    authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<User>,
}

pub async fn run_login(ctx: &Context, email: &str, password: &str) -> Result<()> {
    let mut app = ctx.open_app()?;
    let user = app.login(email, password).await?;
    emit_signed_in(ctx, "login", user, app.tasks().stats())
}

pub async fn run_signup(ctx: &Context, name: &str, email: &str, password: &str) -> Result<()> {
    let mut app = ctx.open_app()?;
    let user = app.signup(name, email, password).await?;
    emit_signed_in(ctx, "signup", user, app.tasks().stats())
}

fn emit_signed_in(ctx: &Context, command: &str, user: User, tasks: TaskStats) -> Result<()> {
    let mut report = Report::new(format!("Welcome, {}!", user.name));
    report.field("email", &user.email);
    report.field("id", &user.id);
    report.field("tasks", tasks.total);
    report.hint("todo task list");

    print_success(ctx.output, command, &SessionReport { user, tasks }, &report)
}

pub fn run_logout(ctx: &Context) -> Result<()> {
    let mut app = ctx.open_app()?;
    let was_signed_in = app.session().is_authenticated();
    app.logout()?;

    let mut report = if was_signed_in {
        Report::new("Signed out; local tasks were deleted")
    } else {
        let mut report = Report::new("Signed out");
        report.warn("nobody was signed in");
        report
    };
    report.hint("todo login <email>");

    print_success(ctx.output, "logout", &LogoutReport { was_signed_in }, &report)
}

pub fn run_whoami(ctx: &Context) -> Result<()> {
    let app = ctx.open_app()?;
    let user = app.session().user().cloned();

    let report = match &user {
        Some(user) => {
            let mut report = Report::new(format!("{} <{}>", user.name, user.email));
            report.field("id", &user.id);
            report
        }
        None => {
            let mut report = Report::new("Not signed in");
            report.hint("todo login <email>");
            report
        }
    };

    let body = WhoamiReport {
        authenticated: user.is_some(),
        user,
    };
    print_success(ctx.output, "whoami", &body, &report)
}
