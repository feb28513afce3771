use chrono::{TimeZone, Utc};

use todoapp::model::{NewTask, Task, TaskPriority, TaskStatus};
use todoapp::output::{task_row, Report};

fn release() -> Task {
    Task::from_new(
        NewTask::new("Ship release")
            .description("tag v1.2")
            .priority(TaskPriority::High),
        "01hq3v".to_string(),
        "1".to_string(),
        Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap(),
    )
}

#[test]
fn report_renders_task_fields_aligned() {
    let mut report = Report::new("Task created: 01hq3v");
    report.task_fields(&release());

    assert_eq!(
        report.render(),
        "Task created: 01hq3v\n  title        Ship release\n  description  tag v1.2\n  status       pending\n  priority     high"
    );
}

#[test]
fn report_lists_rows_then_warnings_and_hint() {
    let mut done = release();
    done.status = TaskStatus::Done;

    let mut report = Report::new("2 of 2 task(s)");
    report.task_row(&release());
    report.task_row(&done);
    report.warn("nobody was signed in");
    report.hint("todo task list");

    let rendered = report.render();
    assert!(rendered.contains("\n  [ ] 01hq3v (high) Ship release - tag v1.2"));
    assert!(rendered.contains(&format!("\n  {}", task_row(&done))));
    assert!(rendered.ends_with("warning: nobody was signed in\nnext: todo task list"));
}

#[test]
fn bare_report_is_just_the_title() {
    assert_eq!(Report::new("Signed out").render(), "Signed out");
}
