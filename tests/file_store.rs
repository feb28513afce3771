use std::fs;
use std::sync::Arc;

use todoapp::clock::ManualClock;
use todoapp::config::Config;
use todoapp::model::{NewTask, TaskStatus};
use todoapp::storage::{FileStore, KeyValueStore};
use todoapp::App;

#[tokio::test]
async fn app_state_persists_across_file_store_instances() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let clock = Arc::new(ManualClock::default());

    let mut app = App::new(
        Arc::new(FileStore::for_data_dir(dir.path())),
        clock.clone(),
        &Config::default(),
    );
    app.login("ada@example.com", "secret1").await?;
    let task = app
        .tasks_mut()
        .add(NewTask::new("Persist me"))
        .await?
        .expect("signed in");

    let mut reopened = App::new(
        Arc::new(FileStore::for_data_dir(dir.path())),
        clock,
        &Config::default(),
    );
    let state = reopened.start()?;
    assert!(state.authenticated);
    assert_eq!(reopened.tasks().tasks()[0], task);

    reopened.tasks_mut().set_status(&task.id, TaskStatus::Done).await?;
    assert!(dir.path().join("store").join("todoapp_tasks%3A1.json").exists());

    reopened.logout()?;
    assert!(!dir.path().join("store").join("todoapp_user.json").exists());
    assert!(!dir.path().join("store").join("todoapp_tasks%3A1.json").exists());
    Ok(())
}

#[test]
fn corrupt_user_file_is_removed_on_start() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let store_dir = dir.path().join("store");
    fs::create_dir_all(&store_dir)?;
    fs::write(store_dir.join("todoapp_user.json"), "{{{")?;

    let backend = Arc::new(FileStore::for_data_dir(dir.path()));
    let mut app = App::new(backend.clone(), Arc::new(ManualClock::default()), &Config::default());
    let state = app.start()?;

    assert!(!state.authenticated);
    assert_eq!(backend.get("todoapp_user")?, None);
    Ok(())
}

#[test]
fn file_store_values_are_plain_json_files() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let store = FileStore::new(dir.path());

    store.set("settings", "{\"theme\":\"dark\"}")?;
    let raw = fs::read_to_string(dir.path().join("settings.json"))?;
    assert_eq!(raw, "{\"theme\":\"dark\"}");

    store.remove("settings")?;
    store.remove("settings")?;
    assert_eq!(store.get("settings")?, None);
    Ok(())
}

#[test]
fn non_utf8_task_file_is_treated_as_corrupt() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let backend = Arc::new(FileStore::for_data_dir(dir.path()));
    fs::create_dir_all(dir.path().join("store"))?;
    fs::write(
        dir.path().join("store").join("todoapp_user.json"),
        r#"{"id":"1","email":"ada@example.com","name":"ada"}"#,
    )?;
    let tasks_file = dir.path().join("store").join("todoapp_tasks%3A1.json");
    fs::write(&tasks_file, b"[{\"id\":\"\xff\"}]")?;

    let mut app = App::new(backend, Arc::new(ManualClock::default()), &Config::default());
    assert!(app.start()?.authenticated);

    assert_eq!(app.tasks().tasks().len(), 3);
    assert_eq!(fs::read(&tasks_file)?, b"[{\"id\":\"\xff\"}]".to_vec());
    Ok(())
}
