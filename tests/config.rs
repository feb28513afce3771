use std::fs;
use std::time::Duration;

use todoapp::config::{resolve_data_dir, Config, CONFIG_FILENAME};

#[test]
fn partial_file_keeps_other_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(
        dir.path().join(CONFIG_FILENAME),
        "[latency]\nadd_ms = 0\n\n[storage]\npartition_by_user = false\n",
    )
    .expect("write config");

    let config = Config::load_from_dir(dir.path());
    assert_eq!(config.latency.add(), Duration::ZERO);
    assert_eq!(config.latency.login(), Duration::from_millis(1000));
    assert!(!config.storage.partition_by_user);
    assert_eq!(config.storage.tasks_key_for("7"), "todoapp_tasks");
    assert_eq!(config.auth.min_password_len, 6);
}

#[test]
fn invalid_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(
        dir.path().join(CONFIG_FILENAME),
        "[storage]\nsession_key = \"same\"\ntasks_key = \"same\"\n",
    )
    .expect("write config");

    assert!(Config::load(&dir.path().join(CONFIG_FILENAME)).is_err());
    let config = Config::load_from_dir(dir.path());
    assert_eq!(config.storage.session_key, "todoapp_user");
}

#[test]
fn saved_config_loads_back() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(CONFIG_FILENAME);
    let mut config = Config::default();
    config.auth.fallback_name = "Guest".to_string();
    config.save(&path).expect("save");

    let loaded = Config::load(&path).expect("load");
    assert_eq!(loaded.auth.fallback_name, "Guest");
}

#[test]
fn explicit_data_dir_wins() {
    let dir = tempfile::tempdir().expect("tempdir");
    assert_eq!(resolve_data_dir(Some(dir.path())), dir.path());
}
