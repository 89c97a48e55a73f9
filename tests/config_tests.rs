use std::env;
use std::path::PathBuf;
use std::sync::Mutex;
use taskdash::config::{Config, DEFAULT_TARGET_RATE};

// Use a mutex to ensure tests run serially since they modify environment variables
static TEST_MUTEX: Mutex<()> = Mutex::new(());

#[cfg(target_os = "linux")]
#[test]
fn test_default_path_does_not_create_directory() {
    let _guard = TEST_MUTEX.lock().unwrap();
    let data_home = tempfile::tempdir().unwrap();
    env::remove_var("TASKDASH_TASKS");
    env::set_var("XDG_DATA_HOME", data_home.path());

    let config = Config::from_env();
    env::remove_var("XDG_DATA_HOME");

    assert_eq!(config.tasks_path, data_home.path().join("taskdash").join("tasks.json"));
    assert!(!data_home.path().join("taskdash").exists());
}

#[test]
fn test_env_overrides() {
    let _guard = TEST_MUTEX.lock().unwrap();
    env::set_var("TASKDASH_TASKS", "/tmp/elsewhere.json");
    env::set_var("TASKDASH_TARGET_RATE", "80");
    let config = Config::from_env();
    assert_eq!(config.tasks_path, PathBuf::from("/tmp/elsewhere.json"));
    assert_eq!(config.target_rate, 80.0);

    env::set_var("TASKDASH_TARGET_RATE", "-3");
    assert_eq!(Config::from_env().target_rate, DEFAULT_TARGET_RATE);

    env::remove_var("TASKDASH_TASKS");
    env::remove_var("TASKDASH_TARGET_RATE");
}

#[test]
fn test_cli_overrides_win() {
    let config = Config::default().with_overrides(Some(PathBuf::from("x.json")), Some(0.0));
    assert_eq!(config.tasks_path, PathBuf::from("x.json"));
    assert_eq!(config.target_rate, DEFAULT_TARGET_RATE);
}
