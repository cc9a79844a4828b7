// Data directory resolution reads process-wide environment variables, so
// these tests are serialized.

use crate::config::{self, AppConfig, HOME_ENV_VAR};
use crate::tests::helpers::unique_temp_dir;
use serial_test::serial;

struct EnvGuard {
    previous: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(value: &std::path::Path) -> Self {
        let previous = std::env::var_os(HOME_ENV_VAR);
        // SAFETY: serialized tests; no other thread reads the environment
        unsafe { std::env::set_var(HOME_ENV_VAR, value) };
        Self { previous }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        // SAFETY: see EnvGuard::set
        unsafe {
            match &self.previous {
                Some(value) => std::env::set_var(HOME_ENV_VAR, value),
                None => std::env::remove_var(HOME_ENV_VAR),
            }
        }
    }
}

#[test]
#[serial]
fn test_home_override_is_used_and_created() {
    let temp_dir = unique_temp_dir("home_override");
    let home = temp_dir.path().join("nested").join("mcp");
    let _guard = EnvGuard::set(&home);

    let dir = config::data_dir().unwrap();
    assert_eq!(dir, home);
    assert!(dir.is_dir());
}

#[test]
#[serial]
fn test_store_lands_in_data_dir() {
    let temp_dir = unique_temp_dir("store_location");
    let _guard = EnvGuard::set(temp_dir.path());

    let dir = config::data_dir().unwrap();
    let app_config = AppConfig::load_or_init(&dir).unwrap();
    let db_path = app_config.db_path(&dir);

    assert_eq!(db_path, temp_dir.path().join("session_history.db"));
    assert_eq!(
        config::logs_dir(&dir),
        temp_dir.path().join("logs")
    );
    assert!(AppConfig::config_path(&dir).exists());
}

#[test]
fn test_poll_interval_has_floor() {
    let app_config = AppConfig {
        worker_poll_interval_ms: 0,
        ..AppConfig::default()
    };
    assert_eq!(
        app_config.worker_poll_interval(),
        std::time::Duration::from_millis(10)
    );
}
