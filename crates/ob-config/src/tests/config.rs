use crate::Config;
use crate::tests::{EnvGuard, setup_config_dir};

use googletest::assert_that;
use googletest::prelude::{anything, err, ok};
use serial_test::serial;

#[test]
#[serial]
fn given_no_config_file_when_loaded_then_defaults_are_valid() {
    // Given
    let _env = setup_config_dir();

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.validate(), ok(anything()));
    assert_eq!(config.sync.coalesce_window_ms, 350);
    assert_eq!(config.reload.debounce_window_ms, 300);
}

#[test]
#[serial]
fn given_config_file_when_loaded_then_values_applied() {
    // Given
    let (temp, _guard) = setup_config_dir();
    std::fs::write(
        temp.path().join("config.toml"),
        r#"
[sync]
coalesce_window_ms = 400

[reload]
debounce_window_ms = 250
"#,
    )
    .unwrap();

    // When
    let config = Config::load().unwrap();

    // Then
    assert_eq!(config.sync.coalesce_window_ms, 400);
    assert_eq!(config.reload.debounce_window_ms, 250);
}

#[test]
#[serial]
fn given_env_override_when_loaded_then_wins_over_file() {
    // Given
    let (temp, _guard) = setup_config_dir();
    std::fs::write(
        temp.path().join("config.toml"),
        "[sync]\ncoalesce_window_ms = 400\n",
    )
    .unwrap();
    let _window = EnvGuard::set("OB_SYNC_COALESCE_WINDOW_MS", "275");

    // When
    let config = Config::load().unwrap();

    // Then
    assert_eq!(config.sync.coalesce_window_ms, 275);
}

#[test]
#[serial]
fn given_malformed_toml_when_loaded_then_error() {
    // Given
    let (temp, _guard) = setup_config_dir();
    std::fs::write(temp.path().join("config.toml"), "[sync\nnot toml").unwrap();

    // When
    let result = Config::load();

    // Then
    assert_that!(result, err(anything()));
}
