mod support;

use std::io::Write;
use std::time::Duration;

use ride_validation::config::{ConfigError, OdometerMode, ValidationConfig};

use support::{with_scoped_env, CLEAN_RIDE_ENV};

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_from_file() {
    let file = write_config(
        r#"
[tolerances]
avspeed_ratio_min = 0.95
avspeed_ratio_max = 1.05
total_time_secs = 120.0

[service]
base_url = "http://rides.internal:6543"
timeout_secs = 3
odometer_mode = "last_odometer"
"#,
    );

    let config = ValidationConfig::from_file(file.path()).unwrap();
    assert_eq!(config.tolerances.avspeed_ratio_min, 0.95);
    assert_eq!(config.tolerances.avspeed_ratio_max, 1.05);
    assert_eq!(config.tolerances.odometer, 0.1);
    assert_eq!(config.tolerances.total_time_secs, 120.0);
    assert_eq!(config.service.base_url, "http://rides.internal:6543");
    assert_eq!(config.timeout(), Duration::from_secs(3));
    assert_eq!(config.service.odometer_mode, OdometerMode::LastOdometer);
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = ValidationConfig::from_file(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}

#[test]
fn test_malformed_file() {
    let file = write_config("[service\nbase_url = 1");
    let err = ValidationConfig::from_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_env_overrides() {
    let file = write_config("[service]\nbase_url = \"http://from-file:1\"\n");

    let config = with_scoped_env(
        &[
            ("RIDE_SERVICE_URL", Some("http://from-env:2")),
            ("RIDE_SERVICE_TIMEOUT_SECS", Some("7")),
            ("RIDE_ODOMETER_MODE", Some("last_odometer")),
        ],
        || ValidationConfig::load(Some(file.path())),
    )
    .unwrap();

    assert_eq!(config.service.base_url, "http://from-env:2");
    assert_eq!(config.service.timeout_secs, 7);
    assert_eq!(config.service.odometer_mode, OdometerMode::LastOdometer);
}

#[test]
fn test_invalid_env_override() {
    let err = with_scoped_env(
        &[
            ("RIDE_SERVICE_URL", None),
            ("RIDE_SERVICE_TIMEOUT_SECS", Some("ten")),
            ("RIDE_ODOMETER_MODE", None),
        ],
        ValidationConfig::from_env,
    )
    .unwrap_err();

    assert!(matches!(
        err,
        ConfigError::InvalidEnv {
            name: "RIDE_SERVICE_TIMEOUT_SECS",
            ..
        }
    ));
}

#[test]
fn test_from_env_without_overrides_is_default() {
    let config = with_scoped_env(&CLEAN_RIDE_ENV, ValidationConfig::from_env).unwrap();
    assert_eq!(config, ValidationConfig::default());
}
