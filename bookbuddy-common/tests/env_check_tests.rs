//! Integration tests for `.env` loading and the built-in environment specs
//!
//! Note: Uses serial_test for tests that touch process environment
//! variables so they do not race each other.

use std::env;
use std::io::Write;
use std::path::Path;

use bookbuddy_common::env_check::{
    env_source_with_prefix, frontend_env_spec, load_env_file, server_env_spec, validate,
    SERVER_ENV_PREFIX,
};
use bookbuddy_common::ConfigError;
use serial_test::serial;

fn write_env(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_missing_env_file_is_distinct_error() {
    let err = load_env_file(Path::new("/nonexistent/dir/.env")).unwrap_err();
    assert!(matches!(err, ConfigError::EnvFileNotFound(_)));
}

#[test]
fn test_valid_frontend_env_passes() {
    let file = write_env(
        "VITE_API_URL=http://localhost:5730\n\
         VITE_API_TIMEOUT=30000\n\
         VITE_MAX_RETRIES=3\n\
         VITE_OPENAI_API_KEY=sk-test\n\
         VITE_ENABLE_ANALYTICS=false\n",
    );

    let source = load_env_file(file.path()).unwrap();
    let report = validate(&frontend_env_spec(), &source);

    assert!(report.is_ok(), "unexpected errors: {:?}", report.errors);
    assert!(report
        .warnings
        .contains(&"optional variable not set: VITE_SENTRY_DSN".to_string()));
    assert!(!report
        .warnings
        .iter()
        .any(|w| w.contains("VITE_ENABLE_ANALYTICS")));
}

#[test]
fn test_invalid_frontend_env_collects_all_errors() {
    let file = write_env(
        "# comment lines are ignored\n\
         VITE_API_URL=\"\"\n\
         VITE_API_TIMEOUT=soon\n\
         VITE_ENABLE_ANALYTICS=yes\n\
         LEGACY_FLAG=1\n",
    );

    let source = load_env_file(file.path()).unwrap();
    let report = validate(&frontend_env_spec(), &source);

    assert!(!report.is_ok());
    assert_eq!(
        report.errors,
        vec![
            "VITE_API_URL must be a non-empty string".to_string(),
            "VITE_API_TIMEOUT must be a number".to_string(),
            "missing required variable: VITE_MAX_RETRIES".to_string(),
            "missing required variable: VITE_OPENAI_API_KEY".to_string(),
            "VITE_ENABLE_ANALYTICS must be 'true' or 'false'".to_string(),
        ]
    );
    assert!(report
        .warnings
        .contains(&"unknown variable: LEGACY_FLAG".to_string()));
}

#[test]
#[serial]
fn test_server_env_snapshot_ignores_foreign_variables() {
    env::set_var("BOOKBUDDY_ADMIN_KEY", "admin-secret");
    env::set_var("BOOKBUDDY_PORT", "8123");
    env::remove_var("BOOKBUDDY_HOST");

    let source = env_source_with_prefix(SERVER_ENV_PREFIX);
    assert!(source.keys().all(|k| k.starts_with(SERVER_ENV_PREFIX)));

    let report = validate(&server_env_spec(), &source);
    assert!(report.is_ok(), "unexpected errors: {:?}", report.errors);
    assert!(!report.warnings.iter().any(|w| w.contains("PATH")));

    env::remove_var("BOOKBUDDY_ADMIN_KEY");
    env::remove_var("BOOKBUDDY_PORT");
}

#[test]
#[serial]
fn test_server_env_requires_admin_key() {
    env::remove_var("BOOKBUDDY_ADMIN_KEY");

    let report = validate(&server_env_spec(), &env_source_with_prefix(SERVER_ENV_PREFIX));
    assert!(report
        .errors
        .contains(&"missing required variable: BOOKBUDDY_ADMIN_KEY".to_string()));
}
