//! Tests for ConfigError type

use super::*;

#[test]
fn test_io_error_display() {
    let error = ConfigError::Io {
        path: "/tmp/daycache.toml".to_string(),
        message: "permission denied".to_string(),
    };
    let msg = error.to_string();
    assert!(msg.contains("IO error"));
    assert!(msg.contains("/tmp/daycache.toml"));
    assert!(msg.contains("permission denied"));
}

#[test]
fn test_parse_error_display() {
    let error = ConfigError::Parse("expected `=`".to_string());
    let msg = error.to_string();
    assert!(msg.contains("Invalid config file"));
    assert!(msg.contains("expected `=`"));
}

#[test]
fn test_invalid_error_display() {
    let error = ConfigError::Invalid("delay_ms must be greater than zero".to_string());
    assert!(error.to_string().contains("delay_ms"));
}

#[test]
fn test_parse_error_from_toml_error() {
    let toml_err = toml::from_str::<toml::Value>("not = [valid").unwrap_err();
    let config_err = ConfigError::from(toml_err);
    assert!(matches!(config_err, ConfigError::Parse(_)));
}

#[test]
fn test_error_equality() {
    let err1 = ConfigError::Invalid("test".to_string());
    let err2 = ConfigError::Invalid("test".to_string());
    let err3 = ConfigError::Invalid("different".to_string());

    assert_eq!(err1, err2);
    assert_ne!(err1, err3);
}

#[test]
fn test_all_error_variants_are_cloneable() {
    let errors: Vec<ConfigError> = vec![
        ConfigError::Io {
            path: "a".to_string(),
            message: "b".to_string(),
        },
        ConfigError::Parse("test".to_string()),
        ConfigError::Invalid("test".to_string()),
    ];

    for error in errors {
        let cloned = error.clone();
        assert_eq!(error, cloned);
    }
}
