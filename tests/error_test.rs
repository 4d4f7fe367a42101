//! Tests for error types

use boostly::experiment::Experiment;
use boostly::Error;

#[test]
fn test_storage_error() {
    let error = Error::Storage("disk full".to_string());
    let error_str = format!("{error}");
    assert!(error_str.contains("Storage error"));
    assert!(error_str.contains("disk full"));
}

#[test]
fn test_invalid_experiment_error() {
    let error = Error::InvalidExperiment {
        name: "hero_cta_text".to_string(),
        reason: "weights sum to 0.9, expected 1.0".to_string(),
    };
    let error_str = format!("{error}");
    assert!(error_str.contains("hero_cta_text"));
    assert!(error_str.contains("expected 1.0"));
}

#[test]
fn test_invalid_experiment_from_constructor() {
    let error = Experiment::from_pairs("pricing_highlight", [("most_popular", 0.7)]).unwrap_err();
    assert!(matches!(error, Error::InvalidExperiment { ref name, .. } if name == "pricing_highlight"));
}

#[test]
fn test_invalid_input_error() {
    let error = Error::InvalidInput("trial_days must be positive".to_string());
    let error_str = format!("{error}");
    assert!(error_str.contains("Invalid input"));
    assert!(error_str.contains("trial_days"));
}

#[test]
fn test_io_error_conversion() {
    let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
    let error: Error = io_error.into();
    assert!(format!("{error}").contains("IO error"));
}

#[test]
fn test_json_error_conversion() {
    let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let error: Error = json_error.into();
    assert!(format!("{error}").contains("JSON error"));
}

#[test]
fn test_other_error() {
    let error = Error::Other("custom error message".to_string());
    assert_eq!(format!("{error}"), "custom error message");
}

#[test]
fn test_error_debug() {
    let error = Error::Storage("x".to_string());
    assert!(format!("{error:?}").contains("Storage"));
}

#[test]
fn test_result_type_alias_error() {
    fn returns_error() -> boostly::Result<i32> {
        Err(Error::Other("test error".to_string()))
    }

    assert!(returns_error().is_err());
}
