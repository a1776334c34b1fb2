//! Unit tests for the `AbntError` enum and its associated `Display` trait implementation.

use abnt_rs::error::AbntError;

/// Tests that the `FormatMismatch` variant is correctly formatted.
#[test]
fn test_format_mismatch_error() {
    let err = AbntError::FormatMismatch("no header".to_string());
    assert_eq!(err.to_string(), "Format mismatch: no header");
}

/// Tests that the `FieldDecode` variant names the field and the raw value.
#[test]
fn test_field_decode_error() {
    let err = AbntError::FieldDecode {
        field: "change_slot",
        value: "AB".to_string(),
    };
    assert_eq!(err.to_string(), "Cannot decode field 'change_slot' from 'AB'");
}

/// Tests that the `ConfigurationInvalid` variant is correctly formatted.
#[test]
fn test_configuration_invalid_error() {
    let err = AbntError::ConfigurationInvalid("bad time".to_string());
    assert_eq!(err.to_string(), "Invalid configuration: bad time");
}

/// Tests that the `InsufficientData` variant is correctly formatted.
#[test]
fn test_insufficient_data_error() {
    let err = AbntError::InsufficientData { needed: 5, available: 2 };
    assert_eq!(err.to_string(), "Insufficient data: need 5 samples, got 2");
}

/// Tests the conversion from `std::io::Error`.
#[test]
fn test_io_error_conversion() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    let err: AbntError = io.into();
    assert_eq!(err.to_string(), "I/O error: gone");
}

/// Tests the conversion from `serde_json::Error`.
#[test]
fn test_json_error_conversion() {
    let json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err: AbntError = json.into();
    assert!(err.to_string().starts_with("JSON error: "));
}

/// Tests that the `Other` variant is correctly formatted.
#[test]
fn test_other_error() {
    let err = AbntError::Other("misc".to_string());
    assert_eq!(err.to_string(), "Other error: misc");
}
