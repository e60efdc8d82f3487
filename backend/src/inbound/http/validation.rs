//! Shared validation helpers for inbound HTTP adapters.

use serde_json::json;

use crate::domain::{Coordinates, Error, LoginValidationError, RequestId};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidCoordinates,
    InvalidEmail,
    PasswordTooShort,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidCoordinates => "invalid_coordinates",
            ErrorCode::InvalidEmail => "invalid_email",
            ErrorCode::PasswordTooShort => "password_too_short",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &'static str {
        self.0
    }
}

fn field_error(field: FieldName, code: &str, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code,
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    field_error(
        field,
        ErrorCode::MissingField.as_str(),
        format!("missing required field: {}", field.as_str()),
    )
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let name = field.as_str();
    Error::invalid_request(format!("{name} must be a valid UUID")).with_details(json!({
        "field": name,
        "value": value,
        "code": ErrorCode::InvalidUuid.as_str(),
    }))
}

/// Parse a request id from a path segment.
pub(crate) fn parse_request_id(value: &str) -> Result<RequestId, Error> {
    RequestId::new(value).map_err(|_| invalid_uuid_error(FieldName::new("id"), value))
}

/// Validate a latitude/longitude pair supplied as query parameters.
pub(crate) fn parse_coordinates(latitude: f64, longitude: f64) -> Result<Coordinates, Error> {
    Coordinates::new(latitude, longitude).map_err(|error| {
        field_error(
            FieldName::new("location"),
            ErrorCode::InvalidCoordinates.as_str(),
            error.to_string(),
        )
    })
}

pub(crate) fn login_validation_error(error: LoginValidationError) -> Error {
    let code = match error {
        LoginValidationError::InvalidEmail => ErrorCode::InvalidEmail,
        LoginValidationError::PasswordTooShort { .. } => ErrorCode::PasswordTooShort,
    };
    field_error(FieldName::new(error.field()), code.as_str(), error.to_string())
}
