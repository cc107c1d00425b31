//! Field-level validation failures shared by the API and page adapters.

use serde_json::json;

use super::Error;

/// One rejected input field with a stable code and a human message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    field: &'static str,
    code: &'static str,
    message: String,
}

impl FieldViolation {
    /// Describe a rejected field.
    #[must_use]
    pub fn new(field: &'static str, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            code,
            message: message.into(),
        }
    }

    /// Name of the offending input field.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        self.field
    }

    /// Stable machine-readable code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.code
    }

    /// Message suitable for display next to the field.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

impl From<FieldViolation> for Error {
    fn from(value: FieldViolation) -> Self {
        Self::invalid_request(value.message)
            .with_details(json!({ "field": value.field, "code": value.code }))
    }
}
