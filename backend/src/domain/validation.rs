//! Field-level validation helpers shared by the domain value types.
//!
//! Every value-type constructor reports a violation implementing
//! [`FieldViolation`]; [`field_error`] turns it into an `invalid_request`
//! error whose details name the offending payload field, so clients can show
//! the message next to the right input.

use serde_json::json;

use super::Error;

/// A validation failure that knows its stable machine-readable code.
pub trait FieldViolation: std::fmt::Display {
    /// Stable snake_case code, e.g. `too_long`.
    fn code(&self) -> &'static str;
}

/// Map a violation on `field` into a domain error.
///
/// # Examples
/// ```
/// use backend::domain::{field_error, PostTitle};
///
/// let violation = PostTitle::new("").unwrap_err();
/// let err = field_error("title", &violation);
/// assert_eq!(err.details().unwrap()["field"], "title");
/// ```
pub fn field_error(field: &'static str, violation: &impl FieldViolation) -> Error {
    Error::invalid_request(violation.to_string()).with_details(json!({
        "field": field,
        "code": violation.code(),
    }))
}

/// Error for a required field missing from the payload.
pub fn missing_field_error(field: &'static str) -> Error {
    Error::invalid_request(format!("missing required field: {field}")).with_details(json!({
        "field": field,
        "code": "required",
    }))
}

/// Trim surrounding whitespace and validate the rest is `1..=max`
/// characters. Returns the trimmed value.
pub(crate) fn bounded_text(value: &str, max: usize) -> Result<String, TextViolation> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TextViolation::Blank);
    }
    let length = trimmed.chars().count();
    if length > max {
        return Err(TextViolation::TooLong { max, length });
    }
    Ok(trimmed.to_owned())
}

/// Violations raised by [`bounded_text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TextViolation {
    /// The value was empty or whitespace only.
    #[error("this field may not be blank")]
    Blank,
    /// The value exceeded the column bound.
    #[error("ensure this field has no more than {max} characters (it has {length})")]
    TooLong {
        /// Maximum number of characters.
        max: usize,
        /// Number of characters received.
        length: usize,
    },
}

impl FieldViolation for TextViolation {
    fn code(&self) -> &'static str {
        match self {
            Self::Blank => "blank",
            Self::TooLong { .. } => "too_long",
        }
    }
}

/// Declare a validated free-text newtype bounded to `1..=max` characters.
macro_rules! define_bounded_text {
    ($(#[$meta:meta])* $name:ident, max = $max:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, ::serde::Serialize, ::serde::Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Validate and construct the value.
            pub fn new(
                value: impl Into<String>,
            ) -> Result<Self, $crate::domain::validation::TextViolation> {
                let value = value.into();
                $crate::domain::validation::bounded_text(&value, $max).map(Self)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.0.as_str()
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = $crate::domain::validation::TextViolation;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }
    };
}

pub(crate) use define_bounded_text;
