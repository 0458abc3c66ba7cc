//! Author identity: the account that owns posts, comments and a profile.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::policy::Owned;
use super::post::PostSummary;
use super::profile::Profile;
use super::record_id::define_record_id;
use super::validation::FieldViolation;

define_record_id! {
    /// Store-assigned author identifier.
    AuthorId
}

/// Maximum username length in characters.
pub const USERNAME_MAX: usize = 150;

/// Validation errors returned by [`Username::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsernameValidationError {
    Empty,
    TooLong { max: usize },
    InvalidCharacters,
}

impl fmt::Display for UsernameValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "username must not be empty"),
            Self::TooLong { max } => write!(f, "username must be at most {max} characters"),
            Self::InvalidCharacters => write!(
                f,
                "username may only contain letters, digits and @/./+/-/_ characters",
            ),
        }
    }
}

impl std::error::Error for UsernameValidationError {}

impl FieldViolation for UsernameValidationError {
    fn code(&self) -> &'static str {
        match self {
            Self::Empty => "blank",
            Self::TooLong { .. } => "too_long",
            Self::InvalidCharacters => "invalid_characters",
        }
    }
}

/// Unique login name of an author.
///
/// ## Invariants
/// - 1 to [`USERNAME_MAX`] characters.
/// - Only alphanumeric characters and `@ . + - _`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

fn is_username_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_')
}

impl Username {
    /// Validate and construct a [`Username`].
    pub fn new(username: impl Into<String>) -> Result<Self, UsernameValidationError> {
        let username = username.into();
        if username.is_empty() {
            return Err(UsernameValidationError::Empty);
        }
        if username.chars().count() > USERNAME_MAX {
            return Err(UsernameValidationError::TooLong { max: USERNAME_MAX });
        }
        if !username.chars().all(is_username_char) {
            return Err(UsernameValidationError::InvalidCharacters);
        }
        Ok(Self(username))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UsernameValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Registered author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub id: AuthorId,
    pub username: Username,
    pub date_joined: DateTime<Utc>,
}

impl Owned for Author {
    fn owner(&self) -> AuthorId {
        self.id
    }
}

/// Author page: identity, profile and post summaries, newest post first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorDetail {
    pub author: Author,
    pub profile: Profile,
    pub posts: Vec<PostSummary>,
}
