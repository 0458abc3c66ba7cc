//! Author profile: biography and avatar, one per author.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::author::AuthorId;
use super::validation::{FieldViolation, TextViolation, field_error};
use super::Error;

/// Maximum biography length in characters.
pub const BIO_MAX: usize = 1000;
/// Maximum image reference length in characters.
pub const IMAGE_REF_MAX: usize = 100;
/// Avatar assigned to every new profile.
pub const DEFAULT_AVATAR: &str = "default_avatar.png";

/// Free-text biography.
///
/// Unlike titles and comments a biography may be an empty string; only the
/// length is bounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Bio(String);

impl Bio {
    /// Validate and construct a biography.
    pub fn new(bio: impl Into<String>) -> Result<Self, TextViolation> {
        let bio = bio.into();
        let length = bio.chars().count();
        if length > BIO_MAX {
            return Err(TextViolation::TooLong {
                max: BIO_MAX,
                length,
            });
        }
        Ok(Self(bio))
    }
}

impl AsRef<str> for Bio {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<Bio> for String {
    fn from(value: Bio) -> Self {
        value.0
    }
}

impl TryFrom<String> for Bio {
    type Error = TextViolation;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Reasons an image reference is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRefValidationError {
    Empty,
    TooLong { max: usize },
    AbsolutePath,
    ParentTraversal,
}

impl fmt::Display for ImageRefValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "image reference must not be empty"),
            Self::TooLong { max } => {
                write!(f, "image reference must be at most {max} characters")
            }
            Self::AbsolutePath => write!(f, "image reference must be a relative media path"),
            Self::ParentTraversal => write!(f, "image reference must not contain '..'"),
        }
    }
}

impl std::error::Error for ImageRefValidationError {}

impl FieldViolation for ImageRefValidationError {
    fn code(&self) -> &'static str {
        match self {
            Self::Empty => "blank",
            Self::TooLong { .. } => "too_long",
            Self::AbsolutePath => "absolute_path",
            Self::ParentTraversal => "parent_traversal",
        }
    }
}

/// Relative media path of an uploaded image, e.g. `avatars/ada.png`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ImageRef(String);

impl ImageRef {
    /// Validate and construct an image reference.
    pub fn new(path: impl Into<String>) -> Result<Self, ImageRefValidationError> {
        let path = path.into();
        if path.trim().is_empty() {
            return Err(ImageRefValidationError::Empty);
        }
        if path.chars().count() > IMAGE_REF_MAX {
            return Err(ImageRefValidationError::TooLong { max: IMAGE_REF_MAX });
        }
        if path.starts_with('/') || path.contains("://") {
            return Err(ImageRefValidationError::AbsolutePath);
        }
        if path.split('/').any(|segment| segment == "..") {
            return Err(ImageRefValidationError::ParentTraversal);
        }
        Ok(Self(path))
    }

    /// Placeholder avatar for new profiles.
    pub fn default_avatar() -> Self {
        Self::placeholder(DEFAULT_AVATAR)
    }

    pub(crate) fn placeholder(path: &'static str) -> Self {
        Self(path.to_owned())
    }
}

impl AsRef<str> for ImageRef {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<ImageRef> for String {
    fn from(value: ImageRef) -> Self {
        value.0
    }
}

impl TryFrom<String> for ImageRef {
    type Error = ImageRefValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Profile attached to an author.
///
/// The profile carries no author field of its own beyond the key; ownership
/// checks compare the principal against the author identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub author_id: AuthorId,
    pub bio: Option<Bio>,
    pub avatar: ImageRef,
}

impl Profile {
    /// Fresh profile created alongside a new author.
    pub fn blank(author_id: AuthorId) -> Self {
        Self {
            author_id,
            bio: None,
            avatar: ImageRef::default_avatar(),
        }
    }

    /// Apply validated changes.
    pub fn apply(&mut self, changes: &ProfileChanges) {
        if let Some(bio) = &changes.bio {
            self.bio = bio.clone();
        }
        if let Some(avatar) = &changes.avatar {
            self.avatar = avatar.clone();
        }
    }
}

/// Unvalidated profile patch as received from a client.
///
/// `bio: Some(None)` clears the biography; `None` leaves it untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileSubmission {
    pub bio: Option<Option<String>>,
    pub avatar: Option<String>,
}

/// Validated profile patch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileChanges {
    pub bio: Option<Option<Bio>>,
    pub avatar: Option<ImageRef>,
}

impl ProfileSubmission {
    /// Validate every supplied field.
    pub fn validate(self) -> Result<ProfileChanges, Error> {
        let bio = match self.bio {
            Some(Some(raw)) => Some(Some(Bio::new(raw).map_err(|err| field_error("bio", &err))?)),
            Some(None) => Some(None),
            None => None,
        };
        let avatar = self
            .avatar
            .map(ImageRef::new)
            .transpose()
            .map_err(|err| field_error("avatar", &err))?;
        Ok(ProfileChanges { bio, avatar })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case("", ImageRefValidationError::Empty)]
    #[case("/etc/passwd", ImageRefValidationError::AbsolutePath)]
    #[case("https://cdn.example.org/a.png", ImageRefValidationError::AbsolutePath)]
    #[case("avatars/../secret.png", ImageRefValidationError::ParentTraversal)]
    fn rejects_unsafe_image_refs(#[case] raw: &str, #[case] expected: ImageRefValidationError) {
        assert_eq!(ImageRef::new(raw), Err(expected));
    }

    #[rstest]
    fn blank_profile_uses_placeholder_avatar() {
        let profile = Profile::blank(AuthorId::new(1));
        assert!(profile.bio.is_none());
        assert_eq!(profile.avatar.as_ref(), DEFAULT_AVATAR);
    }

    #[rstest]
    fn empty_bio_is_allowed_but_length_is_bounded() {
        assert!(Bio::new("").is_ok());
        assert!(matches!(
            Bio::new("x".repeat(BIO_MAX + 1)),
            Err(TextViolation::TooLong { max: BIO_MAX, .. })
        ));
    }

    #[rstest]
    fn apply_updates_only_supplied_fields() {
        let mut profile = Profile::blank(AuthorId::new(1));
        profile.bio = Some(Bio::new("blabla").expect("valid bio"));

        let changes = ProfileSubmission {
            bio: None,
            avatar: Some("avatars/test_avatar.png".to_owned()),
        }
        .validate()
        .expect("valid patch");
        profile.apply(&changes);

        assert_eq!(profile.bio.as_ref().map(AsRef::as_ref), Some("blabla"));
        assert_eq!(profile.avatar.as_ref(), "avatars/test_avatar.png");
    }

    #[rstest]
    fn explicit_null_clears_bio() {
        let mut profile = Profile::blank(AuthorId::new(1));
        profile.bio = Some(Bio::new("blabla").expect("valid bio"));
        let changes = ProfileSubmission {
            bio: Some(None),
            avatar: None,
        }
        .validate()
        .expect("valid patch");
        profile.apply(&changes);
        assert!(profile.bio.is_none());
    }

    #[rstest]
    fn invalid_avatar_names_the_field() {
        let err = ProfileSubmission {
            bio: None,
            avatar: Some("/abs.png".to_owned()),
        }
        .validate()
        .expect_err("absolute path rejected");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.details().and_then(|d| d.get("field")), Some(&"avatar".into()));
    }
}
