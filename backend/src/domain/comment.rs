//! Comments left on posts.

use chrono::{DateTime, Utc};

use super::author::AuthorId;
use super::policy::Owned;
use super::post::PostId;
use super::record_id::define_record_id;
use super::validation::{define_bounded_text, field_error, missing_field_error};
use super::Error;

define_record_id! {
    /// Store-assigned comment identifier.
    CommentId
}

/// Maximum comment length in characters.
pub const COMMENT_MAX: usize = 1000;

define_bounded_text! {
    /// Comment body, 1 to [`COMMENT_MAX`] characters.
    CommentText, max = COMMENT_MAX
}

/// Persisted comment. Author and parent post are fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: CommentId,
    pub post: PostId,
    pub author: AuthorId,
    pub text: CommentText,
    pub created: DateTime<Utc>,
}

impl Owned for Comment {
    fn owner(&self) -> AuthorId {
        self.author
    }
}

/// Comment body as submitted by a client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentSubmission {
    pub text: Option<String>,
}

impl CommentSubmission {
    pub fn validate(self) -> Result<CommentText, Error> {
        let text = self.text.ok_or_else(|| missing_field_error("text"))?;
        CommentText::new(text).map_err(|err| field_error("text", &err))
    }
}

/// Comment ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub post: PostId,
    pub author: AuthorId,
    pub text: CommentText,
    pub created: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(None, "required")]
    #[case(Some(""), "blank")]
    fn invalid_text_names_the_field(#[case] text: Option<&str>, #[case] code: &str) {
        let err = CommentSubmission {
            text: text.map(str::to_owned),
        }
        .validate()
        .expect_err("invalid comment");
        assert_eq!(err.details(), Some(&json!({"field": "text", "code": code})));
    }

    #[rstest]
    fn text_is_bounded() {
        assert!(CommentText::new("c".repeat(COMMENT_MAX)).is_ok());
        assert!(CommentText::new("c".repeat(COMMENT_MAX + 1)).is_err());
    }

    #[rstest]
    fn submitted_text_is_stored_trimmed() {
        let text = CommentSubmission {
            text: Some("  Nice post \n".to_owned()),
        }
        .validate()
        .expect("valid comment");
        assert_eq!(text.as_ref(), "Nice post");
    }
}
