//! Blog posts and the payloads used to create or edit them.

use chrono::{DateTime, Utc};

use super::author::AuthorId;
use super::comment::Comment;
use super::policy::Owned;
use super::profile::ImageRef;
use super::record_id::define_record_id;
use super::validation::{define_bounded_text, field_error, missing_field_error};
use super::Error;

define_record_id! {
    /// Store-assigned post identifier.
    PostId
}

/// Maximum title length in characters.
pub const TITLE_MAX: usize = 50;
/// Maximum body length in characters.
pub const CONTENT_MAX: usize = 20_000;
/// Collection path of posts in the JSON API.
pub const POSTS_PATH: &str = "/api/v1/posts";
/// Image assigned to posts created without one.
pub const DEFAULT_POST_IMAGE: &str = "default_image.png";

define_bounded_text! {
    /// Post headline, 1 to [`TITLE_MAX`] characters.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::PostTitle;
    ///
    /// assert!(PostTitle::new("Hello").is_ok());
    /// assert!(PostTitle::new("   ").is_err());
    /// ```
    PostTitle, max = TITLE_MAX
}

define_bounded_text! {
    /// Post body, 1 to [`CONTENT_MAX`] characters.
    PostContent, max = CONTENT_MAX
}

/// Persisted post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: PostId,
    pub title: PostTitle,
    pub content: PostContent,
    pub created: DateTime<Utc>,
    pub image: ImageRef,
    pub author: AuthorId,
}

impl Owned for Post {
    fn owner(&self) -> AuthorId {
        self.author
    }
}

impl Post {
    /// Apply validated edits. Author, id and timestamp never change.
    pub fn apply(&mut self, changes: PostChanges) {
        let PostChanges {
            title,
            content,
            image,
        } = changes;
        if let Some(title) = title {
            self.title = title;
        }
        if let Some(content) = content {
            self.content = content;
        }
        if let Some(image) = image {
            self.image = image;
        }
    }
}

/// Post body as submitted by a client, before validation.
///
/// Any author value in the payload is dropped by the inbound adapter; the
/// owning author always comes from the request principal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostSubmission {
    pub title: Option<String>,
    pub content: Option<String>,
    pub image: Option<String>,
}

impl PostSubmission {
    /// Validate a full post body (create and replace). Title and content are
    /// required.
    pub fn into_draft(self) -> Result<PostDraft, Error> {
        let title = self.title.ok_or_else(|| missing_field_error("title"))?;
        let content = self.content.ok_or_else(|| missing_field_error("content"))?;
        Ok(PostDraft {
            title: PostTitle::new(title).map_err(|err| field_error("title", &err))?,
            content: PostContent::new(content).map_err(|err| field_error("content", &err))?,
            image: validate_image(self.image)?,
        })
    }

    /// Validate a partial post body; every field is optional.
    pub fn into_changes(self) -> Result<PostChanges, Error> {
        Ok(PostChanges {
            title: self
                .title
                .map(PostTitle::new)
                .transpose()
                .map_err(|err| field_error("title", &err))?,
            content: self
                .content
                .map(PostContent::new)
                .transpose()
                .map_err(|err| field_error("content", &err))?,
            image: validate_image(self.image)?,
        })
    }
}

fn validate_image(image: Option<String>) -> Result<Option<ImageRef>, Error> {
    image
        .map(ImageRef::new)
        .transpose()
        .map_err(|err| field_error("image", &err))
}

/// Validated full post body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub title: PostTitle,
    pub content: PostContent,
    pub image: Option<ImageRef>,
}

impl From<PostDraft> for PostChanges {
    fn from(draft: PostDraft) -> Self {
        Self {
            title: Some(draft.title),
            content: Some(draft.content),
            image: draft.image,
        }
    }
}

/// Validated partial edit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostChanges {
    pub title: Option<PostTitle>,
    pub content: Option<PostContent>,
    pub image: Option<ImageRef>,
}

/// Post ready to be inserted; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub author: AuthorId,
    pub title: PostTitle,
    pub content: PostContent,
    pub image: ImageRef,
    pub created: DateTime<Utc>,
}

impl NewPost {
    /// Build an insert for `draft` owned by `author`.
    pub fn from_draft(author: AuthorId, draft: PostDraft, created: DateTime<Utc>) -> Self {
        Self {
            author,
            title: draft.title,
            content: draft.content,
            image: draft.image.unwrap_or_else(default_post_image),
            created,
        }
    }
}

/// Placeholder image reference for posts.
pub fn default_post_image() -> ImageRef {
    ImageRef::placeholder(DEFAULT_POST_IMAGE)
}

/// A post together with its comments, oldest comment first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDetail {
    pub post: Post,
    pub comments: Vec<Comment>,
}

/// Short form of a post listed on an author's page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostSummary {
    pub id: PostId,
    pub title: PostTitle,
    pub created: DateTime<Utc>,
    pub comments_count: u64,
}

impl PostSummary {
    /// Canonical API path of the post.
    pub fn url(&self) -> String {
        format!("{POSTS_PATH}/{}", self.id)
    }
}
