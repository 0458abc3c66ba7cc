//! Internal Diesel row structs and their conversion into domain types.
//!
//! Rows are implementation details of the persistence layer. Reading a row
//! re-validates every field through the domain constructors; a stored value
//! that no longer validates is reported as [`CorruptRow`].

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::{
    Author, AuthorId, Bio, Comment, CommentId, CommentText, ImageRef, Post, PostContent, PostId,
    PostTitle, Profile, Username,
};

use super::schema::{auth_tokens, authors, comments, posts, profiles};

/// A stored value rejected by domain validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("corrupted {column} in database: {message}")]
pub(crate) struct CorruptRow {
    column: &'static str,
    message: String,
}

fn corrupt(column: &'static str, err: impl std::fmt::Display) -> CorruptRow {
    CorruptRow {
        column,
        message: err.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Authors and profiles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = authors)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AuthorRow {
    pub id: i64,
    pub username: String,
    pub date_joined: DateTime<Utc>,
}

impl TryFrom<AuthorRow> for Author {
    type Error = CorruptRow;

    fn try_from(row: AuthorRow) -> Result<Self, Self::Error> {
        let username = Username::new(row.username).map_err(|err| corrupt("username", err))?;
        Ok(Self {
            id: AuthorId::new(row.id),
            username,
            date_joined: row.date_joined,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = authors)]
pub(crate) struct NewAuthorRow<'a> {
    pub username: &'a str,
    pub password_hash: &'a str,
    pub date_joined: DateTime<Utc>,
}

/// Profile row; also used as the insert and update payload.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub(crate) struct ProfileRow {
    pub author_id: i64,
    pub bio: Option<String>,
    pub avatar: String,
}

impl From<&Profile> for ProfileRow {
    fn from(profile: &Profile) -> Self {
        Self {
            author_id: profile.author_id.get(),
            bio: profile.bio.as_ref().map(|bio| bio.as_ref().to_owned()),
            avatar: profile.avatar.as_ref().to_owned(),
        }
    }
}

impl TryFrom<ProfileRow> for Profile {
    type Error = CorruptRow;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        let bio = row
            .bio
            .map(Bio::new)
            .transpose()
            .map_err(|err| corrupt("bio", err))?;
        let avatar = ImageRef::new(row.avatar).map_err(|err| corrupt("avatar", err))?;
        Ok(Self {
            author_id: AuthorId::new(row.author_id),
            bio,
            avatar,
        })
    }
}

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = posts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PostRow {
    pub id: i64,
    pub author_id: i64,
    pub title: String,
    pub content: String,
    pub image: String,
    pub created: DateTime<Utc>,
}

impl TryFrom<PostRow> for Post {
    type Error = CorruptRow;

    fn try_from(row: PostRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: PostId::new(row.id),
            title: PostTitle::new(row.title).map_err(|err| corrupt("title", err))?,
            content: PostContent::new(row.content).map_err(|err| corrupt("content", err))?,
            created: row.created,
            image: ImageRef::new(row.image).map_err(|err| corrupt("image", err))?,
            author: AuthorId::new(row.author_id),
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = posts)]
pub(crate) struct NewPostRow<'a> {
    pub author_id: i64,
    pub title: &'a str,
    pub content: &'a str,
    pub image: &'a str,
    pub created: DateTime<Utc>,
}

/// Editable post columns.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = posts)]
pub(crate) struct PostUpdate<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub image: &'a str,
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CommentRow {
    pub id: i64,
    pub post_id: i64,
    pub author_id: i64,
    pub text: String,
    pub created: DateTime<Utc>,
}

impl TryFrom<CommentRow> for Comment {
    type Error = CorruptRow;

    fn try_from(row: CommentRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: CommentId::new(row.id),
            post: PostId::new(row.post_id),
            author: AuthorId::new(row.author_id),
            text: CommentText::new(row.text).map_err(|err| corrupt("text", err))?,
            created: row.created,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = comments)]
pub(crate) struct NewCommentRow<'a> {
    pub post_id: i64,
    pub author_id: i64,
    pub text: &'a str,
    pub created: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = auth_tokens)]
pub(crate) struct NewAuthTokenRow<'a> {
    pub author_id: i64,
    pub digest: &'a str,
    pub created: DateTime<Utc>,
}
