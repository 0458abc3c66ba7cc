//! In-process entity store used when no database URL is configured.
//!
//! A single mutex guards every table, so each repository call (including
//! cascading deletes) is atomic with respect to other requests. State is
//! lost on restart.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    AuthTokenPersistenceError, AuthTokenRepository, AuthorPersistenceError, AuthorRepository,
    CommentPersistenceError, CommentRepository, NewAuthor, PostPersistenceError, PostRepository,
};
use crate::domain::{
    Author, AuthorId, Comment, CommentId, NewComment, NewPost, Post, PostId, PostSummary,
    Profile, StoredCredentials, TokenDigest,
};

#[derive(Debug, Clone)]
struct AuthorRecord {
    author: Author,
    password_hash: String,
}

#[derive(Debug, Default)]
struct StoreState {
    last_author_id: i64,
    last_post_id: i64,
    last_comment_id: i64,
    authors: BTreeMap<AuthorId, AuthorRecord>,
    profiles: HashMap<AuthorId, Profile>,
    posts: BTreeMap<PostId, Post>,
    comments: BTreeMap<CommentId, Comment>,
    tokens: HashMap<AuthorId, TokenDigest>,
}

impl StoreState {
    fn remove_post_cascade(&mut self, id: PostId) -> bool {
        let removed = self.posts.remove(&id).is_some();
        self.comments.retain(|_, comment| comment.post != id);
        removed
    }

    fn remove_author_cascade(&mut self, id: AuthorId) -> bool {
        let removed = self.authors.remove(&id).is_some();
        self.profiles.remove(&id);
        self.tokens.remove(&id);
        let owned_posts: Vec<PostId> = self
            .posts
            .values()
            .filter(|post| post.author == id)
            .map(|post| post.id)
            .collect();
        for post in owned_posts {
            self.remove_post_cascade(post);
        }
        self.comments.retain(|_, comment| comment.author != id);
        removed
    }

    fn comments_on(&self, post: PostId) -> u64 {
        self.comments
            .values()
            .filter(|comment| comment.post == post)
            .count() as u64
    }
}

/// Newest first, ties broken by id descending.
fn newest_first(a: &Post, b: &Post) -> std::cmp::Ordering {
    b.created.cmp(&a.created).then(b.id.cmp(&a.id))
}

/// Shared in-memory implementation of every driven store port.
#[derive(Debug, Default)]
pub struct InMemoryBlogStore {
    state: Mutex<StoreState>,
}

impl InMemoryBlogStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock<E>(&self, poisoned: impl FnOnce(String) -> E) -> Result<MutexGuard<'_, StoreState>, E> {
        self.state
            .lock()
            .map_err(|err| poisoned(format!("store lock poisoned: {err}")))
    }
}

#[async_trait]
impl AuthorRepository for InMemoryBlogStore {
    async fn create(&self, author: &NewAuthor) -> Result<Author, AuthorPersistenceError> {
        let mut state = self.lock(AuthorPersistenceError::query)?;
        let taken = state
            .authors
            .values()
            .any(|record| record.author.username == author.username);
        if taken {
            return Err(AuthorPersistenceError::duplicate_username(
                author.username.as_ref(),
            ));
        }

        state.last_author_id += 1;
        let id = AuthorId::new(state.last_author_id);
        let created = Author {
            id,
            username: author.username.clone(),
            date_joined: author.date_joined,
        };
        state.authors.insert(
            id,
            AuthorRecord {
                author: created.clone(),
                password_hash: author.password_hash.clone(),
            },
        );
        state.profiles.insert(id, Profile::blank(id));
        Ok(created)
    }

    async fn find_by_id(&self, id: AuthorId) -> Result<Option<Author>, AuthorPersistenceError> {
        let state = self.lock(AuthorPersistenceError::query)?;
        Ok(state.authors.get(&id).map(|record| record.author.clone()))
    }

    async fn list(&self) -> Result<Vec<Author>, AuthorPersistenceError> {
        let state = self.lock(AuthorPersistenceError::query)?;
        Ok(state
            .authors
            .values()
            .map(|record| record.author.clone())
            .collect())
    }

    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<StoredCredentials>, AuthorPersistenceError> {
        let state = self.lock(AuthorPersistenceError::query)?;
        Ok(state
            .authors
            .values()
            .find(|record| record.author.username.as_ref() == username)
            .map(|record| StoredCredentials {
                author_id: record.author.id,
                password_hash: record.password_hash.clone(),
            }))
    }

    async fn password_hash(&self, id: AuthorId) -> Result<Option<String>, AuthorPersistenceError> {
        let state = self.lock(AuthorPersistenceError::query)?;
        Ok(state
            .authors
            .get(&id)
            .map(|record| record.password_hash.clone()))
    }

    async fn delete(&self, id: AuthorId) -> Result<bool, AuthorPersistenceError> {
        let mut state = self.lock(AuthorPersistenceError::query)?;
        Ok(state.remove_author_cascade(id))
    }

    async fn find_profile(&self, id: AuthorId) -> Result<Option<Profile>, AuthorPersistenceError> {
        let state = self.lock(AuthorPersistenceError::query)?;
        Ok(state.profiles.get(&id).cloned())
    }

    async fn save_profile(&self, profile: &Profile) -> Result<(), AuthorPersistenceError> {
        let mut state = self.lock(AuthorPersistenceError::query)?;
        if !state.authors.contains_key(&profile.author_id) {
            return Err(AuthorPersistenceError::query("profile owner does not exist"));
        }
        state.profiles.insert(profile.author_id, profile.clone());
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryBlogStore {
    async fn count(&self) -> Result<u64, PostPersistenceError> {
        let state = self.lock(PostPersistenceError::query)?;
        Ok(state.posts.len() as u64)
    }

    async fn list(&self, offset: u64, limit: u64) -> Result<Vec<Post>, PostPersistenceError> {
        let state = self.lock(PostPersistenceError::query)?;
        let mut posts: Vec<Post> = state.posts.values().cloned().collect();
        posts.sort_by(newest_first);
        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(posts.into_iter().skip(offset).take(limit).collect())
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, PostPersistenceError> {
        let state = self.lock(PostPersistenceError::query)?;
        Ok(state.posts.get(&id).cloned())
    }

    async fn insert(&self, post: &NewPost) -> Result<Post, PostPersistenceError> {
        let mut state = self.lock(PostPersistenceError::query)?;
        if !state.authors.contains_key(&post.author) {
            return Err(PostPersistenceError::query("post author does not exist"));
        }
        state.last_post_id += 1;
        let created = Post {
            id: PostId::new(state.last_post_id),
            title: post.title.clone(),
            content: post.content.clone(),
            created: post.created,
            image: post.image.clone(),
            author: post.author,
        };
        state.posts.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update(&self, post: &Post) -> Result<(), PostPersistenceError> {
        let mut state = self.lock(PostPersistenceError::query)?;
        let Some(stored) = state.posts.get_mut(&post.id) else {
            return Err(PostPersistenceError::query("post not found for update"));
        };
        stored.title = post.title.clone();
        stored.content = post.content.clone();
        stored.image = post.image.clone();
        Ok(())
    }

    async fn delete(&self, id: PostId) -> Result<bool, PostPersistenceError> {
        let mut state = self.lock(PostPersistenceError::query)?;
        Ok(state.remove_post_cascade(id))
    }

    async fn summaries_by_author(
        &self,
        author: AuthorId,
    ) -> Result<Vec<PostSummary>, PostPersistenceError> {
        let state = self.lock(PostPersistenceError::query)?;
        let mut posts: Vec<&Post> = state
            .posts
            .values()
            .filter(|post| post.author == author)
            .collect();
        posts.sort_by(|a, b| newest_first(a, b));
        Ok(posts
            .into_iter()
            .map(|post| PostSummary {
                id: post.id,
                title: post.title.clone(),
                created: post.created,
                comments_count: state.comments_on(post.id),
            })
            .collect())
    }
}

#[async_trait]
impl CommentRepository for InMemoryBlogStore {
    async fn list_for_posts(
        &self,
        posts: &[PostId],
    ) -> Result<Vec<Comment>, CommentPersistenceError> {
        let state = self.lock(CommentPersistenceError::query)?;
        let mut comments: Vec<Comment> = state
            .comments
            .values()
            .filter(|comment| posts.contains(&comment.post))
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created.cmp(&b.created).then(a.id.cmp(&b.id)));
        Ok(comments)
    }

    async fn find_by_id(&self, id: CommentId) -> Result<Option<Comment>, CommentPersistenceError> {
        let state = self.lock(CommentPersistenceError::query)?;
        Ok(state.comments.get(&id).cloned())
    }

    async fn insert(&self, comment: &NewComment) -> Result<Comment, CommentPersistenceError> {
        let mut state = self.lock(CommentPersistenceError::query)?;
        if !state.posts.contains_key(&comment.post) {
            return Err(CommentPersistenceError::query("comment post does not exist"));
        }
        if !state.authors.contains_key(&comment.author) {
            return Err(CommentPersistenceError::query("comment author does not exist"));
        }
        state.last_comment_id += 1;
        let created = Comment {
            id: CommentId::new(state.last_comment_id),
            post: comment.post,
            author: comment.author,
            text: comment.text.clone(),
            created: comment.created,
        };
        state.comments.insert(created.id, created.clone());
        Ok(created)
    }

    async fn delete(&self, id: CommentId) -> Result<bool, CommentPersistenceError> {
        let mut state = self.lock(CommentPersistenceError::query)?;
        Ok(state.comments.remove(&id).is_some())
    }
}

#[async_trait]
impl AuthTokenRepository for InMemoryBlogStore {
    async fn replace(
        &self,
        author: AuthorId,
        digest: &TokenDigest,
        _created: DateTime<Utc>,
    ) -> Result<(), AuthTokenPersistenceError> {
        let mut state = self.lock(AuthTokenPersistenceError::query)?;
        if !state.authors.contains_key(&author) {
            return Err(AuthTokenPersistenceError::query("token owner does not exist"));
        }
        state.tokens.insert(author, digest.clone());
        Ok(())
    }

    async fn resolve(
        &self,
        digest: &TokenDigest,
    ) -> Result<Option<AuthorId>, AuthTokenPersistenceError> {
        let state = self.lock(AuthTokenPersistenceError::query)?;
        Ok(state
            .tokens
            .iter()
            .find(|(_, stored)| *stored == digest)
            .map(|(author, _)| *author))
    }

    async fn revoke(&self, author: AuthorId) -> Result<(), AuthTokenPersistenceError> {
        let mut state = self.lock(AuthTokenPersistenceError::query)?;
        state.tokens.remove(&author);
        Ok(())
    }
}
