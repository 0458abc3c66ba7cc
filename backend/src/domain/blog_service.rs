//! Blog domain service: posts, comments and author pages.
//!
//! Every mutation runs the same sequence: authentication is checked first,
//! then the target is loaded (404 when missing), then ownership is decided,
//! and only then is the payload validated and persisted.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::{Page, PageRequest, PaginationError};
use tracing::info;

use crate::domain::ports::{
    AuthorRepository, AuthorsQuery, CommentOnPostRequest, CommentRepository, CreatePostRequest,
    DeleteCommentRequest, EditPostRequest, PostRepository, PostsCommand, PostsQuery,
    ProfileCommand, UpdateProfileRequest,
};
use crate::domain::{
    Access, AccessPolicy, Author, AuthorDetail, AuthorId, Comment, Error, NewComment, NewPost,
    POSTS_PATH, Post, PostChanges, PostDetail, PostId, PostSubmission, Principal, Profile,
};

/// Service implementing the blog driving ports over the entity store.
#[derive(Clone)]
pub struct BlogService<A, P, C> {
    authors: Arc<A>,
    posts: Arc<P>,
    comments: Arc<C>,
    policy: Arc<dyn AccessPolicy>,
    clock: Arc<dyn Clock>,
}

impl<A, P, C> BlogService<A, P, C> {
    /// Create a new service over the given repositories.
    pub fn new(
        authors: Arc<A>,
        posts: Arc<P>,
        comments: Arc<C>,
        policy: Arc<dyn AccessPolicy>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            authors,
            posts,
            comments,
            policy,
            clock,
        }
    }
}

fn post_not_found(id: PostId) -> Error {
    Error::not_found(format!("post {id} not found"))
}

fn author_not_found(id: AuthorId) -> Error {
    Error::not_found(format!("author {id} not found"))
}

fn page_error(err: PaginationError) -> Error {
    Error::not_found(format!("invalid page: {err}"))
}

/// Distribute `comments` onto their posts, keeping store order on both sides.
fn attach_comments(posts: Vec<Post>, comments: Vec<Comment>) -> Vec<PostDetail> {
    let mut by_post: HashMap<PostId, Vec<Comment>> = HashMap::new();
    for comment in comments {
        by_post.entry(comment.post).or_default().push(comment);
    }
    posts
        .into_iter()
        .map(|post| {
            let comments = by_post.remove(&post.id).unwrap_or_default();
            PostDetail { post, comments }
        })
        .collect()
}

impl<A, P, C> BlogService<A, P, C>
where
    A: AuthorRepository,
    P: PostRepository,
    C: CommentRepository,
{
    /// Reject anonymous mutations before any lookup happens.
    fn require_authenticated(&self, principal: Principal, access: Access) -> Result<(), Error> {
        self.policy.decide(principal, access, None).into_result()
    }

    async fn load_post(&self, id: PostId) -> Result<Post, Error> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| post_not_found(id))
    }

    async fn detail_of(&self, post: Post) -> Result<PostDetail, Error> {
        let comments = self.comments.list_for_posts(&[post.id]).await?;
        Ok(PostDetail { post, comments })
    }

    async fn load_author(&self, id: AuthorId) -> Result<Author, Error> {
        self.authors
            .find_by_id(id)
            .await?
            .ok_or_else(|| author_not_found(id))
    }

    async fn author_detail(&self, author: Author) -> Result<AuthorDetail, Error> {
        let profile = self
            .authors
            .find_profile(author.id)
            .await?
            .unwrap_or_else(|| Profile::blank(author.id));
        let posts = self.posts.summaries_by_author(author.id).await?;
        Ok(AuthorDetail {
            author,
            profile,
            posts,
        })
    }

    async fn edit_post(
        &self,
        request: EditPostRequest,
        validate: fn(PostSubmission) -> Result<PostChanges, Error>,
    ) -> Result<PostDetail, Error> {
        let EditPostRequest {
            principal,
            post_id,
            submission,
        } = request;
        self.require_authenticated(principal, Access::Update)?;
        let mut post = self.load_post(post_id).await?;
        self.policy
            .decide_on(principal, Access::Update, &post)
            .into_result()?;

        let changes = validate(submission)?;
        post.apply(changes);
        self.posts.update(&post).await?;
        info!(post_id = %post.id, author_id = %post.author, "post updated");
        self.detail_of(post).await
    }
}

#[async_trait]
impl<A, P, C> PostsQuery for BlogService<A, P, C>
where
    A: AuthorRepository,
    P: PostRepository,
    C: CommentRepository,
{
    async fn list_posts(&self, page: PageRequest) -> Result<Page<PostDetail>, Error> {
        let count = self.posts.count().await?;
        page.ensure_within(count).map_err(page_error)?;
        let posts = self.posts.list(page.offset(), page.limit()).await?;
        let ids: Vec<PostId> = posts.iter().map(|post| post.id).collect();
        let comments = if ids.is_empty() {
            Vec::new()
        } else {
            self.comments.list_for_posts(&ids).await?
        };
        Page::build(page, count, attach_comments(posts, comments), POSTS_PATH).map_err(page_error)
    }

    async fn get_post(&self, id: PostId) -> Result<PostDetail, Error> {
        let post = self.load_post(id).await?;
        self.detail_of(post).await
    }
}

#[async_trait]
impl<A, P, C> PostsCommand for BlogService<A, P, C>
where
    A: AuthorRepository,
    P: PostRepository,
    C: CommentRepository,
{
    async fn create_post(&self, request: CreatePostRequest) -> Result<PostDetail, Error> {
        self.require_authenticated(request.principal, Access::Create)?;
        let author = request.principal.require_author()?;
        let draft = request.submission.into_draft()?;

        let post = self
            .posts
            .insert(&NewPost::from_draft(author, draft, self.clock.utc()))
            .await?;
        info!(post_id = %post.id, author_id = %author, "post created");
        Ok(PostDetail {
            post,
            comments: Vec::new(),
        })
    }

    async fn replace_post(&self, request: EditPostRequest) -> Result<PostDetail, Error> {
        self.edit_post(request, |submission| {
            submission.into_draft().map(PostChanges::from)
        })
        .await
    }

    async fn patch_post(&self, request: EditPostRequest) -> Result<PostDetail, Error> {
        self.edit_post(request, PostSubmission::into_changes)
            .await
    }

    async fn delete_post(&self, principal: Principal, post_id: PostId) -> Result<(), Error> {
        self.require_authenticated(principal, Access::Delete)?;
        let post = self.load_post(post_id).await?;
        self.policy
            .decide_on(principal, Access::Delete, &post)
            .into_result()?;

        if !self.posts.delete(post_id).await? {
            return Err(post_not_found(post_id));
        }
        info!(post_id = %post_id, author_id = %post.author, "post deleted");
        Ok(())
    }

    async fn comment_on_post(&self, request: CommentOnPostRequest) -> Result<PostDetail, Error> {
        let CommentOnPostRequest {
            principal,
            post_id,
            submission,
        } = request;
        self.require_authenticated(principal, Access::Create)?;
        let author = principal.require_author()?;
        let post = self.load_post(post_id).await?;
        let text = submission.validate()?;

        let comment = self
            .comments
            .insert(&NewComment {
                post: post.id,
                author,
                text,
                created: self.clock.utc(),
            })
            .await?;
        info!(
            post_id = %post.id,
            comment_id = %comment.id,
            author_id = %author,
            "comment added"
        );
        self.detail_of(post).await
    }

    async fn delete_comment(&self, request: DeleteCommentRequest) -> Result<(), Error> {
        let DeleteCommentRequest {
            principal,
            post_id,
            comment_id,
        } = request;
        self.require_authenticated(principal, Access::Delete)?;
        let comment = self
            .comments
            .find_by_id(comment_id)
            .await?
            .filter(|comment| comment.post == post_id)
            .ok_or_else(|| {
                Error::not_found(format!("comment {comment_id} not found on post {post_id}"))
            })?;
        self.policy
            .decide_on(principal, Access::Delete, &comment)
            .into_result()?;

        if !self.comments.delete(comment_id).await? {
            return Err(Error::not_found(format!("comment {comment_id} not found")));
        }
        info!(post_id = %post_id, comment_id = %comment_id, "comment deleted");
        Ok(())
    }
}

#[async_trait]
impl<A, P, C> AuthorsQuery for BlogService<A, P, C>
where
    A: AuthorRepository,
    P: PostRepository,
    C: CommentRepository,
{
    async fn list_authors(&self) -> Result<Vec<AuthorDetail>, Error> {
        let authors = self.authors.list().await?;
        let mut details = Vec::with_capacity(authors.len());
        for author in authors {
            details.push(self.author_detail(author).await?);
        }
        Ok(details)
    }

    async fn get_author(&self, id: AuthorId) -> Result<AuthorDetail, Error> {
        let author = self.load_author(id).await?;
        self.author_detail(author).await
    }
}

#[async_trait]
impl<A, P, C> ProfileCommand for BlogService<A, P, C>
where
    A: AuthorRepository,
    P: PostRepository,
    C: CommentRepository,
{
    async fn update_profile(&self, request: UpdateProfileRequest) -> Result<AuthorDetail, Error> {
        let UpdateProfileRequest {
            principal,
            author_id,
            submission,
        } = request;
        self.require_authenticated(principal, Access::Update)?;
        let author = self.load_author(author_id).await?;
        self.policy
            .decide_on(principal, Access::Update, &author)
            .into_result()?;

        let changes = submission.validate()?;
        let mut profile = self
            .authors
            .find_profile(author_id)
            .await?
            .unwrap_or_else(|| Profile::blank(author_id));
        profile.apply(&changes);
        self.authors.save_profile(&profile).await?;
        info!(author_id = %author_id, "profile updated");
        self.author_detail(author).await
    }
}

#[cfg(test)]
#[path = "blog_service_tests.rs"]
mod tests;
