//! Domain ports for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`PasswordHasher`]) are implemented by
//! outbound adapters. Driving ports (`*Query`, `*Command`) are implemented by
//! the domain services and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod auth_token_repository;
mod author_repository;
mod authors_query;
mod comment_repository;
mod password_hasher;
mod post_repository;
mod posts_command;
mod posts_query;
mod profile_command;

#[cfg(test)]
pub use account_command::MockAccountCommand;
pub use account_command::{AccountCommand, LoginOutcome, SignUpRequest};
#[cfg(test)]
pub use auth_token_repository::MockAuthTokenRepository;
pub use auth_token_repository::{AuthTokenPersistenceError, AuthTokenRepository};
#[cfg(test)]
pub use author_repository::MockAuthorRepository;
pub use author_repository::{AuthorPersistenceError, AuthorRepository, NewAuthor};
#[cfg(test)]
pub use authors_query::MockAuthorsQuery;
pub use authors_query::AuthorsQuery;
#[cfg(test)]
pub use comment_repository::MockCommentRepository;
pub use comment_repository::{CommentPersistenceError, CommentRepository};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use post_repository::MockPostRepository;
pub use post_repository::{PostPersistenceError, PostRepository};
#[cfg(test)]
pub use posts_command::MockPostsCommand;
pub use posts_command::{
    CommentOnPostRequest, CreatePostRequest, DeleteCommentRequest, EditPostRequest, PostsCommand,
};
#[cfg(test)]
pub use posts_query::MockPostsQuery;
pub use posts_query::PostsQuery;
#[cfg(test)]
pub use profile_command::MockProfileCommand;
pub use profile_command::{ProfileCommand, UpdateProfileRequest};
