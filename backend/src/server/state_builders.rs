//! Builders wiring domain services over the configured entity store.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use backend::domain::ports::{
    AuthTokenRepository, AuthorRepository, CommentRepository, PasswordHasher, PostRepository,
};
use backend::domain::{AccountService, BlogService, OwnerOrReadOnly};
use backend::inbound::http::state::{HttpState, HttpStatePorts};
use backend::outbound::memory::InMemoryBlogStore;
use backend::outbound::persistence::{
    DieselAuthTokenRepository, DieselAuthorRepository, DieselCommentRepository,
    DieselPostRepository,
};
use backend::outbound::security::Argon2PasswordHasher;

use super::ServerConfig;

/// Repositories backing one store.
struct Stores<A, P, C, T> {
    authors: Arc<A>,
    posts: Arc<P>,
    comments: Arc<C>,
    tokens: Arc<T>,
}

fn ports_over<A, P, C, T>(stores: Stores<A, P, C, T>) -> HttpStatePorts
where
    A: AuthorRepository + 'static,
    P: PostRepository + 'static,
    C: CommentRepository + 'static,
    T: AuthTokenRepository + 'static,
{
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2PasswordHasher::new());
    let Stores {
        authors,
        posts,
        comments,
        tokens,
    } = stores;

    let blog = Arc::new(BlogService::new(
        authors.clone(),
        posts,
        comments,
        Arc::new(OwnerOrReadOnly),
        clock.clone(),
    ));
    let accounts = Arc::new(AccountService::new(authors, tokens, hasher, clock));

    HttpStatePorts {
        posts: blog.clone(),
        posts_command: blog.clone(),
        authors: blog.clone(),
        profiles: blog,
        accounts,
    }
}

/// Build handler state over PostgreSQL when a pool is configured, otherwise
/// over a fresh in-memory store.
pub(crate) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let ports = match &config.db_pool {
        Some(pool) => ports_over(Stores {
            authors: Arc::new(DieselAuthorRepository::new(pool.clone())),
            posts: Arc::new(DieselPostRepository::new(pool.clone())),
            comments: Arc::new(DieselCommentRepository::new(pool.clone())),
            tokens: Arc::new(DieselAuthTokenRepository::new(pool.clone())),
        }),
        None => {
            let store = Arc::new(InMemoryBlogStore::new());
            ports_over(Stores {
                authors: store.clone(),
                posts: store.clone(),
                comments: store.clone(),
                tokens: store,
            })
        }
    };
    web::Data::new(HttpState::with_page_size(ports, config.page_size))
}
