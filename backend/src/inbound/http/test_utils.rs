//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use chrono::{DateTime, TimeZone, Utc};

use crate::domain::ports::{
    MockAccountCommand, MockAuthorsQuery, MockPostsCommand, MockPostsQuery, MockProfileCommand,
};
use crate::domain::{AuthorId, Principal};
use crate::inbound::http::configure;
use crate::inbound::http::state::{HttpState, HttpStatePorts};

/// Token key accepted by [`MockPorts::with_token_for`].
pub const TEST_TOKEN: &str = "9944b09199c62bcf9418ad846dd0e4bbdfc6ee4b";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Fixed timestamp for response fixtures.
pub fn fixture_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

/// Mockall doubles for every driving port.
#[derive(Default)]
pub struct MockPorts {
    pub posts: MockPostsQuery,
    pub posts_command: MockPostsCommand,
    pub authors: MockAuthorsQuery,
    pub profiles: MockProfileCommand,
    pub accounts: MockAccountCommand,
}

impl MockPorts {
    /// Resolve [`TEST_TOKEN`] to `author`; any other key is unknown.
    pub fn with_token_for(mut self, author: AuthorId) -> Self {
        self.accounts.expect_resolve_token().returning(move |token| {
            if token.expose() == TEST_TOKEN {
                Ok(Principal::Authenticated(author))
            } else {
                Err(crate::domain::Error::unauthorized("invalid token"))
            }
        });
        self
    }

    pub fn into_state(self) -> web::Data<HttpState> {
        web::Data::new(HttpState::new(HttpStatePorts {
            posts: Arc::new(self.posts),
            posts_command: Arc::new(self.posts_command),
            authors: Arc::new(self.authors),
            profiles: Arc::new(self.profiles),
            accounts: Arc::new(self.accounts),
        }))
    }
}

/// App serving every `/api/v1` route over `state`.
pub fn test_app(
    state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(state)
        .wrap(test_session_middleware())
        .service(web::scope("/api/v1").configure(configure))
}

/// `Authorization` header value carrying [`TEST_TOKEN`].
pub fn token_header() -> (&'static str, String) {
    ("Authorization", format!("Token {TEST_TOKEN}"))
}
