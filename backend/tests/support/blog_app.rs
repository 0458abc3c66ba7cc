//! In-memory application harness shared by the HTTP integration suites.
//!
//! Each request builds a fresh Actix test service over the same
//! [`HttpState`], so data written by one call is visible to the next while
//! no socket is ever bound. Every service signs sessions with the same key,
//! so a cookie captured from one response authenticates later requests.

use std::sync::Arc;

use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::{Cookie, Key};
use actix_web::http::{Method, StatusCode, header};
use actix_web::{App, test, web};
use argon2::Params;
use mockable::{Clock, DefaultClock};
use serde_json::{Value, json};

use backend::Trace;
use backend::domain::ports::PasswordHasher;
use backend::domain::{AccountService, BlogService, OwnerOrReadOnly, TRACE_ID_HEADER};
use backend::inbound::http::configure;
use backend::inbound::http::state::{HttpState, HttpStatePorts};
use backend::outbound::memory::InMemoryBlogStore;
use backend::outbound::security::Argon2PasswordHasher;

/// Password used by every fixture account.
pub(crate) const PASSWORD: &str = "correct-horse-9";

const SESSION_COOKIE: &str = "session";
const SESSION_KEY: [u8; 64] = [7; 64];

/// Handler state over an empty in-memory store.
///
/// Argon2 runs with minimal cost so suites stay fast in debug builds.
pub(crate) fn in_memory_state(page_size: u32) -> web::Data<HttpState> {
    let store = Arc::new(InMemoryBlogStore::new());
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let params = Params::new(8, 1, 1, None).expect("argon2 params");
    let hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2PasswordHasher::with_params(params));

    let blog = Arc::new(BlogService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        Arc::new(OwnerOrReadOnly),
        clock.clone(),
    ));
    let accounts = Arc::new(AccountService::new(store.clone(), store, hasher, clock));

    web::Data::new(HttpState::with_page_size(
        HttpStatePorts {
            posts: blog.clone(),
            posts_command: blog.clone(),
            authors: blog.clone(),
            profiles: blog,
            accounts,
        },
        page_size,
    ))
}

/// One API call relative to `/api/v1`.
pub(crate) struct ApiRequest<'a> {
    pub(crate) method: Method,
    pub(crate) path: &'a str,
    pub(crate) token: Option<&'a str>,
    pub(crate) cookie: Option<Cookie<'static>>,
    pub(crate) payload: Option<Value>,
}

impl<'a> ApiRequest<'a> {
    pub(crate) fn new(method: Method, path: &'a str) -> Self {
        Self {
            method,
            path,
            token: None,
            cookie: None,
            payload: None,
        }
    }

    pub(crate) fn get(path: &'a str) -> Self {
        Self::new(Method::GET, path)
    }

    pub(crate) fn token(mut self, token: Option<&'a str>) -> Self {
        self.token = token;
        self
    }

    /// Present a session cookie instead of (or alongside) a token.
    pub(crate) fn cookie(mut self, cookie: Option<Cookie<'static>>) -> Self {
        self.cookie = cookie;
        self
    }

    pub(crate) fn json(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }
}

static NULL: Value = Value::Null;

/// Captured response; empty bodies decode to [`Value::Null`].
#[derive(Debug, Clone)]
pub(crate) struct ApiResponse {
    pub(crate) status: StatusCode,
    pub(crate) trace_id: Option<String>,
    /// Session cookie set (or removed) by the response.
    pub(crate) cookie: Option<Cookie<'static>>,
    pub(crate) body: Value,
}

impl ApiResponse {
    pub(crate) fn field(&self, name: &str) -> &Value {
        self.body.get(name).unwrap_or(&NULL)
    }

    pub(crate) fn id(&self) -> i64 {
        self.field("id").as_i64().expect("numeric id")
    }
}

fn session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::from(&SESSION_KEY))
        .cookie_name(SESSION_COOKIE.to_owned())
        .cookie_secure(false)
        .build()
}

/// Dispatch `request` through the full middleware stack.
pub(crate) async fn send(state: &web::Data<HttpState>, request: ApiRequest<'_>) -> ApiResponse {
    let app = test::init_service(
        App::new()
            .app_data(state.clone())
            .wrap(Trace)
            .service(
                web::scope("/api/v1")
                    .wrap(session_middleware())
                    .configure(configure),
            ),
    )
    .await;

    let mut builder = test::TestRequest::default()
        .method(request.method)
        .uri(&format!("/api/v1{}", request.path));
    if let Some(token) = request.token {
        builder = builder.insert_header((header::AUTHORIZATION, format!("Token {token}")));
    }
    if let Some(cookie) = request.cookie {
        builder = builder.cookie(cookie);
    }
    if let Some(payload) = request.payload {
        builder = builder.set_json(payload);
    }

    let response = test::call_service(&app, builder.to_request()).await;
    let status = response.status();
    let trace_id = response
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(ToOwned::to_owned);
    let cookie = response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .map(Cookie::into_owned);
    let bytes = test::read_body(response).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON response body")
    };
    ApiResponse {
        status,
        trace_id,
        cookie,
        body,
    }
}

/// Author created through the public API together with a live token.
#[derive(Debug, Clone)]
pub(crate) struct Account {
    pub(crate) id: i64,
    pub(crate) token: String,
}

/// Log `username` in, returning the response with its token and cookie.
pub(crate) async fn log_in(state: &web::Data<HttpState>, username: &str) -> ApiResponse {
    let login = send(
        state,
        ApiRequest::new(Method::POST, "/auth/token/login")
            .json(json!({ "username": username, "password": PASSWORD })),
    )
    .await;
    assert_eq!(login.status, StatusCode::OK, "log in {username}");
    login
}

/// Sign `username` up and log them in.
pub(crate) async fn register(state: &web::Data<HttpState>, username: &str) -> Account {
    let created = send(
        state,
        ApiRequest::new(Method::POST, "/auth/users")
            .json(json!({ "username": username, "password": PASSWORD })),
    )
    .await;
    assert_eq!(created.status, StatusCode::CREATED, "sign up {username}");

    let login = log_in(state, username).await;
    Account {
        id: created.id(),
        token: login
            .field("authToken")
            .as_str()
            .expect("auth token")
            .to_owned(),
    }
}
