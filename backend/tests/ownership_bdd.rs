//! Behaviour tests for owner-only edits across posts, comments, profiles and
//! accounts.
//!
//! Scenarios drive the real services over the in-memory store through the
//! HTTP adapter, authenticating with per-author API tokens or, for an
//! author's "browser", the session cookie issued at login.
//
// rstest-bdd generates guard variables with double underscores, which trips
// the non_snake_case lint under -D warnings.
#![allow(non_snake_case)]

// Shared harness has helpers used only by other suites.
#[allow(dead_code)]
#[path = "support/blog_app.rs"]
mod blog_app;

use std::cell::RefCell;
use std::collections::HashMap;

use actix_web::cookie::Cookie;
use actix_web::http::Method;
use actix_web::web;
use backend::inbound::http::state::HttpState;
use blog_app::{
    Account, ApiRequest, ApiResponse, PASSWORD, in_memory_state, log_in, register, send,
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::{Value, json};

struct BlogWorld {
    runtime: actix_rt::SystemRunner,
    state: web::Data<HttpState>,
    accounts: RefCell<HashMap<String, Account>>,
    sessions: RefCell<HashMap<String, Cookie<'static>>>,
    post_id: RefCell<Option<i64>>,
    last: RefCell<Option<ApiResponse>>,
}

impl BlogWorld {
    fn new() -> Self {
        Self {
            runtime: actix_rt::System::new(),
            state: in_memory_state(10),
            accounts: RefCell::new(HashMap::new()),
            sessions: RefCell::new(HashMap::new()),
            post_id: RefCell::new(None),
            last: RefCell::new(None),
        }
    }

    fn account(&self, name: &str) -> Account {
        self.accounts
            .borrow()
            .get(name)
            .cloned()
            .unwrap_or_else(|| panic!("unknown author {name}"))
    }

    fn post_path(&self) -> String {
        let id = self.post_id.borrow().expect("a published post");
        format!("/posts/{id}")
    }

    fn register(&self, name: &str) {
        let account = self.runtime.block_on(register(&self.state, name));
        self.accounts.borrow_mut().insert(name.to_owned(), account);
    }

    /// Send a request as `author` (anonymous when `None`) and record it.
    fn perform(&self, author: Option<&str>, method: Method, path: &str, payload: Option<Value>) {
        let token = author.map(|name| self.account(name).token);
        let mut request = ApiRequest::new(method, path).token(token.as_deref());
        if let Some(payload) = payload {
            request = request.json(payload);
        }
        let response = self.runtime.block_on(send(&self.state, request));
        *self.last.borrow_mut() = Some(response);
    }

    /// Log `name` in again, keeping the rotated token and the new cookie.
    fn sign_in_with_session(&self, name: &str) {
        let login = self.runtime.block_on(log_in(&self.state, name));
        let cookie = login.cookie.clone().expect("session cookie");
        let token = login.field("authToken").as_str().expect("auth token");
        if let Some(account) = self.accounts.borrow_mut().get_mut(name) {
            token.clone_into(&mut account.token);
        }
        self.sessions.borrow_mut().insert(name.to_owned(), cookie);
    }

    /// Send a request carrying only `author`'s session cookie.
    fn browse(&self, author: &str, method: Method, path: &str, payload: Option<Value>) {
        let cookie = self.sessions.borrow().get(author).cloned();
        assert!(cookie.is_some(), "{author} has no session");
        let mut request = ApiRequest::new(method, path).cookie(cookie);
        if let Some(payload) = payload {
            request = request.json(payload);
        }
        let response = self.runtime.block_on(send(&self.state, request));
        if let Some(updated) = response.cookie.clone() {
            self.sessions.borrow_mut().insert(author.to_owned(), updated);
        }
        *self.last.borrow_mut() = Some(response);
    }

    fn last(&self) -> ApiResponse {
        self.last.borrow().clone().expect("a recorded response")
    }
}

#[fixture]
fn world() -> BlogWorld {
    BlogWorld::new()
}

#[given("a blog with authors {first} and {second}")]
fn a_blog_with_authors(world: &BlogWorld, first: String, second: String) {
    world.register(&first);
    world.register(&second);
}

#[given("{author} has published a post titled {title}")]
fn author_has_published_a_post(world: &BlogWorld, author: String, title: String) {
    world.perform(
        Some(&author),
        Method::POST,
        "/posts",
        Some(json!({ "title": title, "content": "Body text." })),
    );
    let created = world.last();
    assert_eq!(created.status.as_u16(), 201);
    *world.post_id.borrow_mut() = Some(created.id());
}

#[when("an anonymous visitor lists the posts")]
fn an_anonymous_visitor_lists_the_posts(world: &BlogWorld) {
    world.perform(None, Method::GET, "/posts", None);
}

#[when("an anonymous visitor creates a post titled {title}")]
fn an_anonymous_visitor_creates_a_post(world: &BlogWorld, title: String) {
    world.perform(
        None,
        Method::POST,
        "/posts",
        Some(json!({ "title": title, "content": "Body text." })),
    );
}

#[when("an anonymous visitor fetches the post")]
fn an_anonymous_visitor_fetches_the_post(world: &BlogWorld) {
    world.perform(None, Method::GET, &world.post_path(), None);
}

#[when("{author} renames the post to {title}")]
fn author_renames_the_post(world: &BlogWorld, author: String, title: String) {
    world.perform(
        Some(&author),
        Method::PATCH,
        &world.post_path(),
        Some(json!({ "title": title })),
    );
}

#[when("{author} deletes the post")]
fn author_deletes_the_post(world: &BlogWorld, author: String) {
    world.perform(Some(&author), Method::DELETE, &world.post_path(), None);
}

#[when("{author} comments {text} on the post")]
fn author_comments_on_the_post(world: &BlogWorld, author: String, text: String) {
    let path = format!("{}/comments", world.post_path());
    world.perform(
        Some(&author),
        Method::POST,
        &path,
        Some(json!({ "text": text })),
    );
}

#[when("{author} sets the bio of {target} to {bio}")]
fn author_sets_another_bio(world: &BlogWorld, author: String, target: String, bio: String) {
    let path = format!("/authors/{}/profile", world.account(&target).id);
    world.perform(Some(&author), Method::PATCH, &path, Some(json!({ "bio": bio })));
}

#[when("{author} sets their own bio to {bio} and avatar to {avatar}")]
fn author_sets_own_profile(world: &BlogWorld, author: String, bio: String, avatar: String) {
    let path = format!("/authors/{}/profile", world.account(&author).id);
    world.perform(
        Some(&author),
        Method::PATCH,
        &path,
        Some(json!({ "bio": bio, "avatar": avatar })),
    );
}

#[when("{author} deletes their account")]
fn author_deletes_their_account(world: &BlogWorld, author: String) {
    world.perform(
        Some(&author),
        Method::DELETE,
        "/auth/users/me",
        Some(json!({ "currentPassword": PASSWORD })),
    );
}

#[given("{author} signs in with a session cookie")]
fn author_signs_in_with_a_session_cookie(world: &BlogWorld, author: String) {
    world.sign_in_with_session(&author);
}

#[when("{author}'s browser retitles the post to {title}")]
fn browser_retitles_the_post(world: &BlogWorld, author: String, title: String) {
    world.browse(
        &author,
        Method::PATCH,
        &world.post_path(),
        Some(json!({ "title": title })),
    );
}

#[when("{author}'s browser replies {text} to the post")]
fn browser_replies_to_the_post(world: &BlogWorld, author: String, text: String) {
    let path = format!("{}/comments", world.post_path());
    world.browse(&author, Method::POST, &path, Some(json!({ "text": text })));
}

#[when("{author}'s browser publishes a post titled {title}")]
fn browser_publishes_a_post(world: &BlogWorld, author: String, title: String) {
    world.browse(
        &author,
        Method::POST,
        "/posts",
        Some(json!({ "title": title, "content": "Body text." })),
    );
}

#[then("the response status is {status}")]
fn the_response_status_is(world: &BlogWorld, status: u16) {
    let last = world.last();
    assert_eq!(last.status.as_u16(), status, "body: {}", last.body);
}

#[then("the post title is {title}")]
fn the_post_title_is(world: &BlogWorld, title: String) {
    assert_eq!(world.last().field("title").as_str(), Some(title.as_str()));
}

#[then("the post lists {count} comments ending with {text}")]
fn the_post_lists_comments(world: &BlogWorld, count: usize, text: String) {
    let last = world.last();
    let comments = last
        .field("comments")
        .as_array()
        .expect("comments array");
    assert_eq!(comments.len(), count);
    let newest = comments.last().expect("newest comment");
    assert_eq!(newest.get("text").and_then(Value::as_str), Some(text.as_str()));
}

#[then("the profile shows bio {bio} and avatar {avatar}")]
fn the_profile_shows(world: &BlogWorld, bio: String, avatar: String) {
    let last = world.last();
    let profile = last.field("profile");
    assert_eq!(profile.get("bio").and_then(Value::as_str), Some(bio.as_str()));
    assert_eq!(
        profile.get("avatar").and_then(Value::as_str),
        Some(avatar.as_str())
    );
}

#[scenario(path = "tests/features/ownership.feature")]
fn ownership_scenarios(world: BlogWorld) {
    drop(world);
}
