//! HTTP inbound adapter exposing the blog REST endpoints.
//!
//! Handlers translate JSON to driving-port calls and back; authorisation and
//! validation live in the domain.

pub mod accounts;
pub mod authors;
pub mod error;
pub mod health;
pub mod posts;
pub mod principal;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;

use actix_web::web;

pub use error::ApiResult;

/// Register every `/api/v1` route and the extractor error handlers.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use backend::inbound::http::configure;
///
/// let app = App::new().service(web::scope("/api/v1").configure(configure));
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::PathConfig::default().error_handler(error::path_error_handler))
        .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
        .service(accounts::sign_up)
        .service(accounts::current_author)
        .service(accounts::delete_account)
        .service(accounts::log_in)
        .service(accounts::log_out)
        .service(posts::list_posts)
        .service(posts::create_post)
        .service(posts::get_post)
        .service(posts::replace_post)
        .service(posts::patch_post)
        .service(posts::delete_post)
        .service(posts::comment_on_post)
        .service(posts::delete_comment)
        .service(authors::list_authors)
        .service(authors::get_author)
        .service(authors::patch_author)
        .service(authors::update_profile);
}
