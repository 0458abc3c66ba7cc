//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint, the schema wrappers from
//! [`crate::inbound::http::schemas`] and the two authentication schemes:
//! the `session` cookie and the `Authorization: Token <key>` header.
//!
//! Swagger UI serves the document in debug builds; `openapi-dump` prints it.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema, PostPageSchema};

/// Enrich the generated document with the cookie and token schemes.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/auth/token/login.",
            ))),
        );
        components.add_security_scheme(
            "Token",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                "Authorization",
                "API token from POST /api/v1/auth/token/login, sent as `Token <key>`.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Blog backend API",
        description = "Posts, comments and author profiles with owner-only edits."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = []), ("Token" = [])),
    paths(
        crate::inbound::http::accounts::sign_up,
        crate::inbound::http::accounts::current_author,
        crate::inbound::http::accounts::delete_account,
        crate::inbound::http::accounts::log_in,
        crate::inbound::http::accounts::log_out,
        crate::inbound::http::posts::list_posts,
        crate::inbound::http::posts::create_post,
        crate::inbound::http::posts::get_post,
        crate::inbound::http::posts::replace_post,
        crate::inbound::http::posts::patch_post,
        crate::inbound::http::posts::delete_post,
        crate::inbound::http::posts::comment_on_post,
        crate::inbound::http::posts::delete_comment,
        crate::inbound::http::authors::list_authors,
        crate::inbound::http::authors::get_author,
        crate::inbound::http::authors::patch_author,
        crate::inbound::http::authors::update_profile,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(ErrorSchema, ErrorCodeSchema, PostPageSchema)),
    tags(
        (name = "accounts", description = "Sign-up, token login and account removal"),
        (name = "posts", description = "Posts and their comments"),
        (name = "authors", description = "Author pages and profiles"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
