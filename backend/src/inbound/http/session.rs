//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Wraps the Actix cookie session so handlers only persist, read or purge the
//! signed-in author id.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;

use crate::domain::{AuthorId, Error};

pub(crate) const AUTHOR_ID_KEY: &str = "author_id";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Remember `author` as the signed-in author.
    pub fn persist_author(&self, author: AuthorId) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(AUTHOR_ID_KEY, author.get())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Signed-in author, if any. A cookie value that does not decode is
    /// treated as signed out.
    pub fn author_id(&self) -> Result<Option<AuthorId>, Error> {
        match self.0.get::<i64>(AUTHOR_ID_KEY) {
            Ok(id) => Ok(id.map(AuthorId::new)),
            Err(error) => {
                tracing::warn!(%error, "invalid author id in session cookie");
                Ok(None)
            }
        }
    }

    /// Forget the signed-in author and drop the cookie.
    pub fn purge(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};

    use crate::inbound::http::test_utils::test_session_middleware;

    #[actix_web::test]
    async fn round_trips_author_id_and_purges() {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route(
                    "/set",
                    web::get().to(|session: SessionContext| async move {
                        session.persist_author(AuthorId::new(42))?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                )
                .route(
                    "/get",
                    web::get().to(|session: SessionContext| async move {
                        let id = session.author_id()?;
                        Ok::<_, Error>(HttpResponse::Ok().body(format!("{id:?}")))
                    }),
                ),
        )
        .await;

        let set_res =
            test::call_service(&app, test::TestRequest::get().uri("/set").to_request()).await;
        assert_eq!(set_res.status(), StatusCode::OK);
        let cookie = set_res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set")
            .into_owned();

        let get_res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/get")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        let body = test::read_body(get_res).await;
        assert_eq!(body, "Some(AuthorId(42))");
    }

    #[actix_web::test]
    async fn missing_cookie_reads_as_signed_out() {
        let app = test::init_service(App::new().wrap(test_session_middleware()).route(
            "/get",
            web::get().to(|session: SessionContext| async move {
                let id = session.author_id()?;
                Ok::<_, Error>(HttpResponse::Ok().body(format!("{}", id.is_none())))
            }),
        ))
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/get").to_request()).await;
        assert_eq!(test::read_body(res).await, "true");
    }
}
