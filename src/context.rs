use std::rc::Rc;

use actix_service::{self, Transform};
use actix_web::{
    cookie::Cookie,
    dev::{Payload, Service, ServiceRequest, ServiceResponse},
    Error, FromRequest, HttpMessage, HttpRequest,
};
use futures::{
    future::{ready, LocalBoxFuture, Ready},
    FutureExt,
};

use urlencoding::encode;

use crate::forms::normalize_initials;

pub const INITIALS_COOKIE: &str = "hse_initials";
pub const FLASH_COOKIE: &str = "hse_flash";

/// Per-request display state: the initials tag and the pending flash message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub initials: String,
    pub flash: Option<String>,
}

impl RequestContext {
    pub fn from_cookies(req: &HttpRequest) -> Self {
        Self {
            initials: req
                .cookie(INITIALS_COOKIE)
                .map(|cookie| normalize_initials(cookie.value()))
                .unwrap_or_default(),
            flash: req
                .cookie(FLASH_COOKIE)
                .map(|cookie| cookie.value().to_string())
                .filter(|message| !message.is_empty()),
        }
    }
}

impl FromRequest for RequestContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let existing = req.extensions().get::<RequestContext>().cloned();
        ready(Ok(existing.unwrap_or_else(|| RequestContext::from_cookies(req))))
    }
}

/// Values are percent-encoded; requests decode them when parsing cookies.
pub fn initials_cookie(initials: &str) -> Cookie<'static> {
    Cookie::build(INITIALS_COOKIE, encode(initials).into_owned())
        .path("/")
        .http_only(true)
        .finish()
}

pub fn flash_cookie(message: &str) -> Cookie<'static> {
    Cookie::build(FLASH_COOKIE, encode(message).into_owned())
        .path("/")
        .http_only(true)
        .finish()
}

pub struct RequestContextMiddleware<S> {
    service: Rc<S>,
}
pub struct RequestContextMiddlewareFactory;

impl<S, B> Service<ServiceRequest> for RequestContextMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    actix_service::forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv: Rc<S> = self.service.clone();

        async move {
            let ctx: RequestContext = RequestContext::from_cookies(req.request());
            let pending_flash: bool = ctx.flash.is_some();
            req.extensions_mut().insert::<RequestContext>(ctx);

            let mut res: ServiceResponse<B> = srv.call(req).await?;

            // A rendered page has shown the flash; redirects carry it forward.
            if pending_flash && res.status().is_success() {
                let removal = Cookie::build(FLASH_COOKIE, "").path("/").finish();
                if let Err(error) = res.response_mut().add_removal_cookie(&removal) {
                    tracing::warn!(%error, "could not clear flash cookie");
                }
            }
            Ok(res)
        }
        .boxed_local()
    }
}
impl<S, B> Transform<S, ServiceRequest> for RequestContextMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = RequestContextMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestContextMiddleware {
            service: Rc::new(service),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{get, http::StatusCode, test, App, HttpResponse};

    #[get("/probe")]
    async fn probe(ctx: RequestContext) -> HttpResponse {
        HttpResponse::Ok().body(format!(
            "{}|{}",
            ctx.initials,
            ctx.flash.unwrap_or_default()
        ))
    }

    #[get("/bounce")]
    async fn bounce(ctx: RequestContext) -> HttpResponse {
        HttpResponse::SeeOther()
            .insert_header(("Location", "/probe"))
            .body(ctx.initials)
    }

    #[actix_web::test]
    async fn context_is_built_from_cookies() {
        let app = test::init_service(
            App::new()
                .wrap(RequestContextMiddlewareFactory)
                .service(probe),
        )
        .await;
        let req = test::TestRequest::get()
            .uri("/probe")
            .cookie(Cookie::new(INITIALS_COOKIE, "mz"))
            .cookie(Cookie::new(FLASH_COOKIE, "Saved"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);

        let cleared = res
            .response()
            .cookies()
            .any(|cookie| cookie.name() == FLASH_COOKIE && cookie.value().is_empty());
        assert!(cleared);

        let body = test::read_body(res).await;
        assert_eq!(body, "MZ|Saved");
    }

    #[actix_web::test]
    async fn redirects_keep_the_flash() {
        let app = test::init_service(
            App::new()
                .wrap(RequestContextMiddlewareFactory)
                .service(bounce),
        )
        .await;
        let req = test::TestRequest::get()
            .uri("/bounce")
            .cookie(Cookie::new(FLASH_COOKIE, "Saved"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(res.response().cookies().count(), 0);
    }

    #[actix_web::test]
    async fn flash_cookie_round_trips_accented_text() {
        let cookie = flash_cookie("Formation supprimée.");
        assert!(cookie.to_string().is_ascii());

        let req = test::TestRequest::default()
            .insert_header((
                actix_web::http::header::COOKIE,
                format!("{}={}", cookie.name(), cookie.value()),
            ))
            .to_http_request();
        let ctx = RequestContext::from_cookies(&req);
        assert_eq!(ctx.flash.as_deref(), Some("Formation supprimée."));
    }

    #[actix_web::test]
    async fn extractor_works_without_middleware() {
        let app = test::init_service(App::new().service(probe)).await;
        let req = test::TestRequest::get()
            .uri("/probe")
            .cookie(Cookie::new(INITIALS_COOKIE, "abcdefgh"))
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, "ABCDEF|");
    }
}
