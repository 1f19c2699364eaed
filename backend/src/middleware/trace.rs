//! Middleware scoping every request to a [`TraceId`].
//!
//! A well-formed UUID in the incoming `trace-id` header is reused so callers
//! can correlate across services; otherwise a fresh identifier is generated.
//! The identifier is echoed back in the `trace-id` response header.

use std::task::{Context, Poll};

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{debug, error};

use crate::domain::TraceId;

/// Header used to propagate the trace identifier in both directions.
pub const TRACE_ID_HEADER: &str = "trace-id";

/// Tracing middleware factory.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use recipe_backend::Trace;
///
/// let _app = App::new().wrap(Trace);
/// ```
#[derive(Clone)]
pub struct Trace;

impl<S, B> Transform<S, ServiceRequest> for Trace
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TraceMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TraceMiddleware { service }))
    }
}

/// Service produced by [`Trace`].
pub struct TraceMiddleware<S> {
    service: S,
}

fn inbound_trace_id(req: &ServiceRequest) -> Option<TraceId> {
    let raw = req.headers().get(TRACE_ID_HEADER)?.to_str().ok()?;
    match raw.parse() {
        Ok(id) => Some(id),
        Err(_) => {
            debug!(value = raw, "ignoring malformed inbound trace id");
            None
        }
    }
}

impl<S, B> Service<ServiceRequest> for TraceMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let trace_id = inbound_trace_id(&req).unwrap_or_else(TraceId::generate);
        let inner = self.service.call(req);
        Box::pin(TraceId::scope(trace_id, async move {
            let mut res = inner.await?;
            match HeaderValue::from_str(&trace_id.to_string()) {
                Ok(value) => {
                    res.response_mut()
                        .headers_mut()
                        .insert(HeaderName::from_static(TRACE_ID_HEADER), value);
                }
                Err(err) => {
                    error!(error = %err, %trace_id, "failed to encode trace id header");
                }
            }
            Ok(res)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, test, web};
    use rstest::rstest;

    async fn echo_current_trace_id() -> HttpResponse {
        match TraceId::current() {
            Some(id) => HttpResponse::Ok().body(id.to_string()),
            None => HttpResponse::InternalServerError().finish(),
        }
    }

    #[rstest]
    #[actix_web::test]
    async fn handler_sees_the_same_id_as_the_response_header() {
        let app = test::init_service(
            App::new()
                .wrap(Trace)
                .route("/", web::get().to(echo_current_trace_id)),
        )
        .await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        let header = res
            .headers()
            .get(TRACE_ID_HEADER)
            .expect("trace id header")
            .to_str()
            .expect("ascii header")
            .to_owned();
        let body = test::read_body(res).await;
        assert_eq!(header.as_bytes(), body.as_ref());
    }

    #[rstest]
    #[case("7f0c2a4e-2f6b-4f60-9d5b-0d5c8a3b6e11", true)]
    #[case("not-a-trace-id", false)]
    #[actix_web::test]
    async fn inbound_header_is_reused_only_when_valid(#[case] inbound: &str, #[case] reused: bool) {
        let app = test::init_service(
            App::new()
                .wrap(Trace)
                .route("/", web::get().to(echo_current_trace_id)),
        )
        .await;
        let req = test::TestRequest::get()
            .uri("/")
            .insert_header((TRACE_ID_HEADER, inbound))
            .to_request();
        let res = test::call_service(&app, req).await;
        let header = res
            .headers()
            .get(TRACE_ID_HEADER)
            .expect("trace id header")
            .to_str()
            .expect("ascii header")
            .to_owned();
        assert_eq!(header == inbound, reused);
    }
}
