//! Prometheus request metrics, wrapped so the app type is the same whether
//! or not a registry was configured.

use std::sync::Arc;

use actix_service::{
    Service, ServiceExt as _, Transform,
    boxed::{self, BoxService},
};
use actix_web::body::{BoxBody, MessageBody};
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::middleware::Compat;
use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use futures_util::future::LocalBoxFuture;

const NAMESPACE: &str = "recipes";
const ENDPOINT: &str = "/metrics";

/// Build the `/metrics` middleware.
///
/// # Errors
/// Returns an I/O error when the collectors cannot be registered.
pub(crate) fn prometheus() -> std::io::Result<PrometheusMetrics> {
    PrometheusMetricsBuilder::new(NAMESPACE)
        .endpoint(ENDPOINT)
        .build()
        .map_err(|err| std::io::Error::other(format!("prometheus setup failed: {err}")))
}

#[derive(Clone)]
pub(crate) struct MetricsLayer(Option<Arc<PrometheusMetrics>>);

impl MetricsLayer {
    pub(crate) fn new(metrics: Option<PrometheusMetrics>) -> Self {
        Self(metrics.map(Arc::new))
    }
}

type Boxed = BoxService<ServiceRequest, ServiceResponse<BoxBody>, actix_web::Error>;

impl<S, B> Transform<S, ServiceRequest> for MetricsLayer
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = Boxed;
    type Future = LocalBoxFuture<'static, Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        let Some(metrics) = self.0.clone() else {
            let passthrough = service.map(|res: ServiceResponse<B>| res.map_into_boxed_body());
            return Box::pin(async move { Ok(boxed::service(passthrough)) });
        };
        let wrapped = Compat::new((*metrics).clone()).new_transform(service);
        Box::pin(async move { Ok(boxed::service(wrapped.await?)) })
    }
}
