//! Server construction and middleware wiring.
//!
//! The JSON API lives under `/api/v1` behind the cookie session; short-link
//! redirects and probes sit at the root without a session.

mod config;
#[cfg(feature = "metrics")]
pub(crate) mod metrics;
mod state_builders;

pub use config::ServerConfig;

#[cfg(feature = "metrics")]
use metrics::MetricsLayer;
use state_builders::build_http_state;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite, time::Duration};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use recipe_backend::Trace;
#[cfg(debug_assertions)]
use recipe_backend::doc::ApiDoc;
use recipe_backend::inbound::http::configure_api;
use recipe_backend::inbound::http::health::{HealthState, live, ready};
use recipe_backend::inbound::http::short_links::follow_short_link;
use recipe_backend::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

const SESSION_COOKIE: &str = "session";
const SESSION_TTL_DAYS: i64 = 14;

#[derive(Clone)]
struct SessionCookie {
    key: Key,
    secure: bool,
    same_site: SameSite,
}

impl SessionCookie {
    /// Private (encrypted) cookie store; nothing is kept server side.
    fn middleware(self) -> SessionMiddleware<CookieSessionStore> {
        SessionMiddleware::builder(CookieSessionStore::default(), self.key)
            .cookie_name(SESSION_COOKIE.into())
            .cookie_path("/".into())
            .cookie_secure(self.secure)
            .cookie_http_only(true)
            .cookie_content_security(CookieContentSecurity::Private)
            .cookie_same_site(self.same_site)
            .session_lifecycle(
                PersistentSession::default().session_ttl(Duration::days(SESSION_TTL_DAYS)),
            )
            .build()
    }
}

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    cookie: SessionCookie,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let api = web::scope("/api/v1")
        .wrap(cookie.middleware())
        .configure(configure_api);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(follow_short_link)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Bind the HTTP server.
///
/// Readiness is flipped once the listener is bound; the returned [`Server`]
/// must be awaited to serve requests.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = build_http_state(&config);
    let cookie = SessionCookie {
        key: config.key,
        secure: config.cookie_secure,
        same_site: config.same_site,
    };
    let bind_addr = config.bind_addr;

    #[cfg(feature = "metrics")]
    let metrics_layer = MetricsLayer::new(config.prometheus);

    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        let app = build_app(
            server_health_state.clone(),
            http_state.clone(),
            cookie.clone(),
        );

        #[cfg(feature = "metrics")]
        let app = app.wrap(metrics_layer.clone());

        app
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
