//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{Session, SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpResponse, test, web};

use crate::domain::{Recipe, RecipeId, RecipeSummary, RecipeView, UserId, UserProfile};
use crate::domain::ports::{
    MockCollectionCommand, MockRecipeCommand, MockRecipeQuery, MockReferenceDataQuery,
    MockShoppingListQuery, MockShortLinkCommand, MockSubscriptionCommand,
};
use crate::inbound::http::configure_api;
use crate::inbound::http::session::USER_ID_KEY;
use crate::inbound::http::short_links::follow_short_link;
use crate::inbound::http::state::{HttpState, HttpStatePorts};

/// Public base URL used when handlers build absolute links in tests.
pub const TEST_BASE_URL: &str = "http://recipes.test";

/// Build a session middleware configured for tests.
///
/// Generates a fresh key per invocation, names the cookie `session` and
/// disables the `Secure` flag for plain HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Stand-in for the external authentication layer: stores the path segment
/// as the session user id.
pub async fn login_route(session: Session, id: web::Path<String>) -> HttpResponse {
    session
        .insert(USER_ID_KEY, id.into_inner())
        .expect("store user id in test session");
    HttpResponse::Ok().finish()
}

/// Log `user` in through [`login_route`] and return the session cookie.
pub async fn session_cookie<S, B>(app: &S, user: &UserId) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let res = test::call_service(
        app,
        test::TestRequest::get()
            .uri(&format!("/test/login/{user}"))
            .to_request(),
    )
    .await;
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}

/// Mocked driving ports. Unconfigured mocks panic when called, so each test
/// only sets expectations for the port it exercises.
#[derive(Default)]
pub struct TestPorts {
    pub recipes: MockRecipeCommand,
    pub recipes_query: MockRecipeQuery,
    pub collections: MockCollectionCommand,
    pub shopping_list: MockShoppingListQuery,
    pub short_links: MockShortLinkCommand,
    pub subscriptions: MockSubscriptionCommand,
    pub reference_data: MockReferenceDataQuery,
}

impl TestPorts {
    /// Wrap the mocks in handler state.
    pub fn into_state(self) -> web::Data<HttpState> {
        web::Data::new(HttpState::new(
            HttpStatePorts {
                recipes: Arc::new(self.recipes),
                recipes_query: Arc::new(self.recipes_query),
                collections: Arc::new(self.collections),
                shopping_list: Arc::new(self.shopping_list),
                short_links: Arc::new(self.short_links),
                subscriptions: Arc::new(self.subscriptions),
                reference_data: Arc::new(self.reference_data),
            },
            TEST_BASE_URL,
        ))
    }
}

/// Application with every API route, the short-link redirect and the test
/// login route.
pub fn test_app(
    ports: TestPorts,
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
        .app_data(ports.into_state())
        .wrap(test_session_middleware())
        .route("/test/login/{id}", web::get().to(login_route))
        .service(web::scope("/api/v1").configure(configure_api))
        .service(follow_short_link)
}

/// A recipe by `author` with no tags or ingredients.
pub fn sample_view(id: RecipeId, author: UserId) -> RecipeView {
    RecipeView {
        recipe: Recipe {
            id,
            author: UserProfile {
                id: author,
                username: "ada".to_owned(),
            },
            name: "Pancakes".to_owned(),
            text: "Mix and fry.".to_owned(),
            image: "pancakes.png".to_owned(),
            cooking_time: 20,
            created_at: chrono::DateTime::<chrono::Utc>::UNIX_EPOCH,
            tags: Vec::new(),
            ingredients: Vec::new(),
        },
        is_favorited: false,
        is_in_shopping_cart: false,
    }
}

/// Summary of [`sample_view`].
pub fn sample_summary(id: RecipeId) -> RecipeSummary {
    RecipeSummary {
        id,
        name: "Pancakes".to_owned(),
        image: "pancakes.png".to_owned(),
        cooking_time: 20,
    }
}
