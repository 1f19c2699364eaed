//! Subscription HTTP handlers.
//!
//! ```text
//! GET    /api/v1/users/subscriptions
//! POST   /api/v1/users/{id}/subscribe
//! DELETE /api/v1/users/{id}/subscribe
//! ```

use actix_web::{HttpRequest, HttpResponse, delete, get, post, web};
use pagination::Page;
use tracing::info;

use crate::domain::{DEFAULT_RECIPES_LIMIT, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::query::{QueryParams, public_request_url};
use crate::inbound::http::recipe_dto::SubscriptionResponse;
use crate::inbound::http::schemas::{ErrorSchema, SubscriptionPageSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_page_request, parse_u32, parse_user_id};

fn recipes_limit(params: &QueryParams) -> Result<u32, Error> {
    params
        .first("recipes_limit")
        .map(|raw| parse_u32(raw, FieldName::new("recipes_limit")))
        .transpose()
        .map(|limit| limit.unwrap_or(DEFAULT_RECIPES_LIMIT))
}

/// Authors the caller follows, each with a preview of their newest recipes.
#[utoipa::path(
    get,
    path = "/api/v1/users/subscriptions",
    params(
        ("page" = Option<u32>, Query, description = "1-based page number"),
        ("limit" = Option<u32>, Query, description = "Page size, at most 100"),
        ("recipes_limit" = Option<u32>, Query, description = "Recipes previewed per author, default 3")
    ),
    responses(
        (status = 200, description = "Followed authors", body = SubscriptionPageSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema)
    ),
    tags = ["subscriptions"],
    operation_id = "listSubscriptions",
    security(("SessionCookie" = []))
)]
#[get("/users/subscriptions")]
pub async fn list_subscriptions(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
) -> ApiResult<web::Json<Page<SubscriptionResponse>>> {
    let follower = session.require_user_id()?;
    let params = QueryParams::from_request(&req);
    let page = parse_page_request(params.first("page"), params.first("limit"))?;
    let preview = recipes_limit(&params)?;
    let paged = state.subscriptions.list(&follower, page, preview).await?;
    let base = public_request_url(&state.public_base_url, &req)?;
    Ok(web::Json(
        Page::new(paged.items, paged.total, page, &base).map(SubscriptionResponse::from),
    ))
}

/// Follow an author.
#[utoipa::path(
    post,
    path = "/api/v1/users/{id}/subscribe",
    params(
        ("id" = String, Path, description = "Author id"),
        ("recipes_limit" = Option<u32>, Query, description = "Recipes previewed, default 3")
    ),
    responses(
        (status = 201, description = "Subscribed", body = SubscriptionResponse),
        (status = 400, description = "Self-subscription or already subscribed", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 404, description = "Author not found", body = ErrorSchema)
    ),
    tags = ["subscriptions"],
    operation_id = "subscribe",
    security(("SessionCookie" = []))
)]
#[post("/users/{id}/subscribe")]
pub async fn subscribe(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    let follower = session.require_user_id()?;
    let author = parse_user_id(&path, FieldName::new("id"))?;
    let preview = recipes_limit(&QueryParams::from_request(&req))?;
    let view = state
        .subscriptions
        .subscribe(&follower, &author, preview)
        .await?;
    info!(%follower, %author, "subscribed");
    Ok(HttpResponse::Created().json(SubscriptionResponse::from(view)))
}

/// Stop following an author.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}/subscribe",
    params(("id" = String, Path, description = "Author id")),
    responses(
        (status = 204, description = "Unsubscribed"),
        (status = 400, description = "Not subscribed", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 404, description = "Author not found", body = ErrorSchema)
    ),
    tags = ["subscriptions"],
    operation_id = "unsubscribe",
    security(("SessionCookie" = []))
)]
#[delete("/users/{id}/subscribe")]
pub async fn unsubscribe(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let follower = session.require_user_id()?;
    let author = parse_user_id(&path, FieldName::new("id"))?;
    state.subscriptions.unsubscribe(&follower, &author).await?;
    info!(%follower, %author, "unsubscribed");
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use serde_json::{Value, json};

    use crate::domain::{
        DEFAULT_RECIPES_LIMIT, Error, Paged, RecipeId, SubscriptionView, UserId, UserProfile,
    };
    use crate::inbound::http::test_utils::{TestPorts, sample_summary, session_cookie, test_app};

    fn view(author: UserId, previews: usize) -> SubscriptionView {
        SubscriptionView {
            author: UserProfile {
                id: author,
                username: "grace".to_owned(),
            },
            recipes: (0..previews)
                .map(|_| sample_summary(RecipeId::random()))
                .collect(),
            recipes_count: 5,
        }
    }

    #[actix_web::test]
    async fn list_uses_the_default_preview_size() {
        let follower = UserId::random();
        let author = UserId::random();
        let mut ports = TestPorts::default();
        ports
            .subscriptions
            .expect_list()
            .withf(move |seen, page, limit| {
                *seen == follower && page.page() == 1 && *limit == DEFAULT_RECIPES_LIMIT
            })
            .times(1)
            .returning(move |_, _, _| {
                Ok(Paged {
                    items: vec![view(author, 3)],
                    total: 1,
                })
            });
        let app = actix_test::init_service(test_app(ports)).await;
        let cookie = session_cookie(&app, &follower).await;

        let request = actix_test::TestRequest::get()
            .uri("/api/v1/users/subscriptions")
            .cookie(cookie)
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["count"], json!(1));
        let entry = &body["results"][0];
        assert_eq!(entry["id"], json!(author.to_string()));
        assert_eq!(entry["is_subscribed"], json!(true));
        assert_eq!(entry["recipes_count"], json!(5));
        assert_eq!(entry["recipes"].as_array().map(Vec::len), Some(3));
    }

    #[actix_web::test]
    async fn list_passes_an_explicit_preview_size() {
        let follower = UserId::random();
        let mut ports = TestPorts::default();
        ports
            .subscriptions
            .expect_list()
            .withf(|_, _, limit| *limit == 1)
            .times(1)
            .returning(|_, _, _| Ok(Paged::empty()));
        let app = actix_test::init_service(test_app(ports)).await;
        let cookie = session_cookie(&app, &follower).await;

        let request = actix_test::TestRequest::get()
            .uri("/api/v1/users/subscriptions?recipes_limit=1")
            .cookie(cookie)
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn list_requires_a_session() {
        let app = actix_test::init_service(test_app(TestPorts::default())).await;

        let request = actix_test::TestRequest::get()
            .uri("/api/v1/users/subscriptions")
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn subscribe_returns_the_author_entry() {
        let follower = UserId::random();
        let author = UserId::random();
        let mut ports = TestPorts::default();
        ports
            .subscriptions
            .expect_subscribe()
            .withf(move |seen_follower, seen_author, limit| {
                *seen_follower == follower && *seen_author == author && *limit == 2
            })
            .times(1)
            .returning(move |_, _, _| Ok(view(author, 2)));
        let app = actix_test::init_service(test_app(ports)).await;
        let cookie = session_cookie(&app, &follower).await;

        let request = actix_test::TestRequest::post()
            .uri(&format!("/api/v1/users/{author}/subscribe?recipes_limit=2"))
            .cookie(cookie)
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["username"], json!("grace"));
    }

    #[actix_web::test]
    async fn self_subscription_is_a_bad_request() {
        let user = UserId::random();
        let mut ports = TestPorts::default();
        ports
            .subscriptions
            .expect_subscribe()
            .times(1)
            .returning(|_, _, _| Err(Error::invalid_request("cannot subscribe to yourself")));
        let app = actix_test::init_service(test_app(ports)).await;
        let cookie = session_cookie(&app, &user).await;

        let request = actix_test::TestRequest::post()
            .uri(&format!("/api/v1/users/{user}/subscribe"))
            .cookie(cookie)
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn unsubscribe_returns_no_content() {
        let follower = UserId::random();
        let author = UserId::random();
        let mut ports = TestPorts::default();
        ports
            .subscriptions
            .expect_unsubscribe()
            .withf(move |seen_follower, seen_author| {
                *seen_follower == follower && *seen_author == author
            })
            .times(1)
            .returning(|_, _| Ok(()));
        let app = actix_test::init_service(test_app(ports)).await;
        let cookie = session_cookie(&app, &follower).await;

        let request = actix_test::TestRequest::delete()
            .uri(&format!("/api/v1/users/{author}/subscribe"))
            .cookie(cookie)
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[actix_web::test]
    async fn malformed_author_id_is_rejected() {
        let follower = UserId::random();
        let app = actix_test::init_service(test_app(TestPorts::default())).await;
        let cookie = session_cookie(&app, &follower).await;

        let request = actix_test::TestRequest::post()
            .uri("/api/v1/users/nobody/subscribe")
            .cookie(cookie)
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
