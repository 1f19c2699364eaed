//! Short-link redirect.
//!
//! ```text
//! GET /s/{token}
//! ```
//!
//! Mounted at the root rather than under `/api/v1` so shared links stay
//! short.

use actix_web::http::header;
use actix_web::{HttpResponse, get, web};

use crate::domain::{Error, ShortLinkToken};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Redirect a short token to the recipe's canonical URL.
///
/// Tokens of the wrong shape can never resolve, so they are reported as
/// missing rather than malformed.
#[utoipa::path(
    get,
    path = "/s/{token}",
    params(("token" = String, Path, description = "Short-link token")),
    responses(
        (status = 302, description = "Redirect to the recipe"),
        (status = 404, description = "Unknown token", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "followShortLink"
)]
#[get("/s/{token}")]
pub async fn follow_short_link(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let token = ShortLinkToken::new(path.into_inner())
        .map_err(|_| Error::not_found("short link not found"))?;
    let recipe = state.short_links.resolve(&token).await?;
    Ok(HttpResponse::Found()
        .insert_header((
            header::LOCATION,
            format!("{}/recipes/{recipe}", state.public_base_url),
        ))
        .finish())
}

#[cfg(test)]
mod tests {
    use actix_web::http::{StatusCode, header};
    use actix_web::test as actix_test;

    use crate::domain::{Error, RecipeId};
    use crate::inbound::http::test_utils::{TestPorts, test_app};

    #[actix_web::test]
    async fn known_token_redirects_to_the_recipe() {
        let recipe = RecipeId::random();
        let mut ports = TestPorts::default();
        ports
            .short_links
            .expect_resolve()
            .withf(|token| token.as_str() == "aB3dE5gH")
            .times(1)
            .returning(move |_| Ok(recipe));
        let app = actix_test::init_service(test_app(ports)).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/s/aB3dE5gH").to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::FOUND);
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok());
        assert_eq!(
            location,
            Some(format!("http://recipes.test/recipes/{recipe}").as_str())
        );
    }

    #[actix_web::test]
    async fn unknown_token_is_not_found() {
        let mut ports = TestPorts::default();
        ports
            .short_links
            .expect_resolve()
            .times(1)
            .returning(|_| Err(Error::not_found("short link not found")));
        let app = actix_test::init_service(test_app(ports)).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/s/zzzzzzzz").to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn malformed_token_is_not_found_without_lookup() {
        let app = actix_test::init_service(test_app(TestPorts::default())).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/s/bad!").to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
