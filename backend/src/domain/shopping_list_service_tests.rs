//! Tests for the shopping list service.

use std::sync::Arc;

use super::*;
use crate::domain::ports::{
    MockShoppingListRenderer, MockShoppingListRepository, ShoppingListRenderError,
};
use crate::domain::{CartIngredientLine, ErrorCode, IngredientId, RecipeId};

fn line(recipe_id: RecipeId, id: i64, name: &str, amount: i32) -> CartIngredientLine {
    CartIngredientLine {
        recipe_id,
        ingredient_id: IngredientId(id),
        name: name.to_owned(),
        measurement_unit: "g".to_owned(),
        amount,
    }
}

fn plain_document(body: &str) -> ShoppingListDocument {
    ShoppingListDocument {
        file_name: "shopping_list.txt".to_owned(),
        content_type: "text/plain; charset=utf-8".to_owned(),
        body: body.as_bytes().to_vec(),
    }
}

#[tokio::test]
async fn build_sums_amounts_across_recipes() {
    let pancakes = RecipeId::random();
    let bread = RecipeId::random();
    let mut repo = MockShoppingListRepository::new();
    repo.expect_cart_lines().times(1).return_once(move |_| {
        Ok(vec![
            line(pancakes, 1, "flour", 200),
            line(bread, 1, "flour", 300),
            line(pancakes, 2, "eggs", 2),
        ])
    });

    let service = ShoppingListService::new(Arc::new(repo), Arc::new(MockShoppingListRenderer::new()));
    let list = service
        .build(&UserId::random())
        .await
        .expect("build succeeds");

    let items = list.items();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].name, "eggs");
    assert_eq!(items[1].name, "flour");
    assert_eq!(items[1].total_amount, 500);
}

#[tokio::test]
async fn empty_cart_builds_empty_list() {
    let mut repo = MockShoppingListRepository::new();
    repo.expect_cart_lines()
        .times(1)
        .return_once(|_| Ok(Vec::new()));

    let service = ShoppingListService::new(Arc::new(repo), Arc::new(MockShoppingListRenderer::new()));
    let list = service
        .build(&UserId::random())
        .await
        .expect("build succeeds");

    assert_eq!(list, ShoppingList::empty());
}

#[tokio::test]
async fn download_renders_with_configured_template() {
    let mut repo = MockShoppingListRepository::new();
    repo.expect_cart_lines()
        .times(1)
        .return_once(|_| Ok(vec![line(RecipeId::random(), 1, "flour", 200)]));
    let mut renderer = MockShoppingListRenderer::new();
    renderer
        .expect_render()
        .times(1)
        .withf(|list, template| list.items().len() == 1 && template.line == "{name}: {amount}")
        .return_once(|_, _| Ok(plain_document("flour: 200\n")));

    let template = ShoppingListTemplate {
        line: "{name}: {amount}".to_owned(),
        ..ShoppingListTemplate::default()
    };
    let service = ShoppingListService::with_template(Arc::new(repo), Arc::new(renderer), template);
    let document = service
        .download(&UserId::random())
        .await
        .expect("download succeeds");

    assert_eq!(document.body, b"flour: 200\n".to_vec());
}

#[tokio::test]
async fn render_failure_is_internal() {
    let mut repo = MockShoppingListRepository::new();
    repo.expect_cart_lines()
        .times(1)
        .return_once(|_| Ok(Vec::new()));
    let mut renderer = MockShoppingListRenderer::new();
    renderer
        .expect_render()
        .times(1)
        .return_once(|_, _| Err(ShoppingListRenderError::template("unknown placeholder {x}")));

    let service = ShoppingListService::new(Arc::new(repo), Arc::new(renderer));
    let error = service
        .download(&UserId::random())
        .await
        .expect_err("render fails");

    assert_eq!(error.code(), ErrorCode::InternalError);
}

#[tokio::test]
async fn connection_failure_is_service_unavailable() {
    let mut repo = MockShoppingListRepository::new();
    repo.expect_cart_lines()
        .times(1)
        .return_once(|_| Err(ShoppingListRepositoryError::connection("refused")));

    let service = ShoppingListService::new(Arc::new(repo), Arc::new(MockShoppingListRenderer::new()));
    let error = service
        .build(&UserId::random())
        .await
        .expect_err("unavailable");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}
