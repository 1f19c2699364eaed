//! Behaviour tests for favorites, the shopping cart and the aggregated
//! shopping list, backed by embedded PostgreSQL.
//!
//! When the cluster is unavailable the world carries no services and every
//! step is a no-op, mirroring the skip policy in `support`.

use std::cell::RefCell;

use recipe_backend::domain::ports::{CollectionCommand, RecipeCommand, ShoppingListQuery};
use recipe_backend::domain::{CollectionKind, Error, ErrorCode, RecipeId, UserId};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

mod support;

use support::seed::{count_rows_for_user, insert_user};
use support::services::{Services, services};

struct CartWorld {
    services: Option<Services>,
    cook: RefCell<Option<UserId>>,
    recipes: RefCell<Vec<RecipeId>>,
    last_change: RefCell<Option<Result<(), Error>>>,
}

impl CartWorld {
    fn cook(&self) -> UserId {
        self.cook.borrow().expect("cook seeded")
    }

    fn first_recipe(&self) -> RecipeId {
        *self.recipes.borrow().first().expect("recipe seeded")
    }

    fn add_recipe(&self, services: &Services, name: &str, flour: i32) {
        let draft = services.draft(name, &["breakfast"], &[("flour", flour)]);
        let view = services
            .block_on(services.recipes.create(&self.cook(), draft))
            .expect("recipe created");
        self.recipes.borrow_mut().push(view.recipe.id);
    }

    fn record(&self, outcome: Result<(), Error>) {
        *self.last_change.borrow_mut() = Some(outcome);
    }

    fn last_error_code(&self) -> ErrorCode {
        match self.last_change.borrow().as_ref().expect("a change was made") {
            Ok(()) => panic!("expected the last change to fail"),
            Err(error) => error.code(),
        }
    }
}

#[fixture]
fn world() -> CartWorld {
    CartWorld {
        services: services(),
        cook: RefCell::new(None),
        recipes: RefCell::new(Vec::new()),
        last_change: RefCell::new(None),
    }
}

#[given("a cook and a recipe with {amount} g of flour")]
fn a_cook_and_a_recipe(world: &CartWorld, amount: i32) {
    let Some(services) = world.services.as_ref() else {
        return;
    };
    *world.cook.borrow_mut() = Some(insert_user(services.url(), "cook"));
    world.add_recipe(services, "Bread", amount);
}

#[given("another recipe with {amount} g of flour")]
fn another_recipe(world: &CartWorld, amount: i32) {
    let Some(services) = world.services.as_ref() else {
        return;
    };
    world.add_recipe(services, "Pizza", amount);
}

#[when("the cook favorites the first recipe")]
fn the_cook_favorites_the_first_recipe(world: &CartWorld) {
    let Some(services) = world.services.as_ref() else {
        return;
    };
    let outcome = services
        .block_on(services.collections.add(
            CollectionKind::Favorite,
            &world.cook(),
            &world.first_recipe(),
        ))
        .map(|_| ());
    world.record(outcome);
}

#[when("the cook removes the first recipe from the cart")]
fn the_cook_removes_the_first_recipe_from_the_cart(world: &CartWorld) {
    let Some(services) = world.services.as_ref() else {
        return;
    };
    let outcome = services.block_on(services.collections.remove(
        CollectionKind::Cart,
        &world.cook(),
        &world.first_recipe(),
    ));
    world.record(outcome);
}

#[when("the cook adds every recipe to the cart")]
fn the_cook_adds_every_recipe_to_the_cart(world: &CartWorld) {
    let Some(services) = world.services.as_ref() else {
        return;
    };
    let recipes = world.recipes.borrow().clone();
    for recipe in recipes {
        services
            .block_on(
                services
                    .collections
                    .add(CollectionKind::Cart, &world.cook(), &recipe),
            )
            .expect("recipe added to cart");
    }
}

#[then("the last collection change is rejected as a conflict")]
fn the_last_change_is_a_conflict(world: &CartWorld) {
    if world.services.is_none() {
        return;
    }
    assert_eq!(world.last_error_code(), ErrorCode::Conflict);
}

#[then("the last collection change reports nothing removed")]
fn the_last_change_reports_nothing_removed(world: &CartWorld) {
    if world.services.is_none() {
        return;
    }
    assert_eq!(world.last_error_code(), ErrorCode::InvalidRequest);
}

#[then("the cook has {count} favorite stored")]
fn the_cook_has_favorites_stored(world: &CartWorld, count: i64) {
    let Some(services) = world.services.as_ref() else {
        return;
    };
    let stored = count_rows_for_user(services.url(), "favorites", "user_id", &world.cook());
    assert_eq!(stored, count);
}

#[then("the shopping list has a single flour line of {total}")]
fn the_shopping_list_has_a_single_flour_line(world: &CartWorld, total: u64) {
    let Some(services) = world.services.as_ref() else {
        return;
    };
    let list = services
        .block_on(services.shopping_list.build(&world.cook()))
        .expect("shopping list built");
    let lines: Vec<_> = list
        .items()
        .iter()
        .map(|item| (item.name.as_str(), item.measurement_unit.as_str(), item.total_amount))
        .collect();
    assert_eq!(lines, [("flour", "g", total)]);
}

#[then("the shopping list is empty")]
fn the_shopping_list_is_empty(world: &CartWorld) {
    let Some(services) = world.services.as_ref() else {
        return;
    };
    let list = services
        .block_on(services.shopping_list.build(&world.cook()))
        .expect("shopping list built");
    assert!(list.is_empty());
}

#[then("the downloaded shopping list is plain text listing flour")]
fn the_downloaded_list_is_plain_text(world: &CartWorld) {
    let Some(services) = world.services.as_ref() else {
        return;
    };
    let document = services
        .block_on(services.shopping_list.download(&world.cook()))
        .expect("shopping list rendered");
    assert!(document.content_type.starts_with("text/plain"));
    let body = String::from_utf8(document.body).expect("utf-8 body");
    assert!(body.contains("flour"), "body was {body:?}");
}

#[scenario(
    path = "tests/features/collections.feature",
    name = "Favoriting a recipe twice stores it once"
)]
fn favoriting_twice_stores_once(world: CartWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/collections.feature",
    name = "Removing a recipe that is not in the cart"
)]
fn removing_absent_cart_entry(world: CartWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/collections.feature",
    name = "Shared ingredients are summed across the cart"
)]
fn shared_ingredients_are_summed(world: CartWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/collections.feature",
    name = "An empty cart yields an empty shopping list"
)]
fn empty_cart_yields_empty_list(world: CartWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/collections.feature",
    name = "The shopping list downloads as plain text"
)]
fn shopping_list_downloads_as_text(world: CartWorld) {
    drop(world);
}
