//! Domain services wired to Diesel adapters over a temporary database.

use std::sync::Arc;

use mockable::DefaultClock;
use recipe_backend::domain::ports::ReferenceDataQuery;
use recipe_backend::domain::{
    CollectionService, IngredientEntry, IngredientId, RandomTokenSource, RecipeDraft,
    RecipeService, ReferenceDataService, ShoppingListService, ShortLinkService,
    SubscriptionService, TagId,
};
use recipe_backend::outbound::persistence::{
    DbPool, DieselCollectionRepository, DieselRecipeRepository, DieselReferenceDataRepository,
    DieselShoppingListRepository, DieselShortLinkRepository, DieselSubscriptionRepository,
    PoolConfig,
};
use recipe_backend::outbound::rendering::PlainTextShoppingListRenderer;
use tokio::runtime::Runtime;

use super::seed::{INGREDIENTS_CSV, TAGS_CSV};
use super::{TestDatabase, test_database};

pub type Recipes = RecipeService<DieselRecipeRepository>;
pub type Collections = CollectionService<DieselCollectionRepository, DieselRecipeRepository>;
pub type ShoppingLists =
    ShoppingListService<DieselShoppingListRepository, PlainTextShoppingListRenderer>;

pub struct Services {
    pub recipes: Recipes,
    pub collections: Collections,
    pub shopping_list: ShoppingLists,
    pub short_links: ShortLinkService<DieselShortLinkRepository>,
    pub subscriptions: SubscriptionService<DieselSubscriptionRepository>,
    pub reference_data: ReferenceDataService<DieselReferenceDataRepository>,
    pub pool: DbPool,
    // Dropped after the pool so the database has no open connections.
    pub runtime: Runtime,
    pub database: TestDatabase,
}

impl Services {
    pub fn url(&self) -> &str {
        self.database.url()
    }

    /// Run `future` on the suite's runtime.
    pub fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Id of the tag with `slug`.
    pub fn tag(&self, slug: &str) -> TagId {
        let tags = self
            .block_on(self.reference_data.list_tags())
            .expect("tags load");
        tags.into_iter()
            .find(|tag| tag.slug == slug)
            .unwrap_or_else(|| panic!("tag {slug} seeded"))
            .id
    }

    /// Id of the ingredient named `name`.
    pub fn ingredient(&self, name: &str) -> IngredientId {
        let found = self
            .block_on(self.reference_data.search_ingredients(Some(name.to_owned())))
            .expect("ingredients load");
        found
            .into_iter()
            .find(|ingredient| ingredient.name == name)
            .unwrap_or_else(|| panic!("ingredient {name} seeded"))
            .id
    }

    /// A valid draft using seeded reference data.
    pub fn draft(&self, name: &str, tags: &[&str], ingredients: &[(&str, i32)]) -> RecipeDraft {
        RecipeDraft {
            name: name.to_owned(),
            text: "Mix everything and cook.".to_owned(),
            image: Some(format!("{}.png", name.to_lowercase())),
            cooking_time: 15,
            tags: tags.iter().map(|slug| self.tag(slug)).collect(),
            ingredients: ingredients
                .iter()
                .map(|(name, amount)| IngredientEntry {
                    ingredient_id: self.ingredient(name),
                    amount: *amount,
                })
                .collect(),
        }
    }
}

fn build(database: TestDatabase) -> Result<Services, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let config = PoolConfig::new(database.url()).with_max_size(4);
    let pool = runtime
        .block_on(DbPool::new(config))
        .map_err(|err| err.to_string())?;

    let recipes_repo = Arc::new(DieselRecipeRepository::new(pool.clone()));
    let reference_data =
        ReferenceDataService::new(Arc::new(DieselReferenceDataRepository::new(pool.clone())));
    runtime
        .block_on(async {
            reference_data.import_ingredients_csv(INGREDIENTS_CSV).await?;
            reference_data.import_tags_csv(TAGS_CSV).await
        })
        .map_err(|err| format!("seed reference data: {err}"))?;

    Ok(Services {
        recipes: RecipeService::new(recipes_repo.clone(), Arc::new(DefaultClock)),
        collections: CollectionService::new(
            Arc::new(DieselCollectionRepository::new(pool.clone())),
            recipes_repo,
        ),
        shopping_list: ShoppingListService::new(
            Arc::new(DieselShoppingListRepository::new(pool.clone())),
            Arc::new(PlainTextShoppingListRenderer),
        ),
        short_links: ShortLinkService::new(
            Arc::new(DieselShortLinkRepository::new(pool.clone())),
            Arc::new(RandomTokenSource),
        ),
        subscriptions: SubscriptionService::new(Arc::new(DieselSubscriptionRepository::new(
            pool.clone(),
        ))),
        reference_data,
        pool,
        runtime,
        database,
    })
}

/// Services over a fresh database, or `None` when the suite is skipped.
pub fn services() -> Option<Services> {
    let database = test_database()?;
    match build(database) {
        Ok(services) => Some(services),
        Err(reason) => panic!("service setup failed: {reason}"),
    }
}
